// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The typed per-record encode/decode passes, per §4.6.
//!
//! One generic walk serves every `DataType` variant (imagette is simply the
//! one-field case): for each record, for each field in `DataType::fields()`
//! order, apply prediction (§4.4), lossy rounding, zig-zag mapping, and
//! variable-length coding (§4.2/§4.3) — or their inverses on decode.
//!
//! Buffers are caller-owned flat `u32` arrays, record-major then
//! field-minor (`buf[record * field_count + field]`), replacing the
//! original's packed/pointer-cast struct layout with explicit indexing, per
//! the Design Notes in `spec.md` §9.
//!
//! **Rounding semantics.** `round` is applied only to the prediction
//! source (the model value, or the previous sample in `Diff` modes), per
//! the literal formula in §4.4 — not as a second, separate quantization of
//! the sample itself. Under this reading `residual`/`reconstruct` are
//! exact inverses for every `round` value, matching §8's blanket
//! round-trip property (`decode(encode(x)) == x` for every legal
//! `(data_type, mode, parameters)` tuple, not just `round == 0`). See
//! `DESIGN.md` for the full resolution of this ambiguity between §2's
//! high-level pipeline gloss and §4.4's formula.

use icu_cmp_core::bitio::{BitReader, BitWriter};
use icu_cmp_core::mapping::{
    field_mask, field_signed, field_unsigned, reconstruct, residual,
    updated_model as blend_model, zigzag_map, zigzag_unmap,
};
use icu_cmp_core::overlap::slices_overlap;

use crate::config::Configuration;
use crate::error::{CmpError, Result};
use crate::escape;
use crate::mode::CompressionMode;
use crate::setup::FieldSetup;

fn write_field(w: &mut BitWriter<'_>, setup: &FieldSetup, mapped: u32) -> Result<()> {
    match setup.kind {
        crate::setup::CodecKind::Raw => {
            if mapped > field_mask(setup.max_used_bits) {
                return Err(CmpError::FieldTooLarge);
            }
            w.write_bits(setup.max_used_bits, mapped).map_err(CmpError::from)
        }
        crate::setup::CodecKind::Stuff => {
            if mapped > field_mask(setup.cmp_par) {
                return Err(CmpError::FieldTooLarge);
            }
            w.write_bits(setup.cmp_par, mapped).map_err(CmpError::from)
        }
        crate::setup::CodecKind::Zero => {
            if mapped >= setup.spill && mapped.wrapping_add(1) > field_mask(setup.max_used_bits) {
                return Err(CmpError::FieldTooLarge);
            }
            escape::encode_zero(w, mapped, setup.cmp_par, setup.spill, setup.max_used_bits)
        }
        crate::setup::CodecKind::Multi => escape::encode_multi(w, mapped, setup.cmp_par, setup.spill),
    }
}

fn read_field(r: &mut BitReader<'_>, setup: &FieldSetup) -> Result<u32> {
    match setup.kind {
        crate::setup::CodecKind::Raw => r.read_bits(setup.max_used_bits).map_err(CmpError::from),
        crate::setup::CodecKind::Stuff => r.read_bits(setup.cmp_par).map_err(CmpError::from),
        crate::setup::CodecKind::Zero => {
            escape::decode_zero(r, setup.cmp_par, setup.spill, setup.max_used_bits)
        }
        crate::setup::CodecKind::Multi => escape::decode_multi(r, setup.cmp_par, setup.spill),
    }
}

/// Encodes `n_records` records of `cfg.field_count()` fields each from
/// `src` (record-major, `src.len() == n_records * cfg.field_count()`)
/// into `dst`. Returns the number of bits written.
pub fn encode_records(
    cfg: &Configuration,
    src: &[u32],
    n_records: usize,
    model: Option<&[u32]>,
    mut updated_model: Option<&mut [u32]>,
    dst: &mut [u32],
    max_stream_bits: u64,
) -> Result<u64> {
    let fc = cfg.field_count();
    if src.len() != n_records * fc {
        return Err(CmpError::FieldTooLarge);
    }
    if cfg.mode.is_model_mode() {
        let m = model.ok_or(CmpError::NoModel)?;
        if m.len() != n_records * fc {
            return Err(CmpError::NoModel);
        }
    }
    if let Some(um) = updated_model.as_deref() {
        if um.len() != n_records * fc {
            return Err(CmpError::FieldTooLarge);
        }
    }

    if slices_overlap(src, &*dst) {
        return Err(CmpError::BuffersOverlap);
    }
    if let Some(m) = model {
        if slices_overlap(m, src) || slices_overlap(m, &*dst) {
            return Err(CmpError::BuffersOverlap);
        }
    }
    if let Some(um) = updated_model.as_deref() {
        if slices_overlap(um, src) || slices_overlap(um, &*dst) {
            return Err(CmpError::BuffersOverlap);
        }
        if let Some(m) = model {
            if slices_overlap(um, m) {
                return Err(CmpError::BuffersOverlap);
            }
        }
    }

    let mut w = BitWriter::new(dst, max_stream_bits);
    let mut prev = vec![0u32; fc];

    for i in 0..n_records {
        for f in 0..fc {
            let setup = &cfg.field_setups[f];
            let raw = src[i * fc + f];

            let pred_source = match cfg.mode {
                CompressionMode::Raw | CompressionMode::Stuff => 0,
                _ if cfg.mode.is_model_mode() => model.unwrap()[i * fc + f],
                _ => prev[f],
            };

            let mapped = match cfg.mode {
                CompressionMode::Raw | CompressionMode::Stuff => raw,
                _ => {
                    let bits = setup.max_used_bits;
                    if raw > field_mask(bits) {
                        return Err(CmpError::FieldTooLarge);
                    }
                    let d = residual(raw, pred_source, cfg.round, bits);
                    let signed = field_signed(d, bits);
                    zigzag_map(signed)
                }
            };

            write_field(&mut w, setup, mapped)?;

            if cfg.mode.is_diff_mode() {
                prev[f] = raw;
            }

            if let Some(um) = updated_model.as_deref_mut() {
                if cfg.mode.has_prediction() {
                    um[i * fc + f] = blend_model(pred_source, raw, cfg.v_model);
                }
            }
        }
    }

    Ok(w.bit_pos())
}

/// Decodes `n_records` records of `cfg.field_count()` fields each from
/// `encoded` into `dst` (record-major). Returns the number of bits
/// consumed.
pub fn decode_records(
    cfg: &Configuration,
    encoded: &[u32],
    n_records: usize,
    model: Option<&[u32]>,
    mut updated_model: Option<&mut [u32]>,
    dst: &mut [u32],
    max_stream_bits: u64,
) -> Result<u64> {
    let fc = cfg.field_count();
    if dst.len() != n_records * fc {
        return Err(CmpError::FieldTooLarge);
    }
    if cfg.mode.is_model_mode() {
        let m = model.ok_or(CmpError::NoModel)?;
        if m.len() != n_records * fc {
            return Err(CmpError::NoModel);
        }
    }
    if let Some(um) = updated_model.as_deref() {
        if um.len() != n_records * fc {
            return Err(CmpError::FieldTooLarge);
        }
    }

    if slices_overlap(encoded, &*dst) {
        return Err(CmpError::BuffersOverlap);
    }
    if let Some(m) = model {
        if slices_overlap(m, encoded) || slices_overlap(m, &*dst) {
            return Err(CmpError::BuffersOverlap);
        }
    }
    if let Some(um) = updated_model.as_deref() {
        if slices_overlap(um, encoded) || slices_overlap(um, &*dst) {
            return Err(CmpError::BuffersOverlap);
        }
        if let Some(m) = model {
            if slices_overlap(um, m) {
                return Err(CmpError::BuffersOverlap);
            }
        }
    }

    let mut r = BitReader::new(encoded, max_stream_bits);
    let mut prev = vec![0u32; fc];

    for i in 0..n_records {
        for f in 0..fc {
            let setup = &cfg.field_setups[f];

            let pred_source = match cfg.mode {
                CompressionMode::Raw | CompressionMode::Stuff => 0,
                _ if cfg.mode.is_model_mode() => model.unwrap()[i * fc + f],
                _ => prev[f],
            };

            let mapped = read_field(&mut r, setup)?;

            let raw = match cfg.mode {
                CompressionMode::Raw | CompressionMode::Stuff => mapped,
                _ => {
                    let bits = setup.max_used_bits;
                    let signed = zigzag_unmap(mapped);
                    let d = field_unsigned(signed, bits);
                    reconstruct(d, pred_source, cfg.round, bits)
                }
            };

            dst[i * fc + f] = raw;

            if cfg.mode.is_diff_mode() {
                prev[f] = raw;
            }

            if let Some(um) = updated_model.as_deref_mut() {
                if cfg.mode.has_prediction() {
                    um[i * fc + f] = blend_model(pred_source, raw, cfg.v_model);
                }
            }
        }
    }

    Ok(r.bit_pos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigurationBuilder;
    use crate::data_type::{DataType, ImagetteKind};
    use crate::mode::Endpoint;

    fn imagette_cfg(mode: CompressionMode, cmp_par: u32, spill: u32, round: u32, v_model: u32) -> Configuration {
        ConfigurationBuilder::new(DataType::Imagette(ImagetteKind::NonAdaptive), mode, Endpoint::Icu)
            .round(round)
            .v_model(v_model)
            .field_param(0, cmp_par, spill)
            .build()
            .unwrap()
    }

    #[test]
    fn scenario_imagette_diff_zero_full_pass() {
        let cfg = imagette_cfg(CompressionMode::DiffZero, 1, 8, 0, 0);
        let src = [0xFFFFu32, 1, 0, 42, 0x8000, 0x7FFF, 0xFFFF];
        let mut dst = [0u32; 4];
        let bits = encode_records(&cfg, &src, 7, None, None, &mut dst, 128).unwrap();
        assert_eq!(bits, 66);
        assert_eq!(&dst[..3], &[0xDF6002AB, 0xFEB70000, 0x0000_0000]);

        let mut out = [0u32; 7];
        let consumed = decode_records(&cfg, &dst, 7, None, None, &mut out, 128).unwrap();
        assert_eq!(consumed, 66);
        assert_eq!(out, src);
    }

    #[test]
    fn scenario_imagette_model_multi_full_pass() {
        let cfg = imagette_cfg(CompressionMode::ModelMulti, 3, 8, 0, 8);
        let src = [0x0000u32, 0x0001, 0x0042, 0x8000, 0x7FFF, 0xFFFF, 0xFFFF];
        let model = [0x0000u32, 0xFFFF, 0xF301, 0x8FFF, 0x0000, 0xFFFF, 0x0000];
        let expected_updated = [0x0000u32, 0x8000, 0x79A1, 0x87FF, 0x3FFF, 0xFFFF, 0x7FFF];

        let mut dst = [0u32; 4];
        let mut um_enc = [0u32; 7];
        let bits =
            encode_records(&cfg, &src, 7, Some(&model), Some(&mut um_enc), &mut dst, 128).unwrap();
        assert_eq!(bits, 76);
        assert_eq!(&dst[..3], &[0x2BDB4F5E, 0xDFF5F9FF, 0xEC200000]);
        assert_eq!(um_enc, expected_updated);

        let mut out = [0u32; 7];
        let mut um_dec = [0u32; 7];
        let consumed =
            decode_records(&cfg, &dst, 7, Some(&model), Some(&mut um_dec), &mut out, 128).unwrap();
        assert_eq!(consumed, 76);
        assert_eq!(out, src);
        assert_eq!(um_dec, expected_updated);
    }

    #[test]
    fn scenario_imagette_stuff_full_pass() {
        let cfg = imagette_cfg(CompressionMode::Stuff, 16, 0, 0, 0);
        let src = [0x0u32, 0x1, 0x23, 0x42, 0x8000, 0x7FFF, 0xFFFF];
        let mut dst = [0u32; 4];
        let bits = encode_records(&cfg, &src, 7, None, None, &mut dst, 128).unwrap();
        assert_eq!(bits, 112);

        let bytes: Vec<u8> = dst[..4].iter().flat_map(|w| w.to_be_bytes()).collect();
        assert_eq!(
            &bytes[..14],
            &[0x00, 0x00, 0x00, 0x01, 0x00, 0x23, 0x00, 0x42, 0x80, 0x00, 0x7F, 0xFF, 0xFF, 0xFF]
        );

        let mut out = [0u32; 7];
        decode_records(&cfg, &dst, 7, None, None, &mut out, 128).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn scenario_imagette_raw_full_pass() {
        let cfg = imagette_cfg(CompressionMode::Raw, 0, 0, 0, 0);
        let src = [0x0u32, 0x1, 0x23, 0x42, 0x8000, 0x7FFF, 0xFFFF];
        let mut dst = [0u32; 4];
        let bits = encode_records(&cfg, &src, 7, None, None, &mut dst, 128).unwrap();
        assert_eq!(bits, 112);
        let mut out = [0u32; 7];
        decode_records(&cfg, &dst, 7, None, None, &mut out, 128).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn round_trips_across_all_modes_and_a_range_of_parameters() {
        let src: Vec<u32> = (0..64u32).map(|i| (i * 997) & 0xFFFF).collect();
        for mode in [
            CompressionMode::Raw,
            CompressionMode::Stuff,
            CompressionMode::DiffZero,
            CompressionMode::DiffMulti,
            CompressionMode::ModelZero,
            CompressionMode::ModelMulti,
        ] {
            for round in 0..=3u32 {
                if mode.is_model_mode() || mode == CompressionMode::Stuff || mode == CompressionMode::Raw
                {
                    if round != 0 {
                        continue;
                    }
                }
                let (cmp_par, spill) = match mode {
                    CompressionMode::Stuff => (16, 0),
                    CompressionMode::Raw => (0, 0),
                    _ => (3, 8),
                };
                let cfg = imagette_cfg(mode, cmp_par, spill, round, 8);
                let model: Vec<u32> = src.iter().map(|&s| s.wrapping_add(3) & 0xFFFF).collect();
                let model_arg = if mode.is_model_mode() { Some(model.as_slice()) } else { None };

                let mut dst = vec![0u32; 256];
                encode_records(&cfg, &src, src.len(), model_arg, None, &mut dst, 8192).unwrap();
                let mut out = vec![0u32; src.len()];
                decode_records(&cfg, &dst, src.len(), model_arg, None, &mut out, 8192).unwrap();
                assert_eq!(out, src, "mode={mode:?} round={round}");
            }
        }
    }

    #[test]
    fn over_wide_sample_is_rejected_under_prediction_modes() {
        let cfg = imagette_cfg(CompressionMode::DiffZero, 1, 8, 0, 0);
        // MaxUsedBits defaults to 16 for imagette; 0x1_0000 does not fit.
        let src = [0x1_0000u32, 0, 0, 0, 0, 0, 0];
        let mut dst = [0u32; 4];
        let err = encode_records(&cfg, &src, 7, None, None, &mut dst, 128).unwrap_err();
        assert_eq!(err, CmpError::FieldTooLarge);
    }

    #[test]
    fn model_buffer_aliasing_source_is_rejected() {
        let cfg = imagette_cfg(CompressionMode::ModelMulti, 3, 8, 0, 8);
        let src = vec![0u32, 1, 2, 3, 4, 5, 6];
        let mut dst = [0u32; 4];
        // Model and source are the exact same buffer: not legal per §3.
        let err = encode_records(&cfg, &src, 7, Some(&src), None, &mut dst, 128).unwrap_err();
        assert_eq!(err, CmpError::BuffersOverlap);
    }
}
