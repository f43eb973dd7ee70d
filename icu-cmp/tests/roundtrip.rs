// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Crate-boundary round-trip tests: one full chunk per `DataType` family,
//! through the public `ChunkCompressor` surface rather than the internal
//! `passes` module directly, per `SPEC_FULL.md` §8.

use icu_cmp::chunk::{bound, Chunk, ChunkCompressor, COLLECTION_HEADER_LEN};
use icu_cmp::config::ConfigurationBuilder;
use icu_cmp::data_type::{AuxKind, DataType, FluxCadence, FluxTier, ImagetteKind};
use icu_cmp::mode::{CompressionMode, Endpoint};
use icu_cmp::session::Timestamp;

fn collection(data_type: DataType, record_bytes: &[u8]) -> Vec<u8> {
    let mut buf = vec![0u8; COLLECTION_HEADER_LEN + record_bytes.len()];
    buf[0] = data_type.to_wire();
    buf[1..7].copy_from_slice(&Timestamp::ZERO.0);
    buf[7..9].copy_from_slice(&1u16.to_be_bytes());
    buf[9..11].copy_from_slice(&(record_bytes.len() as u16).to_be_bytes());
    buf[COLLECTION_HEADER_LEN..].copy_from_slice(record_bytes);
    buf
}

fn pack_be(fields: &[u32], widths: &[u32]) -> Vec<u8> {
    let mut out = Vec::new();
    for (&v, &bits) in fields.iter().zip(widths) {
        let nbytes = ((bits as usize) + 7) / 8;
        let b = v.to_be_bytes();
        out.extend_from_slice(&b[4 - nbytes..]);
    }
    out
}

#[test]
fn imagette_chunk_round_trips_under_diff_zero() {
    let cfg = ConfigurationBuilder::new(
        DataType::Imagette(ImagetteKind::NonAdaptive),
        CompressionMode::DiffZero,
        Endpoint::Icu,
    )
    .field_param(0, 1, 8)
    .build()
    .unwrap();

    let samples: [u16; 7] = [0xFFFF, 1, 0, 42, 0x8000, 0x7FFF, 0xFFFF];
    let record_bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_be_bytes()).collect();
    let chunk = collection(cfg.data_type, &record_bytes);

    let compressor = ChunkCompressor::default();
    let mut dst = vec![0u8; bound(chunk.len(), 1, cfg.data_type).unwrap()];
    let n = compressor.compress(&cfg, Chunk::new(&chunk), 1, 0, None, None, &mut dst).unwrap();

    let mut out = vec![0u8; chunk.len()];
    let (info, m) = compressor.decompress(&cfg, &dst[..n], None, None, &mut out).unwrap();
    assert!(!info.raw);
    assert_eq!(m, chunk.len());
    assert_eq!(out, chunk);
}

#[test]
fn flux_cob_short_fx_chunk_round_trips_under_diff_multi() {
    let data_type = DataType::FluxCob(FluxCadence::Short, FluxTier::Fx);
    let cfg = ConfigurationBuilder::new(data_type, CompressionMode::DiffMulti, Endpoint::Icu)
        .field_param(0, 1, 4)
        .field_param(1, 3, 64)
        .build()
        .unwrap();

    let widths = data_type.fields();
    let records: [[u32; 2]; 5] = [[0, 0], [1, 10], [2, 500], [0, 65535], [3, 12]];
    let record_bytes: Vec<u8> = records.iter().flat_map(|r| pack_be(r, widths)).collect();
    let chunk = collection(data_type, &record_bytes);

    let compressor = ChunkCompressor::default();
    let mut dst = vec![0u8; bound(chunk.len(), 1, data_type).unwrap()];
    let n = compressor.compress(&cfg, Chunk::new(&chunk), 2, 0, None, None, &mut dst).unwrap();

    let mut out = vec![0u8; chunk.len()];
    let (_info, m) = compressor.decompress(&cfg, &dst[..n], None, None, &mut out).unwrap();
    assert_eq!(m, chunk.len());
    assert_eq!(out, chunk);
}

#[test]
fn aux_science_smearing_chunk_round_trips_under_model_zero() {
    let data_type = DataType::AuxScience(AuxKind::Smearing);
    let cfg = ConfigurationBuilder::new(data_type, CompressionMode::ModelZero, Endpoint::Icu)
        .v_model(8)
        .field_param(0, 5, 16)
        .field_param(1, 5, 16)
        .build()
        .unwrap();

    let widths = data_type.fields();
    let records: [[u32; 2]; 3] = [[100, 4], [101, 5], [99, 3]];
    let record_bytes: Vec<u8> = records.iter().flat_map(|r| pack_be(r, widths)).collect();
    let chunk = collection(data_type, &record_bytes);

    let field_count = cfg.field_count();
    let model = vec![50u32, 2, 51, 2, 52, 2];
    assert_eq!(model.len(), records.len() * field_count);

    let compressor = ChunkCompressor::default();
    let mut dst = vec![0u8; bound(chunk.len(), 1, data_type).unwrap()];
    let mut um_enc = vec![0u32; model.len()];
    let n = compressor
        .compress(&cfg, Chunk::new(&chunk), 3, 1, Some(&model), Some(&mut um_enc), &mut dst)
        .unwrap();

    let mut out = vec![0u8; chunk.len()];
    let mut um_dec = vec![0u32; model.len()];
    let (_info, m) = compressor
        .decompress(&cfg, &dst[..n], Some(&model), Some(&mut um_dec), &mut out)
        .unwrap();
    assert_eq!(m, chunk.len());
    assert_eq!(out, chunk);
    assert_eq!(um_dec, um_enc);
}

#[test]
fn aux_science_background_has_three_fields() {
    let data_type = DataType::AuxScience(AuxKind::Background);
    assert_eq!(data_type.field_count(), 3);

    let cfg = ConfigurationBuilder::new(data_type, CompressionMode::Stuff, Endpoint::Icu)
        .field_param(0, 32, 0)
        .field_param(1, 32, 0)
        .field_param(2, 16, 0)
        .build()
        .unwrap();

    let widths = data_type.fields();
    let records: [[u32; 3]; 2] = [[10, 20, 3], [11, 19, 4]];
    let record_bytes: Vec<u8> = records.iter().flat_map(|r| pack_be(r, widths)).collect();
    let chunk = collection(data_type, &record_bytes);

    let compressor = ChunkCompressor::default();
    let mut dst = vec![0u8; bound(chunk.len(), 1, data_type).unwrap()];
    let n = compressor.compress(&cfg, Chunk::new(&chunk), 0, 0, None, None, &mut dst).unwrap();
    let mut out = vec![0u8; chunk.len()];
    let (_info, m) = compressor.decompress(&cfg, &dst[..n], None, None, &mut out).unwrap();
    assert_eq!(m, chunk.len());
    assert_eq!(out, chunk);
}

#[test]
fn raw_mode_entity_is_header_plus_verbatim_chunk() {
    let data_type = DataType::Imagette(ImagetteKind::Adaptive);
    let cfg = ConfigurationBuilder::new(data_type, CompressionMode::Raw, Endpoint::Icu).build().unwrap();

    let samples: [u16; 7] = [0x0, 0x1, 0x23, 0x42, 0x8000, 0x7FFF, 0xFFFF];
    let record_bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_be_bytes()).collect();
    let chunk = collection(data_type, &record_bytes);

    let compressor = ChunkCompressor::default();
    let mut dst = vec![0u8; bound(chunk.len(), 1, data_type).unwrap()];
    let n = compressor.compress(&cfg, Chunk::new(&chunk), 0, 0, None, None, &mut dst).unwrap();

    let header_len = icu_cmp::container::header_len(data_type, 0);
    assert_eq!(n, header_len + chunk.len());
    assert_eq!(&dst[header_len..n], chunk.as_slice());
}

#[test]
fn multi_collection_chunk_of_the_same_variant_round_trips_under_diff_zero() {
    let data_type = DataType::Imagette(ImagetteKind::NonAdaptive);
    let cfg = ConfigurationBuilder::new(data_type, CompressionMode::DiffZero, Endpoint::Icu)
        .field_param(0, 1, 8)
        .build()
        .unwrap();

    let first: [u16; 4] = [0xFFFF, 1, 0, 42];
    let second: [u16; 3] = [0x8000, 0x7FFF, 0xFFFF];
    let first_bytes: Vec<u8> = first.iter().flat_map(|s| s.to_be_bytes()).collect();
    let second_bytes: Vec<u8> = second.iter().flat_map(|s| s.to_be_bytes()).collect();
    let mut chunk = collection(data_type, &first_bytes);
    chunk.extend(collection(data_type, &second_bytes));

    let compressor = ChunkCompressor::default();
    let mut dst = vec![0u8; bound(chunk.len(), 2, data_type).unwrap()];
    let n = compressor.compress(&cfg, Chunk::new(&chunk), 1, 0, None, None, &mut dst).unwrap();

    let mut out = vec![0u8; chunk.len()];
    let (_info, m) = compressor.decompress(&cfg, &dst[..n], None, None, &mut out).unwrap();
    assert_eq!(m, chunk.len());
    assert_eq!(out, chunk);
}

/// §8 scenario 6: a chunk mixing two FluxCob tiers of the same family (one
/// `s_fx` group and a richer `s_fx_efx_ncob_ecob`-style group with every
/// optional field present) compresses and decompresses as one entity,
/// since chunk validation only requires family-consistency, not that every
/// collection share one exact variant.
#[test]
fn raw_chunk_mixing_two_flux_cob_tiers_round_trips() {
    let lean = DataType::FluxCob(FluxCadence::Short, FluxTier::Fx);
    let rich = DataType::FluxCob(FluxCadence::Short, FluxTier::FxEfxEcob);
    let cfg = ConfigurationBuilder::new(rich, CompressionMode::Raw, Endpoint::Icu).build().unwrap();

    let lean_widths = lean.fields();
    let rich_widths = rich.fields();
    let lean_records: [[u32; 2]; 2] = [[0, 10], [1, 20]];
    let rich_records: [[u32; 7]; 3] = [
        [0, 100, 1, 2, 3, 4, 5],
        [1, 200, 6, 7, 8, 9, 10],
        [2, 300, 11, 12, 13, 14, 15],
    ];

    let mut chunk = Vec::new();
    chunk.extend(collection(lean, &pack_be(&lean_records[0], lean_widths)));
    chunk.extend(collection(lean, &pack_be(&lean_records[1], lean_widths)));
    for r in &rich_records {
        chunk.extend(collection(rich, &pack_be(r, rich_widths)));
    }

    let compressor = ChunkCompressor::default();
    let mut dst = vec![0u8; bound(chunk.len(), 5, rich).unwrap()];
    let n = compressor.compress(&cfg, Chunk::new(&chunk), 6, 0, None, None, &mut dst).unwrap();

    let mut out = vec![0u8; chunk.len()];
    let (info, m) = compressor.decompress(&cfg, &dst[..n], None, None, &mut out).unwrap();
    assert!(info.raw);
    assert_eq!(m, chunk.len());
    assert_eq!(out, chunk);
}

#[test]
fn bound_is_never_exceeded_by_the_real_compressed_size() {
    let data_type = DataType::FluxCob(FluxCadence::Long, FluxTier::FxEfxNcob);
    let cfg = ConfigurationBuilder::new(data_type, CompressionMode::DiffZero, Endpoint::Icu)
        .field_param(0, 1, 4)
        .field_param(1, 4, 32)
        .field_param(2, 4, 32)
        .field_param(3, 4, 32)
        .field_param(4, 4, 32)
        .build()
        .unwrap();

    let widths = data_type.fields();
    let records: Vec<[u32; 5]> =
        (0..20u32).map(|i| [i % 4, i * 1000, i * 999, i * 500, i * 250]).collect();
    let record_bytes: Vec<u8> = records.iter().flat_map(|r| pack_be(r, widths)).collect();
    let chunk = collection(data_type, &record_bytes);

    let b = bound(chunk.len(), 1, data_type).unwrap();
    let compressor = ChunkCompressor::default();
    let mut dst = vec![0u8; b];
    let n = compressor.compress(&cfg, Chunk::new(&chunk), 0, 0, None, None, &mut dst).unwrap();
    assert!(n <= b, "compressed size {n} exceeded bound {b}");
}
