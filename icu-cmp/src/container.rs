// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The entity/chunk container header, per §4.8 and §6's byte layout.
//!
//! Two header shapes share one 23-byte prefix (version, original size +
//! raw flag, start/end timestamps, data type, model id/counter): a fixed
//! 32-byte form for imagette entities (one field, `cmp_par` fits a byte,
//! `spill` a `u16`), and a longer, `field_count`-dependent form for every
//! other family, which additionally carries a 16-bit collection count `k`
//! followed by `k` 16-bit per-collection compressed sizes before the
//! payload — self-describing, unlike the imagette form (always exactly
//! one collection).
//!
//! The header's byte-20 "raw bit replicated in the high nibble" quirk
//! from the wire layout is dropped: it duplicates the raw flag already
//! present in the original-size word, and the full byte range is needed
//! for `data_type`'s wire encoding (`DataType::Unknown` is `255`). See
//! `DESIGN.md`.

use crate::data_type::{DataType, Family};
use crate::error::{CmpError, Result};
use crate::mode::CompressionMode;
use crate::session::Timestamp;

pub const VERSION: [u8; 3] = [1, 0, 0];

const PREFIX_LEN: usize = 23;
const IMAGETTE_PARAM_LEN: usize = 9;

/// Largest representable `original_size` (24 bits): §4.9's maximum entity
/// size.
pub const MAX_ORIGINAL_SIZE: u32 = (1 << 24) - 1;

/// Everything the container header records about one entity, independent
/// of the bytes it is serialized into.
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub original_size: u32,
    pub raw: bool,
    pub start_timestamp: Timestamp,
    pub end_timestamp: Timestamp,
    pub data_type: DataType,
    pub model_id: u16,
    pub model_counter: u8,
    pub mode: CompressionMode,
    pub round: u32,
    pub v_model: u32,
    /// One `(cmp_par, spill)` pair per field, in `DataType::fields()` order.
    pub field_params: Vec<(u32, u32)>,
}

fn is_imagette(dt: DataType) -> bool {
    dt.family() == Family::Imagette
}

fn param_block_len(dt: DataType) -> usize {
    if is_imagette(dt) {
        IMAGETTE_PARAM_LEN
    } else {
        // mode + round/v_model + field_count + per-field (cmp_par, spill) + n_collections
        3 + 4 * dt.field_count() + 2
    }
}

/// The full header length for an entity of `data_type` with `n_collections`
/// collections (`n_collections` is ignored for imagette, which never
/// carries a per-collection size table since it is always a single
/// collection written as one flat typed pass — see `DESIGN.md`).
pub fn header_len(data_type: DataType, n_collections: usize) -> usize {
    if is_imagette(data_type) {
        PREFIX_LEN + IMAGETTE_PARAM_LEN
    } else {
        PREFIX_LEN + param_block_len(data_type) + 2 * n_collections
    }
}

/// Writes the container header (prefix, mode/parameter block, and, for
/// non-imagette entities, the `collection_sizes` table) into `dst`.
/// Returns the number of bytes written.
pub fn write_header(
    dst: &mut [u8],
    info: &HeaderInfo,
    collection_sizes: &[u16],
) -> Result<usize> {
    let total = header_len(info.data_type, collection_sizes.len());
    if dst.len() < total {
        return Err(CmpError::EntityTooSmall);
    }
    if info.original_size > MAX_ORIGINAL_SIZE {
        return Err(CmpError::ChunkTooLarge);
    }

    dst[0..3].copy_from_slice(&VERSION);

    let mut size_and_flag = info.original_size & MAX_ORIGINAL_SIZE;
    if info.raw {
        size_and_flag |= 1 << 31;
    }
    dst[3..7].copy_from_slice(&size_and_flag.to_be_bytes());

    dst[7..13].copy_from_slice(&info.start_timestamp.0);
    dst[13..19].copy_from_slice(&info.end_timestamp.0);

    dst[19] = info.data_type.to_wire();
    dst[20..22].copy_from_slice(&info.model_id.to_be_bytes());
    dst[22] = info.model_counter;

    let mut off = PREFIX_LEN;
    dst[off] = info.mode.to_wire();
    off += 1;
    if info.round > 0xF || info.v_model > 0xF {
        return Err(CmpError::FieldDoesNotFit);
    }
    dst[off] = ((info.round as u8) << 4) | (info.v_model as u8);
    off += 1;

    if is_imagette(info.data_type) {
        let (cmp_par, spill) = info.field_params.first().copied().unwrap_or((0, 0));
        if cmp_par > u8::MAX as u32 {
            return Err(CmpError::FieldDoesNotFit);
        }
        if spill > u16::MAX as u32 {
            return Err(CmpError::FieldDoesNotFit);
        }
        dst[off] = cmp_par as u8;
        off += 1;
        dst[off..off + 2].copy_from_slice(&(spill as u16).to_be_bytes());
        off += 2;
        dst[off..off + 4].copy_from_slice(&[0u8; 4]);
        off += 4;
    } else {
        if info.field_params.len() > u8::MAX as usize {
            return Err(CmpError::FieldDoesNotFit);
        }
        dst[off] = info.field_params.len() as u8;
        off += 1;
        for &(cmp_par, spill) in &info.field_params {
            if cmp_par > u16::MAX as u32 || spill > u16::MAX as u32 {
                return Err(CmpError::FieldDoesNotFit);
            }
            dst[off..off + 2].copy_from_slice(&(cmp_par as u16).to_be_bytes());
            off += 2;
            dst[off..off + 2].copy_from_slice(&(spill as u16).to_be_bytes());
            off += 2;
        }
        if collection_sizes.len() > u16::MAX as usize {
            return Err(CmpError::FieldDoesNotFit);
        }
        dst[off..off + 2].copy_from_slice(&(collection_sizes.len() as u16).to_be_bytes());
        off += 2;
        for &sz in collection_sizes {
            dst[off..off + 2].copy_from_slice(&sz.to_be_bytes());
            off += 2;
        }
    }

    debug_assert_eq!(off, total);
    Ok(off)
}

/// Parses a container header out of `src`. Returns the parsed
/// [`HeaderInfo`], the per-collection size table (empty for imagette),
/// and the number of bytes consumed.
pub fn read_header(src: &[u8]) -> Result<(HeaderInfo, Vec<u16>, usize)> {
    if src.len() < PREFIX_LEN + 2 {
        return Err(CmpError::EntityTooSmall);
    }

    let size_and_flag = u32::from_be_bytes(src[3..7].try_into().unwrap());
    let raw = size_and_flag & (1 << 31) != 0;
    let original_size = size_and_flag & MAX_ORIGINAL_SIZE;

    let start_timestamp = Timestamp(src[7..13].try_into().unwrap());
    let end_timestamp = Timestamp(src[13..19].try_into().unwrap());
    let data_type = DataType::from_wire(src[19]);
    let model_id = u16::from_be_bytes(src[20..22].try_into().unwrap());
    let model_counter = src[22];

    let mut off = PREFIX_LEN;
    if src.len() < off + 2 {
        return Err(CmpError::EntityTooSmall);
    }
    let mode = CompressionMode::from_wire(src[off]).ok_or(CmpError::UnsupportedMode)?;
    off += 1;
    let round_v = src[off];
    off += 1;
    let round = u32::from(round_v >> 4);
    let v_model = u32::from(round_v & 0xF);

    let (field_params, collection_sizes);
    if is_imagette(data_type) {
        if src.len() < off + 7 {
            return Err(CmpError::EntityTooSmall);
        }
        let cmp_par = u32::from(src[off]);
        off += 1;
        let spill = u32::from(u16::from_be_bytes(src[off..off + 2].try_into().unwrap()));
        off += 2;
        off += 4;
        field_params = vec![(cmp_par, spill)];
        collection_sizes = Vec::new();
    } else {
        if src.len() < off + 1 {
            return Err(CmpError::EntityTooSmall);
        }
        let field_count = src[off] as usize;
        off += 1;
        if src.len() < off + 4 * field_count {
            return Err(CmpError::EntityTooSmall);
        }
        let mut fp = Vec::with_capacity(field_count);
        for _ in 0..field_count {
            let cmp_par = u32::from(u16::from_be_bytes(src[off..off + 2].try_into().unwrap()));
            off += 2;
            let spill = u32::from(u16::from_be_bytes(src[off..off + 2].try_into().unwrap()));
            off += 2;
            fp.push((cmp_par, spill));
        }
        field_params = fp;

        if src.len() < off + 2 {
            return Err(CmpError::EntityTooSmall);
        }
        let k = u16::from_be_bytes(src[off..off + 2].try_into().unwrap()) as usize;
        off += 2;
        if src.len() < off + 2 * k {
            return Err(CmpError::EntityTooSmall);
        }
        let mut sizes = Vec::with_capacity(k);
        for _ in 0..k {
            sizes.push(u16::from_be_bytes(src[off..off + 2].try_into().unwrap()));
            off += 2;
        }
        collection_sizes = sizes;
    }

    Ok((
        HeaderInfo {
            original_size,
            raw,
            start_timestamp,
            end_timestamp,
            data_type,
            model_id,
            model_counter,
            mode,
            round,
            v_model,
            field_params,
        },
        collection_sizes,
        off,
    ))
}

/// An owned, framed entity: a parsed [`HeaderInfo`] paired with the bytes
/// it was parsed from (header and payload together), for callers that
/// want to hold the two together rather than re-parsing the header on
/// every access.
#[derive(Debug, Clone)]
pub struct Entity {
    pub header: HeaderInfo,
    pub bytes: Vec<u8>,
}

impl Entity {
    /// Parses `bytes`' header without copying the payload out of it.
    pub fn parse(bytes: &[u8]) -> Result<Entity> {
        let (header, _sizes, _consumed) = read_header(bytes)?;
        Ok(Entity { header, bytes: bytes.to_vec() })
    }

    pub fn payload(&self) -> &[u8] {
        &self.bytes
    }
}
