// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The chunk compressor, per §4.9: walks a caller-provided chunk (one or
//! more 12-byte-header-prefixed collections of typed records), validates
//! it, and emits one framed [`Entity`].
//!
//! One `Configuration` supplies the compression mode, escape policy, and
//! `round`/`v_model` shared across a chunk; it is not required that every
//! collection share the configured `data_type`'s exact variant, only its
//! family (`spec.md` §4.9 step 2 — e.g. a chunk may mix `s_fx` and
//! `s_fx_efx_ncob_ecob` collections, since both are S-fx variants). Each
//! collection's own variant is re-resolved from its header's `kind` byte
//! to determine its record size and field list; that variant's fields
//! must be a prefix of the configured `data_type`'s fields (matching
//! bit-for-bit) so the shared field parameters still apply positionally.

use log::{debug, trace};

use icu_cmp_core::overlap::slices_overlap;

use crate::config::Configuration;
use crate::container::{self, HeaderInfo};
use crate::data_type::DataType;
use crate::error::{CmpError, Result};
use crate::passes;
use crate::session::{Session, Timestamp};

/// Checks the buffer-distinctness invariants of §3 across the four
/// caller-supplied buffers a chunk (de)compression call can see: the
/// source bytes, the destination bytes, and the optional model and
/// updated-model sample buffers. Internal scratch buffers allocated by
/// `compress`/`decompress` are fresh allocations and never reach this
/// check, since they cannot alias caller memory.
fn check_no_overlap(
    source: &[u8],
    dst: &[u8],
    model: Option<&[u32]>,
    updated_model: Option<&[u32]>,
) -> Result<()> {
    if slices_overlap(source, dst) {
        return Err(CmpError::BuffersOverlap);
    }
    if let Some(m) = model {
        if slices_overlap(source, m) || slices_overlap(dst, m) {
            return Err(CmpError::BuffersOverlap);
        }
    }
    if let Some(um) = updated_model {
        if slices_overlap(source, um) || slices_overlap(dst, um) {
            return Err(CmpError::BuffersOverlap);
        }
        if let Some(m) = model {
            if slices_overlap(m, um) {
                return Err(CmpError::BuffersOverlap);
            }
        }
    }
    Ok(())
}

/// One collection's 12-byte header: a 1-byte kind (sub-service, resolved
/// to its own `DataType` and checked against the chunk's family), a
/// 6-byte timestamp, a 2-byte sequence number, and a 2-byte record-data
/// length in bytes, plus one reserved byte.
pub const COLLECTION_HEADER_LEN: usize = 12;

#[derive(Debug, Clone, Copy)]
pub struct CollectionHeader {
    pub kind: u8,
    pub timestamp: Timestamp,
    pub sequence_number: u16,
    pub data_length: u16,
}

fn read_collection_header(src: &[u8]) -> Result<CollectionHeader> {
    if src.len() < COLLECTION_HEADER_LEN {
        return Err(CmpError::ChunkSizeInconsistent);
    }
    Ok(CollectionHeader {
        kind: src[0],
        timestamp: Timestamp(src[1..7].try_into().unwrap()),
        sequence_number: u16::from_be_bytes([src[7], src[8]]),
        data_length: u16::from_be_bytes([src[9], src[10]]),
    })
}

fn write_collection_header(dst: &mut [u8], h: &CollectionHeader) {
    dst[0] = h.kind;
    dst[1..7].copy_from_slice(&h.timestamp.0);
    dst[7..9].copy_from_slice(&h.sequence_number.to_be_bytes());
    dst[9..11].copy_from_slice(&h.data_length.to_be_bytes());
    dst[11] = 0;
}

/// A caller-owned chunk: zero or more 12-byte-header-prefixed collections,
/// validated lazily when passed to [`ChunkCompressor::compress`]. A thin
/// newtype over the raw bytes, matching the framing-only role `Chunk`
/// plays in the public surface (the actual parsing lives in
/// [`parse_collections`]).
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a>(&'a [u8]);

impl<'a> Chunk<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Chunk(bytes)
    }
}

impl<'a> std::ops::Deref for Chunk<'a> {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        self.0
    }
}

struct ParsedCollection<'a> {
    header: CollectionHeader,
    data: &'a [u8],
    n_records: usize,
    /// This collection's own resolved variant, re-read from its header's
    /// `kind` byte — may differ from the chunk's configured `data_type`
    /// as long as it shares its family.
    data_type: DataType,
}

fn parse_collections<'a>(chunk: &'a [u8], data_type: DataType) -> Result<Vec<ParsedCollection<'a>>> {
    let family = data_type.family();
    let mut out = Vec::new();
    let mut off = 0usize;

    while off < chunk.len() {
        let header = read_collection_header(&chunk[off..])?;
        off += COLLECTION_HEADER_LEN;

        let resolved = DataType::from_wire(header.kind);
        if resolved.family() != family {
            return Err(CmpError::MixedFamilies);
        }

        let record_size = resolved.record_size_bytes();
        let data_length = header.data_length as usize;
        if data_length % record_size.max(1) != 0 {
            return Err(CmpError::CollectionSizeInconsistent);
        }
        if off + data_length > chunk.len() {
            return Err(CmpError::ChunkSizeInconsistent);
        }

        let n_records = if record_size == 0 { 0 } else { data_length / record_size };
        out.push(ParsedCollection {
            header,
            data: &chunk[off..off + data_length],
            n_records,
            data_type: resolved,
        });
        off += data_length;
    }

    if off != chunk.len() {
        return Err(CmpError::ChunkSizeInconsistent);
    }

    Ok(out)
}

/// Derives the `Configuration` a single collection of `resolved`'s variant
/// should be encoded/decoded under, from the chunk's shared `cfg`: the
/// collection's field list must be a bit-for-bit prefix of `cfg`'s own
/// (true of every same-cadence S-fx tier, which only ever append fields),
/// so its leading `FieldSetup`s — and thus the caller's per-field escape
/// parameters — still apply positionally.
fn collection_configuration(cfg: &Configuration, resolved: DataType) -> Result<Configuration> {
    let wanted = resolved.fields();
    if wanted.len() > cfg.field_setups.len() {
        return Err(CmpError::UnsupportedSubservice);
    }
    for (i, &bits) in wanted.iter().enumerate() {
        if cfg.field_setups[i].max_used_bits != bits {
            return Err(CmpError::UnsupportedSubservice);
        }
    }
    let mut c = cfg.clone();
    c.data_type = resolved;
    c.field_setups.truncate(wanted.len());
    Ok(c)
}

/// Byte-serializes one collection's records (record-major, field-minor)
/// into a flat `u32` sample buffer, the representation `passes` operates
/// on.
fn unpack_records(data: &[u8], data_type: DataType) -> Vec<u32> {
    let fields = data_type.fields();
    let mut out = Vec::with_capacity(fields.len() * (data.len() / data_type.record_size_bytes().max(1)));
    let mut off = 0usize;
    while off < data.len() {
        for &bits in fields {
            let nbytes = ((bits as usize) + 7) / 8;
            let mut v = 0u32;
            for b in &data[off..off + nbytes] {
                v = (v << 8) | u32::from(*b);
            }
            out.push(v);
            off += nbytes;
        }
    }
    out
}

fn pack_records(samples: &[u32], data_type: DataType, dst: &mut [u8]) {
    let fields = data_type.fields();
    let mut off = 0usize;
    for rec in samples.chunks(fields.len()) {
        for (&bits, &v) in fields.iter().zip(rec) {
            let nbytes = ((bits as usize) + 7) / 8;
            let bytes = v.to_be_bytes();
            dst[off..off + nbytes].copy_from_slice(&bytes[4 - nbytes..]);
            off += nbytes;
        }
    }
}

/// An upper bound, in bytes, on the entity a `chunk` of `n_collections`
/// collections compresses to, sized conservatively: the worst case is
/// assumed to never exceed a verbatim (`Raw`-mode) copy plus the largest
/// header shape and per-collection 32-bit padding overhead.
pub fn bound(chunk_size: usize, n_collections: usize, data_type: DataType) -> Result<usize> {
    if chunk_size > container::MAX_ORIGINAL_SIZE as usize {
        return Err(CmpError::ChunkTooLarge);
    }
    let header = container::header_len(data_type, n_collections);
    let filler = n_collections * 4;
    let total = header + filler + chunk_size;
    Ok((total + 3) & !3)
}

/// Compresses one chunk under `cfg`, with an optional model buffer (and
/// optional updated-model output) spanning every collection's records in
/// order. Returns the number of bytes written to `dst`.
pub struct ChunkCompressor {
    session: Session,
}

impl Default for ChunkCompressor {
    fn default() -> Self {
        ChunkCompressor { session: Session::new() }
    }
}

impl ChunkCompressor {
    pub fn new(session: Session) -> Self {
        ChunkCompressor { session }
    }

    pub fn compress(
        &self,
        cfg: &Configuration,
        chunk: Chunk<'_>,
        model_id: u16,
        model_counter: u8,
        model: Option<&[u32]>,
        mut updated_model: Option<&mut [u32]>,
        dst: &mut [u8],
    ) -> Result<usize> {
        let chunk: &[u8] = &chunk;
        check_no_overlap(chunk, dst, model, updated_model.as_deref())?;
        let collections = parse_collections(chunk, cfg.data_type)?;
        trace!("chunk: {} collections, {} bytes", collections.len(), chunk.len());

        if chunk.len() > container::MAX_ORIGINAL_SIZE as usize {
            return Err(CmpError::ChunkTooLarge);
        }

        let start = self.session.now()?;

        if cfg.mode == crate::mode::CompressionMode::Raw {
            let info = HeaderInfo {
                original_size: chunk.len() as u32,
                raw: true,
                start_timestamp: start,
                end_timestamp: self.session.now()?,
                data_type: cfg.data_type,
                model_id,
                model_counter,
                mode: cfg.mode,
                round: cfg.round,
                v_model: cfg.v_model,
                field_params: cfg.field_setups.iter().map(|s| (s.cmp_par, s.spill)).collect(),
            };
            let header_len = container::write_header(dst, &info, &[])?;
            if dst.len() < header_len + chunk.len() {
                return Err(CmpError::EntityTooSmall);
            }
            dst[header_len..header_len + chunk.len()].copy_from_slice(chunk);
            return Ok(header_len + chunk.len());
        }

        // Each collection may resolve to a different variant (and thus a
        // different field count) within the chunk's family, so the model
        // buffer's expected length is the sum of each collection's own
        // `n_records * field_count`, not a single shared multiplier.
        let total_samples: usize =
            collections.iter().map(|c| c.n_records * c.data_type.field_count()).sum();
        if let Some(m) = model {
            if m.len() != total_samples {
                return Err(CmpError::NoModel);
            }
        }
        if let Some(um) = updated_model.as_deref() {
            if um.len() != total_samples {
                return Err(CmpError::NoModel);
            }
        }

        // A conservative scratch allowance: escape expansion never needs
        // more than a handful of extra bits per field over the field's raw
        // width, so four times the raw width is ample headroom.
        let header_len_guess = container::header_len(cfg.data_type, collections.len());
        let mut payload = vec![0u8; dst.len().saturating_sub(header_len_guess)];

        let mut sizes = Vec::with_capacity(collections.len());
        let mut body_off = 0usize;
        let mut sample_off = 0usize;

        for c in &collections {
            if body_off + COLLECTION_HEADER_LEN > payload.len() {
                return Err(CmpError::SmallBuffer);
            }
            write_collection_header(&mut payload[body_off..], &c.header);
            body_off += COLLECTION_HEADER_LEN;

            let coll_cfg = collection_configuration(cfg, c.data_type)?;
            let coll_field_count = coll_cfg.field_count();
            let coll_samples = c.n_records * coll_field_count;

            let samples = unpack_records(c.data, c.data_type);
            let model_slice = model.map(|m| &m[sample_off..sample_off + coll_samples]);
            let mut um_scratch = vec![0u32; coll_samples];

            let scratch_bits = (coll_samples as u64 * 32 * 4) + 256;
            let scratch_words = ((scratch_bits + 31) / 32) as usize;
            let mut scratch = vec![0u32; scratch_words];

            let bits = passes::encode_records(
                &coll_cfg,
                &samples,
                c.n_records,
                model_slice,
                Some(&mut um_scratch),
                &mut scratch,
                scratch_bits,
            )?;

            if let Some(um) = updated_model.as_deref_mut() {
                um[sample_off..sample_off + coll_samples].copy_from_slice(&um_scratch);
            }

            let payload_bytes = (((bits + 31) / 32) * 4) as usize;
            if body_off + payload_bytes > payload.len() {
                return Err(CmpError::SmallBuffer);
            }
            for (i, w) in scratch[..payload_bytes / 4].iter().enumerate() {
                payload[body_off + i * 4..body_off + i * 4 + 4].copy_from_slice(&w.to_be_bytes());
            }
            body_off += payload_bytes;

            let collection_total = COLLECTION_HEADER_LEN + payload_bytes;
            if collection_total > u16::MAX as usize {
                return Err(CmpError::FieldDoesNotFit);
            }
            sizes.push(collection_total as u16);
            sample_off += coll_samples;
        }

        let info = HeaderInfo {
            original_size: chunk.len() as u32,
            raw: false,
            start_timestamp: start,
            end_timestamp: self.session.now()?,
            data_type: cfg.data_type,
            model_id,
            model_counter,
            mode: cfg.mode,
            round: cfg.round,
            v_model: cfg.v_model,
            field_params: cfg.field_setups.iter().map(|s| (s.cmp_par, s.spill)).collect(),
        };

        let header_len = container::write_header(dst, &info, &sizes)?;
        if dst.len() < header_len + body_off {
            return Err(CmpError::EntityTooSmall);
        }
        dst[header_len..header_len + body_off].copy_from_slice(&payload[..body_off]);

        debug!("compressed chunk: {} -> {} bytes", chunk.len(), header_len + body_off);
        Ok(header_len + body_off)
    }

    /// Decompresses `entity` (as produced by [`Self::compress`]) into
    /// `dst`, reconstructing the original chunk byte-for-byte (headers
    /// and typed records). Returns the parsed header and the number of
    /// bytes written to `dst`.
    pub fn decompress(
        &self,
        cfg: &Configuration,
        entity: &[u8],
        model: Option<&[u32]>,
        mut updated_model: Option<&mut [u32]>,
        dst: &mut [u8],
    ) -> Result<(HeaderInfo, usize)> {
        check_no_overlap(entity, dst, model, updated_model.as_deref())?;

        let (info, _sizes, mut off) = container::read_header(entity)?;
        if info.data_type != cfg.data_type || info.mode != cfg.mode {
            return Err(CmpError::UnsupportedDataType);
        }

        if info.raw {
            let n = info.original_size as usize;
            if entity.len() < off + n || dst.len() < n {
                return Err(CmpError::EntityTooSmall);
            }
            dst[..n].copy_from_slice(&entity[off..off + n]);
            return Ok((info, n));
        }

        let family = cfg.data_type.family();
        let is_imagette = family == crate::data_type::Family::Imagette;
        let mut dst_off = 0usize;
        let mut sample_off = 0usize;

        while off < entity.len() {
            if off + COLLECTION_HEADER_LEN > entity.len() {
                return Err(CmpError::ChunkSizeInconsistent);
            }
            let header = read_collection_header(&entity[off..])?;
            off += COLLECTION_HEADER_LEN;

            let resolved = DataType::from_wire(header.kind);
            if resolved.family() != family {
                return Err(CmpError::MixedFamilies);
            }
            let coll_cfg = collection_configuration(cfg, resolved)?;
            let coll_field_count = coll_cfg.field_count();

            let record_size = resolved.record_size_bytes();
            let n_records = if record_size == 0 { 0 } else { header.data_length as usize / record_size };
            let coll_samples = n_records * coll_field_count;

            if dst_off + COLLECTION_HEADER_LEN > dst.len() {
                return Err(CmpError::SmallBuffer);
            }
            write_collection_header(&mut dst[dst_off..], &header);
            dst_off += COLLECTION_HEADER_LEN;

            let remaining_bits = ((entity.len() - off) as u64) * 8;
            let model_slice = model.map(|m| &m[sample_off..sample_off + coll_samples]);
            let mut um_scratch = vec![0u32; coll_samples];
            let mut samples = vec![0u32; coll_samples];

            let words = &entity[off..];
            let word_stream: Vec<u32> = words
                .chunks(4)
                .map(|c| {
                    let mut b = [0u8; 4];
                    b[..c.len()].copy_from_slice(c);
                    u32::from_be_bytes(b)
                })
                .collect();

            let consumed_bits = passes::decode_records(
                &coll_cfg,
                &word_stream,
                n_records,
                model_slice,
                Some(&mut um_scratch),
                &mut samples,
                remaining_bits.min((word_stream.len() as u64) * 32),
            )?;

            if let Some(um) = updated_model.as_deref_mut() {
                um[sample_off..sample_off + coll_samples].copy_from_slice(&um_scratch);
            }

            let out_bytes = n_records * record_size;
            if dst_off + out_bytes > dst.len() {
                return Err(CmpError::SmallBuffer);
            }
            pack_records(&samples, resolved, &mut dst[dst_off..dst_off + out_bytes]);
            dst_off += out_bytes;

            off += (((consumed_bits + 31) / 32) * 4) as usize;
            sample_off += coll_samples;

            if is_imagette {
                break;
            }
        }

        Ok((info, dst_off))
    }
}
