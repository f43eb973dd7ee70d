// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A thin adapter over the original single-data-type `cmp_cfg`-style call
//! shape, per §4.10 (SPEC_FULL). Exists purely to preserve call-site shape
//! for ports of software still written against the old entry point; it
//! performs no validation of its own beyond what
//! [`ConfigurationBuilder`](crate::config::ConfigurationBuilder) already
//! does, and carries none of the newer chunk API's multi-collection
//! ergonomics.
//!
//! The legacy API compressed one flat sample sequence for one data type
//! in one call, with no notion of a multi-collection chunk or a
//! per-collection header; `CmpCfg::compress` synthesizes the single
//! 12-byte collection header the unified [`ChunkCompressor`] expects and
//! stamps it with sequence number zero.

use crate::chunk::{Chunk, ChunkCompressor, COLLECTION_HEADER_LEN};
use crate::config::ConfigurationBuilder;
use crate::data_type::DataType;
use crate::error::Result;
use crate::mode::{CompressionMode, Endpoint};
use crate::session::{Session, Timestamp};

/// One field's legacy `(cmp_par, spill)` pair, in `DataType::fields()`
/// order.
pub type LegacyFieldParam = (u32, u32);

/// The legacy, single-data-type configuration call: one `data_type`, one
/// `mode`, one model value, one lossy `round`, and one `(cmp_par, spill)`
/// pair per field — the flat argument list the original ICU-only API
/// took, with no endpoint axis (it always targeted the ICU).
pub struct CmpCfg {
    pub data_type: DataType,
    pub mode: CompressionMode,
    pub v_model: u32,
    pub round: u32,
    pub field_params: Vec<LegacyFieldParam>,
}

impl CmpCfg {
    pub fn new(data_type: DataType, mode: CompressionMode, v_model: u32, round: u32) -> Self {
        let field_count = data_type.field_count();
        CmpCfg { data_type, mode, v_model, round, field_params: vec![(0, 0); field_count] }
    }

    pub fn field_param(mut self, index: usize, cmp_par: u32, spill: u32) -> Self {
        self.field_params[index] = (cmp_par, spill);
        self
    }

    /// Builds the unified [`Configuration`](crate::config::Configuration)
    /// this legacy call maps to, always against [`Endpoint::Icu`] (the
    /// only endpoint the legacy API ever targeted).
    fn build_configuration(&self) -> Result<crate::config::Configuration> {
        let mut b = ConfigurationBuilder::new(self.data_type, self.mode, Endpoint::Icu)
            .v_model(self.v_model)
            .round(self.round);
        for (i, &(cmp_par, spill)) in self.field_params.iter().enumerate() {
            b = b.field_param(i, cmp_par, spill);
        }
        b.build()
    }

    /// Compresses `samples` (one flat, record-major sequence of this data
    /// type's records) into `dst`, wrapping them in a single synthetic
    /// collection the way the original one-call-per-data-type API did not
    /// need to, since the unified chunk format has no "no header" shape.
    #[allow(clippy::too_many_arguments)]
    pub fn compress(
        &self,
        record_bytes: &[u8],
        model_id: u16,
        model_counter: u8,
        model: Option<&[u32]>,
        updated_model: Option<&mut [u32]>,
        dst: &mut [u8],
    ) -> Result<usize> {
        let cfg = self.build_configuration()?;

        let mut chunk_buf = vec![0u8; COLLECTION_HEADER_LEN + record_bytes.len()];
        chunk_buf[0] = self.data_type.to_wire();
        chunk_buf[1..7].copy_from_slice(&Timestamp::ZERO.0);
        chunk_buf[7..9].copy_from_slice(&0u16.to_be_bytes());
        chunk_buf[9..11].copy_from_slice(&(record_bytes.len() as u16).to_be_bytes());
        chunk_buf[11] = 0;
        chunk_buf[COLLECTION_HEADER_LEN..].copy_from_slice(record_bytes);

        let compressor = ChunkCompressor::new(Session::new());
        compressor.compress(&cfg, Chunk::new(&chunk_buf), model_id, model_counter, model, updated_model, dst)
    }

    /// Decompresses `entity` (as produced by [`Self::compress`]) into
    /// `dst`, stripping the single synthetic collection header this
    /// adapter introduced so the caller sees only the record bytes, as
    /// the legacy API's callers expect.
    pub fn decompress(
        &self,
        entity: &[u8],
        model: Option<&[u32]>,
        updated_model: Option<&mut [u32]>,
        dst: &mut [u8],
    ) -> Result<usize> {
        let cfg = self.build_configuration()?;
        let compressor = ChunkCompressor::new(Session::new());

        let mut scratch = vec![0u8; dst.len() + COLLECTION_HEADER_LEN];
        let (_info, n) = compressor.decompress(&cfg, entity, model, updated_model, &mut scratch)?;

        let body = &scratch[COLLECTION_HEADER_LEN..n];
        dst[..body.len()].copy_from_slice(body);
        Ok(body.len())
    }
}
