// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `error` module defines `CmpError`, the error type surfaced across the
//! whole crate boundary: configuration, chunk compression, and container
//! decoding all funnel into it.

use core::fmt;

use icu_cmp_core::CoreError;

/// Every way a configuration, chunk, or container operation can fail,
/// per §7's taxonomy (configuration errors, input errors, runtime errors).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpError {
    /// The requested data type has no implementation (e.g. `F_CAM_OFFSET`,
    /// `F_CAM_BACKGROUND`), or is not legal for the selected endpoint.
    UnsupportedDataType,
    /// The compression mode is not legal for the selected data type.
    UnsupportedMode,
    /// `model_value` is outside `[0, 16]`.
    InvalidModelValue,
    /// `round` is outside the endpoint's legal range.
    InvalidRound,
    /// A field's `cmp_par` is outside its legal range.
    InvalidCmpPar,
    /// A field's `spill` is outside its legal range for the field's `cmp_par`.
    InvalidSpill,
    /// A declared `MaxUsedBits` entry exceeds 32.
    InvalidMaxUsedBits,
    /// A model mode was selected but no model buffer was supplied.
    NoModel,
    /// Source, destination, model, or updated-model buffers alias.
    BuffersOverlap,
    /// The destination buffer has no room for the next write.
    SmallBuffer,
    /// A sample (or residual) exceeds the field's declared `MaxUsedBits`.
    FieldTooLarge,
    /// A decoded Golomb/Rice codeword, or a Zero-escape literal, violates
    /// the bitstream's own invariants.
    MalformedStream,
    /// A chunk's collection headers do not sum to the chunk's total size.
    ChunkSizeInconsistent,
    /// A collection's `data_length` is not a multiple of its record size.
    CollectionSizeInconsistent,
    /// A collection names a sub-service this codec does not implement.
    UnsupportedSubservice,
    /// Two collections in one chunk belong to different data-type families.
    MixedFamilies,
    /// The chunk's original size would exceed the container's maximum
    /// representable entity size (`2^24 - 1` bytes).
    ChunkTooLarge,
    /// The destination entity buffer is smaller than the container header
    /// alone.
    EntityTooSmall,
    /// A configuration value does not fit in its container header field
    /// (e.g. `cmp_par > 65535` for a non-imagette parameter slot).
    FieldDoesNotFit,
    /// The installed `TimestampSource` returned an out-of-range value.
    TimestampError,
}

impl fmt::Display for CmpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            CmpError::UnsupportedDataType => "data type is not supported by this endpoint",
            CmpError::UnsupportedMode => "compression mode is not legal for this data type",
            CmpError::InvalidModelValue => "model_value out of range [0, 16]",
            CmpError::InvalidRound => "round out of range for the selected endpoint",
            CmpError::InvalidCmpPar => "cmp_par out of range",
            CmpError::InvalidSpill => "spill out of range for cmp_par",
            CmpError::InvalidMaxUsedBits => "MaxUsedBits entry exceeds 32",
            CmpError::NoModel => "model mode selected but no model buffer was supplied",
            CmpError::BuffersOverlap => "source, destination, or model buffers alias",
            CmpError::SmallBuffer => "destination buffer has no room for the next write",
            CmpError::FieldTooLarge => "sample exceeds the field's declared MaxUsedBits",
            CmpError::MalformedStream => "decoded codeword or literal violates stream invariants",
            CmpError::ChunkSizeInconsistent => "chunk size disagrees with its collection headers",
            CmpError::CollectionSizeInconsistent => "collection data_length is not a multiple of the record size",
            CmpError::UnsupportedSubservice => "collection names an unsupported sub-service",
            CmpError::MixedFamilies => "chunk mixes collections from different data-type families",
            CmpError::ChunkTooLarge => "chunk exceeds the maximum entity original size",
            CmpError::EntityTooSmall => "destination entity buffer is smaller than the header",
            CmpError::FieldDoesNotFit => "a configuration value does not fit its header field",
            CmpError::TimestampError => "timestamp source returned an out-of-range value",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for CmpError {}

impl From<CoreError> for CmpError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SmallBuffer => CmpError::SmallBuffer,
            CoreError::CodewordTooLong => CmpError::MalformedStream,
            CoreError::InvalidEscapeLiteral => CmpError::MalformedStream,
        }
    }
}

pub type Result<T> = core::result::Result<T, CmpError>;
