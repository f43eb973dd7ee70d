// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `CompressionMode` and `Endpoint`, per §3 and SPEC_FULL §3's endpoint
//! addition.

use crate::setup::CodecKind;

/// Which prediction source a mode uses and (for entropy-coded modes) which
/// escape mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionMode {
    /// No entropy coding, big-endian passthrough.
    Raw,
    /// Predicts from the previous sample, Zero escape.
    DiffZero,
    /// Predicts from the previous sample, Multi escape.
    DiffMulti,
    /// Predicts from a caller-supplied model, Zero escape.
    ModelZero,
    /// Predicts from a caller-supplied model, Multi escape.
    ModelMulti,
    /// Fixed-width bit-packing, no prediction, no mapping.
    Stuff,
}

/// Which escape mechanism a mode uses, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeKind {
    Zero,
    Multi,
}

impl CompressionMode {
    pub fn is_model_mode(self) -> bool {
        matches!(self, CompressionMode::ModelZero | CompressionMode::ModelMulti)
    }

    pub fn is_diff_mode(self) -> bool {
        matches!(self, CompressionMode::DiffZero | CompressionMode::DiffMulti)
    }

    /// `true` for modes that predict a field from a prior value (model or
    /// the previous sample), as opposed to `Raw`/`Stuff`, which do not.
    pub fn has_prediction(self) -> bool {
        self.is_model_mode() || self.is_diff_mode()
    }

    pub fn escape(self) -> Option<EscapeKind> {
        match self {
            CompressionMode::DiffZero | CompressionMode::ModelZero => Some(EscapeKind::Zero),
            CompressionMode::DiffMulti | CompressionMode::ModelMulti => Some(EscapeKind::Multi),
            CompressionMode::Raw | CompressionMode::Stuff => None,
        }
    }

    pub fn codec_kind(self) -> CodecKind {
        match self {
            CompressionMode::Raw => CodecKind::Raw,
            CompressionMode::Stuff => CodecKind::Stuff,
            CompressionMode::DiffZero | CompressionMode::ModelZero => CodecKind::Zero,
            CompressionMode::DiffMulti | CompressionMode::ModelMulti => CodecKind::Multi,
        }
    }

    /// One-byte wire encoding used by the container header's mode field.
    pub fn to_wire(self) -> u8 {
        match self {
            CompressionMode::Raw => 0,
            CompressionMode::DiffZero => 1,
            CompressionMode::DiffMulti => 2,
            CompressionMode::ModelZero => 3,
            CompressionMode::ModelMulti => 4,
            CompressionMode::Stuff => 5,
        }
    }

    pub fn from_wire(v: u8) -> Option<Self> {
        Some(match v {
            0 => CompressionMode::Raw,
            1 => CompressionMode::DiffZero,
            2 => CompressionMode::DiffMulti,
            3 => CompressionMode::ModelZero,
            4 => CompressionMode::ModelMulti,
            5 => CompressionMode::Stuff,
            _ => return None,
        })
    }
}

/// Which hardware target a `Configuration` is validated against. Several
/// invariants (legal `round` range, data-type support) are endpoint
/// dependent (§4.7); modeling this explicitly avoids a global switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// The on-board CPU software codec.
    Icu,
    /// The hardware compressor, byte-compatible bitstream.
    Rdcu,
}

impl Endpoint {
    /// Inclusive legal range for the lossy `round` parameter on this
    /// endpoint: `[0,3]` for the ICU, `[0,2]` for the RDCU.
    pub fn max_round(self) -> u32 {
        match self {
            Endpoint::Icu => 3,
            Endpoint::Rdcu => 2,
        }
    }
}
