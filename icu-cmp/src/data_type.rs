// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `DataType` and its field tables, per §3. Each variant fixes a field list
//! (encode/decode order) and a default `MaxUsedBits` per field.

/// Which family a `DataType` belongs to. Chunk compression requires every
/// collection in a chunk to share one family (§4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Imagette,
    FluxCob,
    AuxScience,
    Unsupported,
}

/// Flux/COB record cadence: governs field bit width, not the field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FluxCadence {
    Short,
    Long,
    Fast,
}

/// Flux/COB field-richness tier: which optional groups (extended flux,
/// normal/extended center-of-brightness) are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FluxTier {
    Fx,
    FxEfx,
    FxNcob,
    FxEfxNcob,
    FxEcob,
    FxEfxEcob,
}

/// Aux-science record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxKind {
    Offset,
    Background,
    Smearing,
}

/// Imagette record kind; all four share a single `u16` sample field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagetteKind {
    NonAdaptive,
    Adaptive,
    Saturated,
    FrontCamera,
}

/// The full tagged enumeration of record layouts, per §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Imagette(ImagetteKind),
    FluxCob(FluxCadence, FluxTier),
    AuxScience(AuxKind),
    /// Declared upstream but never implemented; recognized so a caller can
    /// name them, always rejected at validation (§9 Open Question).
    FCamOffset,
    FCamBackground,
    Unknown,
}

impl DataType {
    pub fn family(self) -> Family {
        match self {
            DataType::Imagette(_) => Family::Imagette,
            DataType::FluxCob(_, _) => Family::FluxCob,
            DataType::AuxScience(_) => Family::AuxScience,
            DataType::FCamOffset | DataType::FCamBackground | DataType::Unknown => {
                Family::Unsupported
            }
        }
    }

    /// `true` for data types that are recognized but never implemented
    /// upstream (always rejected by the validator).
    pub fn is_declared_unimplemented(self) -> bool {
        matches!(self, DataType::FCamOffset | DataType::FCamBackground)
    }

    /// The field list in encode/decode order, paired with each field's
    /// default declared `MaxUsedBits`.
    pub fn fields(self) -> &'static [u32] {
        match self {
            DataType::Imagette(_) => &[16],
            DataType::FluxCob(cadence, tier) => flux_cob_fields(cadence, tier),
            DataType::AuxScience(AuxKind::Offset) => &[32, 32],
            DataType::AuxScience(AuxKind::Background) => &[32, 32, 16],
            DataType::AuxScience(AuxKind::Smearing) => &[32, 32],
            DataType::FCamOffset | DataType::FCamBackground | DataType::Unknown => &[],
        }
    }

    pub fn field_count(self) -> usize {
        self.fields().len()
    }

    /// Size, in bytes, of one record of this data type (sum of field widths,
    /// each rounded up to a whole byte, matching the on-the-wire record
    /// layout a collection's `data_length` is measured against).
    pub fn record_size_bytes(self) -> usize {
        self.fields().iter().map(|&bits| ((bits as usize) + 7) / 8).sum()
    }

    /// The container header's one-byte `data_type` encoding (§6).
    pub fn to_wire(self) -> u8 {
        use AuxKind::*;
        use FluxCadence::*;
        use FluxTier::*;
        use ImagetteKind::*;
        match self {
            DataType::Imagette(NonAdaptive) => 0,
            DataType::Imagette(Adaptive) => 1,
            DataType::Imagette(Saturated) => 2,
            DataType::Imagette(FrontCamera) => 3,
            DataType::FluxCob(Short, Fx) => 4,
            DataType::FluxCob(Short, FxEfx) => 5,
            DataType::FluxCob(Short, FxNcob) => 6,
            DataType::FluxCob(Short, FxEfxNcob) => 7,
            DataType::FluxCob(Short, FxEcob) => 8,
            DataType::FluxCob(Short, FxEfxEcob) => 9,
            DataType::FluxCob(Long, Fx) => 10,
            DataType::FluxCob(Long, FxEfx) => 11,
            DataType::FluxCob(Long, FxNcob) => 12,
            DataType::FluxCob(Long, FxEfxNcob) => 13,
            DataType::FluxCob(Long, FxEcob) => 14,
            DataType::FluxCob(Long, FxEfxEcob) => 15,
            DataType::FluxCob(Fast, Fx) => 16,
            DataType::FluxCob(Fast, FxEfx) => 17,
            DataType::FluxCob(Fast, FxNcob) => 18,
            DataType::FluxCob(Fast, FxEfxNcob) => 19,
            DataType::FluxCob(Fast, FxEcob) => 20,
            DataType::FluxCob(Fast, FxEfxEcob) => 21,
            DataType::AuxScience(Offset) => 22,
            DataType::AuxScience(Background) => 23,
            DataType::AuxScience(Smearing) => 24,
            DataType::FCamOffset => 25,
            DataType::FCamBackground => 26,
            DataType::Unknown => 255,
        }
    }

    pub fn from_wire(v: u8) -> Self {
        use AuxKind::*;
        use FluxCadence::*;
        use FluxTier::*;
        use ImagetteKind::*;
        match v {
            0 => DataType::Imagette(NonAdaptive),
            1 => DataType::Imagette(Adaptive),
            2 => DataType::Imagette(Saturated),
            3 => DataType::Imagette(FrontCamera),
            4 => DataType::FluxCob(Short, Fx),
            5 => DataType::FluxCob(Short, FxEfx),
            6 => DataType::FluxCob(Short, FxNcob),
            7 => DataType::FluxCob(Short, FxEfxNcob),
            8 => DataType::FluxCob(Short, FxEcob),
            9 => DataType::FluxCob(Short, FxEfxEcob),
            10 => DataType::FluxCob(Long, Fx),
            11 => DataType::FluxCob(Long, FxEfx),
            12 => DataType::FluxCob(Long, FxNcob),
            13 => DataType::FluxCob(Long, FxEfxNcob),
            14 => DataType::FluxCob(Long, FxEcob),
            15 => DataType::FluxCob(Long, FxEfxEcob),
            16 => DataType::FluxCob(Fast, Fx),
            17 => DataType::FluxCob(Fast, FxEfx),
            18 => DataType::FluxCob(Fast, FxNcob),
            19 => DataType::FluxCob(Fast, FxEfxNcob),
            20 => DataType::FluxCob(Fast, FxEcob),
            21 => DataType::FluxCob(Fast, FxEfxEcob),
            22 => DataType::AuxScience(Offset),
            23 => DataType::AuxScience(Background),
            24 => DataType::AuxScience(Smearing),
            25 => DataType::FCamOffset,
            26 => DataType::FCamBackground,
            _ => DataType::Unknown,
        }
    }
}

/// The flux/COB field list is determined entirely by the tier (which
/// optional groups are present); the cadence only changes each field's bit
/// width.
fn flux_cob_fields(cadence: FluxCadence, tier: FluxTier) -> &'static [u32] {
    match (cadence, tier) {
        (FluxCadence::Short, FluxTier::Fx) | (FluxCadence::Fast, FluxTier::Fx) => &[8, 16],
        (FluxCadence::Short, FluxTier::FxEfx) | (FluxCadence::Fast, FluxTier::FxEfx) => {
            &[8, 16, 16]
        }
        (FluxCadence::Short, FluxTier::FxNcob) | (FluxCadence::Fast, FluxTier::FxNcob) => {
            &[8, 16, 16, 16]
        }
        (FluxCadence::Short, FluxTier::FxEfxNcob) | (FluxCadence::Fast, FluxTier::FxEfxNcob) => {
            &[8, 16, 16, 16, 16]
        }
        (FluxCadence::Short, FluxTier::FxEcob) | (FluxCadence::Fast, FluxTier::FxEcob) => {
            &[8, 16, 16, 16, 16, 16]
        }
        (FluxCadence::Short, FluxTier::FxEfxEcob) | (FluxCadence::Fast, FluxTier::FxEfxEcob) => {
            &[8, 16, 16, 16, 16, 16, 16]
        }
        (FluxCadence::Long, FluxTier::Fx) => &[8, 32],
        (FluxCadence::Long, FluxTier::FxEfx) => &[8, 32, 32],
        (FluxCadence::Long, FluxTier::FxNcob) => &[8, 32, 32, 32],
        (FluxCadence::Long, FluxTier::FxEfxNcob) => &[8, 32, 32, 32, 32],
        (FluxCadence::Long, FluxTier::FxEcob) => &[8, 32, 32, 32, 32, 32],
        (FluxCadence::Long, FluxTier::FxEfxEcob) => &[8, 32, 32, 32, 32, 32, 32],
    }
}
