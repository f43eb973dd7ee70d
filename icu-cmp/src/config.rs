// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `Configuration`, its builder, and the validator, per §4.7.
//!
//! `Configuration` is deliberately buffer-free: it holds the data type,
//! mode, lossy/model parameters, and the per-field [`FieldSetup`] table.
//! Buffer bindings (source, model, updated-model, destination) are passed
//! explicitly to the encode/decode entry points in [`crate::passes`] —
//! this splits the "creator" and "buffer-binding" lifecycle steps `spec.md`
//! §3 describes into distinct, independently testable stages, rather than
//! threading caller pointers through the parameter object itself.

use crate::data_type::DataType;
use crate::error::{CmpError, Result};
use crate::limits;
use crate::mode::{CompressionMode, Endpoint};
use crate::setup::FieldSetup;

/// One field's caller-supplied `(cmp_par, spill)` pair. Ignored for `Raw`
/// fields; for `Stuff` fields only `cmp_par` (the literal bit width) is
/// used.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldParam {
    pub cmp_par: u32,
    pub spill: u32,
}

/// An immutable, validated set of per-call parameters. Constructed once
/// per encode/decode call by [`ConfigurationBuilder::build`] and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub data_type: DataType,
    pub mode: CompressionMode,
    pub endpoint: Endpoint,
    pub v_model: u32,
    pub round: u32,
    pub field_setups: Vec<FieldSetup>,
}

impl Configuration {
    pub fn field_count(&self) -> usize {
        self.field_setups.len()
    }
}

/// Builds and validates a [`Configuration`]. Every setter is infallible;
/// all range checking happens in [`Self::build`], so a caller can set
/// fields in any order and get one dense error report rather than
/// failing on the first out-of-range setter call.
pub struct ConfigurationBuilder {
    data_type: DataType,
    mode: CompressionMode,
    endpoint: Endpoint,
    v_model: u32,
    round: u32,
    field_params: Vec<FieldParam>,
    max_used_bits: Vec<u32>,
}

impl ConfigurationBuilder {
    pub fn new(data_type: DataType, mode: CompressionMode, endpoint: Endpoint) -> Self {
        let max_used_bits = data_type.fields().to_vec();
        let field_count = max_used_bits.len();
        ConfigurationBuilder {
            data_type,
            mode,
            endpoint,
            v_model: 0,
            round: 0,
            field_params: vec![FieldParam::default(); field_count],
            max_used_bits,
        }
    }

    pub fn v_model(mut self, v_model: u32) -> Self {
        self.v_model = v_model;
        self
    }

    pub fn round(mut self, round: u32) -> Self {
        self.round = round;
        self
    }

    /// Overrides the `(cmp_par, spill)` pair for field `index` (in
    /// `DataType::fields()` order). Out-of-range indices are a
    /// programming error and panic, matching the other per-field setters.
    pub fn field_param(mut self, index: usize, cmp_par: u32, spill: u32) -> Self {
        self.field_params[index] = FieldParam { cmp_par, spill };
        self
    }

    /// Overrides field `index`'s declared `MaxUsedBits`, in case a caller
    /// needs a width other than the data type's default (e.g. to widen a
    /// Zero-escape literal).
    pub fn max_used_bits(mut self, index: usize, bits: u32) -> Self {
        self.max_used_bits[index] = bits;
        self
    }

    pub fn build(self) -> Result<Configuration> {
        validate(&self)?;

        let field_setups = (0..self.max_used_bits.len())
            .map(|i| {
                let p = self.field_params[i];
                FieldSetup::new(
                    self.mode.codec_kind(),
                    p.cmp_par,
                    p.spill,
                    self.round,
                    self.v_model,
                    self.max_used_bits[i],
                )
            })
            .collect();

        Ok(Configuration {
            data_type: self.data_type,
            mode: self.mode,
            endpoint: self.endpoint,
            v_model: self.v_model,
            round: self.round,
            field_setups,
        })
    }
}

fn validate(b: &ConfigurationBuilder) -> Result<()> {
    if b.data_type.is_declared_unimplemented() || matches!(b.data_type, DataType::Unknown) {
        return Err(CmpError::UnsupportedDataType);
    }
    if b.endpoint == Endpoint::Rdcu && b.data_type.family() != crate::data_type::Family::Imagette {
        return Err(CmpError::UnsupportedDataType);
    }
    if b.v_model > 16 {
        return Err(CmpError::InvalidModelValue);
    }
    if b.round > b.endpoint.max_round() {
        return Err(CmpError::InvalidRound);
    }
    if b.mode.is_model_mode() {
        // Model-buffer presence is checked against the caller-supplied
        // buffer at encode/decode time (Configuration is buffer-free);
        // nothing further to validate here.
    }

    let is_imagette = b.data_type.family() == crate::data_type::Family::Imagette;

    for (i, &bits) in b.max_used_bits.iter().enumerate() {
        if bits == 0 || bits > 32 {
            return Err(CmpError::InvalidMaxUsedBits);
        }

        match b.mode {
            CompressionMode::Raw => {}
            CompressionMode::Stuff => {
                let cmp_par = b.field_params[i].cmp_par;
                if cmp_par == 0 || cmp_par > limits::STUFF_MAX_BITS {
                    return Err(CmpError::InvalidCmpPar);
                }
            }
            _ => {
                let cmp_par = b.field_params[i].cmp_par;
                let spill = b.field_params[i].spill;

                if is_imagette {
                    if cmp_par < limits::CMP_PAR_MIN || cmp_par > limits::CMP_PAR_MAX_IMAGETTE {
                        return Err(CmpError::InvalidCmpPar);
                    }
                    let max_spill = limits::imagette_max_spill(cmp_par)
                        .ok_or(CmpError::InvalidCmpPar)?;
                    if spill < limits::MIN_SPILL || spill > max_spill {
                        return Err(CmpError::InvalidSpill);
                    }
                } else {
                    if cmp_par < limits::CMP_PAR_MIN || cmp_par > limits::CMP_PAR_MAX_NON_IMAGETTE {
                        return Err(CmpError::InvalidCmpPar);
                    }
                    let max_spill = limits::non_imagette_max_spill(cmp_par);
                    if u64::from(spill) < u64::from(limits::MIN_SPILL) || u64::from(spill) > max_spill
                    {
                        return Err(CmpError::InvalidSpill);
                    }
                }
            }
        }
    }

    Ok(())
}
