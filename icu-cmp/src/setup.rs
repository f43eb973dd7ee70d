// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-field setup records, per §4.5: constructed once per call from a
//! validated [`Configuration`](crate::config::Configuration), never per
//! sample. `CodecKind` is the closed tagged union the design notes (§9)
//! call for in place of function-pointer dispatch.

/// Which of the four coding strategies a field uses. Selected once, from
/// the configuration's `mode`, at setup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecKind {
    /// No entropy coding; big-endian passthrough at the field's declared
    /// width.
    Raw,
    /// Fixed-width bit-packing at `cmp_par` bits, no prediction or mapping.
    Stuff,
    /// Golomb/Rice with the Zero escape (§4.3).
    Zero,
    /// Golomb/Rice with the Multi escape (§4.3).
    Multi,
}

/// A single field's binding of compression parameter, spillover, lossy
/// parameter, and codeword strategy. Built once per call and rejected
/// wholesale if out of range; never mutated afterwards.
#[derive(Debug, Clone, Copy)]
pub struct FieldSetup {
    pub kind: CodecKind,
    /// Golomb/Rice divisor `m` (meaningless for `Raw`/`Stuff`).
    pub cmp_par: u32,
    /// `floor(log2(cmp_par))`, precomputed once (meaningless for
    /// `Raw`/`Stuff`).
    pub log2_cmp_par: u32,
    /// Escape threshold (meaningless for `Raw`/`Stuff`).
    pub spill: u32,
    /// Lossy right-shift applied to the prediction source, not the sample.
    pub round: u32,
    /// Model blend weight in `[0, 16]`.
    pub v_model: u32,
    /// The field's declared bit width; also the Zero-escape literal width.
    pub max_used_bits: u32,
}

impl FieldSetup {
    pub fn new(
        kind: CodecKind,
        cmp_par: u32,
        spill: u32,
        round: u32,
        v_model: u32,
        max_used_bits: u32,
    ) -> Self {
        let log2_cmp_par = if cmp_par >= 1 { 31 - cmp_par.leading_zeros() } else { 0 };
        FieldSetup { kind, cmp_par, log2_cmp_par, spill, round, v_model, max_used_bits }
    }
}
