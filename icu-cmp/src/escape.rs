// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The Zero and Multi escape policies, per §4.3. Both wrap the leaf
//! Golomb/Rice codec in `icu-cmp-core` with a literal fallback for values
//! that would overflow a 32-bit codeword.

use icu_cmp_core::bitio::{BitReader, BitWriter};
use icu_cmp_core::error::CoreError;
use icu_cmp_core::golomb;
use icu_cmp_core::mapping::field_mask;

use crate::error::{CmpError, Result};

/// Zero-escape encode: values `< spill` are Golomb/Rice coded as `v + 1`
/// (reserving codeword 0 exclusively for the escape marker); values
/// `>= spill` emit codeword 0 followed by the literal `(v + 1) mod 2^bits`
/// in `bits` bits.
pub fn encode_zero(w: &mut BitWriter<'_>, v: u32, m: u32, spill: u32, bits: u32) -> Result<()> {
    if v >= spill {
        golomb::write(w, 0, m).map_err(CmpError::from)?;
        let lit = v.wrapping_add(1) & field_mask(bits);
        w.write_bits(bits, lit).map_err(CmpError::from)?;
    } else {
        golomb::write(w, v + 1, m).map_err(CmpError::from)?;
    }
    Ok(())
}

/// Zero-escape decode: the inverse of [`encode_zero`]. A literal that,
/// after decrementing, falls below `spill` is not a genuine outlier and is
/// reported as a malformed stream.
pub fn decode_zero(r: &mut BitReader<'_>, m: u32, spill: u32, bits: u32) -> Result<u32> {
    let c = golomb::read(r, m).map_err(CmpError::from)?;
    if c == 0 {
        let lit = r.read_bits(bits).map_err(CmpError::from)?;
        let v = lit.wrapping_sub(1) & field_mask(bits);
        if v < spill {
            return Err(CoreError::InvalidEscapeLiteral.into());
        }
        Ok(v)
    } else {
        Ok(c - 1)
    }
}

/// The escape index for a Multi-escape literal of magnitude `extra`: the
/// literal is written in `2*(escape_index+1)` bits, so `escape_index` is
/// chosen as the smallest value whose width can hold `extra` without
/// truncation, rounding the bit requirement up to an even width.
fn escape_index(extra: u32) -> u32 {
    let bitlen = if extra == 0 { 1 } else { 32 - extra.leading_zeros() };
    let width = if bitlen % 2 == 0 { bitlen } else { bitlen + 1 };
    width / 2 - 1
}

/// Multi-escape encode: values `< spill` are Golomb/Rice coded directly
/// (no pre-increment); values `>= spill` emit the codeword for
/// `spill + escape_index` followed by the literal `v - spill` in
/// `2*(escape_index+1)` bits.
pub fn encode_multi(w: &mut BitWriter<'_>, v: u32, m: u32, spill: u32) -> Result<()> {
    if v < spill {
        golomb::write(w, v, m).map_err(CmpError::from)
    } else {
        let extra = v - spill;
        let ei = escape_index(extra);
        let width = 2 * (ei + 1);
        golomb::write(w, spill + ei, m).map_err(CmpError::from)?;
        w.write_bits(width, extra).map_err(CmpError::from)
    }
}

/// Multi-escape decode: the inverse of [`encode_multi`].
pub fn decode_multi(r: &mut BitReader<'_>, m: u32, spill: u32) -> Result<u32> {
    let c = golomb::read(r, m).map_err(CmpError::from)?;
    if c < spill {
        Ok(c)
    } else {
        let ei = c - spill;
        let width = 2 * (ei + 1);
        let extra = r.read_bits(width).map_err(CmpError::from)?;
        Ok(spill + extra)
    }
}
