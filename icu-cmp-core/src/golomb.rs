// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Golomb and Rice codeword generation and decoding for a single unsigned
//! integer, per §4.2. The Rice fast path is selected whenever the divisor
//! `m` is a power of two; general Golomb coding is used otherwise.

use crate::bitio::{BitReader, BitWriter};
use crate::error::{CoreError, Result};

/// `floor(log2(m))` for `m >= 1`.
#[inline(always)]
pub fn log2_floor(m: u32) -> u32 {
    debug_assert!(m >= 1);
    31 - m.leading_zeros()
}

/// A generated codeword: `len` bits, right-aligned in `bits`. `len` can
/// exceed 32 only conceptually — callers must check `len <= 32` via
/// [`CodeWord::checked`] before attempting to materialize it into a 32-bit
/// field; the unary prefix alone can run arbitrarily long for pathological
/// inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeWord {
    pub bits: u64,
    pub len: u32,
}

/// Encodes `v` with Rice parameter `k` (i.e. `m = 2^k`). Returns `None` when
/// the resulting codeword would need more than 32 bits, signalling the
/// caller to escape per §4.3.
pub fn encode_rice(v: u32, k: u32) -> Option<CodeWord> {
    let q = v >> k;
    let len = u64::from(q) + 1 + u64::from(k);
    if len > 32 {
        return None;
    }
    let suffix = u64::from(v) & ((1u64 << k) - 1);
    let prefix = ((1u64 << q) - 1) << 1;
    Some(CodeWord { bits: (prefix << k) | suffix, len: len as u32 })
}

/// Encodes `v` with general Golomb parameter `m >= 1`. Dispatches to the
/// Rice fast path when `m` is a power of two. Returns `None` on overflow,
/// per §4.3.
pub fn encode(v: u32, m: u32) -> Option<CodeWord> {
    debug_assert!(m >= 1);

    if m.is_power_of_two() {
        return encode_rice(v, m.trailing_zeros());
    }

    let k = log2_floor(m);
    let cutoff = (1u32 << (k + 1)) - m;
    let q = v / m;
    let r = v % m;

    let (suffix, suffix_len) = if r < cutoff { (r, k) } else { (r + cutoff, k + 1) };

    let len = u64::from(q) + 1 + u64::from(suffix_len);
    if len > 32 {
        return None;
    }

    let prefix = ((1u64 << q) - 1) << 1;
    Some(CodeWord { bits: (prefix << suffix_len) | u64::from(suffix), len: len as u32 })
}

/// Writes the Golomb/Rice codeword for `v` with parameter `m` to `w`.
/// Returns [`CoreError::CodewordTooLong`] if the codeword would exceed 32
/// bits (the caller is expected to have already decided to escape in that
/// case, per §4.3; this is the low-level primitive the escape policies
/// build on).
pub fn write(w: &mut BitWriter<'_>, v: u32, m: u32) -> Result<()> {
    let cw = encode(v, m).ok_or(CoreError::CodewordTooLong)?;
    debug_assert!(cw.len <= 32);
    w.write_bits(cw.len, cw.bits as u32)
}

/// Reads one Golomb/Rice codeword with parameter `m` from `r`.
pub fn read(r: &mut BitReader<'_>, m: u32) -> Result<u32> {
    debug_assert!(m >= 1);

    let q = r.read_unary()?;

    if m.is_power_of_two() {
        let k = m.trailing_zeros();
        let suffix = if k == 0 { 0 } else { r.read_bits(k)? };
        return Ok((q << k) | suffix);
    }

    let k = log2_floor(m);
    let cutoff = (1u32 << (k + 1)) - m;

    let provisional = if k == 0 { 0 } else { r.read_bits(k)? };

    let rem = if provisional < cutoff {
        provisional
    } else {
        let extra = r.read_bits(1)?;
        ((provisional << 1) | extra) - cutoff
    };

    Ok(q * m + rem)
}

/// The maximum encodable length, in bits, of the codeword for `v` with
/// parameter `m` — used by callers that need to decide whether to escape
/// before committing to a write (a "measure" query equivalent to calling
/// [`encode`] and inspecting `len`, but without needing `v` to already be
/// representable).
pub fn encoded_len(v: u32, m: u32) -> Option<u32> {
    encode(v, m).map(|cw| cw.len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(v: u32, m: u32) {
        let mut words = [0u32; 8];
        let mut w = BitWriter::new(&mut words, 256);
        write(&mut w, v, m).unwrap();
        let len = w.bit_pos();

        let mut r = BitReader::new(&words, 256);
        let got = read(&mut r, m).unwrap();
        assert_eq!(got, v, "v={v} m={m}");
        assert_eq!(r.bit_pos(), len, "v={v} m={m}");
    }

    #[test]
    fn rice_and_golomb_round_trip_small_values() {
        for m in 1..=64u32 {
            for v in 0..=512u32 {
                if encoded_len(v, m).is_some() {
                    round_trip(v, m);
                }
            }
        }
    }

    #[test]
    fn power_of_two_rice_and_golomb_agree() {
        for m in [1u32, 2, 4, 8, 16, 32, 64, 128] {
            for v in 0..2048u32 {
                let rice = encode(v, m);
                let k = m.trailing_zeros();
                let direct = encode_rice(v, k);
                assert_eq!(rice, direct, "m={m} v={v}");
            }
        }
    }

    #[test]
    fn overflow_is_reported_not_panicked() {
        // m=1 with a large v needs v+1 unary bits; this overflows 32 bits.
        assert!(encode(40, 1).is_none());
        assert!(encode(u32::MAX, 1).is_none());
    }

    #[test]
    fn example_golomb_non_power_of_two() {
        // m=3: k=1, cutoff = 2^2 - 3 = 1.
        // v=0 -> q=0, r=0, r<cutoff -> suffix=0 (1 bit) -> codeword "0" "0" = 0b00, len=2
        let cw = encode(0, 3).unwrap();
        assert_eq!(cw.len, 2);
        assert_eq!(cw.bits, 0b00);

        // v=1 -> q=0, r=1, r>=cutoff -> suffix = 1+1=2 (2 bits) -> "0" "10", len=3
        let cw = encode(1, 3).unwrap();
        assert_eq!(cw.len, 3);
        assert_eq!(cw.bits, 0b010);

        // v=2 -> q=0, r=2, r>=cutoff -> suffix = 2+1=3 (2 bits) -> "0" "11", len=3
        let cw = encode(2, 3).unwrap();
        assert_eq!(cw.len, 3);
        assert_eq!(cw.bits, 0b011);

        // v=3 -> q=1, r=0, r<cutoff -> "1" "0" "0" = 0b100, len=3
        let cw = encode(3, 3).unwrap();
        assert_eq!(cw.len, 3);
        assert_eq!(cw.bits, 0b100);
    }
}
