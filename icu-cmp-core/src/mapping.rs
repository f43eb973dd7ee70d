// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value mapping: the zig-zag signed/unsigned bijection, lossy rounding,
//! and the model-prediction arithmetic shared by every typed pass, per
//! §4.4.

/// Maps a signed residual to an unsigned codeword input: `2x` for `x >= 0`,
/// `-2x - 1` for `x < 0`. `i32::MIN` maps to `u32::MAX`, matching the
/// documented wrap.
#[inline]
pub fn zigzag_map(x: i32) -> u32 {
    // Standard zig-zag encoding via an arithmetic shift of the sign: for
    // x >= 0, (x >> 31) is 0 and the expression reduces to 2x; for x < 0,
    // (x >> 31) is -1 (all ones), giving -2x - 1 after the XOR.
    ((x << 1) ^ (x >> 31)) as u32
}

/// Inverse of [`zigzag_map`]: even `n` maps to `n/2`, odd `n` maps to
/// `-((n+1)/2)`, with `n = u32::MAX` wrapping to `i32::MIN`.
#[inline]
pub fn zigzag_unmap(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}

/// Forward lossy rounding: `x >> round`.
#[inline]
pub fn round_forward(x: u32, round: u32) -> u32 {
    if round == 0 {
        x
    } else {
        x >> round
    }
}

/// Inverse lossy rounding: `x << round`, saturating the result to `bits`
/// bits so a shifted-in high bit cannot silently overflow the field width.
#[inline]
pub fn round_inverse(x: u32, round: u32, bits: u32) -> u32 {
    debug_assert!(bits >= 1 && bits <= 32);
    if round == 0 {
        return x & field_mask(bits);
    }
    let shifted = (u64::from(x)) << round;
    let max = field_mask(bits) as u64;
    (shifted.min(max)) as u32
}

/// A `bits`-wide mask of ones, `bits` in `1..=32`.
#[inline]
pub fn field_mask(bits: u32) -> u32 {
    debug_assert!(bits >= 1 && bits <= 32);
    if bits == 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

/// Computes the residual for sample `s` predicted from `model`, modulo
/// `2^bits`, per §4.4: `d = s - round_forward(model, round) (mod 2^bits)`.
#[inline]
pub fn residual(s: u32, model: u32, round: u32, bits: u32) -> u32 {
    let predicted = round_forward(model, round);
    s.wrapping_sub(predicted) & field_mask(bits)
}

/// Inverts [`residual`]: recovers `s` from a decoded residual, the same
/// model, and lossy parameters, modulo `2^bits`.
#[inline]
pub fn reconstruct(residual: u32, model: u32, round: u32, bits: u32) -> u32 {
    let predicted = round_forward(model, round);
    residual.wrapping_add(predicted) & field_mask(bits)
}

/// Reinterprets an unsigned `bits`-wide residual as signed within that same
/// width (not as a full-width `i32`): values at or past the half-range wrap
/// to negative, per §4.4's "residual is read back as a signed, `bits`-wide
/// quantity before zig-zag mapping" step.
#[inline]
pub fn field_signed(d: u32, bits: u32) -> i32 {
    debug_assert!(bits >= 1 && bits <= 32);
    if bits == 32 {
        return d as i32;
    }
    let half = 1u32 << (bits - 1);
    if d >= half {
        (i64::from(d) - (1i64 << bits)) as i32
    } else {
        d as i32
    }
}

/// Inverse of [`field_signed`]: folds a signed value back into an unsigned
/// `bits`-wide quantity, modulo `2^bits`.
#[inline]
pub fn field_unsigned(x: i32, bits: u32) -> u32 {
    debug_assert!(bits >= 1 && bits <= 32);
    (x as u32) & field_mask(bits)
}

/// Computes the updated model value after observing decoded sample `s`
/// against prior model `model`, with blend weight `v_model in [0, 16]`:
/// `m' = (v_model*m + (16 - v_model)*s) / 16`.
#[inline]
pub fn updated_model(model: u32, s: u32, v_model: u32) -> u32 {
    debug_assert!(v_model <= 16);
    let blended = u64::from(v_model) * u64::from(model) + u64::from(16 - v_model) * u64::from(s);
    (blended / 16) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_is_a_bijection() {
        let samples: [i32; 9] =
            [0, 1, -1, 2, -2, i32::MAX, i32::MIN, i32::MIN + 1, i32::MAX - 1];
        for &x in &samples {
            assert_eq!(zigzag_unmap(zigzag_map(x)), x, "x={x}");
        }
        assert_eq!(zigzag_map(i32::MIN), u32::MAX);
        assert_eq!(zigzag_unmap(u32::MAX), i32::MIN);
    }

    #[test]
    fn zigzag_matches_documented_table() {
        let table: [(i32, u32); 6] = [(0, 0), (-1, 1), (1, 2), (-2, 3), (2, 4), (-5, 9)];
        for (x, n) in table {
            assert_eq!(zigzag_map(x), n, "x={x}");
            assert_eq!(zigzag_unmap(n), x, "n={n}");
        }
    }

    #[test]
    fn round_trip_through_round_forward_and_inverse_is_lossless_at_round_zero() {
        for x in [0u32, 1, 255, 65535, 0xFFFF_FFFF] {
            assert_eq!(round_inverse(round_forward(x, 0), 0, 32), x);
        }
    }

    #[test]
    fn round_inverse_saturates_instead_of_overflowing() {
        // 16-bit field, round=3: a large value shifted left by 3 would spill
        // past bit 15 without saturation.
        let got = round_inverse(0xFFFF, 3, 16);
        assert_eq!(got, field_mask(16));
    }

    #[test]
    fn residual_round_trip_is_modulo_field_width() {
        for bits in [8u32, 16, 32] {
            for s in [0u32, 1, field_mask(bits) / 2, field_mask(bits)] {
                for model in [0u32, 1, field_mask(bits)] {
                    let d = residual(s, model, 0, bits);
                    assert_eq!(reconstruct(d, model, 0, bits), s & field_mask(bits));
                }
            }
        }
    }

    #[test]
    fn field_signed_round_trips_through_field_unsigned() {
        for bits in [4u32, 8, 16, 32] {
            let half = 1i64 << (bits - 1);
            for x in [0i64, 1, -1, half - 1, -half] {
                let x = x as i32;
                let d = field_unsigned(x, bits);
                assert_eq!(field_signed(d, bits), x, "bits={bits} x={x}");
            }
        }
    }

    #[test]
    fn field_signed_matches_two_complement_wrap() {
        // 16-bit field: 0x8000 is the most negative signed value, -32768.
        assert_eq!(field_signed(0x8000, 16), -32768);
        assert_eq!(field_signed(0x7FFF, 16), 32767);
        assert_eq!(field_signed(0x0000, 16), 0);
        assert_eq!(field_signed(0xFFFF, 16), -1);
    }

    #[test]
    fn updated_model_matches_worked_example() {
        // From the imagette model-multi scenario: v_model=8, m=0x0000, s=0x0000 -> m'=0x0000.
        assert_eq!(updated_model(0x0000, 0x0000, 8), 0x0000);
        // m=0xFFFF, s=0x0001 -> (8*0xFFFF + 8*1)/16 = (524280+8)/16 = 32768 = 0x8000.
        assert_eq!(updated_model(0xFFFF, 0x0001, 8), 0x8000);
    }
}
