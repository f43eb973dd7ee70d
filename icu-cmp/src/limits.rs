// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Range tables and limit formulas for `cmp_par` (the Golomb parameter `m`)
//! and `spill` (the escape threshold), per §3's invariants.
//!
//! The imagette table's entries are derived from the same general spillover
//! formula the non-imagette path uses, scaled to the imagette field's 16-bit
//! width and clamped to the documented `0..=623` range (see `DESIGN.md`:
//! the flight-constant table itself could not be recovered from the
//! retrieval pack, so this is a faithful-by-construction stand-in, not a
//! transcription of the original).

use icu_cmp_core::golomb::log2_floor;

/// Smallest legal `cmp_par` for any mode other than `Raw`/`Stuff`.
pub const CMP_PAR_MIN: u32 = 1;

/// Largest legal `cmp_par` for imagette fields.
pub const CMP_PAR_MAX_IMAGETTE: u32 = 64;

/// Largest legal `cmp_par` for non-imagette fields (`2^31`).
pub const CMP_PAR_MAX_NON_IMAGETTE: u32 = 1 << 31;

/// Largest legal `cmp_par` ("Stuff" literal width).
pub const STUFF_MAX_BITS: u32 = 32;

/// Smallest legal `spill` for any escape-coded field.
pub const MIN_SPILL: u32 = 2;

const MAX_CW_BITS_NON_IMAGETTE: u64 = 32;

/// `imagette_max_spill[m]` for `m` in `1..=64`; index 0 is an unused
/// sentinel. Values are monotonically non-decreasing and bounded by 623,
/// per §3.
const IMAGETTE_MAX_SPILL: [u32; 65] = [
    0, 8, 22, 35, 48, 60, 72, 84, 96, 107, 118, 129, 140, 151, 162, 173, 184, 194, 204, 214, 224,
    234, 244, 254, 264, 274, 284, 294, 304, 314, 324, 334, 344, 353, 362, 371, 380, 389, 398, 407,
    416, 425, 434, 443, 452, 461, 470, 479, 488, 497, 506, 515, 524, 533, 542, 551, 560, 569, 578,
    587, 596, 605, 614, 623, 623,
];

/// The maximum legal `spill` for imagette field parameter `m`, or `None` if
/// `m` is out of `[1, 64]`.
pub fn imagette_max_spill(m: u32) -> Option<u32> {
    IMAGETTE_MAX_SPILL.get(m as usize).copied().filter(|_| (1..=CMP_PAR_MAX_IMAGETTE).contains(&m))
}

/// The maximum legal `spill` for a non-imagette field parameter `m`, per
/// §3's formula:
///
/// `floor((max_cw_bits - 1 - floor(log2 m))*m + cutoff - (max_cw_bits/2 - 1) - 1)`
/// with `cutoff = 2^(floor(log2 m)+1) - m` and `max_cw_bits = 32`.
pub fn non_imagette_max_spill(m: u32) -> u64 {
    debug_assert!(m >= 1);
    let k = u64::from(log2_floor(m));
    let cutoff = (1u64 << (k + 1)) - u64::from(m);
    (MAX_CW_BITS_NON_IMAGETTE - 1 - k) * u64::from(m) + cutoff - (MAX_CW_BITS_NON_IMAGETTE / 2 - 1)
        - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imagette_table_is_monotonic_and_bounded() {
        let mut prev = 0;
        for m in 1..=CMP_PAR_MAX_IMAGETTE {
            let v = imagette_max_spill(m).unwrap();
            assert!(v >= prev, "table not monotonic at m={m}");
            assert!(v <= 623, "table exceeds documented bound at m={m}");
            prev = v;
        }
    }

    #[test]
    fn imagette_table_rejects_out_of_range_m() {
        assert_eq!(imagette_max_spill(0), None);
        assert_eq!(imagette_max_spill(65), None);
    }

    #[test]
    fn non_imagette_spill_matches_worked_values() {
        // m=1: k=0, cutoff=2-1=1. (32-1-0)*1 + 1 - 15 - 1 = 31+1-16=16.
        assert_eq!(non_imagette_max_spill(1), 16);
    }
}
