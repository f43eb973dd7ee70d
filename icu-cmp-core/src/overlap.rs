// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Byte-range aliasing detection for caller-supplied buffers, per §3's
//! buffer-distinctness invariants (source/destination never alias; model
//! and updated-model buffers, when present, are distinct from both and
//! from each other). No teacher analogue — Symphonia's I/O layer always
//! owns a single sink and never juggles multiple caller buffers that
//! could alias, so this is new construction grounded directly on the
//! spec's invariant text.

/// Returns `true` if the byte ranges backing `a` and `b` overlap. Slices of
/// different element types are supported (e.g. a `[u8]` source compared
/// against a `[u32]` model buffer) since the comparison is done purely on
/// byte address ranges. Empty slices never overlap with anything.
pub fn slices_overlap<T, U>(a: &[T], b: &[U]) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let a_start = a.as_ptr() as usize;
    let a_end = a_start + std::mem::size_of_val(a);
    let b_start = b.as_ptr() as usize;
    let b_end = b_start + std::mem::size_of_val(b);
    a_start < b_end && b_start < a_end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disjoint_slices_do_not_overlap() {
        let a = [0u8; 16];
        let b = [0u32; 4];
        assert!(!slices_overlap(&a, &b));
    }

    #[test]
    fn identical_slice_overlaps_itself() {
        let a = [0u32; 8];
        assert!(slices_overlap(&a, &a));
    }

    #[test]
    fn overlapping_subslices_are_detected() {
        let a = [0u8; 32];
        let (left, right) = a.split_at(20);
        // left = [0,20), right = [20,32): adjacent, not overlapping.
        assert!(!slices_overlap(left, right));

        let b = [0u8; 32];
        let first_half = &b[0..20];
        let second_half = &b[10..30];
        assert!(slices_overlap(first_half, second_half));
    }

    #[test]
    fn empty_slice_never_overlaps() {
        let a: [u8; 0] = [];
        let b = [0u8; 16];
        assert!(!slices_overlap(&a, &b));
        assert!(!slices_overlap(&b, &a));
    }
}
