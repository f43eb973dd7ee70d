// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `error` module defines the error type shared by the leaf bit I/O,
//! Golomb/Rice, and value-mapping primitives.

use core::fmt;

/// `CoreError` enumerates every way the bit-level primitives can fail.
///
/// There is no panic path here for conditions reachable from untrusted input
/// or a validated-but-adversarial bitstream; `debug_assert!` is used instead
/// for preconditions that a caller can only violate by constructing an
/// invalid `Setup` (a programming error, not a runtime one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// There is not enough room left in the destination word stream (or the
    /// source word stream has been exhausted) to perform the requested
    /// bit-level read or write.
    SmallBuffer,
    /// A decoded Golomb/Rice codeword would be longer than 32 bits, which
    /// indicates either a malformed bitstream or a pathological unary prefix.
    CodewordTooLong,
    /// A Zero-escape literal read as exactly the spillover threshold, or
    /// read as a value that does not satisfy the escape invariant.
    InvalidEscapeLiteral,
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::SmallBuffer => write!(f, "destination or source word stream too small"),
            CoreError::CodewordTooLong => write!(f, "codeword length exceeds 32 bits"),
            CoreError::InvalidEscapeLiteral => {
                write!(f, "escape literal violates the zero-escape invariant")
            }
        }
    }
}

impl std::error::Error for CoreError {}

pub type Result<T> = core::result::Result<T, CoreError>;
