// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `icu-cmp-core` provides the leaf algorithmic primitives shared by the
//! ICU science-data codec: MSB-first bit I/O over a big-endian word stream,
//! Golomb/Rice codeword generation and decoding, and the value-mapping
//! arithmetic (zig-zag, lossy rounding, model prediction) used by every
//! typed per-record pass.
//!
//! This crate has no notion of record layouts, configuration, or the
//! container format — those live in `icu-cmp`, which depends on it.

pub mod bitio;
pub mod error;
pub mod golomb;
pub mod mapping;
pub mod overlap;

pub use error::{CoreError, Result};
