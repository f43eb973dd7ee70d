// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The installable timestamp source and the `Session` that carries it,
//! per §4.11. Replaces the process-wide timestamp provider the Design
//! Notes flag for removal with a value passed to the chunk compressor
//! explicitly.

use crate::error::CmpError;

/// A 6-byte, big-endian on-board timestamp, copied verbatim into the
/// container header's start/end timestamp fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timestamp(pub [u8; 6]);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp([0; 6]);
}

/// Supplies the current on-board time. Called at most twice per chunk
/// compression (start, end); a configuration not wired to a clock can
/// leave the `Session` on its default [`NullTimestampSource`], which
/// stamps all-zero timestamps.
pub trait TimestampSource {
    fn now(&self) -> Result<Timestamp, CmpError>;
}

/// The default `TimestampSource`: no clock is installed, so every chunk
/// is stamped with [`Timestamp::ZERO`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTimestampSource;

impl TimestampSource for NullTimestampSource {
    fn now(&self) -> Result<Timestamp, CmpError> {
        Ok(Timestamp::ZERO)
    }
}

/// Caller-owned context for one or more chunk compressions. Holds the
/// optional installed clock; carries no other mutable state, per §5's
/// single-threaded, no-shared-state model.
pub struct Session {
    clock: Box<dyn TimestampSource>,
}

impl Default for Session {
    fn default() -> Self {
        Session { clock: Box::new(NullTimestampSource) }
    }
}

impl Session {
    /// A session with the default (all-zero) timestamp source.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session whose chunks are stamped by `clock`.
    pub fn with_clock(clock: impl TimestampSource + 'static) -> Self {
        Session { clock: Box::new(clock) }
    }

    pub(crate) fn now(&self) -> Result<Timestamp, CmpError> {
        self.clock.now()
    }
}
