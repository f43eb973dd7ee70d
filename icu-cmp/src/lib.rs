// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `icu-cmp` implements the typed data model, configuration and
//! validation, per-field setup, escape policies, typed encode/decode
//! passes, and the entity/chunk container for the ICU science-data
//! codec, built on the leaf bit-level primitives in `icu-cmp-core`.
//!
//! The primary entry points are [`config::ConfigurationBuilder`], which
//! produces a validated [`config::Configuration`], and
//! [`chunk::ChunkCompressor`], which compresses or decompresses a
//! [`chunk::Chunk`] under that configuration into or out of a framed
//! [`container::Entity`]. Callers porting code against the original
//! single-data-type call shape can use [`legacy::CmpCfg`] instead.

pub mod chunk;
pub mod config;
pub mod container;
pub mod data_type;
pub mod error;
pub mod escape;
pub mod legacy;
pub mod limits;
pub mod mode;
pub mod passes;
pub mod session;
pub mod setup;

pub use config::{Configuration, ConfigurationBuilder};
pub use data_type::DataType;
pub use error::{CmpError, Result};
pub use mode::{CompressionMode, Endpoint};
pub use session::{Session, Timestamp, TimestampSource};
