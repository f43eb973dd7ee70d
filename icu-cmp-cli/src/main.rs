// icu-cmp
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A ground-tool demo/QA binary for `icu-cmp`: reads a flat sequence of
//! imagette samples, compresses them under a caller-chosen mode and
//! parameters, and reports the compression ratio. With `--verify`, it
//! also decompresses the result and asserts bit-exact equality with the
//! input, the same spot-check the original project's demo harness ran
//! by hand.
//!
//! Not part of the flight interface (see `spec.md` §1's Non-goals); this
//! binary exists purely for ground-side exploration of the library.

#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::info;

use icu_cmp::legacy::CmpCfg;
use icu_cmp::{CompressionMode, DataType};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModeArg {
    Raw,
    DiffZero,
    DiffMulti,
    ModelZero,
    ModelMulti,
    Stuff,
}

impl From<ModeArg> for CompressionMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Raw => CompressionMode::Raw,
            ModeArg::DiffZero => CompressionMode::DiffZero,
            ModeArg::DiffMulti => CompressionMode::DiffMulti,
            ModeArg::ModelZero => CompressionMode::ModelZero,
            ModeArg::ModelMulti => CompressionMode::ModelMulti,
            ModeArg::Stuff => CompressionMode::Stuff,
        }
    }
}

/// Round-trips a flat imagette sample file through the `icu-cmp` codec.
#[derive(Parser, Debug)]
#[command(name = "icu-cmp", version, about)]
struct Cli {
    /// Path to a file of big-endian u16 imagette samples, packed with no
    /// header.
    input: PathBuf,

    /// Compression mode.
    #[arg(long, value_enum, default_value = "diff-zero")]
    mode: ModeArg,

    /// Golomb/Rice parameter `m` (ignored for `raw`; bit width for `stuff`).
    #[arg(long, default_value_t = 1)]
    cmp_par: u32,

    /// Spillover threshold (ignored for `raw`/`stuff`).
    #[arg(long, default_value_t = 8)]
    spill: u32,

    /// Lossy rounding parameter, `0..=3`. `0` is lossless.
    #[arg(long, default_value_t = 0)]
    round: u32,

    /// Model blend weight, `0..=16` (ignored outside model modes).
    #[arg(long, default_value_t = 8)]
    v_model: u32,

    /// Decompress the result and verify it matches the input exactly.
    #[arg(long)]
    verify: bool,

    /// Write the compressed entity to this path instead of discarding it.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("icu-cmp: {msg}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let raw = fs::read(&cli.input).map_err(|e| format!("reading {:?}: {e}", cli.input))?;
    if raw.len() % 2 != 0 {
        return Err(format!("input length {} is not a whole number of u16 samples", raw.len()));
    }

    let mode: CompressionMode = cli.mode.into();
    let data_type = DataType::Imagette(icu_cmp::data_type::ImagetteKind::NonAdaptive);

    let cfg = CmpCfg::new(data_type, mode, cli.v_model, cli.round).field_param(0, cli.cmp_par, cli.spill);

    // A generous bound: the worst case is a verbatim copy plus framing.
    let mut compressed = vec![0u8; raw.len() + 4096];
    let n = cfg
        .compress(&raw, 0, 0, None, None, &mut compressed)
        .map_err(|e| format!("compress: {e}"))?;
    compressed.truncate(n);

    let ratio = raw.len() as f64 / n as f64;
    info!("compressed {} -> {} bytes (ratio {:.3})", raw.len(), n, ratio);
    println!("{} -> {} bytes, ratio {:.3}", raw.len(), n, ratio);

    if let Some(out) = &cli.out {
        fs::write(out, &compressed).map_err(|e| format!("writing {out:?}: {e}"))?;
    }

    if cli.verify {
        let mut decompressed = vec![0u8; raw.len()];
        let m = cfg
            .decompress(&compressed, None, None, &mut decompressed)
            .map_err(|e| format!("decompress: {e}"))?;
        decompressed.truncate(m);
        if decompressed != raw {
            return Err("round-trip mismatch: decompressed output differs from input".to_string());
        }
        println!("verify: OK ({m} bytes, bit-exact)");
    }

    Ok(())
}
