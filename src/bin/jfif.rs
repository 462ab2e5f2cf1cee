// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! jfif CLI: compress a 24-bit bitmap and write the reconstruction back.
//!
//! Loads the bitmap, encodes it, decodes it with the tables just built and
//! writes the result as a bitmap with the original header, reporting sizes
//! and timings on stderr.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};

use jfif_core::bmp::Bitmap;
use jfif_core::{CodecOptions, DctKind, JpegCodec, PixelOrder, Precision};

/// Round-trip a 24-bit bitmap through the transform codec.
#[derive(Parser, Debug)]
#[command(name = "jfif")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    jfif photo.bmp                          Writes photo.jfif.bmp
    jfif photo.bmp -o out.bmp --threads 4   Use four worker threads
    jfif photo.bmp --precision single -v    f32 transform, debug logging")]
struct Args {
    /// Input bitmap (24 bits per pixel, uncompressed)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output bitmap [default: <INPUT>.jfif.bmp]
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Floating-point precision of the DCT
    #[arg(long, value_enum, default_value = "double")]
    precision: PrecisionArg,

    /// Worker threads (0 = one per core)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Run on the calling thread only
    #[arg(long)]
    no_parallel: bool,

    /// Use the direct-sum DCT instead of the separable one
    #[arg(long)]
    reference_dct: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PrecisionArg {
    Single,
    Double,
}

impl From<PrecisionArg> for Precision {
    fn from(arg: PrecisionArg) -> Self {
        match arg {
            PrecisionArg::Single => Precision::Single,
            PrecisionArg::Double => Precision::Double,
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn format_mb(bytes: usize) -> String {
    format!("{:.2} MB", bytes as f64 / 1_000_000.0)
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let start = Instant::now();
    let bitmap = Bitmap::read(&args.input)
        .map_err(|e| format!("Can't read '{}': {e}", args.input.display()))?;
    let load_time = start.elapsed();
    let (width, height, padding) = (bitmap.width(), bitmap.height(), bitmap.row_padding());
    eprintln!("Loaded: {}", args.input.display());
    eprintln!("  Dimensions: {width}x{height} (row padding {padding})");
    eprintln!("  Load time: {load_time:.2?}");

    let options = CodecOptions::builder()
        .precision(args.precision.into())
        .parallel(!args.no_parallel)
        .threads(Some(args.threads))
        .dct(if args.reference_dct {
            DctKind::Reference
        } else {
            DctKind::Separable
        })
        .pixel_order(PixelOrder::Bgr)
        .build();
    let codec = JpegCodec::new(options);
    let opts = codec.options();
    eprintln!(
        "  Transform: {:?} DCT, {:?} precision, parallel {}",
        opts.dct, opts.precision, opts.parallel
    );

    let start = Instant::now();
    let (encoded, tables) = codec.encode(bitmap.pixels(), width, height, padding)?;
    let encode_time = start.elapsed();

    let original = bitmap.pixels().len();
    let compressed = encoded.encoded_bytes();
    eprintln!("Encoded:");
    eprintln!("  Size before: {}", format_mb(original));
    eprintln!("  Size after:  {}", format_mb(compressed));
    if compressed > 0 {
        eprintln!("  Ratio: {:.2}:1", original as f64 / compressed as f64);
    }
    eprintln!(
        "  Huffman symbols: Y {}, Cb {}, Cr {}",
        tables.y.len(),
        tables.cb.len(),
        tables.cr.len()
    );
    eprintln!("  Encode time: {encode_time:.2?}");

    let start = Instant::now();
    let restored = codec.decode_padded(&encoded, &tables, width, height, padding)?;
    let decode_time = start.elapsed();
    eprintln!("  Decode time: {decode_time:.2?}");

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("jfif.bmp"));
    bitmap
        .with_pixels(restored)?
        .write(&output)
        .map_err(|e| format!("Can't write '{}': {e}", output.display()))?;
    eprintln!("Wrote: {}", output.display());
    Ok(())
}
