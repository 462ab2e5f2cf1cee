// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! JPEG-style transform codec for interleaved 8-bit RGB.
//!
//! The encoder runs every image through the same fixed pipeline:
//!
//! 1. deinterleave the padded pixel rows into an RGB grid
//! 2. convert to YCbCr and subsample both chroma planes 4:2:0
//! 3. per plane: pad to whole 8×8 blocks, level shift by −128, DCT,
//!    quantize against the standard luma or chroma table, zigzag
//! 4. per plane: build a Huffman code over the plane's whole zigzag stream
//!    and encode it to a [`BitString`]
//!
//! The result is three bit strings plus the plane geometry
//! ([`EncodedPlanes`]) and, separately, the three code tables
//! ([`CodeTables`]) the decoder needs. Decoding inverts each stage and crops
//! the padding away again.
//!
//! Blocks within a plane and the three planes themselves are independent;
//! with the `parallel` feature they are spread over a rayon pool.

pub mod bitio;
pub mod color;
pub mod dct;
pub mod error;
pub mod frame;
pub mod huffman;
pub mod options;
pub mod plane;
pub mod progress;
pub mod tables;
pub mod transform;
pub mod zigzag;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, instrument};

use bitio::BitString;
use color::{rgb_to_ycbcr, ycbcr_to_rgb, Rgb, YCbCr};
use dct::DctGrid;
use error::{CodecError, Result};
use frame::{FrameInfo, PlaneDims, PlaneKind};
use huffman::CodeTable;
use options::{CodecOptions, Precision};
use plane::{deinterleave, interleave, Plane};
use progress::Progress;
use tables::quant_table_for;
use transform::{DctKernel, Sample};

/// Samples handed to one worker at a time: 64 blocks.
const CHUNK_SAMPLES: usize = 64 * 64;

/// Center of the 8-bit sample range, subtracted before the DCT.
const LEVEL_SHIFT: f64 = 128.0;

/// The three Huffman-coded planes of one image and the geometry needed to
/// undo padding and subsampling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPlanes {
    pub y: BitString,
    pub cb: BitString,
    pub cr: BitString,
    pub y_dims: PlaneDims,
    /// Shared by Cb and Cr.
    pub chroma_dims: PlaneDims,
}

impl EncodedPlanes {
    pub fn plane(&self, kind: PlaneKind) -> &BitString {
        match kind {
            PlaneKind::Y => &self.y,
            PlaneKind::Cb => &self.cb,
            PlaneKind::Cr => &self.cr,
        }
    }

    pub fn dims(&self, kind: PlaneKind) -> PlaneDims {
        if kind.is_chroma() {
            self.chroma_dims
        } else {
            self.y_dims
        }
    }

    /// Total coded bits over all three planes.
    pub fn encoded_bits(&self) -> usize {
        self.y.len() + self.cb.len() + self.cr.len()
    }

    /// Bytes the three planes occupy when each is packed separately.
    pub fn encoded_bytes(&self) -> usize {
        self.y.as_bytes().len() + self.cb.as_bytes().len() + self.cr.as_bytes().len()
    }
}

/// Per-plane Huffman code tables produced by the encoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTables {
    pub y: CodeTable,
    pub cb: CodeTable,
    pub cr: CodeTable,
}

impl CodeTables {
    pub fn plane(&self, kind: PlaneKind) -> &CodeTable {
        match kind {
            PlaneKind::Y => &self.y,
            PlaneKind::Cb => &self.cb,
            PlaneKind::Cr => &self.cr,
        }
    }
}

/// Encoder / decoder with fixed options.
///
/// Holds no per-image state; one codec can be shared between threads and
/// reused for any number of images.
#[derive(Debug, Clone, Default)]
pub struct JpegCodec {
    options: CodecOptions,
    progress: Option<Progress>,
}

impl JpegCodec {
    pub fn new(options: CodecOptions) -> Self {
        Self {
            options,
            progress: None,
        }
    }

    /// Report block progress to `progress` and stop when it is cancelled.
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Compress `rgb`: `height` rows of `width` pixels, each row followed by
    /// `row_padding` (0..=3) filler bytes that are ignored.
    #[instrument(level = "debug", skip(self, rgb))]
    pub fn encode(
        &self,
        rgb: &[u8],
        width: usize,
        height: usize,
        row_padding: usize,
    ) -> Result<(EncodedPlanes, CodeTables)> {
        self.run_in_pool(|| match self.options.precision {
            Precision::Single => self.encode_with::<f32>(rgb, width, height, row_padding),
            Precision::Double => self.encode_with::<f64>(rgb, width, height, row_padding),
        })
    }

    /// Reconstruct tightly packed pixel rows (`width * 3` bytes each).
    #[instrument(level = "debug", skip(self, encoded, tables))]
    pub fn decode(
        &self,
        encoded: &EncodedPlanes,
        tables: &CodeTables,
        width: usize,
        height: usize,
    ) -> Result<Vec<u8>> {
        self.decode_padded(encoded, tables, width, height, 0)
    }

    /// Like [`JpegCodec::decode`], but end every row with `row_padding`
    /// zero bytes so the output has the layout the encoder consumed.
    pub fn decode_padded(
        &self,
        encoded: &EncodedPlanes,
        tables: &CodeTables,
        width: usize,
        height: usize,
        row_padding: usize,
    ) -> Result<Vec<u8>> {
        if row_padding > 3 {
            return Err(CodecError::InvalidPadding(row_padding));
        }
        let pixels = self.run_in_pool(|| match self.options.precision {
            Precision::Single => self.decode_with::<f32>(encoded, tables, width, height),
            Precision::Double => self.decode_with::<f64>(encoded, tables, width, height),
        })?;
        Ok(interleave(&pixels, row_padding, self.options.pixel_order))
    }

    /// Encode, then decode with the tables just built. The output keeps the
    /// input's row padding, so it has the same length as `rgb`.
    pub fn roundtrip(
        &self,
        rgb: &[u8],
        width: usize,
        height: usize,
        row_padding: usize,
    ) -> Result<Vec<u8>> {
        let (encoded, tables) = self.encode(rgb, width, height, row_padding)?;
        self.decode_padded(&encoded, &tables, width, height, row_padding)
    }

    fn encode_with<T: Sample>(
        &self,
        rgb: &[u8],
        width: usize,
        height: usize,
        row_padding: usize,
    ) -> Result<(EncodedPlanes, CodeTables)> {
        let pixels = deinterleave(rgb, width, height, row_padding, self.options.pixel_order)?;
        let frame = FrameInfo::new(width, height)?;
        self.start(&frame);

        let ycc = pixels.map(rgb_to_ycbcr);
        let y = ycc.map(|s| s.y);
        let cb = ycc.map(|s| s.cb).subsample();
        let cr = ycc.map(|s| s.cr).subsample();
        debug!(
            width,
            height,
            chroma_width = cb.width(),
            chroma_height = cb.height(),
            "color converted and subsampled"
        );

        let (y, cb, cr) = self.join3(
            || self.encode_plane::<T>(PlaneKind::Y, &y, frame.luma),
            || self.encode_plane::<T>(PlaneKind::Cb, &cb, frame.chroma),
            || self.encode_plane::<T>(PlaneKind::Cr, &cr, frame.chroma),
        );
        let ((y_bits, y_table), (cb_bits, cb_table), (cr_bits, cr_table)) = (y?, cb?, cr?);

        let encoded = EncodedPlanes {
            y: y_bits,
            cb: cb_bits,
            cr: cr_bits,
            y_dims: frame.luma,
            chroma_dims: frame.chroma,
        };
        debug!(
            bits = encoded.encoded_bits(),
            bytes = encoded.encoded_bytes(),
            "encoded image"
        );
        let tables = CodeTables {
            y: y_table,
            cb: cb_table,
            cr: cr_table,
        };
        Ok((encoded, tables))
    }

    fn encode_plane<T: Sample>(
        &self,
        kind: PlaneKind,
        samples: &Plane<f64>,
        dims: PlaneDims,
    ) -> Result<(BitString, CodeTable)> {
        let padded = samples.pad_replicate(dims.padded_width, dims.padded_height);
        let shifted: Vec<T> = padded
            .to_blocks()
            .into_iter()
            .map(|v| T::cast(v - LEVEL_SHIFT))
            .collect();

        let kernel = DctKernel::<T>::new(self.options.dct);
        let qt = quant_table_for(kind);
        let mut grid = DctGrid::new(dims.blocks_wide(), dims.blocks_tall());
        self.for_each_block(&shifted, grid.coeffs_mut(), |src, dst| {
            let block: [T; 64] = std::array::from_fn(|i| src[i]);
            dst.copy_from_slice(&qt.quantize(&kernel.forward(&block)));
        })
        .map_err(|e| e.in_plane(kind))?;

        let symbols = grid.to_zigzag();
        let table = CodeTable::from_symbols(&symbols);
        let bits = table.encode(&symbols).map_err(|e| e.in_plane(kind))?;
        debug!(
            plane = %kind,
            blocks = grid.total_blocks(),
            distinct = table.len(),
            bits = bits.len(),
            "encoded plane"
        );
        Ok((bits, table))
    }

    fn decode_with<T: Sample>(
        &self,
        encoded: &EncodedPlanes,
        tables: &CodeTables,
        width: usize,
        height: usize,
    ) -> Result<Plane<Rgb>> {
        let frame = FrameInfo::new(width, height)?;
        frame.check_plane(PlaneKind::Y, &encoded.y_dims)?;
        frame.check_plane(PlaneKind::Cb, &encoded.chroma_dims)?;
        self.start(&frame);

        let (y, cb, cr) = self.join3(
            || self.decode_plane::<T>(PlaneKind::Y, encoded, tables),
            || self.decode_plane::<T>(PlaneKind::Cb, encoded, tables),
            || self.decode_plane::<T>(PlaneKind::Cr, encoded, tables),
        );
        let (y, cb, cr) = (y?, cb?, cr?);

        let cb = cb.upsample(width, height);
        let cr = cr.upsample(width, height);
        debug!(width, height, "upsampled chroma");

        let mut pixels = Plane::filled(width, height, Rgb::default());
        for row in 0..height {
            for col in 0..width {
                let sample = YCbCr {
                    y: y.get(col, row),
                    cb: cb.get(col, row),
                    cr: cr.get(col, row),
                };
                pixels.set(col, row, ycbcr_to_rgb(sample));
            }
        }
        Ok(pixels)
    }

    fn decode_plane<T: Sample>(
        &self,
        kind: PlaneKind,
        encoded: &EncodedPlanes,
        tables: &CodeTables,
    ) -> Result<Plane<f64>> {
        let dims = encoded.dims(kind);
        let symbols = tables
            .plane(kind)
            .decode(encoded.plane(kind))
            .map_err(|e| e.in_plane(kind))?;
        let grid = DctGrid::from_zigzag(dims.blocks_wide(), dims.blocks_tall(), &symbols)
            .map_err(|e| e.in_plane(kind))?;

        let kernel = DctKernel::<T>::new(self.options.dct);
        let qt = quant_table_for(kind);
        let mut samples = vec![0.0f64; dims.coefficient_count()];
        self.for_each_block(grid.coeffs(), &mut samples, |src, dst| {
            let quantized: [i16; 64] = std::array::from_fn(|i| src[i]);
            let pixels = kernel.inverse(&qt.dequantize::<T>(&quantized));
            for (d, p) in dst.iter_mut().zip(pixels) {
                *d = (p.widen() + LEVEL_SHIFT).clamp(0.0, 255.0);
            }
        })
        .map_err(|e| e.in_plane(kind))?;

        debug!(plane = %kind, blocks = grid.total_blocks(), "decoded plane");
        reassemble(kind, dims, &samples)
    }

    fn start(&self, frame: &FrameInfo) {
        if let Some(progress) = &self.progress {
            progress.init(frame.total_blocks() as u64);
        }
    }

    /// Apply `f` to every 64-sample block of `input`, writing the matching
    /// block of `output`. Blocks are handed out in chunks; cancellation is
    /// checked before each chunk starts.
    fn for_each_block<I, O, F>(&self, input: &[I], output: &mut [O], f: F) -> Result<()>
    where
        I: Sync,
        O: Send,
        F: Fn(&[I], &mut [O]) + Sync,
    {
        debug_assert_eq!(input.len(), output.len());
        let run = |src: &[I], dst: &mut [O]| -> Result<()> {
            if let Some(progress) = &self.progress {
                progress.check_cancelled()?;
            }
            for (s, d) in src.chunks_exact(64).zip(dst.chunks_exact_mut(64)) {
                f(s, d);
            }
            if let Some(progress) = &self.progress {
                progress.advance((src.len() / 64) as u64);
            }
            Ok(())
        };

        #[cfg(feature = "parallel")]
        {
            if self.options.use_parallel() {
                return input
                    .par_chunks(CHUNK_SAMPLES)
                    .zip(output.par_chunks_mut(CHUNK_SAMPLES))
                    .try_for_each(|(src, dst)| run(src, dst));
            }
        }

        input
            .chunks(CHUNK_SAMPLES)
            .zip(output.chunks_mut(CHUNK_SAMPLES))
            .try_for_each(|(src, dst)| run(src, dst))
    }

    /// Run the three plane jobs, concurrently when parallelism is on.
    fn join3<A, B, C, RA, RB, RC>(&self, a: A, b: B, c: C) -> (RA, RB, RC)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        C: FnOnce() -> RC + Send,
        RA: Send,
        RB: Send,
        RC: Send,
    {
        #[cfg(feature = "parallel")]
        {
            if self.options.use_parallel() {
                let (ra, (rb, rc)) = rayon::join(a, || rayon::join(b, c));
                return (ra, rb, rc);
            }
        }
        (a(), b(), c())
    }

    /// Run `f` inside a dedicated pool when a thread count is configured.
    fn run_in_pool<R, F>(&self, f: F) -> Result<R>
    where
        R: Send,
        F: FnOnce() -> Result<R> + Send,
    {
        #[cfg(feature = "parallel")]
        {
            if let (true, Some(threads)) = (self.options.use_parallel(), self.options.threads) {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| CodecError::ThreadPool(e.to_string()))?;
                return pool.install(f);
            }
        }
        f()
    }
}

/// Put a plane's block-ordered samples back into raster order and crop the
/// block padding.
fn reassemble(kind: PlaneKind, dims: PlaneDims, samples: &[f64]) -> Result<Plane<f64>> {
    let padded = Plane::from_blocks(dims.padded_width, dims.padded_height, samples)
        .ok_or_else(|| {
            CodecError::SymbolCount {
                expected: dims.coefficient_count(),
                actual: samples.len(),
            }
            .in_plane(kind)
        })?;
    Ok(padded.crop(dims.width, dims.height))
}

/// Encode with default options (B,G,R byte order, double precision).
pub fn encode(
    rgb: &[u8],
    width: usize,
    height: usize,
    row_padding: usize,
) -> Result<(EncodedPlanes, CodeTables)> {
    JpegCodec::default().encode(rgb, width, height, row_padding)
}

/// Decode with default options into tightly packed rows.
pub fn decode(
    encoded: &EncodedPlanes,
    tables: &CodeTables,
    width: usize,
    height: usize,
) -> Result<Vec<u8>> {
    JpegCodec::default().decode(encoded, tables, width, height)
}
