// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Codec configuration.

pub use super::plane::PixelOrder;
pub use super::transform::DctKind;

/// Floating-point precision of the block transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// `f32` kernel.
    Single,
    /// `f64` kernel.
    #[default]
    Double,
}

/// Options shared by encode and decode.
///
/// Encoder and decoder must agree on `pixel_order`; the other fields only
/// change how the work is done, and reconstructions under different
/// settings differ by at most rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    pub precision: Precision,
    /// Spread blocks and planes over worker threads. Ignored without the
    /// `parallel` feature.
    pub parallel: bool,
    /// Worker count; `None` uses the global rayon pool.
    pub threads: Option<usize>,
    pub dct: DctKind,
    /// Channel order of the interleaved pixel bytes.
    pub pixel_order: PixelOrder,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            precision: Precision::Double,
            parallel: cfg!(feature = "parallel"),
            threads: None,
            dct: DctKind::Separable,
            pixel_order: PixelOrder::Bgr,
        }
    }
}

impl CodecOptions {
    /// Single-threaded, double precision, separable DCT.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    pub fn builder() -> CodecOptionsBuilder {
        CodecOptionsBuilder::default()
    }

    /// Whether the parallel path will actually run.
    pub(crate) fn use_parallel(&self) -> bool {
        cfg!(feature = "parallel") && self.parallel && self.threads != Some(1)
    }
}

/// Builder for [`CodecOptions`].
#[derive(Debug, Clone, Default)]
pub struct CodecOptionsBuilder {
    options: CodecOptions,
}

impl CodecOptionsBuilder {
    pub fn precision(mut self, precision: Precision) -> Self {
        self.options.precision = precision;
        self
    }

    pub fn parallel(mut self, value: bool) -> Self {
        self.options.parallel = value;
        self
    }

    /// `None` or `Some(0)` keeps the default pool.
    pub fn threads(mut self, threads: Option<usize>) -> Self {
        self.options.threads = threads.filter(|&n| n > 0);
        self
    }

    pub fn dct(mut self, kind: DctKind) -> Self {
        self.options.dct = kind;
        self
    }

    pub fn pixel_order(mut self, order: PixelOrder) -> Self {
        self.options.pixel_order = order;
        self
    }

    #[must_use]
    pub fn build(self) -> CodecOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = CodecOptions::default();
        assert_eq!(opts.precision, Precision::Double);
        assert_eq!(opts.dct, DctKind::Separable);
        assert_eq!(opts.pixel_order, PixelOrder::Bgr);
        assert_eq!(opts.threads, None);
        assert_eq!(opts.parallel, cfg!(feature = "parallel"));
    }

    #[test]
    fn builder_sets_fields() {
        let opts = CodecOptions::builder()
            .precision(Precision::Single)
            .parallel(false)
            .threads(Some(3))
            .dct(DctKind::Reference)
            .pixel_order(PixelOrder::Rgb)
            .build();
        assert_eq!(
            opts,
            CodecOptions {
                precision: Precision::Single,
                parallel: false,
                threads: Some(3),
                dct: DctKind::Reference,
                pixel_order: PixelOrder::Rgb,
            }
        );
        assert!(!opts.use_parallel());
    }

    #[test]
    fn zero_threads_means_default() {
        assert_eq!(CodecOptions::builder().threads(Some(0)).build().threads, None);
    }

    #[test]
    fn one_thread_runs_sequentially() {
        let opts = CodecOptions::builder().parallel(true).threads(Some(1)).build();
        assert!(!opts.use_parallel());
    }
}
