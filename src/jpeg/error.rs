// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for encoding and decoding.

use thiserror::Error;

use super::frame::PlaneKind;

/// Errors that can occur while encoding or decoding an image.
///
/// Transform and quantization math cannot fail; only buffer shapes,
/// code-table consistency and the outer execution layer can.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Pixel buffer length does not match `height * (width * 3 + padding)`.
    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },
    /// Width or height is zero, or the byte size overflows `usize`.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row padding must lie in 0..=3.
    #[error("invalid row padding: {0} (expected 0..=3)")]
    InvalidPadding(usize),
    /// The bit stream does not match the code table: a prefix grew past
    /// the longest code, or the stream ended inside a code.
    #[error("Huffman decode error after {consumed} bits")]
    HuffmanDecode { consumed: usize },
    /// The decoded symbol count does not fill the plane's blocks.
    #[error("expected {expected} coefficients, decoded {actual}")]
    SymbolCount { expected: usize, actual: usize },
    /// A symbol has no code in the table it is being encoded with.
    #[error("Huffman table missing code for symbol {0}")]
    MissingCode(i16),
    /// Encoded plane dimensions disagree with the requested image size.
    #[error("{plane} plane is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    PlaneMismatch {
        plane: PlaneKind,
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },
    /// The operation was cancelled before all blocks were started.
    #[error("operation cancelled")]
    Cancelled,
    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
    /// A bitmap header is malformed or uses an unsupported layout.
    #[error("invalid bitmap: {0}")]
    Bitmap(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// An error raised while processing one plane.
    #[error("{plane} plane: {source}")]
    InPlane {
        plane: PlaneKind,
        #[source]
        source: Box<CodecError>,
    },
}

impl CodecError {
    /// Attach the plane being processed, once.
    pub(crate) fn in_plane(self, plane: PlaneKind) -> Self {
        match self {
            Self::InPlane { .. } | Self::PlaneMismatch { .. } | Self::Cancelled => self,
            other => Self::InPlane {
                plane,
                source: Box::new(other),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_plane() {
        let err = CodecError::HuffmanDecode { consumed: 7 }.in_plane(PlaneKind::Cr);
        assert_eq!(err.to_string(), "Cr plane: Huffman decode error after 7 bits");

        // Context is attached only once.
        let twice = err.in_plane(PlaneKind::Y);
        assert!(matches!(
            twice,
            CodecError::InPlane {
                plane: PlaneKind::Cr,
                ..
            }
        ));
    }

    #[test]
    fn cancellation_is_not_wrapped() {
        assert!(matches!(
            CodecError::Cancelled.in_plane(PlaneKind::Y),
            CodecError::Cancelled
        ));
    }

    #[test]
    fn buffer_size_message() {
        let err = CodecError::BufferSize {
            expected: 12,
            actual: 9,
        };
        assert_eq!(
            err.to_string(),
            "pixel buffer size mismatch: expected 12 bytes, got 9"
        );
    }
}
