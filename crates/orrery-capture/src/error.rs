//! Capture error types.

use std::path::PathBuf;

/// Errors produced while building or writing a capture.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// Pixel data length does not match `width * height * 3`.
    #[error("framebuffer {width}x{height} needs {expected} bytes, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// The capture file could not be created or written.
    #[error("failed to write capture {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
