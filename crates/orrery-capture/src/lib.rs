//! Framebuffer capture to plain-text PPM (`P3`) image files.

pub mod dumper;
pub mod error;
pub mod framebuffer;
pub mod ppm;

pub use dumper::FrameDumper;
pub use error::CaptureError;
pub use framebuffer::{Framebuffer, RowOrder};
pub use ppm::{PPM_MAGIC, PPM_MAX_VALUE, write_ppm};
