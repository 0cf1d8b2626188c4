//! Numbered capture files.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::CaptureError;
use crate::framebuffer::Framebuffer;
use crate::ppm::write_ppm;

/// Writes framebuffers to `<output_dir>/<prefix><id>.ppm`.
///
/// Ids start at 0 and advance by one after every successful write, for the
/// lifetime of the dumper. A failed write leaves the id unchanged so the
/// next attempt reuses it.
#[derive(Debug)]
pub struct FrameDumper {
    prefix: String,
    output_dir: PathBuf,
    next_id: u32,
}

impl FrameDumper {
    /// Dumper writing into the current working directory.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_output_dir(prefix, PathBuf::new())
    }

    pub fn with_output_dir(prefix: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            output_dir: output_dir.into(),
            next_id: 0,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Id the next successful capture will use.
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Path of the file the next capture will write.
    pub fn next_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}{}.ppm", self.prefix, self.next_id))
    }

    /// Write `framebuffer` to the next numbered file, creating or overwriting it.
    pub fn dump(&mut self, framebuffer: &Framebuffer) -> Result<PathBuf, CaptureError> {
        let path = self.next_path();
        let write_err = |source| CaptureError::Write {
            path: path.clone(),
            source,
        };

        if !self.output_dir.as_os_str().is_empty() {
            std::fs::create_dir_all(&self.output_dir).map_err(write_err)?;
        }
        let file = File::create(&path).map_err(write_err)?;
        write_ppm(BufWriter::new(file), framebuffer).map_err(write_err)?;

        log::info!(
            "Captured {}x{} framebuffer to {}",
            framebuffer.width(),
            framebuffer.height(),
            path.display()
        );
        self.next_id += 1;
        Ok(path)
    }
}
