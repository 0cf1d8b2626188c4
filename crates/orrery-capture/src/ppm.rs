//! Plain-text PPM (`P3`) encoding.

use std::io::{self, Write};

use crate::framebuffer::{CHANNELS, Framebuffer};

/// Magic token of the plain-text RGB format.
pub const PPM_MAGIC: &str = "P3";

/// Maximum channel value written in the header.
pub const PPM_MAX_VALUE: u8 = 255;

/// Write `framebuffer` as a `P3` image.
///
/// Header is three lines: magic, `<width> <height>`, max value. Then one line
/// per pixel row from top to bottom, each holding `width` space-separated
/// `R G B` decimal triples. A zero-area framebuffer produces only the header.
pub fn write_ppm<W: Write>(mut writer: W, framebuffer: &Framebuffer) -> io::Result<()> {
    writeln!(writer, "{PPM_MAGIC}")?;
    writeln!(writer, "{} {}", framebuffer.width(), framebuffer.height())?;
    writeln!(writer, "{PPM_MAX_VALUE}")?;

    if framebuffer.width() == 0 {
        return writer.flush();
    }

    let mut line = String::with_capacity(framebuffer.width() as usize * 12);
    for row in framebuffer.rows_top_down() {
        line.clear();
        for (i, px) in row.chunks_exact(CHANNELS).enumerate() {
            if i > 0 {
                line.push(' ');
            }
            line.push_str(&format!("{} {} {}", px[0], px[1], px[2]));
        }
        writeln!(writer, "{line}")?;
    }
    writer.flush()
}
