//! CPU-side copy of a color buffer.

use crate::error::CaptureError;

/// Bytes per pixel: one byte each for red, green and blue.
pub const CHANNELS: usize = 3;

/// Vertical order of rows in [`Framebuffer::pixels`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowOrder {
    /// First row is the bottom of the image (OpenGL `glReadPixels` layout).
    BottomUp,
    /// First row is the top of the image (wgpu texture copy layout).
    TopDown,
}

/// Tightly packed RGB8 pixels with a known row order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    row_order: RowOrder,
}

impl Framebuffer {
    /// Wrap `pixels`, which must hold exactly `width * height` RGB triples.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        row_order: RowOrder,
    ) -> Result<Self, CaptureError> {
        let expected = width as usize * height as usize * CHANNELS;
        if pixels.len() != expected {
            return Err(CaptureError::SizeMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            row_order,
        })
    }

    /// A framebuffer filled with a single color.
    #[cfg(test)]
    pub(crate) fn solid(width: u32, height: u32, rgb: [u8; 3], row_order: RowOrder) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: rgb.repeat(count),
            row_order,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn row_order(&self) -> RowOrder {
        self.row_order
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Bytes of the row `y` pixels below the top edge, regardless of storage order.
    ///
    /// Panics if `y >= height`.
    pub fn row_from_top(&self, y: u32) -> &[u8] {
        assert!(
            y < self.height,
            "row {y} out of range for height {}",
            self.height
        );
        let stored = match self.row_order {
            RowOrder::TopDown => y,
            RowOrder::BottomUp => self.height - 1 - y,
        } as usize;
        let stride = self.width as usize * CHANNELS;
        &self.pixels[stored * stride..(stored + 1) * stride]
    }

    /// Rows from the top edge to the bottom edge.
    pub fn rows_top_down(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.height).map(move |y| self.row_from_top(y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch_rejected() {
        let result = Framebuffer::new(2, 2, vec![0; 11], RowOrder::TopDown);
        assert!(matches!(
            result,
            Err(CaptureError::SizeMismatch {
                expected: 12,
                actual: 11,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_framebuffer_accepted() {
        let fb = Framebuffer::new(0, 0, Vec::new(), RowOrder::BottomUp).unwrap();
        assert_eq!(fb.rows_top_down().count(), 0);
    }

    #[test]
    fn test_bottom_up_rows_are_flipped() {
        // Stored bottom row first: red on the bottom, blue on top.
        let fb = Framebuffer::new(1, 2, vec![255, 0, 0, 0, 0, 255], RowOrder::BottomUp).unwrap();
        assert_eq!(fb.row_from_top(0), &[0, 0, 255]);
        assert_eq!(fb.row_from_top(1), &[255, 0, 0]);
    }

    #[test]
    fn test_top_down_rows_kept() {
        let fb = Framebuffer::new(1, 2, vec![255, 0, 0, 0, 0, 255], RowOrder::TopDown).unwrap();
        let rows: Vec<&[u8]> = fb.rows_top_down().collect();
        assert_eq!(rows, vec![&[255u8, 0, 0][..], &[0u8, 0, 255][..]]);
    }

    #[test]
    fn test_solid_fill() {
        let fb = Framebuffer::solid(3, 2, [1, 2, 3], RowOrder::TopDown);
        assert_eq!(fb.pixels().len(), 18);
        assert!(fb.pixels().chunks_exact(3).all(|p| p == [1, 2, 3]));
    }
}
