//! Copying the presented surface back to the CPU for captures.

use orrery_capture::{CaptureError, Framebuffer, RowOrder};
use thiserror::Error;

/// Bytes per texel of the 8-bit RGBA/BGRA surface formats.
const BYTES_PER_PIXEL: u32 = 4;

#[derive(Debug, Error)]
pub enum ReadbackError {
    #[error("failed to map readback buffer: {0}")]
    Map(#[from] wgpu::BufferAsyncError),

    #[error("device poll failed: {0}")]
    Poll(String),

    #[error("readback callback dropped before completing")]
    ChannelClosed,

    #[error("surface format {0:?} cannot be captured")]
    UnsupportedFormat(wgpu::TextureFormat),

    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// A surface copy recorded into a buffer but not yet read.
#[derive(Debug)]
pub struct PendingReadback {
    buffer: wgpu::Buffer,
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
    format: wgpu::TextureFormat,
}

impl PendingReadback {
    pub(crate) fn allocate(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        let padded_bytes_per_row = padded_bytes_per_row(width);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("orrery-capture-readback"),
            size: u64::from(padded_bytes_per_row) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            width,
            height,
            padded_bytes_per_row,
            format,
        }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn padded_bytes_per_row(&self) -> u32 {
        self.padded_bytes_per_row
    }

    /// Block until the copy has finished and return the pixels, top row first.
    /// Call after the encoder that recorded the copy has been submitted.
    pub fn resolve(self, device: &wgpu::Device) -> Result<Framebuffer, ReadbackError> {
        let bgra = match self.format {
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => true,
            wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb => false,
            other => return Err(ReadbackError::UnsupportedFormat(other)),
        };

        let slice = self.buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .map_err(|e| ReadbackError::Poll(e.to_string()))?;
        rx.recv().map_err(|_| ReadbackError::ChannelClosed)??;

        let pixels = {
            let mapped = slice.get_mapped_range();
            unpad_to_rgb(
                &mapped,
                self.width,
                self.height,
                self.padded_bytes_per_row,
                bgra,
            )
        };
        self.buffer.unmap();

        Ok(Framebuffer::new(
            self.width,
            self.height,
            pixels,
            RowOrder::TopDown,
        )?)
    }
}

/// Row stride rounded up to the copy alignment.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (width * BYTES_PER_PIXEL).div_ceil(align) * align
}

/// Drop row padding and alpha, swapping BGRA to RGB when `bgra` is set.
pub fn unpad_to_rgb(bytes: &[u8], width: u32, height: u32, padded_row: u32, bgra: bool) -> Vec<u8> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let row_len = (width * BYTES_PER_PIXEL) as usize;
    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for row in bytes.chunks(padded_row as usize).take(height as usize) {
        for px in row[..row_len].chunks_exact(BYTES_PER_PIXEL as usize) {
            if bgra {
                rgb.extend_from_slice(&[px[2], px[1], px[0]]);
            } else {
                rgb.extend_from_slice(&px[..3]);
            }
        }
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_row_alignment() {
        assert_eq!(padded_bytes_per_row(1), 256);
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(1024), 4096);
    }

    #[test]
    fn test_unpad_rgba() {
        // Two rows of one pixel, padded to 8 bytes each.
        let bytes = [1, 2, 3, 255, 0, 0, 0, 0, 4, 5, 6, 255, 0, 0, 0, 0];
        assert_eq!(unpad_to_rgb(&bytes, 1, 2, 8, false), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_unpad_bgra_swaps_channels() {
        let bytes = [30, 20, 10, 255, 60, 50, 40, 255];
        assert_eq!(
            unpad_to_rgb(&bytes, 2, 1, 8, true),
            vec![10, 20, 30, 40, 50, 60]
        );
    }

    #[test]
    fn test_unpad_empty() {
        assert!(unpad_to_rgb(&[], 0, 0, 256, false).is_empty());
    }

    /// Clear a 2x2 offscreen target and read it back.
    fn clear_and_read(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        color: wgpu::Color,
    ) -> Framebuffer {
        let extent = wgpu::Extent3d {
            width: 2,
            height: 2,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("readback-test"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
        let readback = PendingReadback::allocate(device, 2, 2, format);
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: readback.buffer(),
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(readback.padded_bytes_per_row()),
                    rows_per_image: Some(2),
                },
            },
            extent,
        );
        queue.submit([encoder.finish()]);
        readback.resolve(device).unwrap()
    }

    #[test]
    fn test_offscreen_clear_reads_back() {
        let Some((device, queue)) = crate::test_device::create_test_device() else {
            return;
        };
        let format = wgpu::TextureFormat::Rgba8Unorm;
        let fb = clear_and_read(&device, &queue, format, wgpu::Color::RED);
        assert_eq!(fb.row_order(), RowOrder::TopDown);
        assert_eq!(fb.pixels(), &[255, 0, 0].repeat(4)[..]);
    }

    #[test]
    fn test_default_clear_color_stored_linear() {
        let Some((device, queue)) = crate::test_device::create_test_device() else {
            return;
        };
        let color = wgpu::Color {
            r: 0.3,
            g: 0.4,
            b: 0.5,
            a: 1.0,
        };
        let fb = clear_and_read(&device, &queue, wgpu::TextureFormat::Bgra8Unorm, color);
        // Unorm conversion may round an exact .5 either way.
        for pixel in fb.pixels().chunks_exact(3) {
            for (got, want) in pixel.iter().zip([77u8, 102, 128]) {
                assert!(got.abs_diff(want) <= 1, "{pixel:?} vs [77, 102, 128]");
            }
        }
    }
}
