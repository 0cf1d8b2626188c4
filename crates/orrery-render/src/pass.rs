//! Per-frame command encoding.
//!
//! [`RenderPassBuilder`] describes the clear color and depth attachment, and
//! [`FrameEncoder`] owns the command encoder and surface texture for one frame.

use crate::readback::PendingReadback;

/// Color used when nothing else is configured, matching the config default.
pub const DEFAULT_CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.3,
    g: 0.4,
    b: 0.5,
    a: 1.0,
};

#[derive(Debug, Clone, Copy)]
struct DepthAttachment<'a> {
    view: &'a wgpu::TextureView,
    clear_value: f32,
}

/// Describes the attachments of the main pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderPassBuilder<'a> {
    clear_color: wgpu::Color,
    depth: Option<DepthAttachment<'a>>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> RenderPassBuilder<'a> {
    pub fn new() -> Self {
        Self {
            clear_color: DEFAULT_CLEAR_COLOR,
            depth: None,
            label: None,
        }
    }

    /// Opaque clear color from RGB components.
    pub fn clear_rgb(self, rgb: [f64; 3]) -> Self {
        self.clear_color(wgpu::Color {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
            a: 1.0,
        })
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Clear `view` to `clear_value` at the start of the pass.
    pub fn depth(mut self, view: &'a wgpu::TextureView, clear_value: f32) -> Self {
        self.depth = Some(DepthAttachment { view, clear_value });
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn begin<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        color_view: &'e wgpu::TextureView,
    ) -> wgpu::RenderPass<'e>
    where
        'a: 'e,
    {
        let color_attachment = wgpu::RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(self.clear_color),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };
        let depth_stencil_attachment =
            self.depth
                .map(|depth| wgpu::RenderPassDepthStencilAttachment {
                    view: depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(depth.clear_value),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// One frame's encoder and target. [`submit`](Self::submit) presents it;
/// dropping the encoder without submitting discards the frame.
pub struct FrameEncoder<'q> {
    queue: &'q wgpu::Queue,
    encoder: wgpu::CommandEncoder,
    surface_texture: wgpu::SurfaceTexture,
    surface_view: wgpu::TextureView,
}

impl<'q> FrameEncoder<'q> {
    pub fn new(
        device: &wgpu::Device,
        queue: &'q wgpu::Queue,
        surface_texture: wgpu::SurfaceTexture,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("orrery-frame"),
        });
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            queue,
            encoder,
            surface_texture,
            surface_view,
        }
    }

    /// Start a pass rendering into the surface texture.
    pub fn begin_render_pass<'s>(
        &'s mut self,
        builder: &RenderPassBuilder<'s>,
    ) -> wgpu::RenderPass<'s> {
        builder.begin(&mut self.encoder, &self.surface_view)
    }

    /// Surface size in pixels.
    pub fn size(&self) -> (u32, u32) {
        let texture = &self.surface_texture.texture;
        (texture.width(), texture.height())
    }

    /// Record a copy of the surface into a mappable buffer. The data is
    /// available after [`submit`](Self::submit) through
    /// [`PendingReadback::resolve`]. `None` if the surface was not
    /// configured with `COPY_SRC`.
    pub fn copy_surface_to_buffer(&mut self, device: &wgpu::Device) -> Option<PendingReadback> {
        let texture = &self.surface_texture.texture;
        if !texture.usage().contains(wgpu::TextureUsages::COPY_SRC) {
            return None;
        }
        let readback = PendingReadback::allocate(
            device,
            texture.width(),
            texture.height(),
            texture.format(),
        );

        self.encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: readback.buffer(),
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(readback.padded_bytes_per_row()),
                    rows_per_image: Some(readback.height()),
                },
            },
            wgpu::Extent3d {
                width: readback.width(),
                height: readback.height(),
                depth_or_array_layers: 1,
            },
        );
        Some(readback)
    }

    /// Submit the recorded commands and present the surface texture.
    pub fn submit(self) {
        self.queue.submit([self.encoder.finish()]);
        self.surface_texture.present();
    }
}
