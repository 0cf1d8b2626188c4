//! wgpu rendering for the orrery: GPU context, surface sizing, the cube mesh
//! with per-instance model matrices, the shader program, frame encoding and
//! surface readback for captures.

pub mod depth;
pub mod gpu;
pub mod mesh;
pub mod pass;
pub mod readback;
pub mod shader;
pub mod surface;

pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use mesh::{BufferAllocator, InstanceBuffer, InstanceRaw, MeshBuffer, Vertex, cube};
pub use pass::{FrameEncoder, RenderPassBuilder};
pub use readback::{PendingReadback, ReadbackError};
pub use shader::{ProgramTargets, ShaderError, ShaderProgram};
pub use surface::{PhysicalSize, SurfaceResizeEvent, SurfaceWrapper};

#[cfg(test)]
pub(crate) mod test_device {
    /// Headless device for GPU tests. `None` when no adapter is available (CI).
    pub fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    force_fallback_adapter: false,
                    compatible_surface: None,
                })
                .await
                .ok()?;
            adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()
        })
    }
}
