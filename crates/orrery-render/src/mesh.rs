//! Vertex, index and instance buffers for the shared cube mesh.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Position plus flat per-face color.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// One model matrix per drawn instance, column-major.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

impl InstanceRaw {
    // Locations 0 and 1 belong to the vertex buffer.
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Unit cube centered on the origin, one flat color per face.
pub mod cube {
    use super::Vertex;

    pub const VERTEX_COUNT: usize = 24;
    pub const INDEX_COUNT: usize = 36;

    const fn v(position: [f32; 3], color: [f32; 3]) -> Vertex {
        Vertex { position, color }
    }

    const BACK: [f32; 3] = [1.0, 1.0, 0.0];
    const FRONT: [f32; 3] = [1.0, 0.0, 1.0];
    const LEFT: [f32; 3] = [1.0, 0.0, 0.0];
    const RIGHT: [f32; 3] = [0.0, 1.0, 0.0];
    const BOTTOM: [f32; 3] = [0.0, 1.0, 1.0];
    const TOP: [f32; 3] = [0.0, 0.0, 1.0];

    /// Four corners per face, counter-clockwise seen from outside.
    pub const VERTICES: [Vertex; VERTEX_COUNT] = [
        // z = -0.5
        v([0.5, -0.5, -0.5], BACK),
        v([-0.5, -0.5, -0.5], BACK),
        v([-0.5, 0.5, -0.5], BACK),
        v([0.5, 0.5, -0.5], BACK),
        // z = +0.5
        v([-0.5, -0.5, 0.5], FRONT),
        v([0.5, -0.5, 0.5], FRONT),
        v([0.5, 0.5, 0.5], FRONT),
        v([-0.5, 0.5, 0.5], FRONT),
        // x = -0.5
        v([-0.5, -0.5, -0.5], LEFT),
        v([-0.5, -0.5, 0.5], LEFT),
        v([-0.5, 0.5, 0.5], LEFT),
        v([-0.5, 0.5, -0.5], LEFT),
        // x = +0.5
        v([0.5, -0.5, 0.5], RIGHT),
        v([0.5, -0.5, -0.5], RIGHT),
        v([0.5, 0.5, -0.5], RIGHT),
        v([0.5, 0.5, 0.5], RIGHT),
        // y = -0.5
        v([-0.5, -0.5, -0.5], BOTTOM),
        v([0.5, -0.5, -0.5], BOTTOM),
        v([0.5, -0.5, 0.5], BOTTOM),
        v([-0.5, -0.5, 0.5], BOTTOM),
        // y = +0.5
        v([-0.5, 0.5, 0.5], TOP),
        v([0.5, 0.5, 0.5], TOP),
        v([0.5, 0.5, -0.5], TOP),
        v([-0.5, 0.5, -0.5], TOP),
    ];

    /// Two triangles per face.
    pub const INDICES: [u16; INDEX_COUNT] = {
        let mut indices = [0u16; INDEX_COUNT];
        let mut face = 0;
        while face < 6 {
            let base = (face * 4) as u16;
            let i = face * 6;
            indices[i] = base;
            indices[i + 1] = base + 1;
            indices[i + 2] = base + 2;
            indices[i + 3] = base + 2;
            indices[i + 4] = base + 3;
            indices[i + 5] = base;
            face += 1;
        }
        indices
    };
}

/// Uploaded vertex and index buffers.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    /// Bind the mesh at vertex slot 0 and the instances at slot 1.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>, instances: &InstanceBuffer) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, instances.buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
    }

    pub fn draw_instanced(&self, render_pass: &mut wgpu::RenderPass<'_>, instance_count: u32) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..instance_count);
    }
}

/// Fixed-capacity buffer of [`InstanceRaw`] rewritten every frame.
pub struct InstanceBuffer {
    pub buffer: wgpu::Buffer,
    capacity: u32,
    len: u32,
}

impl InstanceBuffer {
    /// Instances written by the last [`write`](Self::write).
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Upload `instances`. Anything beyond capacity is dropped with a warning.
    pub fn write(&mut self, queue: &wgpu::Queue, instances: &[InstanceRaw]) {
        let count = instances.len().min(self.capacity as usize);
        if count < instances.len() {
            log::warn!(
                "Instance buffer holds {} instances, dropping {}",
                self.capacity,
                instances.len() - count
            );
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&instances[..count]));
        self.len = count as u32;
    }
}

/// Creates GPU buffers on one device.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    /// Upload a mesh with 16-bit indices.
    pub fn create_mesh(&self, label: &str, vertices: &[Vertex], indices: &[u16]) -> MeshBuffer {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-vertices")),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-indices")),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// The shared cube.
    pub fn create_cube(&self) -> MeshBuffer {
        self.create_mesh("cube", &cube::VERTICES, &cube::INDICES)
    }

    pub fn create_instance_buffer(&self, label: &str, capacity: u32) -> InstanceBuffer {
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity.max(1) as usize * std::mem::size_of::<InstanceRaw>())
                as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        InstanceBuffer {
            buffer,
            capacity,
            len: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_device::create_test_device;
    use glam::{Mat4, Vec3};

    #[test]
    fn test_vertex_layout() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
    }

    #[test]
    fn test_instance_layout_follows_vertex_locations() {
        let layout = InstanceRaw::layout();
        assert_eq!(layout.array_stride, 64);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
        let locations: Vec<u32> = layout.attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, vec![2, 3, 4, 5]);
        assert_eq!(layout.attributes[3].offset, 48);
    }

    #[test]
    fn test_instance_is_column_major() {
        let raw = InstanceRaw {
            model: Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)).to_cols_array_2d(),
        };
        assert_eq!(raw.model[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_cube_indices_in_range() {
        assert_eq!(cube::INDICES.len(), 36);
        assert!(
            cube::INDICES
                .iter()
                .all(|&i| (i as usize) < cube::VERTEX_COUNT)
        );
        assert_eq!(&cube::INDICES[6..12], &[4, 5, 6, 6, 7, 4]);
    }

    #[test]
    fn test_cube_faces_are_flat_colored_and_planar() {
        for face in cube::VERTICES.chunks_exact(4) {
            assert!(face.iter().all(|v| v.color == face[0].color));
            let on_plane = (0..3).any(|axis| {
                let c = face[0].position[axis];
                c.abs() == 0.5 && face.iter().all(|v| v.position[axis] == c)
            });
            assert!(on_plane);
        }
    }

    #[test]
    fn test_cube_winding_faces_outward() {
        for face in cube::VERTICES.chunks_exact(4) {
            let p = |i: usize| Vec3::from_array(face[i].position);
            let normal = (p(1) - p(0)).cross(p(2) - p(0));
            let center = (p(0) + p(2)) * 0.5;
            assert!(normal.dot(center) > 0.0);
        }
    }

    #[test]
    fn test_create_cube_mesh() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let mesh = BufferAllocator::new(&device).create_cube();
        assert_eq!(mesh.index_count, 36);
        assert_eq!(mesh.vertex_buffer.size(), 24 * 24);
    }

    #[test]
    fn test_instance_buffer_write_clamps_to_capacity() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let mut instances = BufferAllocator::new(&device).create_instance_buffer("bodies", 3);
        assert!(instances.is_empty());

        let models = [InstanceRaw {
            model: Mat4::IDENTITY.to_cols_array_2d(),
        }; 4];
        instances.write(&queue, &models[..3]);
        assert_eq!(instances.len(), 3);

        instances.write(&queue, &models);
        assert_eq!(instances.len(), 3);
        assert_eq!(instances.buffer.size(), 3 * 64);
    }
}
