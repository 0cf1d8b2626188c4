//! Vertex + fragment shader pair linked into a render pipeline, with named
//! `mat4` uniforms.

use std::num::NonZeroU64;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use log::{debug, info};
use thiserror::Error;

use crate::depth::DepthBuffer;
use crate::mesh::{InstanceRaw, Vertex};

/// Built-in vertex stage.
pub const VERTEX_SHADER_SOURCE: &str = include_str!("../shaders/orrery.vert.wgsl");

/// Built-in fragment stage.
pub const FRAGMENT_SHADER_SOURCE: &str = include_str!("../shaders/orrery.frag.wgsl");

static NEXT_PROGRAM_ID: AtomicU32 = AtomicU32::new(1);

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("shader file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read shader file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shader program '{label}' failed to compile: {message}")]
    Compile { label: String, message: String },

    #[error("program has no mat4 uniform named '{name}'")]
    UnknownUniform { name: String },
}

/// Attachment formats the pipeline renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramTargets {
    pub color_format: wgpu::TextureFormat,
    pub depth_format: Option<wgpu::TextureFormat>,
}

impl ProgramTargets {
    /// Color target plus the reverse-Z depth buffer.
    pub fn with_depth(color_format: wgpu::TextureFormat) -> Self {
        Self {
            color_format,
            depth_format: Some(DepthBuffer::FORMAT),
        }
    }
}

/// Layout of the uniform block at group 0, binding 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
struct Globals {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
}

const MAT4_SIZE: wgpu::BufferAddress = std::mem::size_of::<[[f32; 4]; 4]>() as wgpu::BufferAddress;

/// Byte offset of a named matrix in the uniform block.
fn uniform_offset(name: &str) -> Option<wgpu::BufferAddress> {
    match name {
        "view" => Some(0),
        "projection" => Some(MAT4_SIZE),
        _ => None,
    }
}

/// A linked shader program.
pub struct ShaderProgram {
    id: u32,
    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    globals: Globals,
}

impl ShaderProgram {
    /// Compile and link the program shipped with the crate.
    pub fn builtin(device: &wgpu::Device, targets: ProgramTargets) -> Result<Self, ShaderError> {
        Self::from_sources(
            device,
            "orrery",
            VERTEX_SHADER_SOURCE,
            FRAGMENT_SHADER_SOURCE,
            targets,
        )
    }

    /// Read both stages from disk and link them.
    pub fn from_files(
        device: &wgpu::Device,
        vertex_path: &Path,
        fragment_path: &Path,
        targets: ProgramTargets,
    ) -> Result<Self, ShaderError> {
        let vertex = read_source(vertex_path)?;
        let fragment = read_source(fragment_path)?;
        let label = vertex_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "orrery".to_string());
        Self::from_sources(device, &label, &vertex, &fragment, targets)
    }

    /// Compile two WGSL sources (entry points `vs_main` and `fs_main`).
    /// Parse and pipeline validation errors come back as
    /// [`ShaderError::Compile`].
    pub fn from_sources(
        device: &wgpu::Device,
        label: &str,
        vertex_source: &str,
        fragment_source: &str,
        targets: ProgramTargets,
    ) -> Result<Self, ShaderError> {
        debug!("Compiling shader program '{label}'");

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{label}-vert")),
            source: wgpu::ShaderSource::Wgsl(vertex_source.into()),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{label}-frag")),
            source: wgpu::ShaderSource::Wgsl(fragment_source.into()),
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orrery-globals-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<Globals>() as u64),
                },
                count: None,
            }],
        });

        let globals = Globals {
            view: Mat4::IDENTITY.to_cols_array_2d(),
            projection: Mat4::IDENTITY.to_cols_array_2d(),
        };
        let globals_buffer = {
            use wgpu::util::DeviceExt;
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("orrery-globals"),
                contents: bytemuck::bytes_of(&globals),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        };
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orrery-globals-bind-group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("orrery-pipeline-layout"),
            bind_group_layouts: &[&globals_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout(), InstanceRaw::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Spinning cubes show every face; depth testing resolves overlap.
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: targets.depth_format.map(|format| wgpu::DepthStencilState {
                format,
                ..DepthBuffer::depth_stencil_state()
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: targets.color_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(ShaderError::Compile {
                label: label.to_string(),
                message: err.to_string(),
            });
        }

        let id = NEXT_PROGRAM_ID.fetch_add(1, Ordering::Relaxed);
        info!("Linked shader program {id} '{label}'");
        Ok(Self {
            id,
            pipeline,
            globals_buffer,
            globals_bind_group,
            globals,
        })
    }

    /// Process-unique handle, increasing in creation order.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Bind the pipeline and its uniforms for subsequent draws.
    pub fn use_program(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.globals_bind_group, &[]);
    }

    /// Set the `view` or `projection` matrix.
    pub fn set_mat4(
        &mut self,
        queue: &wgpu::Queue,
        name: &str,
        value: Mat4,
    ) -> Result<(), ShaderError> {
        let offset = uniform_offset(name).ok_or_else(|| ShaderError::UnknownUniform {
            name: name.to_string(),
        })?;
        let cols = value.to_cols_array_2d();
        match name {
            "view" => self.globals.view = cols,
            _ => self.globals.projection = cols,
        }
        queue.write_buffer(&self.globals_buffer, offset, bytemuck::cast_slice(&cols));
        Ok(())
    }

    /// Last value written for a named matrix.
    pub fn mat4(&self, name: &str) -> Option<Mat4> {
        match name {
            "view" => Some(Mat4::from_cols_array_2d(&self.globals.view)),
            "projection" => Some(Mat4::from_cols_array_2d(&self.globals.projection)),
            _ => None,
        }
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    if !path.exists() {
        return Err(ShaderError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_device::create_test_device;

    #[test]
    fn test_uniform_offsets() {
        assert_eq!(uniform_offset("view"), Some(0));
        assert_eq!(uniform_offset("projection"), Some(64));
        assert_eq!(uniform_offset("model"), None);
        assert_eq!(std::mem::size_of::<Globals>(), 128);
    }

    #[test]
    fn test_builtin_sources_declare_entry_points() {
        assert!(VERTEX_SHADER_SOURCE.contains("fn vs_main"));
        assert!(FRAGMENT_SHADER_SOURCE.contains("fn fs_main"));
        assert!(VERTEX_SHADER_SOURCE.contains("@location(5)"));
    }

    #[test]
    fn test_missing_file_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.wgsl");
        assert!(matches!(
            read_source(&missing),
            Err(ShaderError::FileNotFound { path }) if path == missing
        ));
    }

    #[test]
    fn test_read_source_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orrery.frag.wgsl");
        std::fs::write(&path, FRAGMENT_SHADER_SOURCE).unwrap();
        assert_eq!(read_source(&path).unwrap(), FRAGMENT_SHADER_SOURCE);
    }

    #[test]
    fn test_program_ids_increase() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let targets = ProgramTargets::with_depth(wgpu::TextureFormat::Rgba8Unorm);
        let a = ShaderProgram::builtin(&device, targets).unwrap();
        let b = ShaderProgram::builtin(&device, targets).unwrap();
        assert!(b.id() > a.id());
    }

    #[test]
    fn test_set_mat4_known_and_unknown() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let targets = ProgramTargets::with_depth(wgpu::TextureFormat::Rgba8Unorm);
        let mut program = ShaderProgram::builtin(&device, targets).unwrap();

        let view = Mat4::from_translation(glam::Vec3::new(0.0, 0.0, -5.0));
        program.set_mat4(&queue, "view", view).unwrap();
        assert_eq!(program.mat4("view"), Some(view));
        assert_eq!(program.mat4("projection"), Some(Mat4::IDENTITY));

        let err = program.set_mat4(&queue, "model", Mat4::IDENTITY).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::UnknownUniform { name } if name == "model"
        ));
    }

    #[test]
    fn test_from_files_loads_both_stages() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let vert = dir.path().join("orrery.vert.wgsl");
        let frag = dir.path().join("orrery.frag.wgsl");
        std::fs::write(&vert, VERTEX_SHADER_SOURCE).unwrap();
        std::fs::write(&frag, FRAGMENT_SHADER_SOURCE).unwrap();

        let targets = ProgramTargets::with_depth(wgpu::TextureFormat::Rgba8Unorm);
        let program = ShaderProgram::from_files(&device, &vert, &frag, targets);
        assert!(program.is_ok());
    }

    #[test]
    fn test_invalid_wgsl_is_compile_error() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let vert = dir.path().join("orrery.vert.wgsl");
        let frag = dir.path().join("orrery.frag.wgsl");
        std::fs::write(&vert, "this is not wgsl").unwrap();
        std::fs::write(&frag, FRAGMENT_SHADER_SOURCE).unwrap();

        let targets = ProgramTargets::with_depth(wgpu::TextureFormat::Rgba8Unorm);
        let err = ShaderProgram::from_files(&device, &vert, &frag, targets).err().unwrap();
        assert!(matches!(
            err,
            ShaderError::Compile { label, .. } if label == "orrery.vert"
        ));
    }

    #[test]
    fn test_missing_entry_point_is_compile_error() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let targets = ProgramTargets::with_depth(wgpu::TextureFormat::Rgba8Unorm);
        let fragment = FRAGMENT_SHADER_SOURCE.replace("fs_main", "shade");
        let result = ShaderProgram::from_sources(
            &device,
            "renamed",
            VERTEX_SHADER_SOURCE,
            &fragment,
            targets,
        );
        assert!(matches!(result, Err(ShaderError::Compile { .. })));

        // The device is still usable afterwards.
        assert!(ShaderProgram::builtin(&device, targets).is_ok());
    }
}
