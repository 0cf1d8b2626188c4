//! Window creation and event handling via winit.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`]. Each redraw it
//! advances the day clock, computes the three model matrices, draws the cube
//! three times and, when the capture key went down this frame, dumps the
//! presented image to a PPM file.

use std::sync::Arc;

use orrery_capture::FrameDumper;
use orrery_config::{Config, RenderConfig};
use orrery_input::{Action, ActionMap, KeyboardState};
use orrery_render::{
    BufferAllocator, DepthBuffer, FrameEncoder, InstanceBuffer, InstanceRaw, MeshBuffer,
    ProgramTargets, RenderContext, RenderPassBuilder, ShaderError, ShaderProgram, SurfaceError,
    SurfaceWrapper,
    init_render_context_blocking,
};
use orrery_scene::{Body, Camera, DayClock, SolarSystem};
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::error::AppError;
use crate::game_loop::GameLoop;
use crate::setup;

/// Shader file names looked up in `render.shader_dir`.
pub const VERTEX_SHADER_FILE: &str = "orrery.vert.wgsl";
pub const FRAGMENT_SHADER_FILE: &str = "orrery.frag.wgsl";

/// GPU state that exists once the window does.
struct Renderer {
    ctx: RenderContext,
    depth: DepthBuffer,
    program: ShaderProgram,
    cube: MeshBuffer,
    instances: InstanceBuffer,
}

impl Renderer {
    fn new(ctx: RenderContext, render: &RenderConfig) -> Result<Self, AppError> {
        let (width, height) = ctx.surface_size();
        let depth = DepthBuffer::new(&ctx.device, width, height);
        let program = load_program(&ctx.device, ctx.surface_format, render)?;
        let allocator = BufferAllocator::new(&ctx.device);
        let cube = allocator.create_cube();
        let instances = allocator.create_instance_buffer("orrery-bodies", Body::ALL.len() as u32);
        info!(
            "Renderer ready: {width}x{height} {:?}, program {}",
            ctx.surface_format,
            program.id()
        );

        Ok(Self {
            ctx,
            depth,
            program,
            cube,
            instances,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
        self.depth.resize(&self.ctx.device, width, height);
    }
}

/// Shaders from `render.shader_dir` when set, otherwise the built-in pair.
/// Shader files that cannot be read or compiled fall back to the built-ins.
fn load_program(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    render: &RenderConfig,
) -> Result<ShaderProgram, ShaderError> {
    let targets = ProgramTargets::with_depth(color_format);
    if let Some(dir) = &render.shader_dir {
        match ShaderProgram::from_files(
            device,
            &dir.join(VERTEX_SHADER_FILE),
            &dir.join(FRAGMENT_SHADER_FILE),
            targets,
        ) {
            Ok(program) => return Ok(program),
            Err(e) => warn!("Using built-in shaders: {e}"),
        }
    }
    ShaderProgram::builtin(device, targets)
}

/// Application state driven by the winit event loop.
pub struct AppState {
    config: Config,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    surface_wrapper: SurfaceWrapper,
    camera: Camera,
    system: SolarSystem,
    clock: DayClock,
    game_loop: GameLoop,
    keyboard: KeyboardState,
    actions: ActionMap,
    dumper: FrameDumper,
    /// First fatal error; reported by [`run`] after the loop exits.
    fatal: Option<AppError>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let clock = setup::clock_from_config(&config.time);
        debug!("Day clock: {:?}", clock.mode());
        Self {
            surface_wrapper: SurfaceWrapper::new(config.window.width, config.window.height, 1.0),
            camera: setup::camera_from_config(&config.render),
            system: setup::solar_system_from_config(&config.scene),
            clock,
            game_loop: GameLoop::new(),
            keyboard: KeyboardState::new(),
            actions: setup::action_map_from_config(&config),
            dumper: setup::dumper_from_config(&config),
            window: None,
            renderer: None,
            fatal: None,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Day the next frame renders, before this frame's clock update.
    pub fn day(&self) -> f64 {
        self.clock.day()
    }

    pub fn dumper(&self) -> &FrameDumper {
        &self.dumper
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{err}");
        self.fatal.get_or_insert(err);
        event_loop.exit();
    }

    /// Surface, depth buffer and camera aspect follow the physical size.
    fn apply_resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect_ratio(width as f32, height as f32);
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(width, height);
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attrs = setup::window_attributes_from_config(&self.config);
        let window = Arc::new(event_loop.create_window(attrs)?);

        let size = window.inner_size();
        self.surface_wrapper = SurfaceWrapper::new(size.width, size.height, window.scale_factor());
        let physical = self.surface_wrapper.physical_size();
        self.camera
            .set_aspect_ratio(physical.width as f32, physical.height as f32);

        let ctx = init_render_context_blocking(window.clone(), self.config.window.vsync)?;
        self.renderer = Some(Renderer::new(ctx, &self.config.render)?);
        self.window = Some(window);
        Ok(())
    }

    /// Frame and update counts for the shutdown log.
    fn shutdown_summary(&self) -> String {
        format!(
            "{} frames, {} clock updates, {:.1}s simulated, {} captures",
            self.game_loop.frame_count(),
            self.game_loop.update_count(),
            self.game_loop.total_sim_time(),
            self.dumper.next_id()
        )
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.actions.triggered(Action::Quit, &self.keyboard) {
            info!("Quit key pressed, shutting down");
            event_loop.exit();
            return;
        }
        let capture_requested = self.actions.triggered(Action::Capture, &self.keyboard);

        let clock = &mut self.clock;
        self.game_loop.tick(|dt| clock.advance(dt));
        let day = self.clock.day();
        let transforms = self.system.model_matrices(day);

        // Wayland may not have assigned a size yet.
        if !self.surface_wrapper.is_ready() {
            return;
        }
        let Some(renderer) = &mut self.renderer else {
            return;
        };

        let instances = transforms
            .to_cols_arrays()
            .map(|model| InstanceRaw { model });
        renderer.instances.write(&renderer.ctx.queue, &instances);
        for (name, value) in [
            ("view", self.camera.view_matrix()),
            ("projection", self.camera.projection_matrix()),
        ] {
            if let Err(e) = renderer.program.set_mat4(&renderer.ctx.queue, name, value) {
                error!("{e}");
            }
        }

        let surface_texture = match renderer.ctx.get_current_texture() {
            Ok(texture) => texture,
            Err(SurfaceError::Lost) => {
                let size = self.surface_wrapper.physical_size();
                renderer.resize(size.width, size.height);
                return;
            }
            Err(SurfaceError::Timeout) => {
                warn!("Surface timeout, skipping frame");
                return;
            }
            Err(e @ SurfaceError::OutOfMemory) => {
                self.fail(event_loop, e.into());
                return;
            }
        };

        let mut frame =
            FrameEncoder::new(&renderer.ctx.device, &renderer.ctx.queue, surface_texture);
        {
            let builder = RenderPassBuilder::new()
                .clear_rgb(self.config.render.clear_color)
                .depth(&renderer.depth.view, DepthBuffer::CLEAR_VALUE)
                .label("orrery-main");
            let mut pass = frame.begin_render_pass(&builder);
            renderer.program.use_program(&mut pass);
            renderer.cube.bind(&mut pass, &renderer.instances);
            renderer.cube.draw_instanced(&mut pass, renderer.instances.len());
        }
        let readback = if capture_requested {
            let readback = frame.copy_surface_to_buffer(&renderer.ctx.device);
            if readback.is_none() {
                warn!("Capture skipped: surface does not support copies");
            }
            readback
        } else {
            None
        };
        frame.submit();

        if let Some(readback) = readback {
            debug!("Capturing frame at day {day}");
            match readback.resolve(&renderer.ctx.device) {
                Ok(framebuffer) => {
                    if let Err(e) = self.dumper.dump(&framebuffer) {
                        warn!("Capture failed: {e}");
                    }
                }
                Err(e) => warn!("Capture readback failed: {e}"),
            }
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_window(event_loop) {
            self.fail(event_loop, e);
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(resize) = self
                    .surface_wrapper
                    .handle_resize(new_size.width, new_size.height)
                {
                    let size = resize.physical;
                    self.apply_resize(size.width, size.height);
                    info!("Window resized to {}x{}", size.width, size.height);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let Some(inner) = self.window.as_ref().map(|w| w.inner_size()) else {
                    return;
                };
                if let Some(resize) = self.surface_wrapper.handle_scale_factor_changed(
                    scale_factor,
                    inner.width,
                    inner.height,
                ) {
                    let size = resize.physical;
                    self.apply_resize(size.width, size.height);
                    info!(
                        "Scale factor changed to {:.2}, resized to {}x{}",
                        resize.scale_factor, size.width, size.height
                    );
                }
            }
            WindowEvent::Focused(false) => self.keyboard.release_all(),
            WindowEvent::KeyboardInput { event, .. } => self.keyboard.process_event(&event),
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                self.keyboard.clear_transients();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        info!("Shutting down: {}", self.shutdown_summary());
    }
}

/// Open the window and run until it closes. Returns the error that ended
/// the loop, if any.
#[instrument(skip_all)]
pub fn run(config: Config) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config);
    event_loop.run_app(&mut app)?;
    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
