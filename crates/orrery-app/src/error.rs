use thiserror::Error;

/// Errors that end the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    Gpu(#[from] orrery_render::RenderContextError),

    #[error("built-in shaders failed to compile: {0}")]
    Shader(#[from] orrery_render::ShaderError),

    #[error("surface error: {0}")]
    Surface(#[from] orrery_render::SurfaceError),
}
