//! Window size tracking for the render surface.
//!
//! Wayland may report a zero-size window before the compositor assigns one,
//! and a minimized window reports zero on Windows. [`SurfaceWrapper`] clamps
//! to 1x1 and only emits a [`SurfaceResizeEvent`] when the size really changes.

/// Smallest dimension a surface may be configured with.
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Physical pixel dimensions of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

/// Emitted when the physical surface size changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceResizeEvent {
    pub physical: PhysicalSize,
    pub scale_factor: f64,
}

/// Current surface size and scale factor.
#[derive(Debug, Clone)]
pub struct SurfaceWrapper {
    size: PhysicalSize,
    scale_factor: f64,
    /// False until a non-zero size has been seen.
    configured: bool,
}

impl SurfaceWrapper {
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        Self {
            size: clamp_size(physical_width, physical_height),
            scale_factor,
            configured: physical_width > 0 && physical_height > 0,
        }
    }

    /// Record a window resize. Returns an event if the clamped size changed.
    pub fn handle_resize(
        &mut self,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        if physical_width > 0 && physical_height > 0 {
            self.configured = true;
        }
        let size = clamp_size(physical_width, physical_height);
        if size == self.size {
            return None;
        }
        self.size = size;
        Some(SurfaceResizeEvent {
            physical: size,
            scale_factor: self.scale_factor,
        })
    }

    /// Record a DPI change. The physical size usually changes with it.
    pub fn handle_scale_factor_changed(
        &mut self,
        scale_factor: f64,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        self.scale_factor = scale_factor;
        self.handle_resize(physical_width, physical_height)
    }

    pub fn physical_size(&self) -> PhysicalSize {
        self.size
    }

    /// Whether a real (non-zero) size has been reported yet.
    pub fn is_ready(&self) -> bool {
        self.configured
    }
}

fn clamp_size(width: u32, height: u32) -> PhysicalSize {
    PhysicalSize {
        width: width.max(MIN_SURFACE_DIMENSION),
        height: height.max(MIN_SURFACE_DIMENSION),
    }
}
