//! Orbiting bodies and their static constants.

use glam::{DVec3, Mat4, Vec3};

/// Degrees in one full revolution.
const FULL_TURN_DEGREES: f64 = 360.0;

/// One of the three bodies drawn by the demo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Body {
    Sun,
    Earth,
    Moon,
}

impl Body {
    /// All bodies in draw order. Parents precede their children.
    pub const ALL: [Body; 3] = [Body::Sun, Body::Earth, Body::Moon];

    /// Index into per-body arrays.
    pub const fn index(self) -> usize {
        match self {
            Body::Sun => 0,
            Body::Earth => 1,
            Body::Moon => 2,
        }
    }

    /// Lowercase display name, used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Earth => "earth",
            Body::Moon => "moon",
        }
    }
}

/// Static orbital constants for one body. Periods are in days.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyParams {
    /// Distance from the parent's center. Ignored when `parent` is `None`.
    pub orbit_radius: f64,
    /// Days per revolution around the parent.
    pub orbital_period: f64,
    /// Days per revolution around `spin_axis`.
    pub spin_period: f64,
    /// Axis of self-rotation.
    pub spin_axis: Vec3,
    /// Fixed axial tilt in degrees.
    pub axial_tilt_degrees: f64,
    /// Axis the tilt rotates about.
    pub tilt_axis: Vec3,
    /// Uniform scale applied to the unit cube.
    pub scale: f32,
    /// Body this one orbits, if any.
    pub parent: Option<Body>,
}

impl BodyParams {
    /// Self-rotation angle in radians: `radians(360 * day / spin_period)`.
    pub fn spin_angle(&self, day: f64) -> f64 {
        (FULL_TURN_DEGREES * day / self.spin_period).to_radians()
    }

    /// Orbital angle in radians: `radians(360 * day / orbital_period)`.
    pub fn orbit_angle(&self, day: f64) -> f64 {
        (FULL_TURN_DEGREES * day / self.orbital_period).to_radians()
    }

    /// Offset from the parent's center on the XZ plane. Zero for a root body.
    pub fn local_orbit_offset(&self, day: f64) -> DVec3 {
        if self.parent.is_none() {
            return DVec3::ZERO;
        }
        let angle = self.orbit_angle(day);
        DVec3::new(
            self.orbit_radius * angle.cos(),
            0.0,
            self.orbit_radius * angle.sin(),
        )
    }

    /// Model matrix for a body whose orbital center is already resolved:
    /// translate, then scale, then tilt, then spin.
    pub fn model_matrix_at(&self, position: DVec3, day: f64) -> Mat4 {
        let mut model = Mat4::IDENTITY;
        model *= Mat4::from_translation(position.as_vec3());
        model *= Mat4::from_scale(Vec3::splat(self.scale));
        if self.axial_tilt_degrees != 0.0 {
            model *= Mat4::from_axis_angle(
                self.tilt_axis.normalize(),
                self.axial_tilt_degrees.to_radians() as f32,
            );
        }
        model *= Mat4::from_axis_angle(self.spin_axis.normalize(), self.spin_angle(day) as f32);
        model
    }
}
