//! The sun/earth/moon system and its per-frame transforms.

use glam::{DVec3, Mat4, Vec3};

use crate::body::{Body, BodyParams};

/// Model matrices for one frame, indexed by [`Body::index`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTransforms {
    pub models: [Mat4; 3],
}

impl SceneTransforms {
    pub fn get(&self, body: Body) -> Mat4 {
        self.models[body.index()]
    }

    /// Column-major arrays ready for an instance buffer, in draw order.
    pub fn to_cols_arrays(&self) -> [[[f32; 4]; 4]; 3] {
        self.models.map(|m| m.to_cols_array_2d())
    }
}

/// Constants for the three bodies, indexed by [`Body::index`].
#[derive(Clone, Debug, PartialEq)]
pub struct SolarSystem {
    bodies: [BodyParams; 3],
}

impl SolarSystem {
    /// Build a system from explicit per-body constants.
    ///
    /// The sun is the root; the earth orbits the sun and the moon orbits the
    /// earth regardless of the `parent` fields passed in.
    pub fn new(mut sun: BodyParams, mut earth: BodyParams, mut moon: BodyParams) -> Self {
        sun.parent = None;
        earth.parent = Some(Body::Sun);
        moon.parent = Some(Body::Earth);
        Self {
            bodies: [sun, earth, moon],
        }
    }

    /// The reference scene: a sun spinning every 27 days, an earth tilted
    /// 23.4° on a 365-day orbit of radius 24, and a tidally locked moon on a
    /// 28-day orbit of radius 12.
    pub fn reference() -> Self {
        Self::new(
            BodyParams {
                orbit_radius: 0.0,
                orbital_period: 1.0,
                spin_period: 27.0,
                spin_axis: Vec3::Y,
                axial_tilt_degrees: 0.0,
                tilt_axis: Vec3::NEG_Z,
                scale: 12.0,
                parent: None,
            },
            BodyParams {
                orbit_radius: 24.0,
                orbital_period: 365.0,
                spin_period: 1.0,
                spin_axis: Vec3::Y,
                axial_tilt_degrees: 23.4,
                tilt_axis: Vec3::NEG_Z,
                scale: 6.0,
                parent: Some(Body::Sun),
            },
            BodyParams {
                orbit_radius: 12.0,
                orbital_period: 28.0,
                spin_period: 28.0,
                spin_axis: Vec3::NEG_Y,
                axial_tilt_degrees: 0.0,
                tilt_axis: Vec3::NEG_Z,
                scale: 3.0,
                parent: Some(Body::Earth),
            },
        )
    }

    pub fn params(&self, body: Body) -> &BodyParams {
        &self.bodies[body.index()]
    }

    /// World-space orbital center of `body`: its own offset plus every
    /// ancestor's offset.
    pub fn orbital_position(&self, body: Body, day: f64) -> DVec3 {
        let params = self.params(body);
        let offset = params.local_orbit_offset(day);
        match params.parent {
            Some(parent) => self.orbital_position(parent, day) + offset,
            None => offset,
        }
    }

    /// Model matrix of `body` at `day`.
    pub fn model_matrix(&self, body: Body, day: f64) -> Mat4 {
        let position = self.orbital_position(body, day);
        self.params(body).model_matrix_at(position, day)
    }

    /// Model matrices of all three bodies at `day`.
    pub fn model_matrices(&self, day: f64) -> SceneTransforms {
        SceneTransforms {
            models: Body::ALL.map(|body| self.model_matrix(body, day)),
        }
    }
}

impl Default for SolarSystem {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_DAYS: [f64; 8] = [-365.0, -12.5, 0.0, 1.0, 27.3, 100.0, 365.0, 10_000.0];

    #[test]
    fn test_sun_has_zero_translation() {
        let system = SolarSystem::reference();
        for &day in &SAMPLE_DAYS {
            let model = system.model_matrix(Body::Sun, day);
            assert_eq!(model.w_axis.truncate(), Vec3::ZERO, "day {day}");
            assert_eq!(system.orbital_position(Body::Sun, day), DVec3::ZERO);
        }
    }

    #[test]
    fn test_earth_orbits_at_radius_on_xz_plane() {
        let system = SolarSystem::reference();
        for &day in &SAMPLE_DAYS {
            let pos = system.orbital_position(Body::Earth, day);
            assert_eq!(pos.y, 0.0);
            assert!((pos.length() - 24.0).abs() < 1e-9, "day {day}: {pos}");
        }
    }

    #[test]
    fn test_moon_orbits_earth_at_radius() {
        let system = SolarSystem::reference();
        for &day in &SAMPLE_DAYS {
            let earth = system.orbital_position(Body::Earth, day);
            let moon = system.orbital_position(Body::Moon, day);
            let relative = moon - earth;
            assert_eq!(relative.y, 0.0);
            assert!((relative.length() - 12.0).abs() < 1e-9, "day {day}");
        }
    }

    #[test]
    fn test_earth_position_at_day_100() {
        let system = SolarSystem::reference();
        let pos = system.orbital_position(Body::Earth, 100.0);
        // radians(360 / 365 * 100) ≈ radians(98.63°)
        assert!((pos.x - (-3.61)).abs() < 1e-2, "x = {}", pos.x);
        assert!((pos.z - 23.73).abs() < 1e-2, "z = {}", pos.z);
    }

    #[test]
    fn test_model_translation_matches_orbital_position() {
        let system = SolarSystem::reference();
        let transforms = system.model_matrices(100.0);
        for body in Body::ALL {
            let expected = system.orbital_position(body, 100.0).as_vec3();
            let actual = transforms.get(body).w_axis.truncate();
            assert!((actual - expected).length() < 1e-4, "{}", body.name());
        }
    }

    #[test]
    fn test_earth_spin_axis_is_tilted() {
        let system = SolarSystem::reference();
        let model = system.model_matrix(Body::Earth, 0.0);
        let axis = model.transform_vector3(Vec3::Y).normalize();
        let tilt = axis.angle_between(Vec3::Y).to_degrees();
        assert!((tilt - 23.4).abs() < 1e-3, "tilt = {tilt}");
    }

    #[test]
    fn test_model_matrices_are_pure() {
        let system = SolarSystem::reference();
        assert_eq!(system.model_matrices(42.0), system.model_matrices(42.0));
    }

    #[test]
    fn test_new_forces_hierarchy() {
        let reference = SolarSystem::reference();
        let mut sun = reference.params(Body::Sun).clone();
        sun.parent = Some(Body::Moon);
        let system = SolarSystem::new(
            sun,
            reference.params(Body::Earth).clone(),
            reference.params(Body::Moon).clone(),
        );
        assert_eq!(system, reference);
    }

    #[test]
    fn test_cols_arrays_follow_draw_order() {
        let transforms = SolarSystem::reference().model_matrices(5.0);
        let arrays = transforms.to_cols_arrays();
        assert_eq!(arrays[1], transforms.get(Body::Earth).to_cols_array_2d());
    }
}
