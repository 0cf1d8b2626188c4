//! Scene model for the orrery: orbiting bodies, their per-frame model
//! matrices, the viewing camera and the simulation day clock.

pub mod body;
pub mod camera;
pub mod clock;
pub mod system;

pub use body::{Body, BodyParams};
pub use camera::Camera;
pub use clock::{DayClock, TimeMode};
pub use system::{SceneTransforms, SolarSystem};
