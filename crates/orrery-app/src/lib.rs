//! The orrery application: window, event loop, per-frame update and render.

pub mod error;
pub mod game_loop;
pub mod platform;
pub mod setup;
pub mod window;

pub use error::AppError;
pub use window::{AppState, run};
