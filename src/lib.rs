//! Skyline - procedural low-poly city
//!
//! A sky-blue city of randomly coloured buildings with drifting clouds and
//! weaving airplanes, viewed through damped orbit controls.
//!
//! - [`config`] - layered TOML/env configuration
//! - [`scene`] - base scene builder and procedural populator
//! - [`systems`] - animation, frame loop, rendering and window systems
//! - [`stage`] - mount/frame/unmount lifecycle tying it together

pub mod config;
pub mod scene;
pub mod stage;
pub mod systems;

pub use config::AppConfig;
pub use stage::{FrameStatus, Stage, StageError, TeardownReport, Viewport};
