//! Camera input handling
//!
//! This crate provides damped orbit controls: the camera circles a target
//! point, left-drag rotates, right-drag pans and the wheel zooms.

mod orbit_controller;

pub use orbit_controller::{OrbitController, CameraControl};
