//! Application systems
//!
//! Modular systems extracted from main.rs for better organization and testability.

mod animation;
mod frame_loop;
mod render;
mod window;

pub use animation::{AnimationDriver, AnimationReport};
pub use frame_loop::{CancellationToken, FrameClock};
pub use render::RenderSystem;
pub use window::{format_title, WindowError, WindowSystem};
