//! Systems module for basketball3d
//!
//! Bevy systems driving the desktop front-end, organized by functionality:
//!
//! - `setup`: Room, device camera, lights, HUD and prefab registration
//! - `bevy_engine`: The engine boundary implemented on the ECS world
//! - `tracking`: Per-frame device pose feed and anchor events
//! - `input`: Mouse, touch and keyboard taps
//! - `camera`: Walking and turning the simulated device
//! - `lifecycle`: Pause and resume on focus changes
//! - `hud`: Status overlay
//! - `balls`: Optional cap on live balls

mod balls;
mod bevy_engine;
mod camera;
mod hud;
mod input;
mod lifecycle;
mod setup;
mod tracking;

pub use balls::limit_balls;
pub use bevy_engine::{AnchorNodes, BallCounter, BevyArEngine};
pub use camera::{clamp_to_room, move_device};
pub use hud::{hud_status, update_hud};
pub use input::handle_taps;
pub use lifecycle::{pause_on_focus_change, toggle_pause};
pub use setup::{setup, start_session, DEVICE_HEIGHT};
pub use tracking::{advance_tracking, SessionRng};
