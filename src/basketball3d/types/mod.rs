//! Type definitions for the AR basketball game
//!
//! This module is organized into submodules:
//! - `mode` - The two game phases and the one-shot transition between them
//! - `anchor` - Tracked plane anchors, rays and hit-test results
//! - `scene` - Descriptions of the objects the game asks the engine to create
//! - `camera` - Camera-related components
//! - `settings` - Game configuration and persistence

pub mod anchor;
pub mod camera;
pub mod mode;
pub mod scene;
pub mod settings;

pub use anchor::*;
pub use camera::*;
pub use mode::*;
pub use scene::*;
pub use settings::*;
