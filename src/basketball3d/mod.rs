//! AR basketball game
//!
//! - `types`: Shared data types, components, resources and config
//! - `engine`: The boundary between gameplay and the AR/3D engine
//! - `controllers`: Plane tracking callbacks, backboard placement and throwing
//! - `ar_sim`: Simulated world tracking for desktop builds
//! - `prefabs`: Backboard and ball prefabs
//! - `systems`: Bevy systems for the desktop front-end
//! - `headless`: In-memory engine and event-script replay

pub mod ar_sim;
pub mod controllers;
pub mod engine;
pub mod headless;
pub mod prefabs;
pub mod systems;
pub mod types;

pub use ar_sim::*;
pub use controllers::*;
pub use engine::*;
pub use headless::*;
pub use prefabs::*;
pub use systems::*;
pub use types::*;
