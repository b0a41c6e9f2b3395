//! Simulated AR backend
//!
//! Desktop builds have no camera-based world tracking, so this module provides
//! a stand-in: a room of known surfaces, a tracking session that discovers them
//! as plane anchors, and ray tests against the discovered extents.

mod hit_test;
mod projection;
mod room;
mod session;

pub use hit_test::*;
pub use projection::*;
pub use room::*;
pub use session::*;
