//! Gameplay controllers
//!
//! Callbacks the engine drives: anchor added/updated/removed and screen taps.
//! A tap goes to backboard placement or to ball throwing depending on the
//! current [`AppMode`]. Nothing here fails loudly; an event that cannot be
//! acted on is dropped.

mod placement;
mod plane_tracker;
mod throw;

pub use placement::*;
pub use plane_tracker::*;
pub use throw::*;

use bevy::prelude::*;

use crate::basketball3d::engine::{ArEngine, RunOptions, TrackingConfig};
use crate::basketball3d::types::{AppMode, GameMode, GameplayConfig};

/// Why a tap had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The ray through the tap crossed no detected plane.
    NoHit,
    /// The nearest plane under the tap is not a wall.
    NotVertical,
    /// Tracking has not produced a camera pose yet.
    NoCameraPose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    BackboardPlaced,
    BallThrown,
    Skipped(SkipReason),
}

/// Route a tap to the controller for the current mode.
pub fn handle_tap<E: ArEngine>(
    engine: &mut E,
    mode: &mut GameMode,
    screen_point: Vec2,
    gameplay: &GameplayConfig,
) -> TapOutcome {
    match mode.current() {
        AppMode::PlacingBackboard => place_backboard(engine, mode, screen_point, gameplay),
        AppMode::ThrowingBalls => throw_ball(engine, gameplay),
    }
}

/// Start world tracking looking for walls.
pub fn start_tracking<E: ArEngine>(engine: &mut E) {
    engine.run_session(TrackingConfig::vertical_planes(), RunOptions::default());
}
