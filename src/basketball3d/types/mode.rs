//! Game phase state
//!
//! The game starts by asking the player to place a backboard. Once a backboard
//! has been placed the game switches to throwing balls, and never goes back.

use bevy::prelude::*;

/// Phases of the game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AppMode {
    #[default]
    PlacingBackboard,
    ThrowingBalls,
}

impl AppMode {
    pub fn name(&self) -> &'static str {
        match self {
            AppMode::PlacingBackboard => "placing backboard",
            AppMode::ThrowingBalls => "throwing balls",
        }
    }

    /// Instruction shown to the player for this phase.
    pub fn instruction(&self) -> &'static str {
        match self {
            AppMode::PlacingBackboard => "Point at a wall and tap a green plane to hang the backboard",
            AppMode::ThrowingBalls => "Tap to throw a ball",
        }
    }
}

/// Resource holding the current game phase.
///
/// The only way to change the phase is [`GameMode::finish_placement`], which
/// moves forward exactly once.
#[derive(Resource, Debug, Default, Clone)]
pub struct GameMode {
    mode: AppMode,
}

impl GameMode {
    pub fn current(&self) -> AppMode {
        self.mode
    }

    /// Switch to throwing balls. Returns `false` if the switch already happened.
    pub fn finish_placement(&mut self) -> bool {
        match self.mode {
            AppMode::PlacingBackboard => {
                self.mode = AppMode::ThrowingBalls;
                true
            }
            AppMode::ThrowingBalls => false,
        }
    }
}
