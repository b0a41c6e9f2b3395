//! Session pause and resume
//!
//! Losing window focus is the desktop's "view will disappear": tracking pauses
//! and placed objects stay where they are. Focus coming back resumes tracking
//! with whatever detection the session was last running with.

use bevy::prelude::*;
use bevy::window::WindowFocused;

use super::bevy_engine::BevyArEngine;
use crate::basketball3d::ar_sim::SessionState;
use crate::basketball3d::engine::{ArEngine, RunOptions};

fn resume(engine: &mut BevyArEngine) {
    if engine.session.state() != SessionState::Paused {
        return;
    }
    let config = engine.session.config();
    engine.run_session(config, RunOptions::default());
}

pub fn pause_on_focus_change(mut focus: MessageReader<WindowFocused>, mut engine: BevyArEngine) {
    for event in focus.read() {
        if event.focused {
            resume(&mut engine);
        } else {
            engine.pause_session();
        }
    }
}

/// `P` toggles the session between paused and running.
pub fn toggle_pause(keyboard: Res<ButtonInput<KeyCode>>, mut engine: BevyArEngine) {
    if !keyboard.just_pressed(KeyCode::KeyP) {
        return;
    }

    match engine.session.state() {
        SessionState::Running => engine.pause_session(),
        SessionState::Paused => resume(&mut engine),
        SessionState::NotStarted => {}
    }
}
