//! Tap input
//!
//! A left click or a new touch is a tap at that screen position. Space taps
//! the middle of the screen, which is handy once the backboard is up.

use bevy::prelude::*;

use super::bevy_engine::BevyArEngine;
use crate::basketball3d::controllers::{handle_tap, TapOutcome};
use crate::basketball3d::types::*;

/// Screen points tapped this frame.
fn taps_this_frame(
    window: &Window,
    mouse: &ButtonInput<MouseButton>,
    keyboard: &ButtonInput<KeyCode>,
    touches: &Touches,
) -> Vec<Vec2> {
    let mut taps: Vec<Vec2> = touches.iter_just_pressed().map(|touch| touch.position()).collect();

    if mouse.just_pressed(MouseButton::Left) {
        if let Some(cursor) = window.cursor_position() {
            taps.push(cursor);
        }
    }

    if keyboard.just_pressed(KeyCode::Space) {
        taps.push(Vec2::new(window.width(), window.height()) / 2.0);
    }

    taps
}

/// Route taps to placement or throwing.
pub fn handle_taps(
    windows: Query<&Window>,
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    touches: Res<Touches>,
    mut mode: ResMut<GameMode>,
    mut engine: BevyArEngine,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let taps = taps_this_frame(window, &mouse, &keyboard, &touches);
    if taps.is_empty() {
        return;
    }

    let gameplay = engine.config.gameplay.clone();
    for tap in taps {
        match handle_tap(&mut engine, &mut mode, tap, &gameplay) {
            TapOutcome::Skipped(reason) => debug!("Tap at {tap} skipped: {reason:?}"),
            outcome => debug!("Tap at {tap}: {outcome:?}"),
        }
    }
}
