use bevy::prelude::*;

use super::bevy_engine::AnchorNodes;
use crate::basketball3d::ar_sim::TrackingSession;
use crate::basketball3d::types::*;

pub fn hud_status(mode: AppMode, session: &TrackingSession, planes: usize, balls: usize) -> String {
    let tracking = if session.is_tracking_initialized() {
        "tracking"
    } else {
        session.state().name()
    };

    format!(
        "{}\nSession: {tracking} | planes: {planes} | balls: {balls}\nWASD/QE move, right-drag look, P pause",
        mode.instruction()
    )
}

pub fn update_hud(
    mode: Res<GameMode>,
    session: Res<TrackingSession>,
    nodes: Res<AnchorNodes>,
    balls: Query<(), With<Ball>>,
    mut hud: Query<&mut Text, With<HudText>>,
) {
    let status = hud_status(mode.current(), &session, nodes.visual_count(), balls.iter().count());
    for mut text in hud.iter_mut() {
        if text.0 != status {
            text.0 = status.clone();
        }
    }
}
