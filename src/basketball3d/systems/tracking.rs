//! Per-frame world tracking

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::bevy_engine::BevyArEngine;
use crate::basketball3d::ar_sim::SimulatedRoom;
use crate::basketball3d::types::ArCamera;

/// Randomness for tracker noise.
#[derive(Resource)]
pub struct SessionRng(pub StdRng);

impl Default for SessionRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

/// Feed the device pose to the tracker, then apply whatever it reports.
pub fn advance_tracking(
    time: Res<Time>,
    room: Res<SimulatedRoom>,
    mut rng: ResMut<SessionRng>,
    camera_query: Query<&GlobalTransform, With<ArCamera>>,
    mut engine: BevyArEngine,
) {
    match camera_query.single() {
        Ok(camera) => {
            let (_, rotation, translation) = camera.to_scale_rotation_translation();
            engine
                .session
                .set_device_pose(Mat4::from_rotation_translation(rotation, translation));
        }
        Err(_) => engine.session.clear_device_pose(),
    }

    let events = engine.session.tick(time.delta_secs(), &room, &mut rng.0);
    for event in events {
        engine.apply_anchor_event(event);
    }
}
