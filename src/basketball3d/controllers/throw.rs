//! Ball throwing
//!
//! Every tap spawns a ball at the device, oriented like the device, and kicks
//! it away from the viewer along the camera's view direction.

use bevy::log::debug;
use bevy::prelude::*;

use super::{SkipReason, TapOutcome};
use crate::basketball3d::engine::ArEngine;
use crate::basketball3d::types::{
    BodyKind, BodyShape, GameplayConfig, PhysicsBody, PrefabKind, SceneObject,
};

/// Launch impulse: the camera's third basis column scaled by `-strength`.
///
/// The camera looks down its local -Z, so the negated Z column points into the
/// scene.
pub fn launch_impulse(camera_pose: Mat4, strength: f32) -> Vec3 {
    camera_pose.z_axis.truncate() * -strength
}

pub fn ball_object(camera_pose: Mat4, gameplay: &GameplayConfig) -> SceneObject {
    let mut transform = Transform::from_matrix(camera_pose);
    transform.scale = Vec3::splat(gameplay.object_scale);

    SceneObject {
        prefab: PrefabKind::Ball,
        transform,
        body: PhysicsBody {
            kind: BodyKind::Dynamic,
            shape: BodyShape::Inferred,
        },
        impulse: Some(launch_impulse(camera_pose, gameplay.throw_impulse)),
    }
}

/// Tap handler while throwing balls.
pub fn throw_ball<E: ArEngine>(engine: &mut E, gameplay: &GameplayConfig) -> TapOutcome {
    let Some(camera_pose) = engine.camera_pose() else {
        debug!("Throw skipped: no camera pose yet");
        return TapOutcome::Skipped(SkipReason::NoCameraPose);
    };

    engine.spawn_object(ball_object(camera_pose, gameplay));
    TapOutcome::BallThrown
}

/// How many of the oldest balls to remove so at most `limit` remain.
pub fn balls_over_limit(count: usize, limit: Option<usize>) -> usize {
    limit.map_or(0, |limit| count.saturating_sub(limit))
}
