//! Backboard placement
//!
//! The first successful tap on a vertical plane hangs the backboard there,
//! switches off plane detection (dropping the plane visuals with their
//! anchors) and moves the game on to throwing balls.

use bevy::log::{debug, info};
use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

use super::{SkipReason, TapOutcome};
use crate::basketball3d::engine::{ArEngine, PlaneDetection, RunOptions, TrackingConfig};
use crate::basketball3d::types::{
    BodyKind, BodyShape, GameMode, GameplayConfig, HitTestResult, PhysicsBody, PrefabKind,
    SceneObject,
};

/// Pose for the backboard prefab at `hit`.
///
/// The prefab is authored upright facing +Z, so it is turned a quarter turn
/// about its local X axis to stand against the wall.
pub fn backboard_transform(hit: &HitTestResult, scale: f32) -> Transform {
    let mut transform = Transform::from_matrix(hit.world_transform);
    transform.rotate_local_x(-FRAC_PI_2);
    transform.scale = Vec3::splat(scale);
    transform
}

pub fn backboard_object(hit: &HitTestResult, gameplay: &GameplayConfig) -> SceneObject {
    SceneObject {
        prefab: PrefabKind::Backboard,
        transform: backboard_transform(hit, gameplay.object_scale),
        body: PhysicsBody {
            kind: BodyKind::Static,
            shape: BodyShape::Geometry,
        },
        impulse: None,
    }
}

/// Tap handler while placing the backboard.
pub fn place_backboard<E: ArEngine>(
    engine: &mut E,
    mode: &mut GameMode,
    screen_point: Vec2,
    gameplay: &GameplayConfig,
) -> TapOutcome {
    let Some(hit) = engine.hit_test(screen_point) else {
        debug!("Tap at {screen_point} hit no plane");
        return TapOutcome::Skipped(SkipReason::NoHit);
    };

    if !hit.anchor.is_vertical() {
        debug!("Tap at {screen_point} hit a non-vertical plane");
        return TapOutcome::Skipped(SkipReason::NotVertical);
    }

    let object = backboard_object(&hit, gameplay);
    let position = object.transform.translation;
    engine.spawn_object(object);

    engine.run_session(
        TrackingConfig {
            plane_detection: PlaneDetection::NONE,
        },
        RunOptions {
            remove_existing_anchors: true,
        },
    );

    mode.finish_placement();
    info!("Backboard placed at {position}");
    TapOutcome::BackboardPlaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basketball3d::types::{plane_frame, AnchorId, PlaneAlignment, PlaneAnchor};

    fn wall_hit() -> HitTestResult {
        let frame = plane_frame(Vec3::new(0.0, 1.5, -4.0), Vec3::Z);
        let (_, rotation, _) = frame.to_scale_rotation_translation();
        HitTestResult {
            world_transform: Mat4::from_rotation_translation(rotation, Vec3::new(0.4, 1.8, -4.0)),
            distance: 4.0,
            anchor: PlaneAnchor {
                id: AnchorId(3),
                alignment: PlaneAlignment::Vertical,
                transform: frame,
                center: Vec3::ZERO,
                extent: Vec3::new(2.0, 0.0, 2.0),
            },
        }
    }

    #[test]
    fn test_backboard_stands_upright_facing_the_room() {
        let transform = backboard_transform(&wall_hit(), 0.25);

        assert!(transform.translation.abs_diff_eq(Vec3::new(0.4, 1.8, -4.0), 1e-5));
        assert_eq!(transform.scale, Vec3::splat(0.25));
        // Prefab up (+Y) points up, prefab front (+Z) points out of the wall.
        assert!((transform.rotation * Vec3::Y).abs_diff_eq(Vec3::Y, 1e-5));
        assert!((transform.rotation * Vec3::Z).abs_diff_eq(Vec3::Z, 1e-5));
    }

    #[test]
    fn test_backboard_rotation_is_quarter_turn_from_hit() {
        let hit = wall_hit();
        let transform = backboard_transform(&hit, 1.0);
        let (_, hit_rotation, _) = hit.world_transform.to_scale_rotation_translation();
        let expected = hit_rotation * Quat::from_rotation_x(-FRAC_PI_2);
        assert!(
            transform.rotation.abs_diff_eq(expected, 1e-5)
                || transform.rotation.abs_diff_eq(-expected, 1e-5)
        );
    }

    #[test]
    fn test_backboard_object_is_static_and_shaped() {
        let object = backboard_object(&wall_hit(), &GameplayConfig::default());
        assert_eq!(object.prefab, PrefabKind::Backboard);
        assert_eq!(object.body.kind, BodyKind::Static);
        assert_eq!(object.body.shape, BodyShape::Geometry);
        assert!(object.impulse.is_none());
    }
}
