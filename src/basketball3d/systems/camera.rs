//! Device movement
//!
//! On the desktop the device is the camera: WASD walks, Q/E lowers and raises
//! it, and dragging with the right mouse button turns it.

use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;

use crate::basketball3d::types::*;

const WALK_SPEED: f32 = 1.5;
const LOOK_SENSITIVITY: f32 = 0.003;
const MAX_PITCH: f32 = 1.4;

/// Clamp to `[min, max]`, or pin to the middle when the range is empty.
fn clamp_axis(value: f32, min: f32, max: f32) -> f32 {
    if min > max {
        (min + max) / 2.0
    } else {
        value.clamp(min, max)
    }
}

/// Keep `position` inside the room.
pub fn clamp_to_room(position: Vec3, room: &RoomConfig) -> Vec3 {
    let half = Vec3::new(room.width / 2.0, 0.0, room.depth / 2.0);
    Vec3::new(
        clamp_axis(position.x, -half.x + ROOM_CLEARANCE, half.x - ROOM_CLEARANCE),
        clamp_axis(position.y, ROOM_CLEARANCE, room.height - ROOM_CLEARANCE),
        clamp_axis(position.z, -half.z + ROOM_CLEARANCE, half.z - ROOM_CLEARANCE),
    )
}

fn key_axis(keyboard: &ButtonInput<KeyCode>, negative: KeyCode, positive: KeyCode) -> f32 {
    let mut axis = 0.0;
    if keyboard.pressed(negative) {
        axis -= 1.0;
    }
    if keyboard.pressed(positive) {
        axis += 1.0;
    }
    axis
}

pub fn move_device(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut look: ResMut<DeviceLook>,
    mut camera_query: Query<&mut Transform, With<ArCamera>>,
) {
    let Ok(mut transform) = camera_query.single_mut() else {
        return;
    };

    if mouse.pressed(MouseButton::Right) && motion.delta != Vec2::ZERO {
        look.yaw -= motion.delta.x * LOOK_SENSITIVITY;
        look.pitch = (look.pitch - motion.delta.y * LOOK_SENSITIVITY).clamp(-MAX_PITCH, MAX_PITCH);
    }
    transform.rotation = look.rotation();

    // Walking ignores pitch so W never digs into the floor.
    let heading = Quat::from_rotation_y(look.yaw);
    let walk = Vec3::new(
        key_axis(&keyboard, KeyCode::KeyA, KeyCode::KeyD),
        key_axis(&keyboard, KeyCode::KeyQ, KeyCode::KeyE),
        key_axis(&keyboard, KeyCode::KeyW, KeyCode::KeyS),
    );
    if walk != Vec3::ZERO {
        let step = heading * walk.normalize() * WALK_SPEED * time.delta_secs();
        transform.translation = clamp_to_room(transform.translation + step, &config.room);
    }
}
