//! Camera-related types and components

use bevy::prelude::*;

/// Marker component for the AR device camera.
#[derive(Component)]
pub struct ArCamera;

/// Orientation of the simulated device, driven by mouse look.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct DeviceLook {
    pub yaw: f32,
    pub pitch: f32,
}

impl DeviceLook {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}
