//! Screen-to-world projection for engines without a render camera.

use bevy::prelude::*;

use crate::basketball3d::types::Ray;

/// Pinhole projection of a viewport with the origin at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenProjection {
    pub viewport: Vec2,
    /// Vertical field of view in radians.
    pub vertical_fov: f32,
}

impl Default for ScreenProjection {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(1280.0, 720.0),
            vertical_fov: std::f32::consts::FRAC_PI_4,
        }
    }
}

impl ScreenProjection {
    /// Ray from the camera through `point`. The camera looks down its local -Z.
    pub fn ray(&self, camera: Mat4, point: Vec2) -> Option<Ray> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }

        let ndc = Vec2::new(
            2.0 * point.x / self.viewport.x - 1.0,
            1.0 - 2.0 * point.y / self.viewport.y,
        );
        let tan = (self.vertical_fov * 0.5).tan();
        let aspect = self.viewport.x / self.viewport.y;
        let local = Vec3::new(ndc.x * tan * aspect, ndc.y * tan, -1.0);

        Some(Ray::new(
            camera.transform_point3(Vec3::ZERO),
            camera.transform_vector3(local),
        ))
    }

    pub fn center(&self) -> Vec2 {
        self.viewport * 0.5
    }
}
