//! Tracked plane anchors and hit-test results

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Identifier issued by the tracking session for each anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AnchorId(pub u64);

/// Classification of a detected plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneAlignment {
    /// Floors and tables.
    Horizontal,
    /// Walls.
    Vertical,
}

/// A plane tracked by the session.
///
/// `transform` is the anchor's world pose. In anchor space the plane normal is
/// local +Y; `center` is the plane's center offset and `extent` its size, with
/// `extent.x` measured along local X and `extent.z` along local Z.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneAnchor {
    pub id: AnchorId,
    pub alignment: PlaneAlignment,
    pub transform: Mat4,
    pub center: Vec3,
    pub extent: Vec3,
}

impl PlaneAnchor {
    pub fn is_vertical(&self) -> bool {
        self.alignment == PlaneAlignment::Vertical
    }

    /// World-space plane normal.
    pub fn normal(&self) -> Vec3 {
        self.transform.y_axis.truncate().normalize_or_zero()
    }

    /// World-space position of the plane center.
    pub fn world_center(&self) -> Vec3 {
        self.transform.transform_point3(self.center)
    }
}

/// Build an anchor pose whose local +Y is `normal`.
///
/// For walls local X runs horizontally along the wall, which leaves local Z
/// pointing down the wall.
pub fn plane_frame(origin: Vec3, normal: Vec3) -> Mat4 {
    let y = normal.normalize_or(Vec3::Y);
    let x = if y.dot(Vec3::Y).abs() > 0.99 {
        Vec3::X
    } else {
        Vec3::Y.cross(y).normalize()
    };
    let z = x.cross(y);
    Mat4::from_cols(x.extend(0.0), y.extend(0.0), z.extend(0.0), origin.extend(1.0))
}

/// A world-space ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

impl From<Ray3d> for Ray {
    fn from(ray: Ray3d) -> Self {
        Self::new(ray.origin, *ray.direction)
    }
}

/// Nearest intersection of a screen ray with a tracked plane.
#[derive(Debug, Clone, PartialEq)]
pub struct HitTestResult {
    /// Hit pose: the anchor's orientation, positioned at the hit point.
    pub world_transform: Mat4,
    /// Distance from the ray origin.
    pub distance: f32,
    pub anchor: PlaneAnchor,
}
