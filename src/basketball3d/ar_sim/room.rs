//! The real-world room the simulated device is standing in.

use bevy::prelude::*;

use crate::basketball3d::types::{plane_frame, PlaneAlignment, RoomConfig};

/// A flat real-world surface the tracker can discover.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedSurface {
    pub name: &'static str,
    pub alignment: PlaneAlignment,
    /// Pose of the surface center; local +Y is the surface normal.
    pub frame: Mat4,
    /// Full size along local X and local Z.
    pub size: Vec2,
}

impl SimulatedSurface {
    pub fn normal(&self) -> Vec3 {
        self.frame.y_axis.truncate()
    }

    pub fn origin(&self) -> Vec3 {
        self.frame.w_axis.truncate()
    }

    /// Where `ray` crosses the surface, in surface-local (x, z), if it does so
    /// within `max_distance` and inside the surface bounds.
    pub fn intersect(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<(f32, Vec2)> {
        let normal = self.normal();
        let denom = direction.dot(normal);
        if denom.abs() < 1e-6 {
            return None;
        }

        let t = (self.origin() - origin).dot(normal) / denom;
        if t <= 0.0 || t > max_distance {
            return None;
        }

        let local = self.frame.inverse().transform_point3(origin + direction * t);
        let half = self.size * 0.5;
        if local.x.abs() > half.x || local.z.abs() > half.y {
            return None;
        }

        Some((t, Vec2::new(local.x, local.z)))
    }
}

/// Walls and floor of a box-shaped room centered on the origin, floor at y = 0.
#[derive(Resource, Debug, Clone)]
pub struct SimulatedRoom {
    pub surfaces: Vec<SimulatedSurface>,
}

impl SimulatedRoom {
    pub fn from_config(room: &RoomConfig) -> Self {
        let (w, d, h) = (room.width, room.depth, room.height);
        let wall = |name, origin: Vec3, normal: Vec3, width: f32| SimulatedSurface {
            name,
            alignment: PlaneAlignment::Vertical,
            frame: plane_frame(origin, normal),
            size: Vec2::new(width, h),
        };

        Self {
            surfaces: vec![
                wall("north wall", Vec3::new(0.0, h / 2.0, -d / 2.0), Vec3::Z, w),
                wall("south wall", Vec3::new(0.0, h / 2.0, d / 2.0), Vec3::NEG_Z, w),
                wall("west wall", Vec3::new(-w / 2.0, h / 2.0, 0.0), Vec3::X, d),
                wall("east wall", Vec3::new(w / 2.0, h / 2.0, 0.0), Vec3::NEG_X, d),
                SimulatedSurface {
                    name: "floor",
                    alignment: PlaneAlignment::Horizontal,
                    frame: plane_frame(Vec3::ZERO, Vec3::Y),
                    size: Vec2::new(w, d),
                },
            ],
        }
    }
}
