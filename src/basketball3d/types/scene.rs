//! Scene object descriptions and marker components
//!
//! The gameplay code never builds engine objects directly. It describes what it
//! wants (a plane visual, a backboard, a ball) and the engine realizes it.

use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

use super::anchor::{AnchorId, PlaneAnchor};

/// Flat translucent quad drawn over a detected plane.
///
/// The quad is authored facing local +Z (like a wall poster) and rotated a
/// quarter turn about X so it lies in the anchor's XZ plane.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneVisual {
    /// Width (anchor extent X) and height (anchor extent Z).
    pub size: Vec2,
    /// Position relative to the anchor node.
    pub center: Vec3,
    pub color: Color,
}

impl PlaneVisual {
    pub fn from_anchor(anchor: &PlaneAnchor, color: Color) -> Self {
        Self {
            size: Vec2::new(anchor.extent.x, anchor.extent.z),
            center: anchor.center,
            color,
        }
    }

    /// Resize and re-center to the anchor's latest extent.
    pub fn fit_to(&mut self, anchor: &PlaneAnchor) {
        self.size = Vec2::new(anchor.extent.x, anchor.extent.z);
        self.center = anchor.center;
    }

    /// Local transform for a unit quad mesh.
    pub fn transform(&self) -> Transform {
        Transform {
            translation: self.center,
            rotation: Quat::from_rotation_x(-FRAC_PI_2),
            scale: Vec3::new(self.size.x, self.size.y, 1.0),
        }
    }
}

/// The predefined assets the game can instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefabKind {
    Backboard,
    Ball,
}

impl PrefabKind {
    pub fn name(&self) -> &'static str {
        match self {
            PrefabKind::Backboard => "backboard",
            PrefabKind::Ball => "ball",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Never moves; other bodies collide with it.
    Static,
    /// Simulated by the physics world.
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// Collision shape follows the prefab geometry.
    Geometry,
    /// Let the engine infer a simple shape (a sphere for the ball).
    Inferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsBody {
    pub kind: BodyKind,
    pub shape: BodyShape,
}

/// A prefab clone to insert into the scene root.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub prefab: PrefabKind,
    pub transform: Transform,
    pub body: PhysicsBody,
    /// Applied once when the object enters the physics world.
    pub impulse: Option<Vec3>,
}

/// Marker for the node the engine creates for each tracked anchor.
#[derive(Component, Debug, Clone, Copy)]
pub struct AnchorNode(pub AnchorId);

/// The visual child of an anchor node.
#[derive(Component, Debug, Clone)]
pub struct DetectedPlaneVisual {
    pub anchor: AnchorId,
    pub visual: PlaneVisual,
}

/// Marker for the placed backboard.
#[derive(Component)]
pub struct Backboard;

/// A thrown ball. `serial` increases with every throw.
#[derive(Component, Debug, Clone, Copy)]
pub struct Ball {
    pub serial: u64,
}

/// Marker for the status text overlay.
#[derive(Component)]
pub struct HudText;
