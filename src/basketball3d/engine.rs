//! Engine boundary
//!
//! Plane tracking, hit testing, rendering and physics all belong to the engine.
//! The gameplay controllers only see this trait: they read anchors, camera
//! poses and hit results, and ask for objects to be created. Handles (anchor
//! ids) are opaque; the engine owns every node it creates.

use bevy::prelude::*;

use super::types::{AnchorId, HitTestResult, PlaneVisual, SceneObject};

/// Which plane alignments the session should look for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaneDetection {
    pub horizontal: bool,
    pub vertical: bool,
}

impl PlaneDetection {
    pub const NONE: Self = Self {
        horizontal: false,
        vertical: false,
    };

    pub const VERTICAL: Self = Self {
        horizontal: false,
        vertical: true,
    };
}

/// World tracking configuration handed to the session on each run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackingConfig {
    pub plane_detection: PlaneDetection,
}

impl TrackingConfig {
    pub fn vertical_planes() -> Self {
        Self {
            plane_detection: PlaneDetection::VERTICAL,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Drop every anchor (and with it every anchor node) tracked so far.
    pub remove_existing_anchors: bool,
}

/// The AR/3D engine as seen from gameplay code.
pub trait ArEngine {
    /// Start or restart world tracking.
    fn run_session(&mut self, config: TrackingConfig, options: RunOptions);

    /// Stop delivering tracking events. Scene objects are left alone.
    fn pause_session(&mut self);

    /// Cast a ray through `screen_point` against the extents of the planes
    /// detected so far. Returns the nearest hit.
    fn hit_test(&self, screen_point: Vec2) -> Option<HitTestResult>;

    /// Current device pose, or `None` while tracking is not initialized.
    fn camera_pose(&self) -> Option<Mat4>;

    /// Add `visual` as the child of the node for `anchor`.
    fn attach_plane_visual(&mut self, anchor: AnchorId, visual: PlaneVisual);

    /// The visual child of the node for `anchor`, if one exists.
    fn plane_visual(&self, anchor: AnchorId) -> Option<PlaneVisual>;

    /// Overwrite the existing visual child of `anchor`. Does nothing if there is
    /// none.
    fn replace_plane_visual(&mut self, anchor: AnchorId, visual: PlaneVisual);

    fn remove_plane_visual(&mut self, anchor: AnchorId);

    /// Clone a prefab and insert it into the scene root.
    fn spawn_object(&mut self, object: SceneObject);
}
