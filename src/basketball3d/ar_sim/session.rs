//! Simulated world-tracking session
//!
//! Stands in for a device AR session. While running with plane detection
//! enabled, surfaces of the [`SimulatedRoom`] that the device looks at are
//! reported as plane anchors. Their extents start small and grow toward the
//! real surface size, and every reported extent carries raw noise, the way a
//! real tracker refines its estimate over time.

use bevy::log::{debug, info};
use bevy::prelude::*;
use rand::Rng;
use std::collections::BTreeMap;

use super::hit_test::hit_test_planes;
use super::room::{SimulatedRoom, SimulatedSurface};
use crate::basketball3d::engine::{RunOptions, TrackingConfig};
use crate::basketball3d::types::{
    AnchorId, HitTestResult, PlaneAlignment, PlaneAnchor, Ray, TrackingTuning,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Running,
    Paused,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::NotStarted => "not started",
            SessionState::Running => "running",
            SessionState::Paused => "paused",
        }
    }
}

/// Anchor lifecycle notifications, delivered in order.
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorEvent {
    Added(PlaneAnchor),
    Updated(PlaneAnchor),
    Removed(AnchorId),
}

/// Tracker-side state for one detected surface.
#[derive(Debug, Clone)]
struct TrackedPlane {
    surface: usize,
    /// Noise-free estimate of the extent (x, z).
    extent: Vec2,
    /// Noise-free estimate of the center offset (x, z).
    center: Vec2,
    since_update: f32,
    /// What was last reported to the application.
    anchor: PlaneAnchor,
}

#[derive(Resource, Debug, Clone)]
pub struct TrackingSession {
    state: SessionState,
    config: TrackingConfig,
    tuning: TrackingTuning,
    running_time: f32,
    device_pose: Option<Mat4>,
    planes: BTreeMap<AnchorId, TrackedPlane>,
    next_anchor_id: u64,
    pending: Vec<AnchorEvent>,
}

impl TrackingSession {
    pub fn new(tuning: TrackingTuning) -> Self {
        Self {
            state: SessionState::NotStarted,
            config: TrackingConfig::default(),
            tuning,
            running_time: 0.0,
            device_pose: None,
            planes: BTreeMap::new(),
            next_anchor_id: 1,
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> TrackingConfig {
        self.config
    }

    pub fn run(&mut self, config: TrackingConfig, options: RunOptions) {
        if options.remove_existing_anchors {
            let removed: Vec<AnchorId> = self.planes.keys().copied().collect();
            debug!("Discarding {} tracked anchors", removed.len());
            self.pending.extend(removed.into_iter().map(AnchorEvent::Removed));
            self.planes.clear();
        }

        if self.state == SessionState::NotStarted {
            self.running_time = 0.0;
        }
        self.config = config;
        self.state = SessionState::Running;
        info!(
            "Tracking session running (horizontal planes: {}, vertical planes: {})",
            config.plane_detection.horizontal, config.plane_detection.vertical
        );
    }

    pub fn pause(&mut self) {
        if self.state == SessionState::Running {
            self.state = SessionState::Paused;
            info!("Tracking session paused");
        }
    }

    /// Feed the device pose from the motion sensors.
    pub fn set_device_pose(&mut self, pose: Mat4) {
        self.device_pose = Some(pose);
    }

    pub fn clear_device_pose(&mut self) {
        self.device_pose = None;
    }

    pub fn is_tracking_initialized(&self) -> bool {
        self.state == SessionState::Running && self.running_time >= self.tuning.warmup_seconds
    }

    /// Device pose, available once tracking has initialized.
    pub fn camera_pose(&self) -> Option<Mat4> {
        if self.is_tracking_initialized() {
            self.device_pose
        } else {
            None
        }
    }

    pub fn anchors(&self) -> impl Iterator<Item = &PlaneAnchor> {
        self.planes.values().map(|plane| &plane.anchor)
    }

    pub fn anchor(&self, id: AnchorId) -> Option<&PlaneAnchor> {
        self.planes.get(&id).map(|plane| &plane.anchor)
    }

    pub fn hit_test(&self, ray: &Ray) -> Option<HitTestResult> {
        hit_test_planes(ray, self.anchors())
    }

    /// Advance the tracker by `dt` seconds and collect anchor events, including
    /// removals queued by [`TrackingSession::run`].
    pub fn tick(&mut self, dt: f32, room: &SimulatedRoom, rng: &mut impl Rng) -> Vec<AnchorEvent> {
        let mut events = std::mem::take(&mut self.pending);
        if self.state != SessionState::Running {
            return events;
        }

        self.running_time += dt;
        if !self.is_tracking_initialized() {
            return events;
        }

        let Some(pose) = self.device_pose else {
            return events;
        };
        let eye = pose.transform_point3(Vec3::ZERO);
        let forward = pose.transform_vector3(Vec3::NEG_Z).normalize_or_zero();

        for (index, surface) in room.surfaces.iter().enumerate() {
            if !self.detects(surface.alignment) {
                continue;
            }

            let Some(look_point) = self.look_point(eye, forward, surface) else {
                continue;
            };

            let tracked = self
                .planes
                .iter()
                .find(|(_, plane)| plane.surface == index)
                .map(|(id, _)| *id);

            match tracked {
                None => events.push(self.detect(index, surface, look_point, rng)),
                Some(id) => {
                    if let Some(event) = self.refine(id, dt, surface, rng) {
                        events.push(event);
                    }
                }
            }
        }

        events
    }

    fn detects(&self, alignment: PlaneAlignment) -> bool {
        let detection = self.config.plane_detection;
        match alignment {
            PlaneAlignment::Horizontal => detection.horizontal,
            PlaneAlignment::Vertical => detection.vertical,
        }
    }

    /// Where the view ray lands on `surface`, if the device is looking at it.
    fn look_point(&self, eye: Vec3, forward: Vec3, surface: &SimulatedSurface) -> Option<Vec2> {
        let facing = forward.dot(-surface.normal());
        let max_angle = self.tuning.max_view_angle.to_radians();
        if facing <= 0.0 || facing.clamp(-1.0, 1.0).acos() > max_angle {
            return None;
        }

        surface
            .intersect(eye, forward, self.tuning.detection_range)
            .map(|(_, local)| local)
    }

    fn detect(
        &mut self,
        index: usize,
        surface: &SimulatedSurface,
        look_point: Vec2,
        rng: &mut impl Rng,
    ) -> AnchorEvent {
        let id = AnchorId(self.next_anchor_id);
        self.next_anchor_id += 1;

        let extent = Vec2::splat(self.tuning.initial_extent).min(surface.size);
        let center = clamp_center(look_point, extent, surface.size);
        let anchor = self.report(id, surface, extent, center, rng);
        debug!("Detected {} as anchor {:?}", surface.name, id);

        self.planes.insert(
            id,
            TrackedPlane {
                surface: index,
                extent,
                center,
                since_update: 0.0,
                anchor: anchor.clone(),
            },
        );

        AnchorEvent::Added(anchor)
    }

    fn refine(
        &mut self,
        id: AnchorId,
        dt: f32,
        surface: &SimulatedSurface,
        rng: &mut impl Rng,
    ) -> Option<AnchorEvent> {
        let interval = self.tuning.update_interval;
        let growth = self.tuning.growth_rate;

        let (extent, center) = {
            let plane = self.planes.get_mut(&id)?;
            plane.since_update += dt;
            if plane.since_update < interval {
                return None;
            }

            let grown = growth * plane.since_update;
            plane.since_update = 0.0;
            plane.extent = (plane.extent + Vec2::splat(grown)).min(surface.size);
            // Growing outward on both sides pulls the center toward the middle.
            let step = Vec2::splat(grown * 0.5);
            let toward_middle = plane.center.signum() * (plane.center.abs() - step).max(Vec2::ZERO);
            plane.center = clamp_center(toward_middle, plane.extent, surface.size);
            (plane.extent, plane.center)
        };

        let anchor = self.report(id, surface, extent, center, rng);
        let plane = self.planes.get_mut(&id)?;
        plane.anchor = anchor.clone();
        Some(AnchorEvent::Updated(anchor))
    }

    /// Build the anchor as the application sees it: the estimate plus noise.
    fn report(
        &self,
        id: AnchorId,
        surface: &SimulatedSurface,
        extent: Vec2,
        center: Vec2,
        rng: &mut impl Rng,
    ) -> PlaneAnchor {
        let jitter = self.tuning.jitter;
        let mut noise = || {
            if jitter > 0.0 {
                rng.gen_range(-jitter..=jitter)
            } else {
                0.0
            }
        };

        PlaneAnchor {
            id,
            alignment: surface.alignment,
            transform: surface.frame,
            center: Vec3::new(center.x + noise(), 0.0, center.y + noise()),
            extent: Vec3::new(
                (extent.x + noise()).max(0.01),
                0.0,
                (extent.y + noise()).max(0.01),
            ),
        }
    }
}

/// Keep a rectangle of `extent` centered at `center` inside a surface of `size`.
fn clamp_center(center: Vec2, extent: Vec2, size: Vec2) -> Vec2 {
    let limit = ((size - extent) * 0.5).max(Vec2::ZERO);
    center.clamp(-limit, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basketball3d::engine::PlaneDetection;
    use crate::basketball3d::types::RoomConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quiet_tuning() -> TrackingTuning {
        TrackingTuning {
            jitter: 0.0,
            ..TrackingTuning::default()
        }
    }

    /// Device standing in the room center at eye height, looking at the north wall.
    fn facing_north() -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 1.4, 0.0))
    }

    fn running_session(tuning: TrackingTuning) -> TrackingSession {
        let mut session = TrackingSession::new(tuning);
        session.run(TrackingConfig::vertical_planes(), RunOptions::default());
        session.set_device_pose(facing_north());
        session
    }

    #[test]
    fn test_no_camera_pose_before_warmup() {
        let room = SimulatedRoom::from_config(&RoomConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = running_session(quiet_tuning());

        assert!(session.camera_pose().is_none());
        assert!(session.tick(0.1, &room, &mut rng).is_empty());
        assert!(session.camera_pose().is_none());

        session.tick(0.5, &room, &mut rng);
        assert_eq!(session.camera_pose(), Some(facing_north()));
    }

    #[test]
    fn test_detects_wall_in_view_then_grows_it() {
        let room = SimulatedRoom::from_config(&RoomConfig::default());
        let mut rng = StdRng::seed_from_u64(2);
        let mut session = running_session(quiet_tuning());

        let events = session.tick(0.6, &room, &mut rng);
        assert_eq!(events.len(), 1);
        let AnchorEvent::Added(anchor) = &events[0] else {
            panic!("expected an added anchor, got {events:?}");
        };
        assert_eq!(anchor.alignment, PlaneAlignment::Vertical);
        assert!((anchor.extent.x - 0.3).abs() < 1e-5);
        let id = anchor.id;

        let events = session.tick(0.2, &room, &mut rng);
        let AnchorEvent::Updated(updated) = &events[0] else {
            panic!("expected an update, got {events:?}");
        };
        assert_eq!(updated.id, id);
        assert!(updated.extent.x > 0.3);
        assert_eq!(session.anchors().count(), 1);
    }

    #[test]
    fn test_extent_never_exceeds_surface() {
        let room = SimulatedRoom::from_config(&RoomConfig::default());
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = running_session(quiet_tuning());

        for _ in 0..200 {
            session.tick(0.1, &room, &mut rng);
        }
        let anchor = session.anchors().next().unwrap();
        assert!(anchor.extent.x <= 6.0 + 1e-4);
        assert!(anchor.extent.z <= 2.8 + 1e-4);
    }

    #[test]
    fn test_floor_is_not_reported_with_vertical_detection() {
        let room = SimulatedRoom::from_config(&RoomConfig::default());
        let mut rng = StdRng::seed_from_u64(4);
        let mut session = running_session(quiet_tuning());
        // Look straight down.
        session.set_device_pose(Mat4::from_rotation_translation(
            Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
            Vec3::new(0.0, 1.4, 0.0),
        ));

        assert!(session.tick(1.0, &room, &mut rng).is_empty());

        session.run(
            TrackingConfig {
                plane_detection: PlaneDetection {
                    horizontal: true,
                    vertical: false,
                },
            },
            RunOptions::default(),
        );
        let events = session.tick(0.1, &room, &mut rng);
        assert!(matches!(
            &events[..],
            [AnchorEvent::Added(a)] if a.alignment == PlaneAlignment::Horizontal
        ));
    }

    #[test]
    fn test_remove_existing_anchors_queues_removals() {
        let room = SimulatedRoom::from_config(&RoomConfig::default());
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = running_session(quiet_tuning());
        session.tick(0.6, &room, &mut rng);
        let id = session.anchors().next().unwrap().id;

        session.run(
            TrackingConfig {
                plane_detection: PlaneDetection::NONE,
            },
            RunOptions {
                remove_existing_anchors: true,
            },
        );
        assert_eq!(session.anchors().count(), 0);

        let events = session.tick(1.0, &room, &mut rng);
        assert_eq!(events, vec![AnchorEvent::Removed(id)]);
        assert!(session.tick(1.0, &room, &mut rng).is_empty());
    }

    #[test]
    fn test_paused_session_reports_nothing() {
        let room = SimulatedRoom::from_config(&RoomConfig::default());
        let mut rng = StdRng::seed_from_u64(6);
        let mut session = running_session(quiet_tuning());
        session.tick(0.6, &room, &mut rng);

        session.pause();
        assert_eq!(session.state(), SessionState::Paused);
        assert!(session.camera_pose().is_none());
        assert!(session.tick(1.0, &room, &mut rng).is_empty());
    }

    #[test]
    fn test_clamp_center_keeps_rectangle_on_surface() {
        let size = Vec2::new(4.0, 2.0);
        let clamped = clamp_center(Vec2::new(3.0, -3.0), Vec2::splat(1.0), size);
        assert_eq!(clamped, Vec2::new(1.5, -0.5));
        assert_eq!(clamp_center(Vec2::new(3.0, 0.0), size, size), Vec2::ZERO);
    }
}
