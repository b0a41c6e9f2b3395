//! Headless engine and event-script replay
//!
//! [`RecordingEngine`] is a minimal in-memory scene graph implementing
//! [`ArEngine`]: it tracks anchors, plane visuals and inserted objects without
//! rendering or simulating anything. [`HeadlessGame`] wires it to the gameplay
//! controllers so a recorded sequence of tracking events and taps can be
//! replayed and inspected.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::ar_sim::{hit_test_planes, AnchorEvent, ScreenProjection, SessionState};
use super::controllers::{
    balls_over_limit, handle_tap, on_anchor_added, on_anchor_removed, on_anchor_updated,
    start_tracking, TapOutcome,
};
use super::engine::{ArEngine, PlaneDetection, RunOptions, TrackingConfig};
use super::types::{
    plane_frame, AnchorId, AppMode, ConfigError, GameConfig, GameMode, HitTestResult,
    PlaneAlignment, PlaneAnchor, PlaneVisual, PrefabKind, SceneObject,
};

// ============================================================================
// Recording engine
// ============================================================================

#[derive(Debug, Clone)]
pub struct RecordingEngine {
    pub projection: ScreenProjection,
    state: SessionState,
    config: TrackingConfig,
    camera: Option<Mat4>,
    anchors: BTreeMap<AnchorId, PlaneAnchor>,
    visuals: BTreeMap<AnchorId, PlaneVisual>,
    objects: Vec<SceneObject>,
    runs: Vec<(TrackingConfig, RunOptions)>,
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self::new(ScreenProjection::default())
    }
}

impl RecordingEngine {
    pub fn new(projection: ScreenProjection) -> Self {
        Self {
            projection,
            state: SessionState::NotStarted,
            config: TrackingConfig::default(),
            camera: None,
            anchors: BTreeMap::new(),
            visuals: BTreeMap::new(),
            objects: Vec::new(),
            runs: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn tracking_config(&self) -> TrackingConfig {
        self.config
    }

    /// Every `run_session` call, in order.
    pub fn runs(&self) -> &[(TrackingConfig, RunOptions)] {
        &self.runs
    }

    pub fn set_camera(&mut self, pose: Option<Mat4>) {
        self.camera = pose;
    }

    pub fn anchors(&self) -> impl Iterator<Item = &PlaneAnchor> {
        self.anchors.values()
    }

    pub fn visuals(&self) -> &BTreeMap<AnchorId, PlaneVisual> {
        &self.visuals
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn count(&self, prefab: PrefabKind) -> usize {
        self.objects.iter().filter(|o| o.prefab == prefab).count()
    }

    /// Drop the `n` oldest balls.
    pub fn remove_oldest_balls(&mut self, n: usize) {
        let mut remaining = n;
        self.objects.retain(|object| {
            if remaining > 0 && object.prefab == PrefabKind::Ball {
                remaining -= 1;
                false
            } else {
                true
            }
        });
    }

    /// Apply a tracking event the way the session would, returning it if the
    /// application should be notified.
    ///
    /// Added/updated events are dropped unless the session is running and
    /// detecting planes of that alignment.
    pub fn deliver(&mut self, event: AnchorEvent) -> Option<AnchorEvent> {
        if let AnchorEvent::Added(anchor) | AnchorEvent::Updated(anchor) = &event {
            if !self.detects(anchor) {
                return None;
            }
        }

        match event {
            AnchorEvent::Added(anchor) => {
                self.anchors.insert(anchor.id, anchor.clone());
                Some(AnchorEvent::Added(anchor))
            }
            AnchorEvent::Updated(anchor) => {
                if !self.anchors.contains_key(&anchor.id) {
                    return None;
                }
                self.anchors.insert(anchor.id, anchor.clone());
                Some(AnchorEvent::Updated(anchor))
            }
            AnchorEvent::Removed(id) => {
                self.anchors.remove(&id)?;
                Some(AnchorEvent::Removed(id))
            }
        }
    }

    fn detects(&self, anchor: &PlaneAnchor) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        let detection = self.config.plane_detection;
        match anchor.alignment {
            PlaneAlignment::Horizontal => detection.horizontal,
            PlaneAlignment::Vertical => detection.vertical,
        }
    }
}

impl ArEngine for RecordingEngine {
    fn run_session(&mut self, config: TrackingConfig, options: RunOptions) {
        if options.remove_existing_anchors {
            // Anchor nodes go away together with their children.
            self.anchors.clear();
            self.visuals.clear();
        }
        self.config = config;
        self.state = SessionState::Running;
        self.runs.push((config, options));
    }

    fn pause_session(&mut self) {
        if self.state == SessionState::Running {
            self.state = SessionState::Paused;
        }
    }

    fn hit_test(&self, screen_point: Vec2) -> Option<HitTestResult> {
        let ray = self.projection.ray(self.camera?, screen_point)?;
        hit_test_planes(&ray, self.anchors.values())
    }

    fn camera_pose(&self) -> Option<Mat4> {
        match self.state {
            SessionState::Running => self.camera,
            SessionState::NotStarted | SessionState::Paused => None,
        }
    }

    fn attach_plane_visual(&mut self, anchor: AnchorId, visual: PlaneVisual) {
        if self.anchors.contains_key(&anchor) {
            self.visuals.insert(anchor, visual);
        }
    }

    fn plane_visual(&self, anchor: AnchorId) -> Option<PlaneVisual> {
        self.visuals.get(&anchor).cloned()
    }

    fn replace_plane_visual(&mut self, anchor: AnchorId, visual: PlaneVisual) {
        if let Some(existing) = self.visuals.get_mut(&anchor) {
            *existing = visual;
        }
    }

    fn remove_plane_visual(&mut self, anchor: AnchorId) {
        self.visuals.remove(&anchor);
    }

    fn spawn_object(&mut self, object: SceneObject) {
        self.objects.push(object);
    }
}

// ============================================================================
// Replay script
// ============================================================================

/// Anchor as written in a replay script.
#[derive(Debug, Clone, Deserialize)]
pub struct AnchorSpec {
    pub id: u64,
    pub alignment: PlaneAlignment,
    /// World position of the anchor.
    pub origin: [f32; 3],
    /// World-space plane normal.
    pub normal: [f32; 3],
    #[serde(default)]
    pub center: [f32; 3],
    pub extent: [f32; 3],
}

impl AnchorSpec {
    pub fn to_anchor(&self) -> PlaneAnchor {
        PlaneAnchor {
            id: AnchorId(self.id),
            alignment: self.alignment,
            transform: plane_frame(Vec3::from(self.origin), Vec3::from(self.normal)),
            center: Vec3::from(self.center),
            extent: Vec3::from(self.extent),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Device pose update.
    Camera { position: [f32; 3], look_at: [f32; 3] },
    /// Tracking lost; no camera pose until the next `camera` event.
    CameraLost,
    AnchorAdded(AnchorSpec),
    AnchorUpdated(AnchorSpec),
    AnchorRemoved { id: u64 },
    Tap { x: f32, y: f32 },
    Pause,
    Resume,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    #[serde(default = "default_viewport")]
    pub viewport: [f32; 2],
    pub events: Vec<ScriptEvent>,
}

fn default_viewport() -> [f32; 2] {
    [1280.0, 720.0]
}

impl ReplayScript {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

/// What a single script event did.
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    CameraMoved,
    CameraLost,
    /// The anchor event reached the game; `changed` is whether a visual was
    /// created, refit or removed.
    AnchorDelivered { id: AnchorId, changed: bool },
    /// The session did not deliver the anchor event.
    AnchorDropped(AnchorId),
    Tap(TapOutcome),
    Paused,
    Resumed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    pub mode: AppMode,
    pub plane_visuals: usize,
    pub backboards: usize,
    pub balls: usize,
    pub steps: Vec<StepResult>,
}

/// Gameplay controllers running against a [`RecordingEngine`].
#[derive(Debug, Clone)]
pub struct HeadlessGame {
    pub engine: RecordingEngine,
    pub mode: GameMode,
    pub config: GameConfig,
}

impl HeadlessGame {
    /// Start a game with the session running, as when the view appears.
    pub fn new(config: GameConfig, projection: ScreenProjection) -> Self {
        let mut engine = RecordingEngine::new(projection);
        start_tracking(&mut engine);
        Self {
            engine,
            mode: GameMode::default(),
            config,
        }
    }

    pub fn tap(&mut self, screen_point: Vec2) -> TapOutcome {
        let gameplay = &self.config.gameplay;
        let outcome = handle_tap(&mut self.engine, &mut self.mode, screen_point, gameplay);
        if outcome == TapOutcome::BallThrown {
            let excess = balls_over_limit(self.engine.count(PrefabKind::Ball), gameplay.max_balls);
            self.engine.remove_oldest_balls(excess);
        }
        outcome
    }

    /// Feed an anchor event through the session to the plane tracker.
    pub fn anchor_event(&mut self, event: AnchorEvent) -> StepResult {
        let id = match &event {
            AnchorEvent::Added(anchor) | AnchorEvent::Updated(anchor) => anchor.id,
            AnchorEvent::Removed(id) => *id,
        };

        let Some(event) = self.engine.deliver(event) else {
            return StepResult::AnchorDropped(id);
        };

        let color = self.config.planes.color.to_color();
        let changed = match event {
            AnchorEvent::Added(anchor) => on_anchor_added(&mut self.engine, &anchor, color),
            AnchorEvent::Updated(anchor) => on_anchor_updated(&mut self.engine, &anchor),
            AnchorEvent::Removed(id) => {
                let had_visual = self.engine.plane_visual(id).is_some();
                on_anchor_removed(&mut self.engine, id);
                had_visual
            }
        };

        StepResult::AnchorDelivered { id, changed }
    }

    pub fn step(&mut self, event: &ScriptEvent) -> StepResult {
        match event {
            ScriptEvent::Camera { position, look_at } => {
                let transform = Transform::from_translation(Vec3::from(*position))
                    .looking_at(Vec3::from(*look_at), Vec3::Y);
                self.engine.set_camera(Some(Mat4::from_rotation_translation(
                    transform.rotation,
                    transform.translation,
                )));
                StepResult::CameraMoved
            }
            ScriptEvent::CameraLost => {
                self.engine.set_camera(None);
                StepResult::CameraLost
            }
            ScriptEvent::AnchorAdded(spec) => {
                self.anchor_event(AnchorEvent::Added(spec.to_anchor()))
            }
            ScriptEvent::AnchorUpdated(spec) => {
                self.anchor_event(AnchorEvent::Updated(spec.to_anchor()))
            }
            ScriptEvent::AnchorRemoved { id } => {
                self.anchor_event(AnchorEvent::Removed(AnchorId(*id)))
            }
            ScriptEvent::Tap { x, y } => StepResult::Tap(self.tap(Vec2::new(*x, *y))),
            ScriptEvent::Pause => {
                self.engine.pause_session();
                StepResult::Paused
            }
            ScriptEvent::Resume => {
                let config = self.engine.tracking_config();
                self.engine.run_session(config, RunOptions::default());
                StepResult::Resumed
            }
        }
    }

    pub fn report(&self, steps: Vec<StepResult>) -> ReplayReport {
        ReplayReport {
            mode: self.mode.current(),
            plane_visuals: self.engine.visuals().len(),
            backboards: self.engine.count(PrefabKind::Backboard),
            balls: self.engine.count(PrefabKind::Ball),
            steps,
        }
    }

    pub fn plane_detection(&self) -> PlaneDetection {
        self.engine.tracking_config().plane_detection
    }
}

/// Replay every event of `script` from a fresh game.
pub fn replay(script: &ReplayScript, config: GameConfig) -> ReplayReport {
    let projection = ScreenProjection {
        viewport: Vec2::from(script.viewport),
        ..default()
    };
    let mut game = HeadlessGame::new(config, projection);
    let steps = script.events.iter().map(|event| game.step(event)).collect();
    game.report(steps)
}
