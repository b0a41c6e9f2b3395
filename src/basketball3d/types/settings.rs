//! Game configuration types and persistence
//!
//! Configuration lives in a RON file. Every field has a default, so a partial
//! file (or no file at all) is valid.

use bevy::log::info;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::scene::PrefabKind;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// A value is out of range
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// A configured model file does not exist
    #[error("Missing {kind} model: {path}")]
    MissingAsset { kind: &'static str, path: PathBuf },
}

// ============================================================================
// Colors
// ============================================================================

/// Simple serializable RGBA color.
///
/// Reads either the channel struct `(r: 0.0, g: 1.0, b: 0.0, a: 0.75)` or a
/// string accepted by [`ColorSetting::parse`]. Always written as the struct.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorInput")]
pub struct ColorSetting {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorInput {
    Text(String),
    Channels {
        #[serde(default)]
        r: f32,
        #[serde(default)]
        g: f32,
        #[serde(default)]
        b: f32,
        #[serde(default = "default_alpha")]
        a: f32,
    },
}

fn default_alpha() -> f32 {
    1.0
}

impl TryFrom<ColorInput> for ColorSetting {
    type Error = String;

    fn try_from(input: ColorInput) -> Result<Self, Self::Error> {
        match input {
            ColorInput::Text(text) => {
                Self::parse(&text).ok_or_else(|| format!("unrecognized color \"{text}\""))
            }
            ColorInput::Channels { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
        }
    }
}

impl ColorSetting {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_color(&self) -> Color {
        Color::srgba(self.r, self.g, self.b, self.a)
    }

    /// Parse from various string formats:
    /// - "#00FF00" or "#00FF00BF" (hex, RGBA order)
    /// - "R:0 G:1 B:0 A:0.75"
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();

        if input.starts_with('#') {
            return Self::parse_hex(input);
        }

        if input.contains(':') {
            return Self::parse_labeled(input);
        }

        None
    }

    fn parse_hex(input: &str) -> Option<Self> {
        let hex = input.trim_start_matches('#');
        let channel = |i: usize| -> Option<f32> {
            let byte = u8::from_str_radix(hex.get(i..i + 2)?, 16).ok()?;
            Some(byte as f32 / 255.0)
        };

        match hex.len() {
            6 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, 1.0)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    fn parse_labeled(input: &str) -> Option<Self> {
        let mut color = Self::rgba(0.0, 0.0, 0.0, 1.0);

        for part in input.split_whitespace() {
            let (label, value) = part.split_once(':')?;
            let val: f32 = value.trim_end_matches(',').parse().ok()?;
            let val = val.clamp(0.0, 1.0);
            match label.to_uppercase().as_str() {
                "R" => color.r = val,
                "G" => color.g = val,
                "B" => color.b = val,
                "A" => color.a = val,
                _ => return None,
            }
        }

        Some(color)
    }
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Uniform scale applied to both the backboard and every ball.
    pub object_scale: f32,
    /// Magnitude of the launch impulse along the camera's view direction.
    pub throw_impulse: f32,
    pub ball_mass: f32,
    /// Despawn the oldest balls beyond this count. `None` keeps every ball.
    pub max_balls: Option<usize>,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            object_scale: 0.25,
            throw_impulse: 2.0,
            ball_mass: 1.0,
            max_balls: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneStyleConfig {
    pub color: ColorSetting,
}

impl Default for PlaneStyleConfig {
    fn default() -> Self {
        Self {
            color: ColorSetting::rgba(0.0, 1.0, 0.0, 0.75),
        }
    }
}

/// Tuning for the simulated tracking session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingTuning {
    /// Time after the session starts before a camera pose is available.
    pub warmup_seconds: f32,
    /// Seconds between anchor update events.
    pub update_interval: f32,
    /// Meters per second a tracked extent grows toward the real surface.
    pub growth_rate: f32,
    /// Maximum raw noise added to reported extents and centers.
    pub jitter: f32,
    /// Extent of a plane when first detected.
    pub initial_extent: f32,
    /// Surfaces farther than this from the device are not detected.
    pub detection_range: f32,
    /// Surfaces viewed more obliquely than this (degrees from head-on) are not
    /// detected.
    pub max_view_angle: f32,
}

impl Default for TrackingTuning {
    fn default() -> Self {
        Self {
            warmup_seconds: 0.5,
            update_interval: 0.1,
            growth_rate: 0.6,
            jitter: 0.01,
            initial_extent: 0.3,
            detection_range: 6.0,
            max_view_angle: 70.0,
        }
    }
}

/// Closest the device may get to a wall, floor or ceiling.
pub const ROOM_CLEARANCE: f32 = 0.2;

/// Size of the simulated room the device is standing in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            width: 6.0,
            depth: 8.0,
            height: 2.8,
        }
    }
}

/// Optional glTF models replacing the built-in procedural prefabs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory the asset server reads from.
    pub root: PathBuf,
    pub backboard_model: Option<PathBuf>,
    pub ball_model: Option<PathBuf>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            backboard_model: None,
            ball_model: None,
        }
    }
}

impl AssetConfig {
    pub fn model(&self, kind: PrefabKind) -> Option<&Path> {
        match kind {
            PrefabKind::Backboard => self.backboard_model.as_deref(),
            PrefabKind::Ball => self.ball_model.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "AR Basketball".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

// ============================================================================
// Game config
// ============================================================================

/// Top-level configuration resource.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub gameplay: GameplayConfig,
    pub planes: PlaneStyleConfig,
    pub tracking: TrackingTuning,
    pub room: RoomConfig,
    pub assets: AssetConfig,
    pub window: WindowConfig,
}

impl GameConfig {
    /// Parse and validate a RON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_ron(&contents)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("gameplay.object_scale", self.gameplay.object_scale),
            ("gameplay.throw_impulse", self.gameplay.throw_impulse),
            ("gameplay.ball_mass", self.gameplay.ball_mass),
            ("tracking.update_interval", self.tracking.update_interval),
            ("tracking.initial_extent", self.tracking.initial_extent),
            ("tracking.detection_range", self.tracking.detection_range),
            ("room.width", self.room.width),
            ("room.depth", self.room.depth),
            ("room.height", self.room.height),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }

        if self.tracking.warmup_seconds < 0.0
            || self.tracking.jitter < 0.0
            || self.tracking.growth_rate < 0.0
        {
            return Err(ConfigError::Invalid(
                "tracking warmup, jitter and growth rate must not be negative".to_string(),
            ));
        }

        if !(self.tracking.max_view_angle > 0.0 && self.tracking.max_view_angle <= 90.0) {
            return Err(ConfigError::Invalid(format!(
                "tracking.max_view_angle must be in (0, 90], got {}",
                self.tracking.max_view_angle
            )));
        }

        // The device keeps ROOM_CLEARANCE from every surface.
        let room = [
            ("room.width", self.room.width),
            ("room.depth", self.room.depth),
            ("room.height", self.room.height),
        ];
        for (name, value) in room {
            if value <= 2.0 * ROOM_CLEARANCE {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be larger than {}, got {value}",
                    2.0 * ROOM_CLEARANCE
                )));
            }
        }

        if self.gameplay.max_balls == Some(0) {
            return Err(ConfigError::Invalid("gameplay.max_balls must be at least 1".to_string()));
        }

        Ok(())
    }

    /// Fail fast on configured models that are not on disk.
    pub fn check_assets(&self) -> Result<(), ConfigError> {
        for kind in [PrefabKind::Backboard, PrefabKind::Ball] {
            if let Some(model) = self.assets.model(kind) {
                let path = self.assets.root.join(model);
                if !path.is_file() {
                    return Err(ConfigError::MissingAsset {
                        kind: kind.name(),
                        path,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_setting_parse_hex_rgb() {
        let c = ColorSetting::parse("#FF8000").unwrap();
        assert!((c.r - 1.0).abs() < 0.01);
        assert!((c.g - 0.502).abs() < 0.01);
        assert!((c.b - 0.0).abs() < 0.01);
        assert!((c.a - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_color_setting_parse_hex_rgba() {
        let c = ColorSetting::parse("#00FF00BF").unwrap();
        assert!((c.g - 1.0).abs() < 0.01);
        assert!((c.a - 0.75).abs() < 0.01);
    }

    #[test]
    fn test_color_setting_parse_labeled() {
        let c = ColorSetting::parse("R:0 G:1 B:0 A:0.75").unwrap();
        assert_eq!(c, ColorSetting::rgba(0.0, 1.0, 0.0, 0.75));
    }

    #[test]
    fn test_color_setting_parse_rejects_garbage() {
        assert!(ColorSetting::parse("green").is_none());
        assert!(ColorSetting::parse("#12345").is_none());
        assert!(ColorSetting::parse("Q:1").is_none());
    }

    #[test]
    fn test_color_reads_hex_string() {
        let config = GameConfig::from_ron("(planes: (color: \"#00FF00BF\"))").unwrap();
        let color = config.planes.color;
        assert!((color.g - 1.0).abs() < 0.01);
        assert!((color.a - 0.75).abs() < 0.01);
    }

    #[test]
    fn test_color_struct_keeps_channel_defaults() {
        let config = GameConfig::from_ron("(planes: (color: (g: 1.0)))").unwrap();
        assert_eq!(config.planes.color, ColorSetting::rgba(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn test_unknown_color_string_is_a_parse_error() {
        let err = GameConfig::from_ron("(planes: (color: \"green\"))").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validate_rejects_room_without_standing_space() {
        let err =
            GameConfig::from_ron("(room: (width: 0.3, depth: 0.3, height: 0.3))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(GameConfig::from_ron("(room: (width: 0.5))").is_ok());
    }

    #[test]
    fn test_default_gameplay_values() {
        let config = GameConfig::default();
        assert_eq!(config.gameplay.object_scale, 0.25);
        assert_eq!(config.gameplay.throw_impulse, 2.0);
        assert_eq!(config.gameplay.max_balls, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = GameConfig::from_ron("(gameplay: (object_scale: 0.5))").unwrap();
        assert_eq!(config.gameplay.object_scale, 0.5);
        assert_eq!(config.gameplay.throw_impulse, 2.0);
        assert_eq!(config.room, RoomConfig::default());
    }

    #[test]
    fn test_ron_round_trip() {
        let mut config = GameConfig::default();
        config.gameplay.max_balls = Some(20);
        let text = config.to_ron().unwrap();
        assert_eq!(GameConfig::from_ron(&text).unwrap(), config);
    }

    #[test]
    fn test_validate_rejects_non_positive_scale() {
        let err = GameConfig::from_ron("(gameplay: (object_scale: 0.0))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_validate_rejects_zero_ball_limit() {
        let err = GameConfig::from_ron("(gameplay: (max_balls: Some(0)))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = GameConfig::from_ron("(gameplay: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_check_assets_reports_missing_model() {
        let mut config = GameConfig::default();
        config.assets.root = PathBuf::from("does-not-exist");
        config.assets.ball_model = Some(PathBuf::from("ball.glb"));

        match config.check_assets() {
            Err(ConfigError::MissingAsset { kind, path }) => {
                assert_eq!(kind, "ball");
                assert_eq!(path, PathBuf::from("does-not-exist").join("ball.glb"));
            }
            other => panic!("expected missing asset, got {other:?}"),
        }
    }
}
