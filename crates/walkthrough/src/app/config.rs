use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use engine::sim::{
    CameraRig, CameraRigSettings, CameraSmoothing, CharacterState, ColliderSet, DriverSettings,
    RoomBounds,
    DEFAULT_CAMERA_OFFSET, DEFAULT_CHARACTER_BOX, DEFAULT_LOOK_HEIGHT, DEFAULT_MOVE_SPEED,
    DEFAULT_PITCH_MAX, DEFAULT_PITCH_MIN, DEFAULT_ROTATE_SPEED, DEFAULT_SPAWN, DEFAULT_TURN_SPEED,
};
use engine::app::DEFAULT_PAD_TRAVEL_RADIUS_PX;
use glam::Vec3;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

pub(crate) const CONFIG_FILE_NAME: &str = "walkthrough.json";
pub(crate) const CAMERA_ENV_VAR: &str = "ROOMWALK_CAMERA";
pub(crate) const EMBED_HOST_ENV_VAR: &str = "ROOMWALK_EMBED_HOST";

const DEFAULT_ROOM_MARGIN: f32 = 0.7;
const DEFAULT_MODEL_TARGET_HEIGHT: f32 = 1.8;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path} at {at}: {source}")]
    Parse {
        path: PathBuf,
        at: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
    #[error("spawn {position:?} overlaps room collider {collider}")]
    SpawnBlocked { position: [f32; 3], collider: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum CameraModeSetting {
    Orbit,
    Fixed,
}

impl CameraModeSetting {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "orbit" => Some(Self::Orbit),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CameraConfig {
    pub(crate) mode: CameraModeSetting,
    pub(crate) offset: [f32; 3],
    pub(crate) rotate_speed: f32,
    pub(crate) pitch_min: f32,
    pub(crate) pitch_max: f32,
    pub(crate) look_height: f32,
    pub(crate) smoothing: CameraSmoothing,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            mode: CameraModeSetting::Orbit,
            offset: DEFAULT_CAMERA_OFFSET.to_array(),
            rotate_speed: DEFAULT_ROTATE_SPEED,
            pitch_min: DEFAULT_PITCH_MIN,
            pitch_max: DEFAULT_PITCH_MAX,
            look_height: DEFAULT_LOOK_HEIGHT,
            smoothing: CameraSmoothing::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct DataFiles {
    pub(crate) items: String,
    pub(crate) layout: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            items: "items.json".to_string(),
            layout: "room_layout.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ModelConfig {
    /// Tried in order, relative to the models directory.
    pub(crate) sources: Vec<String>,
    pub(crate) target_height: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            sources: vec!["character.obj".to_string(), "character_fallback.obj".to_string()],
            target_height: DEFAULT_MODEL_TARGET_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WalkthroughConfig {
    pub(crate) move_speed: f32,
    pub(crate) turn_speed: f32,
    pub(crate) room_margin: f32,
    pub(crate) character_box: [f32; 3],
    pub(crate) spawn: [f32; 3],
    pub(crate) pad_travel_radius_px: f32,
    pub(crate) embed_host: bool,
    pub(crate) camera: CameraConfig,
    pub(crate) data: DataFiles,
    pub(crate) model: ModelConfig,
}

impl Default for WalkthroughConfig {
    fn default() -> Self {
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
            turn_speed: DEFAULT_TURN_SPEED,
            room_margin: DEFAULT_ROOM_MARGIN,
            character_box: DEFAULT_CHARACTER_BOX.to_array(),
            spawn: DEFAULT_SPAWN.to_array(),
            pad_travel_radius_px: DEFAULT_PAD_TRAVEL_RADIUS_PX,
            embed_host: false,
            camera: CameraConfig::default(),
            data: DataFiles::default(),
            model: ModelConfig::default(),
        }
    }
}

impl WalkthroughConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        let non_negative = [
            ("move_speed", self.move_speed),
            ("turn_speed", self.turn_speed),
            ("room_margin", self.room_margin),
            ("camera.rotate_speed", self.camera.rotate_speed),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be a finite non-negative number, got {value}"));
            }
        }
        let positive = [
            ("pad_travel_radius_px", self.pad_travel_radius_px),
            ("model.target_height", self.model.target_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{name} must be a finite positive number, got {value}"));
            }
        }
        if self.character_box.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err("character_box extents must be positive".to_string());
        }
        let finite_vectors = [
            ("spawn", self.spawn),
            ("camera.offset", self.camera.offset),
        ];
        for (name, value) in finite_vectors {
            if value.iter().any(|v| !v.is_finite()) {
                return Err(format!("{name} must contain finite numbers"));
            }
        }
        if !self.camera.pitch_min.is_finite()
            || !self.camera.pitch_max.is_finite()
            || !self.camera.look_height.is_finite()
        {
            return Err("camera pitch range and look_height must be finite".to_string());
        }
        match self.camera.smoothing {
            CameraSmoothing::PerFrame { blend } if !(0.0..=1.0).contains(&blend) => {
                Err(format!("camera.smoothing.blend must be within [0, 1], got {blend}"))
            }
            CameraSmoothing::TimeCorrected { rate } if !rate.is_finite() || rate < 0.0 => {
                Err(format!("camera.smoothing.rate must be non-negative, got {rate}"))
            }
            _ => Ok(()),
        }
    }

    /// Applies `ROOMWALK_CAMERA` and `ROOMWALK_EMBED_HOST` on top of the file
    /// values. Unrecognised values are logged and ignored.
    pub(crate) fn apply_env_overrides(&mut self) {
        let camera = std::env::var(CAMERA_ENV_VAR).ok();
        let embed_host = std::env::var(EMBED_HOST_ENV_VAR).ok();
        self.apply_overrides(camera.as_deref(), embed_host.as_deref());
    }

    fn apply_overrides(&mut self, camera: Option<&str>, embed_host: Option<&str>) {
        if let Some(raw) = camera {
            match CameraModeSetting::parse(raw) {
                Some(mode) => self.camera.mode = mode,
                None => warn!(
                    var = CAMERA_ENV_VAR,
                    value = raw,
                    "env_override_ignored"
                ),
            }
        }
        if let Some(raw) = embed_host {
            match parse_flag(raw) {
                Some(enabled) => self.embed_host = enabled,
                None => warn!(
                    var = EMBED_HOST_ENV_VAR,
                    value = raw,
                    "env_override_ignored"
                ),
            }
        }
    }

    pub(crate) fn driver_settings(&self) -> DriverSettings {
        DriverSettings {
            move_speed: self.move_speed,
            turn_speed: self.turn_speed,
        }
    }

    pub(crate) fn character_state(&self) -> CharacterState {
        CharacterState::new(
            Vec3::from_array(self.spawn),
            Vec3::from_array(self.character_box),
        )
    }

    pub(crate) fn room_bounds(&self, room_size: Vec3) -> RoomBounds {
        RoomBounds::from_room_size(room_size, self.room_margin)
    }

    /// The character box at the clamped spawn must start clear of every
    /// collider; a blocked start rolls back every later move.
    pub(crate) fn check_spawn(
        &self,
        room_size: Vec3,
        colliders: &ColliderSet,
    ) -> Result<(), ConfigError> {
        let mut character = self.character_state();
        character.position = self.room_bounds(room_size).clamp(character.position);
        match colliders.first_hit(&character.collider()) {
            Some(collider) => Err(ConfigError::SpawnBlocked {
                position: character.position.to_array(),
                collider,
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn camera_rig(&self) -> CameraRig {
        let settings = CameraRigSettings {
            smoothing: self.camera.smoothing,
            pitch_min: self.camera.pitch_min,
            pitch_max: self.camera.pitch_max,
            rotate_speed: self.camera.rotate_speed,
            look_height: self.camera.look_height,
        };
        let offset = Vec3::from_array(self.camera.offset);
        match self.camera.mode {
            CameraModeSetting::Orbit => CameraRig::orbit(offset, settings),
            CameraModeSetting::Fixed => CameraRig::fixed(offset, settings),
        }
    }
}

/// Reads the config file; a missing file yields the defaults.
pub(crate) fn load_config(path: &Path) -> Result<WalkthroughConfig, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "config_defaults");
            return Ok(WalkthroughConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    let config: WalkthroughConfig =
        serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
            let at = error.path().to_string();
            ConfigError::Parse {
                path: path.to_path_buf(),
                at,
                source: error.into_inner(),
            }
        })?;
    config.validate().map_err(|reason| ConfigError::Invalid {
        path: path.to_path_buf(),
        reason,
    })?;
    info!(path = %path.display(), "config_loaded");
    Ok(config)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
