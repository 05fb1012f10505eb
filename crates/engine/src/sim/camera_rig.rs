use glam::{Vec2, Vec3};
use serde::Deserialize;

pub const DEFAULT_CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 4.2, 6.2);
pub const DEFAULT_PITCH_MIN: f32 = 0.15;
pub const DEFAULT_PITCH_MAX: f32 = 1.1;
pub const DEFAULT_ROTATE_SPEED: f32 = 1.6;
pub const DEFAULT_LOOK_HEIGHT: f32 = 0.9;
pub const DEFAULT_FOLLOW_BLEND: f32 = 0.1;

/// How the camera position closes the gap to its target each frame.
///
/// `PerFrame` applies a fixed blend regardless of elapsed time, so the follow
/// speed depends on frame rate. `TimeCorrected` uses `1 - exp(-rate * dt)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CameraSmoothing {
    PerFrame { blend: f32 },
    TimeCorrected { rate: f32 },
}

impl Default for CameraSmoothing {
    fn default() -> Self {
        Self::PerFrame {
            blend: DEFAULT_FOLLOW_BLEND,
        }
    }
}

impl CameraSmoothing {
    pub fn alpha(&self, dt_seconds: f32) -> f32 {
        let alpha = match *self {
            Self::PerFrame { blend } => blend,
            Self::TimeCorrected { rate } => 1.0 - (-rate * dt_seconds.max(0.0)).exp(),
        };
        if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl OrbitState {
    pub fn from_offset(offset: Vec3) -> Self {
        Self {
            yaw: offset.x.atan2(offset.z),
            pitch: offset.y.atan2(offset.x.hypot(offset.z)),
            distance: offset.length(),
        }
    }

    pub fn offset(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch) * self.distance
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraMode {
    FixedOffset(Vec3),
    Orbit(OrbitState),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRigSettings {
    pub smoothing: CameraSmoothing,
    pub pitch_min: f32,
    pub pitch_max: f32,
    pub rotate_speed: f32,
    pub look_height: f32,
}

impl Default for CameraRigSettings {
    fn default() -> Self {
        Self {
            smoothing: CameraSmoothing::default(),
            pitch_min: DEFAULT_PITCH_MIN,
            pitch_max: DEFAULT_PITCH_MAX,
            rotate_speed: DEFAULT_ROTATE_SPEED,
            look_height: DEFAULT_LOOK_HEIGHT,
        }
    }
}

/// Third-person follow camera. Owns the smoothed eye position; the subject
/// (character) position is passed in each frame.
#[derive(Debug, Clone)]
pub struct CameraRig {
    mode: CameraMode,
    settings: CameraRigSettings,
    position: Vec3,
}

impl CameraRig {
    pub fn new(mode: CameraMode, settings: CameraRigSettings) -> Self {
        let pitch_min = settings.pitch_min.min(settings.pitch_max);
        let pitch_max = settings.pitch_min.max(settings.pitch_max);
        let settings = CameraRigSettings {
            pitch_min,
            pitch_max,
            ..settings
        };
        let mode = match mode {
            CameraMode::Orbit(state) => CameraMode::Orbit(OrbitState {
                pitch: state.pitch.clamp(pitch_min, pitch_max),
                ..state
            }),
            fixed => fixed,
        };
        Self {
            mode,
            settings,
            position: Vec3::ZERO,
        }
    }

    pub fn fixed(offset: Vec3, settings: CameraRigSettings) -> Self {
        Self::new(CameraMode::FixedOffset(offset), settings)
    }

    pub fn orbit(offset: Vec3, settings: CameraRigSettings) -> Self {
        Self::new(CameraMode::Orbit(OrbitState::from_offset(offset)), settings)
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn supports_view_adjust(&self) -> bool {
        matches!(self.mode, CameraMode::Orbit(_))
    }

    /// Heading of the camera around the subject, used to make movement input
    /// camera-relative.
    pub fn yaw(&self) -> f32 {
        match self.mode {
            CameraMode::FixedOffset(offset) => offset.x.atan2(offset.z),
            CameraMode::Orbit(state) => state.yaw,
        }
    }

    pub fn offset(&self) -> Vec3 {
        match self.mode {
            CameraMode::FixedOffset(offset) => offset,
            CameraMode::Orbit(state) => state.offset(),
        }
    }

    /// Rotates the orbit by `input` (x turns yaw, z tilts pitch). Returns false
    /// for fixed-offset rigs, which ignore view adjustment.
    pub fn apply_view_adjust(&mut self, input: Vec2, dt_seconds: f32) -> bool {
        let CameraMode::Orbit(state) = &mut self.mode else {
            return false;
        };
        let scale = self.settings.rotate_speed * dt_seconds;
        state.yaw += input.x * scale;
        state.pitch = (state.pitch - input.y * scale)
            .clamp(self.settings.pitch_min, self.settings.pitch_max);
        true
    }

    pub fn target_for(&self, subject: Vec3) -> Vec3 {
        subject + self.offset()
    }

    pub fn look_at(&self, subject: Vec3) -> Vec3 {
        subject + Vec3::Y * self.settings.look_height
    }

    pub fn snap_to(&mut self, subject: Vec3) {
        self.position = self.target_for(subject);
    }

    pub fn follow(&mut self, subject: Vec3, dt_seconds: f32) -> Vec3 {
        let alpha = self.settings.smoothing.alpha(dt_seconds);
        self.position = self.position.lerp(self.target_for(subject), alpha);
        self.position
    }
}
