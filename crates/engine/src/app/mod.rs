mod device;
mod input;
mod loop_runner;
mod metrics;
mod pacing;
mod pad;
mod rendering;
mod scene;

pub use device::{DeviceEvent, InputDevice};
pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::LoopMetricsSnapshot;
pub use pad::{DirectionalPad, PointerId, DEFAULT_PAD_TRAVEL_RADIUS_PX, PAD_DEADZONE};
pub use rendering::{
    clip_segment_near, clip_to_screen, cursor_to_ndc, ray_through_cursor, world_to_screen,
    DetailPanelLayout, PxRect, Ray, Renderer, Viewport,
};
pub use scene::{
    Avatar, Camera3D, DetailPanel, InputSnapshot, Prop, PropId, PropKind, Scene, SceneCommand,
    SceneWorld,
};
