mod camera_rig;
mod character;
mod collision;
mod driver;
mod orientation;

pub use camera_rig::{
    CameraMode, CameraRig, CameraRigSettings, CameraSmoothing, OrbitState,
    DEFAULT_CAMERA_OFFSET, DEFAULT_FOLLOW_BLEND, DEFAULT_LOOK_HEIGHT, DEFAULT_PITCH_MAX,
    DEFAULT_PITCH_MIN, DEFAULT_ROTATE_SPEED,
};
pub use character::{CharacterState, DEFAULT_CHARACTER_BOX, DEFAULT_SPAWN};
pub use collision::{resolve_move, Aabb, ColliderSet, MoveResolution, RoomBounds};
pub use driver::{
    camera_relative_direction, DriverSettings, FrameDriver, FrameIntent, FrameReport,
    DEFAULT_MOVE_SPEED, DEFAULT_TURN_SPEED,
};
pub use orientation::{heading_from_direction, rotate_towards, shortest_angle_delta, FacingSmoother};
