use glam::{Vec2, Vec3};
use tracing::{trace, warn};

use super::camera_rig::CameraRig;
use super::character::CharacterState;
use super::collision::{resolve_move, ColliderSet, RoomBounds};
use super::orientation::FacingSmoother;

pub const DEFAULT_MOVE_SPEED: f32 = 2.1;
pub const DEFAULT_TURN_SPEED: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverSettings {
    pub move_speed: f32,
    pub turn_speed: f32,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
            turn_speed: DEFAULT_TURN_SPEED,
        }
    }
}

/// Merged directional input for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameIntent {
    pub direction: Vec2,
    pub view_adjusting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub position: Vec3,
    pub facing: f32,
    pub camera_position: Vec3,
    pub camera_look_at: Vec3,
    pub moving: bool,
    pub view_adjusting: bool,
}

/// Rotates screen-space intent (x right, z toward the viewer) by the camera
/// yaw so "forward" always points away from the camera.
pub fn camera_relative_direction(intent: Vec2, yaw: f32) -> Vec2 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    Vec2::new(
        intent.x * cos_yaw + intent.y * sin_yaw,
        intent.y * cos_yaw - intent.x * sin_yaw,
    )
}

pub struct FrameDriver {
    character: CharacterState,
    camera: CameraRig,
    colliders: ColliderSet,
    bounds: RoomBounds,
    facing: FacingSmoother,
    settings: DriverSettings,
}

impl FrameDriver {
    pub fn new(
        character: CharacterState,
        mut camera: CameraRig,
        colliders: ColliderSet,
        bounds: RoomBounds,
        settings: DriverSettings,
    ) -> Self {
        let character = CharacterState {
            position: bounds.clamp(character.position),
            ..character
        };
        camera.snap_to(character.position);
        let driver = Self {
            facing: FacingSmoother::new(character.facing, settings.turn_speed),
            character,
            camera,
            colliders,
            bounds,
            settings,
        };
        if let Some(collider) = driver.overlapping_collider() {
            warn!(
                position = ?driver.character.position,
                collider,
                "character_starts_inside_collider"
            );
        }
        driver
    }

    /// First collider the character box currently intersects. Moves out of
    /// such an overlap are always rolled back.
    pub fn overlapping_collider(&self) -> Option<usize> {
        self.colliders.first_hit(&self.character.collider())
    }

    pub fn character(&self) -> &CharacterState {
        &self.character
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn colliders(&self) -> &ColliderSet {
        &self.colliders
    }

    pub fn bounds(&self) -> &RoomBounds {
        &self.bounds
    }

    /// One frame of movement, turning and camera follow.
    ///
    /// Movement and turning only happen on frames with non-zero intent outside
    /// view-adjust mode. In view-adjust mode the raw intent rotates the orbit
    /// instead. Fixed-offset rigs have no view-adjust mode.
    pub fn step(&mut self, dt_seconds: f32, intent: FrameIntent) -> FrameReport {
        let dt = if dt_seconds.is_finite() {
            dt_seconds.max(0.0)
        } else {
            0.0
        };
        let view_adjusting = intent.view_adjusting && self.camera.supports_view_adjust();
        let direction = camera_relative_direction(intent.direction, self.camera.yaw());
        let has_intent = direction.length_squared() > 0.0;
        let moving = has_intent && !view_adjusting;

        if moving {
            let displacement = direction.normalize() * self.settings.move_speed * dt;
            let resolution = resolve_move(
                self.character.position,
                displacement,
                self.character.box_size,
                &self.colliders,
                &self.bounds,
            );
            if resolution.x_blocked || resolution.z_blocked {
                trace!(
                    x_blocked = resolution.x_blocked,
                    z_blocked = resolution.z_blocked,
                    "movement_blocked"
                );
            }
            self.character.position = resolution.position;
            self.facing.aim_along(direction);
            self.character.facing = self.facing.step(self.character.facing, dt);
        }

        if view_adjusting && has_intent {
            self.camera.apply_view_adjust(intent.direction, dt);
        }

        let camera_position = self.camera.follow(self.character.position, dt);
        FrameReport {
            position: self.character.position,
            facing: self.character.facing,
            camera_position,
            camera_look_at: self.camera.look_at(self.character.position),
            moving,
            view_adjusting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::camera_rig::{CameraRigSettings, DEFAULT_CAMERA_OFFSET};
    use crate::sim::character::{DEFAULT_CHARACTER_BOX, DEFAULT_SPAWN};
    use crate::sim::collision::Aabb;
    use std::f32::consts::PI;

    fn scenario_driver(camera: CameraRig) -> FrameDriver {
        let colliders = ColliderSet::new(vec![Aabb::new(
            Vec3::new(4.0, 0.0, 4.0),
            Vec3::new(5.0, 1.0, 5.0),
        )]);
        FrameDriver::new(
            CharacterState::new(DEFAULT_SPAWN, DEFAULT_CHARACTER_BOX),
            camera,
            colliders,
            RoomBounds::from_room_size(Vec3::new(10.0, 3.0, 10.0), 0.7),
            DriverSettings::default(),
        )
    }

    fn orbit_driver() -> FrameDriver {
        scenario_driver(CameraRig::orbit(
            DEFAULT_CAMERA_OFFSET,
            CameraRigSettings::default(),
        ))
    }

    fn intent(x: f32, z: f32) -> FrameIntent {
        FrameIntent {
            direction: Vec2::new(x, z),
            view_adjusting: false,
        }
    }

    #[test]
    fn zero_intent_changes_nothing() {
        let mut driver = orbit_driver();
        let before = *driver.character();
        let report = driver.step(0.016, FrameIntent::default());
        assert!(!report.moving);
        assert_eq!(report.position, before.position);
        assert_eq!(report.facing, before.facing);
    }

    #[test]
    fn forward_moves_away_from_default_camera() {
        let mut driver = orbit_driver();
        let report = driver.step(0.5, intent(0.0, -1.0));
        assert!(report.moving);
        assert!((report.position.z + DEFAULT_MOVE_SPEED * 0.5).abs() < 1e-4);
        assert!(report.position.x.abs() < 1e-5);
    }

    #[test]
    fn diagonal_speed_is_normalized() {
        let mut driver = orbit_driver();
        let report = driver.step(1.0, intent(1.0, 1.0));
        let travelled = (report.position - DEFAULT_SPAWN).length();
        assert!((travelled - DEFAULT_MOVE_SPEED).abs() < 1e-4, "{travelled}");
    }

    #[test]
    fn facing_turns_toward_movement_at_bounded_rate() {
        let mut driver = orbit_driver();
        let report = driver.step(0.1, intent(1.0, 0.0));
        assert!((report.facing - DEFAULT_TURN_SPEED * 0.1).abs() < 1e-4);
    }

    #[test]
    fn facing_holds_when_input_stops() {
        let mut driver = orbit_driver();
        let moving = driver.step(0.05, intent(1.0, 0.0));
        assert!((moving.facing - DEFAULT_TURN_SPEED * 0.05).abs() < 1e-4);
        let idle = driver.step(0.05, FrameIntent::default());
        assert_eq!(idle.facing, moving.facing);
        assert_eq!(idle.position, moving.position);
    }

    #[test]
    fn view_adjust_rotates_camera_instead_of_moving() {
        let mut driver = orbit_driver();
        let yaw_before = driver.camera().yaw();
        let report = driver.step(
            0.5,
            FrameIntent {
                direction: Vec2::new(1.0, 0.0),
                view_adjusting: true,
            },
        );
        assert!(!report.moving);
        assert!(report.view_adjusting);
        assert_eq!(report.position, DEFAULT_SPAWN);
        assert!(driver.camera().yaw() > yaw_before);
    }

    #[test]
    fn fixed_camera_ignores_view_adjust_flag() {
        let mut driver = scenario_driver(CameraRig::fixed(
            DEFAULT_CAMERA_OFFSET,
            CameraRigSettings::default(),
        ));
        let report = driver.step(
            0.5,
            FrameIntent {
                direction: Vec2::new(1.0, 0.0),
                view_adjusting: true,
            },
        );
        assert!(report.moving);
        assert!(!report.view_adjusting);
        assert!(report.position.x > 0.0);
    }

    #[test]
    fn rotated_camera_rotates_movement() {
        let direction = camera_relative_direction(Vec2::new(0.0, -1.0), PI / 2.0);
        assert!(direction.abs_diff_eq(Vec2::new(-1.0, 0.0), 1e-5), "{direction:?}");
    }

    #[test]
    fn walking_into_collider_stops_on_the_blocked_axis() {
        // Box half extent 0.4; the collider starts at x = 4.0 and z = 4.0.
        let mut driver = scenario_driver(CameraRig::fixed(
            DEFAULT_CAMERA_OFFSET,
            CameraRigSettings::default(),
        ));
        driver.character.position = Vec3::new(4.2, 0.95, 3.55);
        let before = driver.character().position;
        let report = driver.step(0.05, intent(-1.0, 1.0));

        let step = DEFAULT_MOVE_SPEED * 0.05 / 2f32.sqrt();
        assert!((report.position.x - (before.x - step)).abs() < 1e-5);
        assert_eq!(report.position.z, before.z);
        assert!(driver.overlapping_collider().is_none());
        assert!(driver.bounds().contains(report.position));
    }

    #[test]
    fn long_walk_into_collider_never_overlaps() {
        let mut driver = orbit_driver();
        for _ in 0..400 {
            driver.step(0.05, intent(1.0, 1.0));
        }
        assert!(driver.overlapping_collider().is_none());
        assert!(driver.bounds().contains(driver.character().position));
    }

    #[test]
    fn overlap_at_start_is_reported() {
        let driver = FrameDriver::new(
            CharacterState::new(DEFAULT_SPAWN, DEFAULT_CHARACTER_BOX),
            CameraRig::fixed(DEFAULT_CAMERA_OFFSET, CameraRigSettings::default()),
            ColliderSet::new(vec![Aabb::new(
                Vec3::new(-1.0, 0.0, -1.0),
                Vec3::new(1.0, 1.0, 1.0),
            )]),
            RoomBounds::from_room_size(Vec3::new(10.0, 3.0, 10.0), 0.7),
            DriverSettings::default(),
        );
        assert_eq!(driver.overlapping_collider(), Some(0));
        assert_eq!(orbit_driver().overlapping_collider(), None);
    }

    #[test]
    fn camera_starts_on_target_and_looks_above_character() {
        let driver = orbit_driver();
        let expected = DEFAULT_SPAWN + DEFAULT_CAMERA_OFFSET;
        assert!(driver.camera().position().abs_diff_eq(expected, 1e-4));
        let look = driver.camera().look_at(driver.character().position);
        assert!((look.y - (DEFAULT_SPAWN.y + 0.9)).abs() < 1e-5);
    }

    #[test]
    fn non_finite_dt_is_treated_as_zero() {
        let mut driver = orbit_driver();
        let report = driver.step(f32::NAN, intent(1.0, 0.0));
        assert_eq!(report.position, DEFAULT_SPAWN);
    }
}
