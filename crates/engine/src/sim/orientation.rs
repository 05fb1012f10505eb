use glam::Vec2;

/// Signed angle from `current` to `target`, wrapped into [-PI, PI].
pub fn shortest_angle_delta(current: f32, target: f32) -> f32 {
    let delta = target - current;
    delta.sin().atan2(delta.cos())
}

/// Turns `current` toward `target` by at most `max_step` radians along the
/// shorter arc. Lands exactly on `current + delta` once within one step.
pub fn rotate_towards(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = shortest_angle_delta(current, target);
    if delta == 0.0 || !delta.is_finite() {
        return current;
    }
    current + delta.abs().min(max_step.max(0.0)) * delta.signum()
}

/// Heading for a movement direction in the XZ plane; 0 faces +Z.
pub fn heading_from_direction(direction: Vec2) -> f32 {
    direction.x.atan2(direction.y)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacingSmoother {
    target: f32,
    turn_speed: f32,
}

impl FacingSmoother {
    pub fn new(initial_facing: f32, turn_speed: f32) -> Self {
        Self {
            target: initial_facing,
            turn_speed: turn_speed.max(0.0),
        }
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Zero-length directions keep the previous target.
    pub fn aim_along(&mut self, direction: Vec2) {
        if direction.length_squared() > 0.0 {
            self.target = heading_from_direction(direction);
        }
    }

    pub fn step(&self, current: f32, dt_seconds: f32) -> f32 {
        rotate_towards(current, self.target, self.turn_speed * dt_seconds)
    }
}
