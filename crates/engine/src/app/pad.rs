use glam::Vec2;

pub const PAD_DEADZONE: f32 = 0.05;
pub const DEFAULT_PAD_TRAVEL_RADIUS_PX: f32 = 42.0;
/// Thumb travel as a fraction of the pad's outer radius.
const TRAVEL_FRACTION: f32 = 0.7;
const PAD_SCREEN_MARGIN_PX: f32 = 28.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerId {
    Mouse,
    Touch(u64),
}

/// On-screen thumb stick anchored to the lower-left corner of the window.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalPad {
    center: Vec2,
    travel_radius: f32,
    owner: Option<PointerId>,
    thumb: Vec2,
}

impl DirectionalPad {
    pub fn new(center: Vec2, travel_radius: f32) -> Self {
        Self {
            center,
            travel_radius: travel_radius.max(1.0),
            owner: None,
            thumb: Vec2::ZERO,
        }
    }

    pub fn for_viewport(width: u32, height: u32, travel_radius: f32) -> Self {
        let mut pad = Self::new(Vec2::ZERO, travel_radius);
        pad.relayout(width, height);
        pad
    }

    pub fn relayout(&mut self, width: u32, height: u32) {
        let outer = self.outer_radius();
        let x = PAD_SCREEN_MARGIN_PX + outer;
        let y = (height as f32 - PAD_SCREEN_MARGIN_PX - outer).max(outer);
        self.center = Vec2::new(x.min(width as f32 - outer).max(outer), y);
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn travel_radius(&self) -> f32 {
        self.travel_radius
    }

    pub fn outer_radius(&self) -> f32 {
        self.travel_radius / TRAVEL_FRACTION
    }

    pub fn thumb_position(&self) -> Vec2 {
        self.center + self.thumb
    }

    pub fn owner(&self) -> Option<PointerId> {
        self.owner
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.distance_squared(self.center) <= self.outer_radius().powi(2)
    }

    /// Captures the pad for `pointer` if it is free and `point` is inside it.
    pub fn press(&mut self, pointer: PointerId, point: Vec2) -> bool {
        if self.owner.is_some() || !self.contains(point) {
            return false;
        }
        self.owner = Some(pointer);
        self.move_thumb(point);
        true
    }

    pub fn drag(&mut self, pointer: PointerId, point: Vec2) -> bool {
        if self.owner != Some(pointer) {
            return false;
        }
        self.move_thumb(point);
        true
    }

    /// Release and cancel behave the same: the owner lets go and the thumb
    /// recentres.
    pub fn release(&mut self, pointer: PointerId) -> bool {
        if self.owner != Some(pointer) {
            return false;
        }
        self.reset();
        true
    }

    pub fn reset(&mut self) {
        self.owner = None;
        self.thumb = Vec2::ZERO;
    }

    /// Thumb offset over travel radius, magnitude at most 1, zero inside the
    /// deadzone. Screen y grows downward, which matches +z (toward the viewer).
    pub fn value(&self) -> Vec2 {
        let value = self.thumb / self.travel_radius;
        if value.length() > PAD_DEADZONE {
            value
        } else {
            Vec2::ZERO
        }
    }

    fn move_thumb(&mut self, point: Vec2) {
        self.thumb = (point - self.center).clamp_length_max(self.travel_radius);
    }
}
