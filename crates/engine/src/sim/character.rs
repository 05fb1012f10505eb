use glam::Vec3;

use super::collision::Aabb;

pub const DEFAULT_CHARACTER_BOX: Vec3 = Vec3::new(0.8, 1.8, 0.8);
pub const DEFAULT_SPAWN: Vec3 = Vec3::new(0.0, 0.95, 0.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterState {
    pub position: Vec3,
    pub facing: f32,
    pub box_size: Vec3,
}

impl Default for CharacterState {
    fn default() -> Self {
        Self::new(DEFAULT_SPAWN, DEFAULT_CHARACTER_BOX)
    }
}

impl CharacterState {
    pub fn new(position: Vec3, box_size: Vec3) -> Self {
        Self {
            position,
            facing: 0.0,
            box_size,
        }
    }

    pub fn collider(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.box_size)
    }

    /// Floor contact point under the box centre.
    pub fn feet(&self) -> Vec3 {
        self.position - Vec3::Y * (self.box_size.y * 0.5)
    }
}
