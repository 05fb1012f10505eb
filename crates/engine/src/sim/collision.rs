use glam::{Vec2, Vec3};

/// Axis-aligned box in world units. Overlap tests are inclusive: boxes that
/// only touch along a face count as intersecting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), point| {
            (min.min(point), max.max(point))
        });
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y
            || other.max.z < self.min.z
            || other.min.z > self.max.z)
    }

    /// True when any extent is zero, negative or not finite.
    pub fn is_degenerate(&self) -> bool {
        let size = self.size();
        !size.is_finite() || size.min_element() <= f32::EPSILON
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
        ]
    }
}

/// Walkable XZ rectangle. Always satisfies `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl RoomBounds {
    /// Rooms narrower than twice the margin collapse to their centre line.
    pub fn from_room_size(room_size: Vec3, margin: f32) -> Self {
        let half_x = (room_size.x * 0.5 - margin).max(0.0);
        let half_z = (room_size.z * 0.5 - margin).max(0.0);
        Self {
            min_x: -half_x,
            max_x: half_x,
            min_z: -half_z,
            max_z: half_z,
        }
    }

    pub fn clamp(&self, position: Vec3) -> Vec3 {
        Vec3::new(
            position.x.clamp(self.min_x, self.max_x),
            position.y,
            position.z.clamp(self.min_z, self.max_z),
        )
    }

    pub fn contains(&self, position: Vec3) -> bool {
        (self.min_x..=self.max_x).contains(&position.x)
            && (self.min_z..=self.max_z).contains(&position.z)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ColliderSet {
    boxes: Vec<Aabb>,
}

impl ColliderSet {
    pub fn new(boxes: Vec<Aabb>) -> Self {
        Self { boxes }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn boxes(&self) -> &[Aabb] {
        &self.boxes
    }

    /// Index of the first collider overlapping `probe`, in insertion order.
    pub fn first_hit(&self, probe: &Aabb) -> Option<usize> {
        self.boxes.iter().position(|collider| probe.intersects(collider))
    }
}

impl FromIterator<Aabb> for ColliderSet {
    fn from_iter<T: IntoIterator<Item = Aabb>>(iter: T) -> Self {
        Self {
            boxes: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResolution {
    pub position: Vec3,
    pub x_blocked: bool,
    pub z_blocked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Z,
}

/// Applies `displacement` (x, z) one axis at a time. Each axis is clamped to
/// `bounds` and rolled back if the character box then overlaps any collider,
/// so a diagonal push into a wall keeps sliding along it.
pub fn resolve_move(
    position: Vec3,
    displacement: Vec2,
    box_size: Vec3,
    colliders: &ColliderSet,
    bounds: &RoomBounds,
) -> MoveResolution {
    let pre_move = bounds.clamp(position);
    let mut current = position;
    let x_blocked = try_axis(
        &mut current,
        Axis::X,
        displacement.x,
        pre_move,
        box_size,
        colliders,
        bounds,
    );
    let z_blocked = try_axis(
        &mut current,
        Axis::Z,
        displacement.y,
        pre_move,
        box_size,
        colliders,
        bounds,
    );
    MoveResolution {
        position: current,
        x_blocked,
        z_blocked,
    }
}

fn try_axis(
    position: &mut Vec3,
    axis: Axis,
    delta: f32,
    pre_move: Vec3,
    box_size: Vec3,
    colliders: &ColliderSet,
    bounds: &RoomBounds,
) -> bool {
    match axis {
        Axis::X => position.x += delta,
        Axis::Z => position.z += delta,
    }
    *position = bounds.clamp(*position);

    let probe = Aabb::from_center_size(*position, box_size);
    let blocked = colliders.first_hit(&probe).is_some();
    if blocked {
        match axis {
            Axis::X => position.x = pre_move.x,
            Axis::Z => position.z = pre_move.z,
        }
    }
    blocked
}
