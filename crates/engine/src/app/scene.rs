use std::sync::Arc;

use glam::{Quat, Vec2, Vec3};

use super::input::{ActionStates, InputAction};
use super::rendering::{ray_through_cursor, Ray, Viewport};
use crate::content::WireMesh;
use crate::sim::{
    Aabb, CharacterState, DEFAULT_CAMERA_OFFSET, DEFAULT_CHARACTER_BOX, DEFAULT_SPAWN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    actions: ActionStates,
    direction: Vec2,
    view_adjusting: bool,
    cursor_position_px: Option<Vec2>,
    click_position_px: Option<Vec2>,
    dismiss_pressed: bool,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        actions: ActionStates,
        direction: Vec2,
        view_adjusting: bool,
        cursor_position_px: Option<Vec2>,
        click_position_px: Option<Vec2>,
        dismiss_pressed: bool,
        window_width: u32,
        window_height: u32,
    ) -> Self {
        Self {
            actions,
            direction,
            view_adjusting,
            cursor_position_px,
            click_position_px,
            dismiss_pressed,
            window_width,
            window_height,
        }
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    /// Merged keyboard and pad intent; x right, y toward the viewer.
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn view_adjusting(&self) -> bool {
        self.view_adjusting
    }

    pub fn cursor_position_px(&self) -> Option<Vec2> {
        self.cursor_position_px
    }

    /// Where a pointer went down off the pad since the last frame.
    pub fn click_position_px(&self) -> Option<Vec2> {
        self.click_position_px
    }

    pub fn dismiss_pressed(&self) -> bool {
        self.dismiss_pressed
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_direction(mut self, direction: Vec2) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_view_adjusting(mut self, view_adjusting: bool) -> Self {
        self.view_adjusting = view_adjusting;
        self
    }

    pub fn with_cursor_position_px(mut self, cursor_position_px: Option<Vec2>) -> Self {
        self.cursor_position_px = cursor_position_px;
        self
    }

    pub fn with_click_position_px(mut self, click_position_px: Option<Vec2>) -> Self {
        self.click_position_px = click_position_px;
        self
    }

    pub fn with_dismiss_pressed(mut self, dismiss_pressed: bool) -> Self {
        self.dismiss_pressed = dismiss_pressed;
        self
    }

    pub fn with_window_size(mut self, window_size: (u32, u32)) -> Self {
        self.window_width = window_size.0;
        self.window_height = window_size.1;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    Wall,
    Furniture,
}

/// Static box in the room: a wall or a furniture piece. `center` is the box
/// centre; `rotation_y` turns it about its vertical axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub id: PropId,
    pub kind: PropKind,
    pub center: Vec3,
    pub size: Vec3,
    pub rotation_y: f32,
    pub color: [u8; 4],
    pub item_id: Option<String>,
}

impl Prop {
    fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.rotation_y)
    }

    /// Corner order matches [`Aabb::corners`].
    pub fn corners(&self) -> [Vec3; 8] {
        let half = self.size * 0.5;
        let rotation = self.rotation();
        Aabb::new(-half, half)
            .corners()
            .map(|corner| self.center + rotation * corner)
    }

    /// Smallest axis-aligned box enclosing the rotated box.
    pub fn world_aabb(&self) -> Aabb {
        let corners = self.corners();
        Aabb::from_points(corners).unwrap_or_else(|| Aabb::from_center_size(self.center, self.size))
    }

    /// Distance along `ray` to the oriented box, if it is hit in front of the
    /// origin.
    pub fn ray_distance(&self, ray: &Ray) -> Option<f32> {
        let inverse = self.rotation().inverse();
        let origin = inverse * (ray.origin - self.center);
        let direction = inverse * ray.direction;
        let half = self.size * 0.5;

        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let (o, d, h) = (origin[axis], direction[axis], half[axis]);
            if d.abs() < 1e-8 {
                if o < -h || o > h {
                    return None;
                }
                continue;
            }
            let t1 = (-h - o) / d;
            let t2 = (h - o) / d;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
            if t_min > t_max {
                return None;
            }
        }
        if t_max < 0.0 {
            return None;
        }
        Some(t_min.max(0.0))
    }
}

#[derive(Debug, Clone)]
pub struct Avatar {
    pub position: Vec3,
    pub facing: f32,
    pub box_size: Vec3,
    pub mesh: Option<Arc<WireMesh>>,
}

impl Default for Avatar {
    fn default() -> Self {
        Self {
            position: DEFAULT_SPAWN,
            facing: 0.0,
            box_size: DEFAULT_CHARACTER_BOX,
            mesh: None,
        }
    }
}

impl Avatar {
    pub fn body(&self) -> CharacterState {
        CharacterState {
            position: self.position,
            facing: self.facing,
            box_size: self.box_size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    pub look_at: Vec3,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera3D {
    fn default() -> Self {
        Self {
            position: DEFAULT_SPAWN + DEFAULT_CAMERA_OFFSET,
            look_at: DEFAULT_SPAWN + Vec3::Y * 0.9,
            fov_y_radians: 60f32.to_radians(),
            near: 0.1,
            far: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPanel {
    pub item_id: String,
    pub title: String,
    pub description: String,
    pub meta: String,
}

#[derive(Debug, Default)]
pub struct SceneWorld {
    room_size: Vec3,
    props: Vec<Prop>,
    next_prop_id: u64,
    avatar: Avatar,
    camera: Camera3D,
    highlighted: Option<PropId>,
    detail_panel: Option<DetailPanel>,
    hint_lines: Vec<String>,
}

impl SceneWorld {
    pub fn room_size(&self) -> Vec3 {
        self.room_size
    }

    pub fn set_room_size(&mut self, room_size: Vec3) {
        self.room_size = room_size;
    }

    pub fn spawn_prop(
        &mut self,
        kind: PropKind,
        center: Vec3,
        size: Vec3,
        rotation_y: f32,
        color: [u8; 4],
        item_id: Option<String>,
    ) -> PropId {
        let id = PropId(self.next_prop_id);
        self.next_prop_id = self.next_prop_id.saturating_add(1);
        self.props.push(Prop {
            id,
            kind,
            center,
            size,
            rotation_y,
            color,
            item_id,
        });
        id
    }

    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    pub fn prop(&self, id: PropId) -> Option<&Prop> {
        self.props.iter().find(|prop| prop.id == id)
    }

    pub fn prop_count(&self) -> usize {
        self.props.len()
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn avatar_mut(&mut self) -> &mut Avatar {
        &mut self.avatar
    }

    pub fn camera(&self) -> &Camera3D {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera3D {
        &mut self.camera
    }

    pub fn highlighted(&self) -> Option<PropId> {
        self.highlighted
    }

    pub fn set_highlighted(&mut self, highlighted: Option<PropId>) {
        self.highlighted = highlighted;
    }

    pub fn detail_panel(&self) -> Option<&DetailPanel> {
        self.detail_panel.as_ref()
    }

    pub fn open_detail_panel(&mut self, panel: DetailPanel) {
        self.detail_panel = Some(panel);
    }

    pub fn close_detail_panel(&mut self) -> Option<DetailPanel> {
        self.detail_panel.take()
    }

    pub fn hint_lines(&self) -> &[String] {
        &self.hint_lines
    }

    pub fn set_hint_lines(&mut self, lines: Vec<String>) {
        self.hint_lines = lines;
    }

    /// Drops all props and UI state; the camera and avatar reset to defaults.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Nearest furniture piece under the cursor. Walls are not pickable and do
    /// not occlude.
    pub fn pick_prop_at_cursor(
        &self,
        cursor_position_px: Vec2,
        window_size: (u32, u32),
    ) -> Option<PropId> {
        let viewport = Viewport {
            width: window_size.0,
            height: window_size.1,
        };
        let ray = ray_through_cursor(&self.camera, cursor_position_px, viewport)?;
        self.props
            .iter()
            .filter(|prop| prop.kind == PropKind::Furniture)
            .filter_map(|prop| prop.ray_distance(&ray).map(|distance| (distance, prop.id)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id)
    }
}

pub trait Scene {
    fn load(&mut self, world: &mut SceneWorld);
    fn update(
        &mut self,
        dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand;
    fn unload(&mut self, world: &mut SceneWorld);
    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_vec3_close(actual: Vec3, expected: Vec3) {
        assert!((actual - expected).length() < 1e-4, "{actual:?} vs {expected:?}");
    }

    #[test]
    fn avatar_feet_sit_under_its_box() {
        let avatar = Avatar {
            position: Vec3::new(1.0, 0.95, -2.0),
            ..Avatar::default()
        };
        assert_vec3_close(avatar.body().feet(), Vec3::new(1.0, 0.05, -2.0));
        assert_vec3_close(avatar.body().collider().size(), avatar.box_size);
    }

    fn furniture(world: &mut SceneWorld, center: Vec3, size: Vec3) -> PropId {
        world.spawn_prop(
            PropKind::Furniture,
            center,
            size,
            0.0,
            [255; 4],
            Some("item".to_string()),
        )
    }

    fn looking_down_world() -> SceneWorld {
        let mut world = SceneWorld::default();
        *world.camera_mut() = Camera3D {
            position: Vec3::new(0.0, 10.0, 0.01),
            look_at: Vec3::ZERO,
            ..Camera3D::default()
        };
        world
    }

    #[test]
    fn snapshot_builders_set_fields() {
        let snapshot = InputSnapshot::empty()
            .with_direction(Vec2::new(1.0, 0.0))
            .with_view_adjusting(true)
            .with_click_position_px(Some(Vec2::new(3.0, 4.0)))
            .with_window_size((800, 600));
        assert_eq!(snapshot.direction(), Vec2::new(1.0, 0.0));
        assert!(snapshot.view_adjusting());
        assert_eq!(snapshot.click_position_px(), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(snapshot.window_size(), (800, 600));
        assert!(!snapshot.dismiss_pressed());
    }

    #[test]
    fn rotated_prop_aabb_swaps_extents() {
        let prop = Prop {
            id: PropId(0),
            kind: PropKind::Furniture,
            center: Vec3::new(1.0, 0.5, 2.0),
            size: Vec3::new(2.0, 1.0, 0.5),
            rotation_y: FRAC_PI_2,
            color: [0; 4],
            item_id: None,
        };
        let aabb = prop.world_aabb();
        assert_vec3_close(aabb.size(), Vec3::new(0.5, 1.0, 2.0));
        assert_vec3_close(aabb.center(), prop.center);
    }

    #[test]
    fn quarter_turn_aabb_grows_to_enclose_corners() {
        let prop = Prop {
            id: PropId(0),
            kind: PropKind::Furniture,
            center: Vec3::ZERO,
            size: Vec3::new(1.0, 1.0, 1.0),
            rotation_y: std::f32::consts::FRAC_PI_4,
            color: [0; 4],
            item_id: None,
        };
        let size = prop.world_aabb().size();
        assert!((size.x - 2f32.sqrt()).abs() < 1e-4);
        assert!((size.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn ray_hits_box_front_face() {
        let prop = Prop {
            id: PropId(0),
            kind: PropKind::Furniture,
            center: Vec3::ZERO,
            size: Vec3::ONE,
            rotation_y: 0.0,
            color: [0; 4],
            item_id: None,
        };
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::new(0.0, 0.0, -1.0),
        };
        let distance = prop.ray_distance(&ray).expect("hit");
        assert!((distance - 4.5).abs() < 1e-5);

        let miss = Ray {
            origin: Vec3::new(2.0, 0.0, 5.0),
            direction: Vec3::new(0.0, 0.0, -1.0),
        };
        assert!(prop.ray_distance(&miss).is_none());
        let behind = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::new(0.0, 0.0, 1.0),
        };
        assert!(prop.ray_distance(&behind).is_none());
    }

    #[test]
    fn pick_returns_nearest_furniture_under_cursor() {
        let mut world = looking_down_world();
        let low = furniture(&mut world, Vec3::new(0.0, 0.5, 0.0), Vec3::ONE);
        let high = furniture(&mut world, Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.5, 0.5, 0.5));
        assert_ne!(low, high);

        let picked = world.pick_prop_at_cursor(Vec2::new(640.0, 360.0), (1280, 720));
        assert_eq!(picked, Some(high));
    }

    #[test]
    fn pick_ignores_walls_and_empty_space() {
        let mut world = looking_down_world();
        world.spawn_prop(
            PropKind::Wall,
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(4.0, 2.0, 4.0),
            0.0,
            [255; 4],
            None,
        );
        assert_eq!(world.pick_prop_at_cursor(Vec2::new(640.0, 360.0), (1280, 720)), None);
        let far_piece = furniture(&mut world, Vec3::new(6.0, 0.5, 0.0), Vec3::ONE);
        assert_ne!(
            world.pick_prop_at_cursor(Vec2::new(640.0, 360.0), (1280, 720)),
            Some(far_piece)
        );
    }

    #[test]
    fn clear_resets_world() {
        let mut world = SceneWorld::default();
        furniture(&mut world, Vec3::ZERO, Vec3::ONE);
        world.open_detail_panel(DetailPanel {
            item_id: "a".to_string(),
            title: "A".to_string(),
            description: String::new(),
            meta: String::new(),
        });
        world.clear();
        assert_eq!(world.prop_count(), 0);
        assert!(world.detail_panel().is_none());
    }
}
