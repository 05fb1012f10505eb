use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};
use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::{DirectionalPad, PropKind, SceneWorld};
use crate::content::WireMesh;

use super::hud::{draw_detail_panel, draw_hint, draw_overlay, draw_pad, OverlayData};
use super::projection::{clip_segment_near, clip_to_screen, Viewport};
use super::raster::{clear, draw_line};

const CLEAR_COLOR: [u8; 4] = [15, 23, 42, 255];
const FLOOR_GRID_COLOR: [u8; 4] = [51, 65, 85, 255];
const FLOOR_EDGE_COLOR: [u8; 4] = [148, 163, 184, 255];
const WALL_COLOR: [u8; 4] = [226, 232, 240, 255];
const HIGHLIGHT_COLOR: [u8; 4] = [254, 240, 138, 255];
const AVATAR_COLOR: [u8; 4] = [52, 211, 153, 255];
const GRID_CELL_WORLD: f32 = 1.0;
const FACING_MARKER_LENGTH: f32 = 0.6;

/// Edge list for the corner order of `Aabb::corners`.
const BOX_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn render_frame(
        &mut self,
        world: &SceneWorld,
        pad: &DirectionalPad,
        overlay: Option<&OverlayData>,
    ) -> Result<(), Error> {
        let Viewport { width, height } = self.viewport;
        if width == 0 || height == 0 {
            return Ok(());
        }

        let frame = self.pixels.frame_mut();
        draw_scene(frame, self.viewport, world);
        draw_hint(frame, width, height, world.hint_lines());
        if let Some(overlay) = overlay {
            draw_overlay(frame, width, height, overlay);
        }
        draw_pad(frame, width, height, pad);
        if let Some(panel) = world.detail_panel() {
            draw_detail_panel(frame, width, height, panel);
        }
        self.pixels.render()
    }
}

/// Clears the frame and draws floor, props and avatar as wireframes.
pub(crate) fn draw_scene(frame: &mut [u8], viewport: Viewport, world: &SceneWorld) {
    clear(frame, CLEAR_COLOR);
    let Some(view_projection) = world.camera().view_projection(viewport) else {
        return;
    };
    let mut wire = WireTarget {
        frame,
        viewport,
        view_projection,
    };

    draw_floor(&mut wire, world.room_size());

    for prop in world.props() {
        let color = if world.highlighted() == Some(prop.id) {
            HIGHLIGHT_COLOR
        } else if prop.kind == PropKind::Wall {
            WALL_COLOR
        } else {
            prop.color
        };
        let corners = prop.corners();
        for [a, b] in BOX_EDGES {
            wire.segment(corners[a], corners[b], color);
        }
    }

    let avatar = world.avatar();
    let rotation = Quat::from_rotation_y(avatar.facing);
    match avatar.mesh.as_deref() {
        Some(mesh) => wire.mesh(mesh, avatar.body().feet(), rotation, AVATAR_COLOR),
        None => wire.mesh(
            &WireMesh::box_outline(avatar.box_size),
            avatar.position,
            rotation,
            AVATAR_COLOR,
        ),
    }
    let chest = avatar.position + Vec3::Y * (avatar.box_size.y * 0.25);
    wire.segment(
        chest,
        chest + rotation * (Vec3::Z * FACING_MARKER_LENGTH),
        AVATAR_COLOR,
    );
}

fn draw_floor(wire: &mut WireTarget<'_>, room_size: Vec3) {
    let half_x = room_size.x * 0.5;
    let half_z = room_size.z * 0.5;
    if !(half_x > 0.0 && half_z > 0.0) {
        return;
    }
    let steps_x = (room_size.x / GRID_CELL_WORLD).floor() as i32;
    for step in 1..steps_x.max(0) {
        let x = -half_x + step as f32 * GRID_CELL_WORLD;
        wire.segment(Vec3::new(x, 0.0, -half_z), Vec3::new(x, 0.0, half_z), FLOOR_GRID_COLOR);
    }
    let steps_z = (room_size.z / GRID_CELL_WORLD).floor() as i32;
    for step in 1..steps_z.max(0) {
        let z = -half_z + step as f32 * GRID_CELL_WORLD;
        wire.segment(Vec3::new(-half_x, 0.0, z), Vec3::new(half_x, 0.0, z), FLOOR_GRID_COLOR);
    }
    let corners = [
        Vec3::new(-half_x, 0.0, -half_z),
        Vec3::new(half_x, 0.0, -half_z),
        Vec3::new(half_x, 0.0, half_z),
        Vec3::new(-half_x, 0.0, half_z),
    ];
    for idx in 0..corners.len() {
        wire.segment(corners[idx], corners[(idx + 1) % corners.len()], FLOOR_EDGE_COLOR);
    }
}

struct WireTarget<'a> {
    frame: &'a mut [u8],
    viewport: Viewport,
    view_projection: Mat4,
}

impl WireTarget<'_> {
    /// Draws `mesh` rotated about and offset to `origin`.
    fn mesh(&mut self, mesh: &WireMesh, origin: Vec3, rotation: Quat, color: [u8; 4]) {
        let vertices = mesh.vertices();
        for [a, b] in mesh.edges() {
            let (Some(va), Some(vb)) = (vertices.get(*a as usize), vertices.get(*b as usize))
            else {
                continue;
            };
            self.segment(origin + rotation * *va, origin + rotation * *vb, color);
        }
    }

    fn segment(&mut self, a: Vec3, b: Vec3, color: [u8; 4]) {
        let clip_a = self.view_projection * a.extend(1.0);
        let clip_b = self.view_projection * b.extend(1.0);
        let Some((clip_a, clip_b)) = clip_segment_near(clip_a, clip_b) else {
            return;
        };
        let (Some(screen_a), Some(screen_b)) = (
            clip_to_screen(clip_a, self.viewport),
            clip_to_screen(clip_b, self.viewport),
        ) else {
            return;
        };
        draw_line(
            self.frame,
            self.viewport.width,
            self.viewport.height,
            screen_a,
            screen_b,
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Camera3D;

    const WIDTH: u32 = 160;
    const HEIGHT: u32 = 120;

    fn viewport() -> Viewport {
        Viewport {
            width: WIDTH,
            height: HEIGHT,
        }
    }

    fn count_color(frame: &[u8], color: [u8; 4]) -> usize {
        frame.chunks_exact(4).filter(|pixel| *pixel == color).count()
    }

    fn world_with_piece(color: [u8; 4]) -> SceneWorld {
        let mut world = SceneWorld::default();
        world.set_room_size(Vec3::new(10.0, 3.0, 10.0));
        world.spawn_prop(
            PropKind::Furniture,
            Vec3::new(0.0, 0.5, -2.0),
            Vec3::ONE,
            0.0,
            color,
            Some("desk-01".to_string()),
        );
        world
    }

    #[test]
    fn empty_world_draws_floor_and_avatar() {
        let world = world_with_piece([1, 2, 3, 255]);
        let mut frame = vec![0u8; (WIDTH * HEIGHT * 4) as usize];
        draw_scene(&mut frame, viewport(), &world);
        assert!(count_color(&frame, FLOOR_EDGE_COLOR) + count_color(&frame, FLOOR_GRID_COLOR) > 0);
        assert!(count_color(&frame, AVATAR_COLOR) > 0);
        assert!(count_color(&frame, [1, 2, 3, 255]) > 0);
    }

    #[test]
    fn loaded_model_replaces_placeholder_box() {
        let mut world = world_with_piece([1, 2, 3, 255]);
        let mut placeholder = vec![0u8; (WIDTH * HEIGHT * 4) as usize];
        draw_scene(&mut placeholder, viewport(), &world);

        world.avatar_mut().mesh = Some(Arc::new(WireMesh::new(
            vec![Vec3::ZERO, Vec3::new(0.0, 1.8, 0.0)],
            vec![[0, 1]],
        )));
        let mut modelled = vec![0u8; (WIDTH * HEIGHT * 4) as usize];
        draw_scene(&mut modelled, viewport(), &world);

        let model_pixels = count_color(&modelled, AVATAR_COLOR);
        assert!(model_pixels > 0);
        assert!(model_pixels < count_color(&placeholder, AVATAR_COLOR));
    }

    #[test]
    fn highlighted_piece_uses_highlight_color() {
        let mut world = world_with_piece([1, 2, 3, 255]);
        let id = world.props()[0].id;
        world.set_highlighted(Some(id));
        let mut frame = vec![0u8; (WIDTH * HEIGHT * 4) as usize];
        draw_scene(&mut frame, viewport(), &world);
        assert_eq!(count_color(&frame, [1, 2, 3, 255]), 0);
        assert!(count_color(&frame, HIGHLIGHT_COLOR) > 0);
    }

    #[test]
    fn geometry_behind_camera_is_not_drawn() {
        let mut world = world_with_piece([1, 2, 3, 255]);
        *world.camera_mut() = Camera3D {
            position: Vec3::new(0.0, 1.0, -5.0),
            look_at: Vec3::new(0.0, 1.0, -10.0),
            ..Camera3D::default()
        };
        world.set_room_size(Vec3::ZERO);
        let mut frame = vec![0u8; (WIDTH * HEIGHT * 4) as usize];
        draw_scene(&mut frame, viewport(), &world);
        assert_eq!(count_color(&frame, [1, 2, 3, 255]), 0);
        assert_eq!(count_color(&frame, AVATAR_COLOR), 0);
    }
}
