use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::app::Camera3D;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn aspect(&self) -> Option<f32> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(self.width as f32 / self.height as f32)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

impl Camera3D {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_radians, aspect, self.near, self.far)
    }

    pub fn view_projection(&self, viewport: Viewport) -> Option<Mat4> {
        let aspect = viewport.aspect()?;
        Some(self.projection_matrix(aspect) * self.view_matrix())
    }
}

/// Pixel position to normalised device coordinates; y points up.
pub fn cursor_to_ndc(cursor_px: Vec2, viewport: Viewport) -> Option<Vec2> {
    viewport.aspect()?;
    Some(Vec2::new(
        cursor_px.x / viewport.width as f32 * 2.0 - 1.0,
        -(cursor_px.y / viewport.height as f32 * 2.0 - 1.0),
    ))
}

/// Ray from the near plane through the pixel under the cursor.
pub fn ray_through_cursor(camera: &Camera3D, cursor_px: Vec2, viewport: Viewport) -> Option<Ray> {
    let ndc = cursor_to_ndc(cursor_px, viewport)?;
    let inverse = camera.view_projection(viewport)?.inverse();
    let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, -1.0));
    let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
    let direction = (far - near).try_normalize()?;
    Some(Ray {
        origin: near,
        direction,
    })
}

/// Clip-space to pixel coordinates. `None` behind the eye.
pub fn clip_to_screen(clip: Vec4, viewport: Viewport) -> Option<Vec2> {
    if clip.w <= f32::EPSILON {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.width as f32,
        (1.0 - ndc.y) * 0.5 * viewport.height as f32,
    ))
}

/// Cuts a clip-space segment at the near plane (z = -w). Returns `None` when
/// the whole segment is in front of it.
pub fn clip_segment_near(a: Vec4, b: Vec4) -> Option<(Vec4, Vec4)> {
    let da = a.z + a.w;
    let db = b.z + b.w;
    match (da >= 0.0, db >= 0.0) {
        (true, true) => Some((a, b)),
        (false, false) => None,
        (a_inside, _) => {
            let t = da / (da - db);
            let cut = a + (b - a) * t;
            if a_inside {
                Some((a, cut))
            } else {
                Some((cut, b))
            }
        }
    }
}

pub fn world_to_screen(view_projection: Mat4, world: Vec3, viewport: Viewport) -> Option<Vec2> {
    let clip = view_projection * world.extend(1.0);
    if clip.z + clip.w < 0.0 {
        return None;
    }
    clip_to_screen(clip, viewport)
}
