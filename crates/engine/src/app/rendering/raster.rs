use glam::Vec2;

/// Pixel rectangle; `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PxRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PxRect {
    pub fn contains(&self, point: Vec2) -> bool {
        let (px, py) = (point.x, point.y);
        px >= self.x as f32
            && py >= self.y as f32
            && px < (self.x + self.width) as f32
            && py < (self.y + self.height) as f32
    }
}

pub(crate) fn write_pixel_rgba(frame: &mut [u8], width: usize, x: usize, y: usize, color: [u8; 4]) {
    let Some(pixel_offset) = y.checked_mul(width).and_then(|row| row.checked_add(x)) else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }

    frame[byte_offset..end].copy_from_slice(&color);
}

fn put_pixel_clipped(frame: &mut [u8], width: u32, height: u32, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return;
    }
    write_pixel_rgba(frame, width as usize, x as usize, y as usize, color);
}

pub(crate) fn clear(frame: &mut [u8], color: [u8; 4]) {
    for chunk in frame.chunks_exact_mut(4) {
        chunk.copy_from_slice(&color);
    }
}

pub(crate) fn draw_filled_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    rect: PxRect,
    color: [u8; 4],
) {
    let start_x = rect.x.max(0);
    let start_y = rect.y.max(0);
    let end_x = (rect.x + rect.width).min(width as i32);
    let end_y = (rect.y + rect.height).min(height as i32);
    if end_x <= start_x || end_y <= start_y {
        return;
    }

    let width_usize = width as usize;
    for py in start_y..end_y {
        for px in start_x..end_x {
            write_pixel_rgba(frame, width_usize, px as usize, py as usize, color);
        }
    }
}

pub(crate) fn draw_rect_outline(
    frame: &mut [u8],
    width: u32,
    height: u32,
    rect: PxRect,
    color: [u8; 4],
) {
    if rect.width <= 1 || rect.height <= 1 {
        return;
    }
    let PxRect {
        x,
        y,
        width: w,
        height: h,
    } = rect;
    for edge in [
        PxRect { x, y, width: w, height: 1 },
        PxRect { x, y: y + h - 1, width: w, height: 1 },
        PxRect { x, y, width: 1, height: h },
        PxRect { x: x + w - 1, y, width: 1, height: h },
    ] {
        draw_filled_rect(frame, width, height, edge, color);
    }
}

/// Liang-Barsky clip of a segment to the frame rectangle.
pub(crate) fn clip_line_to_frame(a: Vec2, b: Vec2, width: u32, height: u32) -> Option<(Vec2, Vec2)> {
    if width == 0 || height == 0 || !a.is_finite() || !b.is_finite() {
        return None;
    }
    let max_x = (width - 1) as f32;
    let max_y = (height - 1) as f32;
    let delta = b - a;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;
    let edges = [
        (-delta.x, a.x),
        (delta.x, max_x - a.x),
        (-delta.y, a.y),
        (delta.y, max_y - a.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }
    Some((a + delta * t0, a + delta * t1))
}

pub(crate) fn draw_line(frame: &mut [u8], width: u32, height: u32, a: Vec2, b: Vec2, color: [u8; 4]) {
    let Some((a, b)) = clip_line_to_frame(a, b, width, height) else {
        return;
    };
    let (mut x0, mut y0) = (a.x.round() as i32, a.y.round() as i32);
    let (x1, y1) = (b.x.round() as i32, b.y.round() as i32);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel_clipped(frame, width, height, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

pub(crate) fn draw_circle_outline(
    frame: &mut [u8],
    width: u32,
    height: u32,
    center: Vec2,
    radius: f32,
    color: [u8; 4],
) {
    let (cx, cy) = (center.x.round() as i32, center.y.round() as i32);
    let mut x = radius.round().max(0.0) as i32;
    let mut y = 0;
    let mut err = 1 - x;
    while x >= y {
        for (px, py) in [
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ] {
            put_pixel_clipped(frame, width, height, cx + px, cy + py, color);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

pub(crate) fn fill_circle(
    frame: &mut [u8],
    width: u32,
    height: u32,
    center: Vec2,
    radius: f32,
    color: [u8; 4],
) {
    let r = radius.max(0.0);
    let r_sq = r * r;
    let top = (center.y - r).floor() as i32;
    let bottom = (center.y + r).ceil() as i32;
    for py in top..=bottom {
        let dy = py as f32 - center.y;
        let span_sq = r_sq - dy * dy;
        if span_sq < 0.0 {
            continue;
        }
        let span = span_sq.sqrt();
        let left = (center.x - span).round() as i32;
        let right = (center.x + span).round() as i32;
        for px in left..=right {
            put_pixel_clipped(frame, width, height, px, py, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * width + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    const RED: [u8; 4] = [255, 0, 0, 255];

    #[test]
    fn out_of_range_pixel_writes_are_ignored() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        write_pixel_rgba(&mut frame, 4, 10, 10, RED);
        write_pixel_rgba(&mut frame, usize::MAX, 1, usize::MAX, RED);
        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn clip_keeps_inside_segment() {
        let (a, b) = clip_line_to_frame(Vec2::new(1.0, 1.0), Vec2::new(5.0, 5.0), 10, 10)
            .expect("visible");
        assert_eq!(a, Vec2::new(1.0, 1.0));
        assert_eq!(b, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn clip_trims_to_frame_edges() {
        let (a, b) = clip_line_to_frame(Vec2::new(-10.0, 5.0), Vec2::new(20.0, 5.0), 10, 10)
            .expect("visible");
        assert!((a.x - 0.0).abs() < 1e-5);
        assert!((b.x - 9.0).abs() < 1e-5);
    }

    #[test]
    fn clip_rejects_outside_segment() {
        assert!(clip_line_to_frame(Vec2::new(-5.0, -5.0), Vec2::new(-1.0, 20.0), 10, 10).is_none());
    }

    #[test]
    fn horizontal_line_covers_endpoints() {
        let mut frame = vec![0u8; 10 * 10 * 4];
        draw_line(&mut frame, 10, 10, Vec2::new(2.0, 3.0), Vec2::new(7.0, 3.0), RED);
        for x in 2..=7 {
            assert_eq!(pixel(&frame, 10, x, 3), RED);
        }
        assert_eq!(pixel(&frame, 10, 8, 3), [0, 0, 0, 0]);
    }

    #[test]
    fn rect_contains_is_half_open() {
        let rect = PxRect {
            x: 10,
            y: 10,
            width: 5,
            height: 5,
        };
        assert!(rect.contains(Vec2::new(10.0, 14.5)));
        assert!(!rect.contains(Vec2::new(15.0, 12.0)));
    }

    #[test]
    fn filled_circle_marks_center_not_corner() {
        let mut frame = vec![0u8; 20 * 20 * 4];
        fill_circle(&mut frame, 20, 20, Vec2::new(10.0, 10.0), 4.0, RED);
        assert_eq!(pixel(&frame, 20, 10, 10), RED);
        assert_eq!(pixel(&frame, 20, 0, 0), [0, 0, 0, 0]);
    }
}
