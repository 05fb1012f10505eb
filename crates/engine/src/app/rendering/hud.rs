use glam::Vec2;

use crate::app::{DetailPanel, DirectionalPad, LoopMetricsSnapshot};

use super::raster::{
    draw_circle_outline, draw_filled_rect, draw_rect_outline, fill_circle, PxRect,
};
use super::text::{draw_text_clipped, text_width_px, wrap_text, GLYPH_ADVANCE, LINE_ADVANCE};

const PANEL_PADDING: i32 = 12;
const PANEL_MAX_WIDTH: i32 = 520;
const PANEL_MARGIN: i32 = 24;
const CLOSE_LABEL: &str = "Close";
const HUD_MARGIN: i32 = 12;
const TEXT_PRIMARY_COLOR: [u8; 4] = [244, 248, 252, 255];
const TEXT_DIM_COLOR: [u8; 4] = [176, 198, 220, 255];
const PANEL_BG_COLOR: [u8; 4] = [15, 23, 42, 255];
const PANEL_BORDER_COLOR: [u8; 4] = [92, 106, 126, 255];
const BUTTON_BG_COLOR: [u8; 4] = [51, 65, 85, 255];
const PAD_RING_COLOR: [u8; 4] = [148, 163, 184, 255];
const PAD_THUMB_COLOR: [u8; 4] = [226, 232, 240, 255];
const PAD_THUMB_ACTIVE_COLOR: [u8; 4] = [52, 211, 153, 255];

#[derive(Debug, Clone)]
pub(crate) struct OverlayData {
    pub metrics: LoopMetricsSnapshot,
    pub render_fps_cap: Option<u32>,
    pub slow_frame_delay_ms: u64,
    pub prop_count: usize,
}

/// Screen placement of the item detail panel and its close button.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanelLayout {
    pub panel: PxRect,
    pub close_button: PxRect,
    lines: Vec<(String, [u8; 4])>,
}

impl DetailPanelLayout {
    /// Centred card sized to the wrapped text.
    pub fn compute(panel: &DetailPanel, width: u32, height: u32) -> Self {
        let available = (width as i32 - PANEL_MARGIN * 2).clamp(GLYPH_ADVANCE * 8, PANEL_MAX_WIDTH);
        let max_chars = ((available - PANEL_PADDING * 2) / GLYPH_ADVANCE).max(1) as usize;

        let mut lines: Vec<(String, [u8; 4])> = Vec::new();
        for line in wrap_text(&panel.title, max_chars) {
            lines.push((line, TEXT_PRIMARY_COLOR));
        }
        lines.push((String::new(), TEXT_DIM_COLOR));
        for line in wrap_text(&panel.description, max_chars) {
            lines.push((line, TEXT_PRIMARY_COLOR));
        }
        lines.push((String::new(), TEXT_DIM_COLOR));
        for line in wrap_text(&panel.meta, max_chars) {
            lines.push((line, TEXT_DIM_COLOR));
        }

        let text_width = lines
            .iter()
            .map(|(line, _)| text_width_px(line))
            .max()
            .unwrap_or(0)
            .max(text_width_px(CLOSE_LABEL));
        let button_height = LINE_ADVANCE + PANEL_PADDING;
        let panel_width = (text_width + PANEL_PADDING * 2).min(available);
        let panel_height =
            lines.len() as i32 * LINE_ADVANCE + button_height + PANEL_PADDING * 3;
        let panel_rect = PxRect {
            x: (width as i32 - panel_width) / 2,
            y: (height as i32 - panel_height) / 2,
            width: panel_width,
            height: panel_height,
        };
        let button_width = text_width_px(CLOSE_LABEL) + PANEL_PADDING * 2;
        let close_button = PxRect {
            x: panel_rect.x + panel_rect.width - PANEL_PADDING - button_width,
            y: panel_rect.y + panel_rect.height - PANEL_PADDING - button_height,
            width: button_width,
            height: button_height,
        };
        Self {
            panel: panel_rect,
            close_button,
            lines,
        }
    }

    /// True when a click at `point` should close the panel: on the close
    /// button or anywhere outside the card.
    pub fn dismisses(&self, point: Vec2) -> bool {
        self.close_button.contains(point) || !self.panel.contains(point)
    }
}

pub(crate) fn draw_detail_panel(frame: &mut [u8], width: u32, height: u32, panel: &DetailPanel) {
    let layout = DetailPanelLayout::compute(panel, width, height);
    draw_filled_rect(frame, width, height, layout.panel, PANEL_BG_COLOR);
    draw_rect_outline(frame, width, height, layout.panel, PANEL_BORDER_COLOR);

    let mut y = layout.panel.y + PANEL_PADDING;
    for (line, color) in &layout.lines {
        draw_text_clipped(frame, width, height, layout.panel.x + PANEL_PADDING, y, line, *color);
        y += LINE_ADVANCE;
    }

    draw_filled_rect(frame, width, height, layout.close_button, BUTTON_BG_COLOR);
    draw_rect_outline(frame, width, height, layout.close_button, PANEL_BORDER_COLOR);
    draw_text_clipped(
        frame,
        width,
        height,
        layout.close_button.x + PANEL_PADDING,
        layout.close_button.y + PANEL_PADDING / 2 + 1,
        CLOSE_LABEL,
        TEXT_PRIMARY_COLOR,
    );
}

/// Control hint in the top-right corner.
pub(crate) fn draw_hint(frame: &mut [u8], width: u32, height: u32, lines: &[String]) {
    let mut y = HUD_MARGIN;
    for line in lines {
        let x = width as i32 - HUD_MARGIN - text_width_px(line);
        draw_text_clipped(frame, width, height, x, y, line, TEXT_DIM_COLOR);
        y += LINE_ADVANCE;
    }
}

pub(crate) fn draw_overlay(frame: &mut [u8], width: u32, height: u32, data: &OverlayData) {
    let lines = build_overlay_lines(data);
    let longest = lines.iter().map(|line| text_width_px(line)).max().unwrap_or(0);
    let panel = PxRect {
        x: HUD_MARGIN - 6,
        y: HUD_MARGIN - 6,
        width: longest + 12,
        height: lines.len() as i32 * LINE_ADVANCE + 8,
    };
    draw_filled_rect(frame, width, height, panel, PANEL_BG_COLOR);
    draw_rect_outline(frame, width, height, panel, PANEL_BORDER_COLOR);
    let mut y = HUD_MARGIN;
    for line in &lines {
        draw_text_clipped(frame, width, height, HUD_MARGIN, y, line, TEXT_PRIMARY_COLOR);
        y += LINE_ADVANCE;
    }
}

fn build_overlay_lines(data: &OverlayData) -> Vec<String> {
    vec![
        format_fps_line(data.metrics.fps, data.render_fps_cap, data.slow_frame_delay_ms),
        format!("Frame: {:.2} ms", data.metrics.frame_time_ms),
        format!("Props: {}", data.prop_count),
    ]
}

fn format_fps_line(current_fps: f32, cap: Option<u32>, slow_frame_delay_ms: u64) -> String {
    let cap_text = match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    };
    if slow_frame_delay_ms > 0 {
        format!("FPS: {current_fps:.1} (cap {cap_text}, slow {slow_frame_delay_ms}ms)")
    } else {
        format!("FPS: {current_fps:.1} (cap {cap_text})")
    }
}

pub(crate) fn draw_pad(frame: &mut [u8], width: u32, height: u32, pad: &DirectionalPad) {
    draw_circle_outline(frame, width, height, pad.center(), pad.outer_radius(), PAD_RING_COLOR);
    draw_circle_outline(frame, width, height, pad.center(), pad.travel_radius(), PAD_RING_COLOR);
    let thumb_color = if pad.owner().is_some() {
        PAD_THUMB_ACTIVE_COLOR
    } else {
        PAD_THUMB_COLOR
    };
    fill_circle(
        frame,
        width,
        height,
        pad.thumb_position(),
        pad.outer_radius() * 0.35,
        thumb_color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> DetailPanel {
        DetailPanel {
            item_id: "desk-01".to_string(),
            title: "Walnut Desk".to_string(),
            description: "A writing desk with two drawers and a cable tray.".to_string(),
            meta: "Category: office | ID: desk-01".to_string(),
        }
    }

    #[test]
    fn panel_is_centred_and_inside_viewport() {
        let layout = DetailPanelLayout::compute(&panel(), 1280, 720);
        let center_x = layout.panel.x + layout.panel.width / 2;
        assert!((center_x - 640).abs() <= 1);
        assert!(layout.panel.x >= 0 && layout.panel.y >= 0);
        assert!(layout.panel.x + layout.panel.width <= 1280);
    }

    #[test]
    fn close_button_sits_inside_panel() {
        let layout = DetailPanelLayout::compute(&panel(), 1280, 720);
        let button = layout.close_button;
        assert!(button.x >= layout.panel.x);
        assert!(button.y + button.height <= layout.panel.y + layout.panel.height);
    }

    #[test]
    fn clicks_outside_or_on_close_dismiss() {
        let layout = DetailPanelLayout::compute(&panel(), 1280, 720);
        assert!(layout.dismisses(Vec2::new(2.0, 2.0)));
        let button = layout.close_button;
        let on_button = Vec2::new(
            (button.x + button.width / 2) as f32,
            (button.y + button.height / 2) as f32,
        );
        assert!(layout.dismisses(on_button));
        let on_text = Vec2::new((layout.panel.x + 14) as f32, (layout.panel.y + 14) as f32);
        assert!(!layout.dismisses(on_text));
    }

    #[test]
    fn narrow_windows_wrap_long_descriptions() {
        let layout = DetailPanelLayout::compute(&panel(), 240, 400);
        assert!(layout.panel.width <= 240);
        assert!(layout.lines.len() > 5);
    }

    #[test]
    fn fps_line_mentions_cap_and_slow_frames() {
        assert_eq!(format_fps_line(59.94, None, 0), "FPS: 59.9 (cap off)");
        assert_eq!(
            format_fps_line(30.0, Some(60), 12),
            "FPS: 30.0 (cap 60, slow 12ms)"
        );
    }
}
