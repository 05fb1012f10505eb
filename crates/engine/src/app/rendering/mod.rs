mod hud;
mod projection;
mod raster;
mod renderer;
mod text;

pub(crate) use hud::OverlayData;
pub use hud::DetailPanelLayout;
pub use projection::{
    clip_segment_near, clip_to_screen, cursor_to_ndc, ray_through_cursor, world_to_screen, Ray,
    Viewport,
};
pub use raster::PxRect;
pub use renderer::Renderer;
