use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;
use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, MouseButton, TouchPhase, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::WindowBuilder;

use super::device::{DeviceEvent, InputDevice};
use super::metrics::MetricsAccumulator;
use super::pacing::{describe_render_cap, FramePacer};
use super::pad::{PointerId, DEFAULT_PAD_TRAVEL_RADIUS_PX};
use super::rendering::OverlayData;
use super::{LoopMetricsSnapshot, Renderer, Scene, SceneCommand, SceneWorld};

pub const SLOW_FRAME_ENV_VAR: &str = "ROOMWALK_SLOW_FRAME_MS";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub max_frame_delta: Duration,
    pub metrics_log_interval: Duration,
    pub simulated_slow_frame_ms: u64,
    pub max_render_fps: Option<u32>,
    pub pad_travel_radius_px: f32,
    pub overlay_visible: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Room Walkthrough".to_string(),
            window_width: 1280,
            window_height: 720,
            max_frame_delta: Duration::from_millis(250),
            metrics_log_interval: Duration::from_secs(1),
            simulated_slow_frame_ms: 0,
            max_render_fps: None,
            pad_travel_radius_px: DEFAULT_PAD_TRAVEL_RADIUS_PX,
            overlay_visible: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Opens the window and drives `scene` once per redraw until the window
/// closes or the scene asks to quit.
pub fn run_app(config: LoopConfig, mut scene: Box<dyn Scene>) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut pacer = FramePacer::from_config(&config);
    let mut stats = MetricsAccumulator::new(normalize_metrics_interval(
        config.metrics_log_interval,
    ));
    let viewport = renderer.viewport();
    let mut device = InputDevice::new(viewport.width, viewport.height, config.pad_travel_radius_px);
    let mut world = SceneWorld::default();
    scene.load(&mut world);
    device.start();
    info!(prop_count = world.prop_count(), "scene_loaded");
    info!(
        max_frame_delta_ms = pacer.max_frame_delta().as_millis() as u64,
        slow_frame_delay_ms = pacer.slow_frame_delay().as_millis() as u64,
        render_fps_cap = %describe_render_cap(pacer.render_cap()),
        "loop_config"
    );

    let mut last_metrics = LoopMetricsSnapshot::default();
    let mut shown_title: Option<String> = None;
    let mut overlay_visible = config.overlay_visible;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(size) => {
                    resize_surface(&mut device, size.width, size.height, |width, height| {
                        renderer.resize(width, height)
                    });
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    resize_surface(&mut device, size.width, size.height, |width, height| {
                        renderer.resize(width, height)
                    });
                }
                WindowEvent::Focused(false) => device.handle(DeviceEvent::FocusLost),
                WindowEvent::CursorMoved { position, .. } => {
                    device.handle(DeviceEvent::PointerMoved {
                        pointer: PointerId::Mouse,
                        position: physical_to_vec2(position),
                    });
                }
                WindowEvent::CursorLeft { .. } => device.clear_cursor_position(),
                WindowEvent::MouseInput { state, button, .. } => {
                    if let Some(pointer_event) =
                        device_event_for_mouse(button, state, device.cursor_position())
                    {
                        device.handle(pointer_event);
                    }
                }
                WindowEvent::Touch(touch) => {
                    device.handle(device_event_for_touch(touch.id, touch.phase, touch.location));
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if let PhysicalKey::Code(key) = event.physical_key {
                        device.handle(DeviceEvent::Key {
                            key,
                            pressed: event.state == ElementState::Pressed,
                        });
                    }
                }
                WindowEvent::RedrawRequested => {
                    if device.take_overlay_toggle_pressed() {
                        overlay_visible = !overlay_visible;
                        info!(overlay_visible, "overlay_toggled");
                    }
                    if !pacer.slow_frame_delay().is_zero() {
                        thread::sleep(pacer.slow_frame_delay());
                    }

                    let timing = pacer.begin_frame(Instant::now());
                    if timing.was_clamped() {
                        warn!(
                            raw_frame_ms = timing.raw.as_millis() as u64,
                            max_frame_delta_ms = pacer.max_frame_delta().as_millis() as u64,
                            "frame_delta_clamped"
                        );
                    }

                    let input = device.snapshot_for_frame();
                    let command = scene.update(timing.clamped.as_secs_f32(), &input, &mut world);
                    if command == SceneCommand::Quit {
                        info!(reason = "scene_quit", "shutdown_requested");
                        window_target.exit();
                        return;
                    }

                    let wait = pacer.present_wait(Instant::now());
                    if !wait.is_zero() {
                        thread::sleep(wait);
                    }
                    let overlay = overlay_visible.then(|| OverlayData {
                        metrics: last_metrics,
                        render_fps_cap: pacer.render_cap(),
                        slow_frame_delay_ms: pacer.slow_frame_delay().as_millis() as u64,
                        prop_count: world.prop_count(),
                    });
                    if let Err(error) = renderer.render_frame(&world, device.pad(), overlay.as_ref())
                    {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    pacer.mark_presented(Instant::now());

                    let title = scene.debug_title(&world);
                    if title != shown_title {
                        window.set_title(title.as_deref().unwrap_or(&config.window_title));
                        shown_title = title;
                    }

                    stats.record_frame(timing.raw);
                    if let Some(snapshot) = stats.maybe_snapshot(timing.now) {
                        last_metrics = snapshot;
                        info!(
                            fps = snapshot.fps,
                            frame_time_ms = snapshot.frame_time_ms,
                            worst_frame_time_ms = snapshot.worst_frame_time_ms,
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => window.request_redraw(),
            Event::LoopExiting => {
                device.stop();
                scene.unload(&mut world);
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// A renderer that cannot follow the new size keeps its old surface; the loop
/// carries on.
fn resize_surface<E: fmt::Display>(
    device: &mut InputDevice,
    width: u32,
    height: u32,
    resize_renderer: impl FnOnce(u32, u32) -> Result<(), E>,
) {
    device.handle(DeviceEvent::Resized { width, height });
    if let Err(error) = resize_renderer(width, height) {
        warn!(error = %error, width, height, "renderer_resize_failed");
    }
}

fn normalize_metrics_interval(interval: Duration) -> Duration {
    if interval.is_zero() {
        Duration::from_secs(1)
    } else {
        interval
    }
}

fn physical_to_vec2(position: PhysicalPosition<f64>) -> Vec2 {
    Vec2::new(position.x as f32, position.y as f32)
}

fn device_event_for_mouse(
    button: MouseButton,
    state: ElementState,
    cursor: Option<Vec2>,
) -> Option<DeviceEvent> {
    if button != MouseButton::Left {
        return None;
    }
    match state {
        ElementState::Pressed => cursor.map(|position| DeviceEvent::PointerDown {
            pointer: PointerId::Mouse,
            position,
        }),
        ElementState::Released => Some(DeviceEvent::PointerUp {
            pointer: PointerId::Mouse,
        }),
    }
}

fn device_event_for_touch(id: u64, phase: TouchPhase, location: PhysicalPosition<f64>) -> DeviceEvent {
    let pointer = PointerId::Touch(id);
    let position = physical_to_vec2(location);
    match phase {
        TouchPhase::Started => DeviceEvent::PointerDown { pointer, position },
        TouchPhase::Moved => DeviceEvent::PointerMoved { pointer, position },
        TouchPhase::Ended => DeviceEvent::PointerUp { pointer },
        TouchPhase::Cancelled => DeviceEvent::PointerCancelled { pointer },
    }
}
