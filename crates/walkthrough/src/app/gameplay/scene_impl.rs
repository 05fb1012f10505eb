use std::path::PathBuf;

use engine::sim::{CameraMode, FrameDriver, FrameIntent, FrameReport};
use engine::{DetailPanelLayout, InputSnapshot, RoomContent, Scene, SceneCommand, SceneWorld};
use glam::Vec2;
use tracing::{debug, info};

use super::inspect::{open_item_detail, HostBridge, InspectOutcome};
use super::model_loader::PendingModel;
use super::room::build_room;
use crate::app::config::WalkthroughConfig;

pub(crate) struct WalkthroughScene {
    content: RoomContent,
    config: WalkthroughConfig,
    model_sources: Vec<PathBuf>,
    bridge: Box<dyn HostBridge>,
    driver: Option<FrameDriver>,
    pending_model: PendingModel,
    last_report: Option<FrameReport>,
}

impl WalkthroughScene {
    pub(crate) fn new(
        content: RoomContent,
        config: WalkthroughConfig,
        model_sources: Vec<PathBuf>,
        bridge: Box<dyn HostBridge>,
    ) -> Self {
        Self {
            content,
            config,
            model_sources,
            bridge,
            driver: None,
            pending_model: PendingModel::resolved(),
            last_report: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn driver(&self) -> Option<&FrameDriver> {
        self.driver.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn last_report(&self) -> Option<&FrameReport> {
        self.last_report.as_ref()
    }

    fn hint_lines(&self, orbit: bool) -> Vec<String> {
        let mut lines = vec!["WASD / arrows / pad: move".to_string()];
        if orbit {
            lines.push("Hold pointer + keys/pad: orbit camera".to_string());
        }
        lines.push("Click furniture: details".to_string());
        lines.push("Esc: close panel / quit".to_string());
        lines
    }

    /// A click while the panel is open only ever dismisses it. Otherwise the
    /// furniture under the cursor is highlighted and inspected; a miss clears
    /// the highlight.
    fn handle_click(&mut self, click: Vec2, window_size: (u32, u32), world: &mut SceneWorld) {
        if let Some(panel) = world.detail_panel() {
            let layout = DetailPanelLayout::compute(panel, window_size.0, window_size.1);
            if layout.dismisses(click) {
                world.close_detail_panel();
                debug!("detail_panel_closed");
            }
            return;
        }

        let Some(prop_id) = world.pick_prop_at_cursor(click, window_size) else {
            world.set_highlighted(None);
            return;
        };
        world.set_highlighted(Some(prop_id));

        let Some(item_id) = world.prop(prop_id).and_then(|prop| prop.item_id.clone()) else {
            return;
        };
        let Some(item) = self.content.catalog.get(&item_id) else {
            debug!(item_id = %item_id, "inspect_unknown_item");
            return;
        };
        let outcome = open_item_detail(item, self.config.embed_host, self.bridge.as_mut(), world);
        info!(
            item_id = %item_id,
            navigated = outcome == InspectOutcome::Navigated,
            "item_inspected"
        );
    }
}

fn sync_world(report: &FrameReport, world: &mut SceneWorld) {
    let avatar = world.avatar_mut();
    avatar.position = report.position;
    avatar.facing = report.facing;
    let camera = world.camera_mut();
    camera.position = report.camera_position;
    camera.look_at = report.camera_look_at;
}

impl Scene for WalkthroughScene {
    fn load(&mut self, world: &mut SceneWorld) {
        world.clear();
        let build = build_room(&self.content.layout, &self.content.catalog, world);

        let driver = FrameDriver::new(
            self.config.character_state(),
            self.config.camera_rig(),
            build.colliders,
            self.config.room_bounds(world.room_size()),
            self.config.driver_settings(),
        );
        let character = *driver.character();
        let avatar = world.avatar_mut();
        avatar.position = character.position;
        avatar.facing = character.facing;
        avatar.box_size = character.box_size;
        avatar.mesh = None;
        let camera = world.camera_mut();
        camera.position = driver.camera().position();
        camera.look_at = driver.camera().look_at(character.position);

        let orbit = matches!(driver.camera().mode(), CameraMode::Orbit(_));
        world.set_hint_lines(self.hint_lines(orbit));

        self.pending_model = if self.model_sources.is_empty() {
            PendingModel::resolved()
        } else {
            PendingModel::spawn(self.model_sources.clone(), self.config.model.target_height)
        };
        self.driver = Some(driver);
        self.last_report = None;

        info!(
            furniture = build.furniture_count,
            unknown_items = build.unknown_item_ids.len(),
            orbit,
            embed_host = self.config.embed_host,
            "walkthrough_ready"
        );
    }

    fn update(
        &mut self,
        dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand {
        if input.dismiss_pressed() {
            if world.close_detail_panel().is_none() {
                info!("quit_requested");
                return SceneCommand::Quit;
            }
            debug!("detail_panel_closed");
        }

        if let Some(click) = input.click_position_px() {
            self.handle_click(click, input.window_size(), world);
        }

        if let Some(driver) = self.driver.as_mut() {
            let report = driver.step(
                dt_seconds,
                FrameIntent {
                    direction: input.direction(),
                    view_adjusting: input.view_adjusting(),
                },
            );
            sync_world(&report, world);
            self.last_report = Some(report);
        }

        if let Some(mesh) = self.pending_model.poll() {
            world.avatar_mut().mesh = mesh;
        }

        SceneCommand::None
    }

    fn unload(&mut self, world: &mut SceneWorld) {
        self.driver = None;
        self.last_report = None;
        self.pending_model = PendingModel::resolved();
        world.clear();
        info!("walkthrough_unloaded");
    }

    fn debug_title(&self, world: &SceneWorld) -> Option<String> {
        let report = self.last_report.as_ref()?;
        let inspecting = world
            .detail_panel()
            .map(|panel| panel.item_id.as_str())
            .unwrap_or("-");
        Some(format!(
            "Room Walkthrough | pos ({:.2}, {:.2}) | facing {:.2} | {} | inspecting {}",
            report.position.x,
            report.position.z,
            report.facing,
            if report.view_adjusting {
                "orbiting"
            } else if report.moving {
                "moving"
            } else {
                "idle"
            },
            inspecting
        ))
    }
}
