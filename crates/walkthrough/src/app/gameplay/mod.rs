use std::path::PathBuf;

use engine::{RoomContent, Scene};

use super::config::WalkthroughConfig;

mod inspect;
mod model_loader;
mod room;
mod scene_impl;

use inspect::LoggingHostBridge;
use scene_impl::WalkthroughScene;

pub(crate) use room::room_colliders;

pub(crate) fn build_scene(
    content: RoomContent,
    config: WalkthroughConfig,
    model_sources: Vec<PathBuf>,
) -> Box<dyn Scene> {
    Box::new(WalkthroughScene::new(
        content,
        config,
        model_sources,
        Box::new(LoggingHostBridge),
    ))
}
