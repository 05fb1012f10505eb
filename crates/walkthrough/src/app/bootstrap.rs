use std::path::PathBuf;

use engine::{
    load_room_content, resolve_app_paths, AppPaths, ContentLoadError, LoopConfig, Scene,
    StartupError,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{load_config, ConfigError, WalkthroughConfig, CONFIG_FILE_NAME};
use super::gameplay;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Content(#[from] ContentLoadError),
}

/// Resolves paths, reads config and both room documents. Any failure here
/// stops startup before a window exists.
pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Room Walkthrough Startup ===");

    let paths = resolve_app_paths()?;
    info!(root = %paths.root.display(), "app_paths_resolved");

    let mut config = load_config(&paths.config_dir.join(CONFIG_FILE_NAME))?;
    config.apply_env_overrides();

    let content = load_room_content(
        &paths.data_dir.join(&config.data.items),
        &paths.data_dir.join(&config.data.layout),
    )?;
    config.check_spawn(
        content.layout.room_size(),
        &gameplay::room_colliders(&content.layout),
    )?;
    let model_sources = model_source_paths(&paths, &config);
    let loop_config = loop_config_for(&config);
    let scene = gameplay::build_scene(content, config, model_sources);

    Ok(AppWiring {
        config: loop_config,
        scene,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn model_source_paths(paths: &AppPaths, config: &WalkthroughConfig) -> Vec<PathBuf> {
    config
        .model
        .sources
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| paths.models_dir.join(entry))
        .collect()
}

fn loop_config_for(config: &WalkthroughConfig) -> LoopConfig {
    LoopConfig {
        pad_travel_radius_px: config.pad_travel_radius_px,
        ..LoopConfig::default()
    }
}
