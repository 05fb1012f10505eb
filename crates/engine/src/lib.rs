use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod content;
pub mod sim;

pub use app::{
    run_app, AppError, Avatar, Camera3D, DetailPanel, DetailPanelLayout, DeviceEvent,
    DirectionalPad, InputAction, InputDevice, InputSnapshot, LoopConfig, LoopMetricsSnapshot,
    PointerId, Prop, PropId, PropKind, Renderer, Scene, SceneCommand, SceneWorld, Viewport,
    SLOW_FRAME_ENV_VAR,
};
pub use content::{
    load_item_catalog, load_room_content, load_room_layout, load_wire_mesh, ContentLoadError,
    ItemCatalog, ItemDetail, LayoutItem, MeshLoadError, RoomContent, RoomLayout, WireMesh,
};

pub const ROOT_ENV_VAR: &str = "ROOMWALK_ROOT";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
    pub data_dir: PathBuf,
    pub models_dir: PathBuf,
    pub config_dir: PathBuf,
}

impl AppPaths {
    pub fn under_root(root: PathBuf) -> Self {
        let assets_dir = root.join("assets");
        Self {
            data_dir: assets_dir.join("data"),
            models_dir: assets_dir.join("models"),
            config_dir: assets_dir.join("config"),
            assets_dir,
            root,
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("{var} could not be read: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("executable location unavailable: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("executable {0} has no containing directory")]
    ExeHasNoParent(PathBuf),
    #[error(
        "{env_var}={path} is not a project root (expected Cargo.toml next to crates/ or assets/)"
    )]
    InvalidEnvRoot {
        path: PathBuf,
        env_var: &'static str,
    },
    #[error(
        "no project root above {start_dir} (expected Cargo.toml next to crates/ or assets/); \
set {env_var} to the checkout directory"
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

/// Project root from `ROOMWALK_ROOT`, or the nearest ancestor of the
/// executable that looks like a checkout.
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = match root_from_env()? {
        Some(root) => root,
        None => root_from_exe()?,
    };
    Ok(AppPaths::under_root(root))
}

fn root_from_env() -> Result<Option<PathBuf>, StartupError> {
    let raw = match env::var(ROOT_ENV_VAR) {
        Ok(raw) => raw,
        Err(env::VarError::NotPresent) => return Ok(None),
        Err(source) => {
            return Err(StartupError::EnvVar {
                var: ROOT_ENV_VAR,
                source,
            })
        }
    };
    let path = normalize_path(Path::new(&raw));
    if is_repo_marker(&path) {
        Ok(Some(path))
    } else {
        Err(StartupError::InvalidEnvRoot {
            path,
            env_var: ROOT_ENV_VAR,
        })
    }
}

fn root_from_exe() -> Result<PathBuf, StartupError> {
    let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
    let Some(exe_dir) = exe.parent() else {
        return Err(StartupError::ExeHasNoParent(exe.clone()));
    };
    find_root_above(exe_dir).ok_or_else(|| StartupError::RootNotFound {
        start_dir: normalize_path(exe_dir),
        env_var: ROOT_ENV_VAR,
    })
}

fn find_root_above(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .find(|candidate| is_repo_marker(candidate))
        .map(normalize_path)
}

fn is_repo_marker(path: &Path) -> bool {
    path.join("Cargo.toml").is_file()
        && (path.join("crates").is_dir() || path.join("assets").is_dir())
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
