use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

use super::catalog::{ItemCatalog, ItemDetail};
use super::layout::RoomLayout;

#[derive(Debug, Error)]
pub enum ContentLoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path} at {at}: {source}")]
    Parse {
        path: PathBuf,
        at: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid document {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Catalog and layout documents, loaded together before the scene is built.
#[derive(Debug, Clone)]
pub struct RoomContent {
    pub catalog: ItemCatalog,
    pub layout: RoomLayout,
}

pub fn load_room_content(
    catalog_path: &Path,
    layout_path: &Path,
) -> Result<RoomContent, ContentLoadError> {
    let catalog = load_item_catalog(catalog_path)?;
    let layout = load_room_layout(layout_path)?;
    info!(
        catalog_items = catalog.len(),
        layout_items = layout.items.len(),
        "room_content_loaded"
    );
    Ok(RoomContent { catalog, layout })
}

/// The overlay font covers printable ASCII only. Items with other text still
/// load; those characters draw as `?` and a warning names the fields.
pub fn load_item_catalog(path: &Path) -> Result<ItemCatalog, ContentLoadError> {
    let items: Vec<ItemDetail> = read_json(path)?;
    if let Some(item) = items.iter().find(|item| item.id.trim().is_empty()) {
        return Err(ContentLoadError::Invalid {
            path: path.to_path_buf(),
            reason: format!("item '{}' has an empty id", item.name),
        });
    }
    for item in &items {
        let fields = unrenderable_fields(item);
        if !fields.is_empty() {
            warn!(
                path = %path.display(),
                item_id = %item.id,
                fields = ?fields,
                "catalog_text_not_renderable"
            );
        }
    }
    Ok(ItemCatalog::from_items(items))
}

fn unrenderable_fields(item: &ItemDetail) -> Vec<&'static str> {
    [
        ("name", &item.name),
        ("description", &item.description),
        ("category", &item.category),
        ("id", &item.id),
    ]
    .into_iter()
    .filter(|(_, text)| !text.chars().all(|ch| ch.is_ascii_whitespace() || ch.is_ascii_graphic()))
    .map(|(field, _)| field)
    .collect()
}

pub fn load_room_layout(path: &Path) -> Result<RoomLayout, ContentLoadError> {
    let layout: RoomLayout = read_json(path)?;
    layout
        .validate()
        .map_err(|reason| ContentLoadError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
    Ok(layout)
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ContentLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| ContentLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
        let at = error.path().to_string();
        ContentLoadError::Parse {
            path: path.to_path_buf(),
            at,
            source: error.into_inner(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).expect("write");
        path
    }

    const CATALOG: &str = r#"[
        {"id": "bed-01", "name": "Oak Bed", "description": "Double bed", "category": "bedroom"},
        {"id": "desk-01", "name": "Desk", "description": "Writing desk", "category": "office"}
    ]"#;

    const LAYOUT: &str = r#"{
        "roomSize": [10, 3, 10],
        "items": [
            {"id": "l-bed", "type": "bed", "itemId": "bed-01",
             "position": [-3, 0.3, -3], "size": [2, 0.6, 2.2]}
        ]
    }"#;

    #[test]
    fn loads_both_documents() {
        let dir = TempDir::new().expect("temp");
        let catalog = write(&dir, "items.json", CATALOG);
        let layout = write(&dir, "room_layout.json", LAYOUT);
        let content = load_room_content(&catalog, &layout).expect("content");
        assert_eq!(content.catalog.len(), 2);
        assert_eq!(content.layout.items.len(), 1);
        assert!(content.catalog.contains("bed-01"));
    }

    #[test]
    fn non_ascii_catalog_text_loads_and_is_flagged() {
        let dir = TempDir::new().expect("temp");
        let catalog = write(
            &dir,
            "items.json",
            r#"[{"id": "bed-01", "name": "\u5e8a", "description": "Wide\nbed",
                "category": "\u5367\u5ba4"}]"#,
        );
        let catalog = load_item_catalog(&catalog).expect("catalog");
        let item = catalog.get("bed-01").expect("bed");
        assert_eq!(item.name, "\u{5e8a}");
        assert_eq!(unrenderable_fields(item), vec!["name", "category"]);
    }

    #[test]
    fn ascii_catalog_text_is_not_flagged() {
        let item = ItemDetail {
            id: "desk-01".to_string(),
            name: "Desk".to_string(),
            description: "Writing desk, 1.2m ~ oak".to_string(),
            category: "office".to_string(),
        };
        assert!(unrenderable_fields(&item).is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = TempDir::new().expect("temp");
        let missing = dir.path().join("nope.json");
        let error = load_item_catalog(&missing).expect_err("missing");
        assert!(matches!(error, ContentLoadError::Read { .. }));
        assert!(error.to_string().contains("nope.json"));
    }

    #[test]
    fn parse_error_names_the_failing_field() {
        let dir = TempDir::new().expect("temp");
        let layout = write(
            &dir,
            "room_layout.json",
            r#"{"roomSize": [10, 3, 10], "items": [{"id": "x", "type": "bed", "itemId": "b",
                "position": [0, 0, "zero"], "size": [1, 1, 1]}]}"#,
        );
        let error = load_room_layout(&layout).expect_err("bad field");
        match error {
            ContentLoadError::Parse { at, .. } => {
                assert!(at.starts_with("items[0].position"), "{at}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_room_size_is_rejected() {
        let dir = TempDir::new().expect("temp");
        let layout = write(&dir, "room_layout.json", r#"{"roomSize": [10, 3, -1]}"#);
        let error = load_room_layout(&layout).expect_err("invalid");
        assert!(matches!(error, ContentLoadError::Invalid { .. }));
    }

    #[test]
    fn empty_item_id_is_rejected() {
        let dir = TempDir::new().expect("temp");
        let catalog = write(
            &dir,
            "items.json",
            r#"[{"id": " ", "name": "Ghost", "description": "", "category": ""}]"#,
        );
        let error = load_item_catalog(&catalog).expect_err("invalid");
        assert!(error.to_string().contains("Ghost"));
    }
}
