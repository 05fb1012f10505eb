use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub item_id: String,
    pub position: [f32; 3],
    pub size: [f32; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_y: Option<f32>,
}

impl LayoutItem {
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn size(&self) -> Vec3 {
        Vec3::from_array(self.size)
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomLayout {
    pub room_size: [f32; 3],
    #[serde(default)]
    pub items: Vec<LayoutItem>,
}

impl RoomLayout {
    pub fn room_size(&self) -> Vec3 {
        Vec3::from_array(self.room_size)
    }

    /// First problem found, as a human-readable reason.
    pub fn validate(&self) -> Result<(), String> {
        if !self.room_size().is_finite() || self.room_size().min_element() <= 0.0 {
            return Err(format!(
                "roomSize must be three positive numbers, got {:?}",
                self.room_size
            ));
        }
        for item in &self.items {
            if !item.position().is_finite() {
                return Err(format!("item '{}' has a non-finite position", item.id));
            }
            if !item.size().is_finite() || item.size().min_element() < 0.0 {
                return Err(format!(
                    "item '{}' size must be non-negative, got {:?}",
                    item.id, item.size
                ));
            }
            if !item.rotation_y().is_finite() {
                return Err(format!("item '{}' has a non-finite rotationY", item.id));
            }
        }
        Ok(())
    }
}
