use engine::sim::ColliderSet;
use engine::{ItemCatalog, PropKind, RoomLayout, SceneWorld};
use glam::Vec3;
use tracing::{info, warn};

pub(crate) const WALL_THICKNESS: f32 = 0.3;
pub(crate) const WALL_COLOR: [u8; 4] = rgba(0xe2e8f0);
const DEFAULT_FURNITURE_COLOR: [u8; 4] = rgba(0x94a3b8);

const fn rgba(hex: u32) -> [u8; 4] {
    [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8, 0xff]
}

pub(crate) fn furniture_color(kind: &str) -> [u8; 4] {
    match kind {
        "bed" => rgba(0xfbbf24),
        "desk" => rgba(0x60a5fa),
        "chair" => rgba(0xa78bfa),
        "fridge" => rgba(0xf87171),
        "shelf" => rgba(0x34d399),
        _ => DEFAULT_FURNITURE_COLOR,
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RoomBuild {
    pub(crate) colliders: ColliderSet,
    pub(crate) furniture_count: usize,
    pub(crate) unknown_item_ids: Vec<String>,
}

/// Spawns furniture then the four walls into `world`. Colliders keep that
/// order: one world-space box per furniture piece, then one per wall.
pub(crate) fn build_room(
    layout: &RoomLayout,
    catalog: &ItemCatalog,
    world: &mut SceneWorld,
) -> RoomBuild {
    let mut unknown_item_ids = Vec::new();
    for item in &layout.items {
        if !catalog.contains(&item.item_id) {
            warn!(
                layout_id = %item.id,
                item_id = %item.item_id,
                "layout_item_not_in_catalog"
            );
            unknown_item_ids.push(item.item_id.clone());
        }
    }

    spawn_room_props(layout, world);
    let colliders: ColliderSet = world.props().iter().map(|prop| prop.world_aabb()).collect();
    info!(
        furniture = layout.items.len(),
        colliders = colliders.len(),
        unknown_items = unknown_item_ids.len(),
        "room_built"
    );
    RoomBuild {
        colliders,
        furniture_count: layout.items.len(),
        unknown_item_ids,
    }
}

/// Colliders `build_room` would produce, without a live world.
pub(crate) fn room_colliders(layout: &RoomLayout) -> ColliderSet {
    let mut scratch = SceneWorld::default();
    spawn_room_props(layout, &mut scratch);
    scratch.props().iter().map(|prop| prop.world_aabb()).collect()
}

fn spawn_room_props(layout: &RoomLayout, world: &mut SceneWorld) {
    let room_size = layout.room_size();
    world.set_room_size(room_size);
    for item in &layout.items {
        world.spawn_prop(
            PropKind::Furniture,
            item.position(),
            item.size(),
            item.rotation_y(),
            furniture_color(&item.kind),
            Some(item.item_id.clone()),
        );
    }
    for (center, size) in wall_boxes(room_size) {
        world.spawn_prop(PropKind::Wall, center, size, 0.0, WALL_COLOR, None);
    }
}

/// Centre and size of the back, front, left and right walls.
fn wall_boxes(room_size: Vec3) -> [(Vec3, Vec3); 4] {
    let height = room_size.y;
    let half_y = height * 0.5;
    let along_x = Vec3::new(room_size.x, height, WALL_THICKNESS);
    let along_z = Vec3::new(WALL_THICKNESS, height, room_size.z);
    [
        (Vec3::new(0.0, half_y, -room_size.z * 0.5), along_x),
        (Vec3::new(0.0, half_y, room_size.z * 0.5), along_x),
        (Vec3::new(-room_size.x * 0.5, half_y, 0.0), along_z),
        (Vec3::new(room_size.x * 0.5, half_y, 0.0), along_z),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{ItemDetail, LayoutItem};
    use std::f32::consts::FRAC_PI_2;

    fn layout_item(id: &str, kind: &str, item_id: &str, rotation_y: Option<f32>) -> LayoutItem {
        LayoutItem {
            id: id.to_string(),
            kind: kind.to_string(),
            item_id: item_id.to_string(),
            position: [2.0, 0.5, -1.0],
            size: [2.0, 1.0, 1.0],
            rotation_y,
        }
    }

    fn catalog() -> ItemCatalog {
        ItemCatalog::from_items(vec![ItemDetail {
            id: "item-bed".to_string(),
            name: "Bed".to_string(),
            description: "A bed.".to_string(),
            category: "Bedroom".to_string(),
        }])
    }

    fn layout(items: Vec<LayoutItem>) -> RoomLayout {
        RoomLayout {
            room_size: [10.0, 3.0, 8.0],
            items,
        }
    }

    #[test]
    fn walls_follow_furniture_in_collider_order() {
        let mut world = SceneWorld::default();
        let build = build_room(
            &layout(vec![layout_item("bed-1", "bed", "item-bed", None)]),
            &catalog(),
            &mut world,
        );
        assert_eq!(build.colliders.len(), 5);
        assert_eq!(build.furniture_count, 1);
        assert_eq!(world.prop_count(), 5);
        assert_eq!(world.props()[0].kind, PropKind::Furniture);
        assert!(world.props()[1..].iter().all(|prop| prop.kind == PropKind::Wall));

        let first = build.colliders.boxes()[0];
        assert!(first.min.abs_diff_eq(Vec3::new(1.0, 0.0, -1.5), 1e-5));
        assert!(first.max.abs_diff_eq(Vec3::new(3.0, 1.0, -0.5), 1e-5));
    }

    #[test]
    fn walls_sit_on_room_edges() {
        let mut world = SceneWorld::default();
        let build = build_room(&layout(Vec::new()), &catalog(), &mut world);
        let boxes = build.colliders.boxes();
        assert_eq!(boxes.len(), 4);
        assert!((boxes[0].center().z + 4.0).abs() < 1e-5);
        assert!((boxes[0].size().z - WALL_THICKNESS).abs() < 1e-5);
        assert!((boxes[0].size().y - 3.0).abs() < 1e-5);
        assert!((boxes[3].center().x - 5.0).abs() < 1e-5);
        assert!((boxes[3].size().z - 8.0).abs() < 1e-5);
        assert_eq!(world.room_size(), Vec3::new(10.0, 3.0, 8.0));
    }

    #[test]
    fn rotated_furniture_collider_encloses_turned_box() {
        let mut world = SceneWorld::default();
        let build = build_room(
            &layout(vec![layout_item("bed-1", "bed", "item-bed", Some(FRAC_PI_2))]),
            &catalog(),
            &mut world,
        );
        let size = build.colliders.boxes()[0].size();
        assert!((size.x - 1.0).abs() < 1e-4, "{size:?}");
        assert!((size.z - 2.0).abs() < 1e-4, "{size:?}");
    }

    #[test]
    fn unknown_catalog_ids_are_kept_and_reported() {
        let mut world = SceneWorld::default();
        let build = build_room(
            &layout(vec![
                layout_item("bed-1", "bed", "item-bed", None),
                layout_item("lamp-1", "lamp", "item-lamp", None),
            ]),
            &catalog(),
            &mut world,
        );
        assert_eq!(build.unknown_item_ids, vec!["item-lamp".to_string()]);
        assert_eq!(build.furniture_count, 2);
        assert_eq!(world.props()[1].color, DEFAULT_FURNITURE_COLOR);
        assert_eq!(world.props()[1].item_id.as_deref(), Some("item-lamp"));
    }

    #[test]
    fn scratch_colliders_match_built_room() {
        let layout = layout(vec![
            layout_item("bed-1", "bed", "item-bed", Some(0.4)),
            layout_item("lamp-1", "lamp", "item-lamp", None),
        ]);
        let mut world = SceneWorld::default();
        let build = build_room(&layout, &catalog(), &mut world);
        assert_eq!(room_colliders(&layout).boxes(), build.colliders.boxes());
    }

    #[test]
    fn furniture_colors_by_type() {
        assert_eq!(furniture_color("bed"), [0xfb, 0xbf, 0x24, 0xff]);
        assert_eq!(furniture_color("shelf"), [0x34, 0xd3, 0x99, 0xff]);
        assert_eq!(furniture_color("sofa"), DEFAULT_FURNITURE_COLOR);
        assert_eq!(WALL_COLOR, [0xe2, 0xe8, 0xf0, 0xff]);
    }
}
