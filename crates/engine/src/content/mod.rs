mod catalog;
mod layout;
mod loader;
mod mesh;

pub use catalog::{ItemCatalog, ItemDetail};
pub use layout::{LayoutItem, RoomLayout};
pub use loader::{
    load_item_catalog, load_room_content, load_room_layout, ContentLoadError, RoomContent,
};
pub use mesh::{load_wire_mesh, parse_obj, MeshLoadError, ObjSyntaxError, WireMesh};
