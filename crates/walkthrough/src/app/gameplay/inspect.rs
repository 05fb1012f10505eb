use engine::{DetailPanel, ItemDetail, SceneWorld};
use serde::Serialize;
use tracing::{info, warn};

pub(crate) const DETAIL_ROUTE: &str = "/pages/itemDetail/index";

/// Messages posted to whatever hosts the walkthrough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub(crate) enum HostMessage {
    #[serde(rename = "itemDetailOpen", rename_all = "camelCase")]
    ItemDetailOpen { item_id: String },
}

pub(crate) trait HostBridge {
    fn post_message(&mut self, message: &HostMessage);
    fn navigate_to(&mut self, route: &str);
}

/// Default bridge for a standalone window: both calls only log.
#[derive(Debug, Default)]
pub(crate) struct LoggingHostBridge;

impl HostBridge for LoggingHostBridge {
    fn post_message(&mut self, message: &HostMessage) {
        match serde_json::to_string(message) {
            Ok(payload) => info!(payload = %payload, "host_message_posted"),
            Err(error) => warn!(error = %error, "host_message_encode_failed"),
        }
    }

    fn navigate_to(&mut self, route: &str) {
        info!(route, "host_navigation_requested");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InspectOutcome {
    PanelOpened,
    Navigated,
}

pub(crate) fn detail_route(item_id: &str) -> String {
    format!("{DETAIL_ROUTE}?itemId={}", urlencoding::encode(item_id))
}

pub(crate) fn detail_panel_for(item: &ItemDetail) -> DetailPanel {
    DetailPanel {
        item_id: item.id.clone(),
        title: item.name.clone(),
        description: item.description.clone(),
        meta: format!("Category: {} | ID: {}", item.category, item.id),
    }
}

/// Announces the item to the host, then either hands navigation to an
/// embedding host or opens the in-window detail panel.
pub(crate) fn open_item_detail(
    item: &ItemDetail,
    embed_host: bool,
    bridge: &mut dyn HostBridge,
    world: &mut SceneWorld,
) -> InspectOutcome {
    bridge.post_message(&HostMessage::ItemDetailOpen {
        item_id: item.id.clone(),
    });

    if embed_host {
        bridge.navigate_to(&detail_route(&item.id));
        return InspectOutcome::Navigated;
    }

    world.open_detail_panel(detail_panel_for(item));
    InspectOutcome::PanelOpened
}
