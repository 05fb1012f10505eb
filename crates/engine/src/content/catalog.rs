use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetail {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
}

/// Item records keyed by id. When ids repeat, the later record wins.
#[derive(Debug, Default, Clone)]
pub struct ItemCatalog {
    items: Vec<ItemDetail>,
    index_by_id: HashMap<String, usize>,
}

impl ItemCatalog {
    pub fn from_items(items: Vec<ItemDetail>) -> Self {
        let mut index_by_id = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            index_by_id.insert(item.id.clone(), idx);
        }
        Self { items, index_by_id }
    }

    pub fn get(&self, id: &str) -> Option<&ItemDetail> {
        self.index_by_id
            .get(id)
            .and_then(|idx| self.items.get(*idx))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.index_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_by_id.is_empty()
    }

    pub fn items(&self) -> &[ItemDetail] {
        &self.items
    }
}
