use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Identifier for items returned by the shop backend.
pub type ItemId = u64;

/// A purchasable in-game item with its base ruby value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub ruby: u64,
    pub img_url: String,
}

/// The item catalog as last fetched. Replaced wholesale on every refresh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
}

impl Catalog {
    /// Builds a catalog, keeping the first occurrence of any repeated id.
    pub fn new(items: Vec<Item>) -> Self {
        let mut kept = Vec::with_capacity(items.len());
        let mut index = HashMap::with_capacity(items.len());
        for item in items {
            if index.contains_key(&item.id) {
                tracing::warn!(item_id = item.id, "duplicate item id in catalog; keeping first");
                continue;
            }
            index.insert(item.id, kept.len());
            kept.push(item);
        }
        Self { items: kept, index }
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.index.get(&id).map(|&pos| &self.items[pos])
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().map(|item| item.id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One line of a package: an item reference and how many of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackageItem {
    pub item_id: ItemId,
    /// Display snapshot from the package payload, used when the catalog lacks the item.
    pub item_name: String,
    pub img_url: String,
    pub quantity: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PackageKey {
    Server(u64),
    Custom(Uuid),
}

impl PackageKey {
    pub fn is_custom(&self) -> bool {
        matches!(self, PackageKey::Custom(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Package {
    pub key: PackageKey,
    pub name: String,
    /// Asking price in real-world currency units.
    pub price: f64,
    pub items: Vec<PackageItem>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PackageList {
    pub last_updated_at: Option<OffsetDateTime>,
    pub packages: Vec<Package>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: ItemId, ruby: u64) -> Item {
        Item {
            id,
            name: format!("item-{id}"),
            ruby,
            img_url: String::new(),
        }
    }

    #[test]
    fn catalog_lookup_by_id() {
        let catalog = Catalog::new(vec![item(1, 100), item(2, 50)]);
        assert_eq!(catalog.get(2).map(|i| i.ruby), Some(50));
        assert!(catalog.get(3).is_none());
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn catalog_keeps_first_duplicate() {
        let catalog = Catalog::new(vec![item(1, 100), item(1, 999), item(2, 50)]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).map(|i| i.ruby), Some(100));
    }
}
