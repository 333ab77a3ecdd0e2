use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::entities::{Item, ItemId};

/// Items the player counts as valuable, plus their locally edited prices.
///
/// Mutators return `true` when state actually changed so the host can persist
/// only on real transitions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSelections {
    #[serde(default)]
    checked: BTreeSet<ItemId>,
    #[serde(default)]
    custom_prices: BTreeMap<ItemId, u64>,
}

impl ItemSelections {
    pub fn toggle_item(&mut self, item_id: ItemId) -> bool {
        if !self.checked.remove(&item_id) {
            self.checked.insert(item_id);
        }
        true
    }

    pub fn check_all(&mut self, item_ids: impl IntoIterator<Item = ItemId>) -> bool {
        let next: BTreeSet<ItemId> = item_ids.into_iter().collect();
        if next == self.checked {
            return false;
        }
        self.checked = next;
        true
    }

    pub fn uncheck_all(&mut self) -> bool {
        if self.checked.is_empty() {
            return false;
        }
        self.checked.clear();
        true
    }

    /// Negative prices are refused and leave the state untouched.
    pub fn set_custom_price(&mut self, item_id: ItemId, price: i64) -> bool {
        let Ok(price) = u64::try_from(price) else {
            tracing::debug!(item_id, price, "rejected negative custom price");
            return false;
        };
        self.custom_prices.insert(item_id, price) != Some(price)
    }

    pub fn reset_custom_price(&mut self, item_id: ItemId) -> bool {
        self.custom_prices.remove(&item_id).is_some()
    }

    pub fn reset_all_custom_prices(&mut self) -> bool {
        if self.custom_prices.is_empty() {
            return false;
        }
        self.custom_prices.clear();
        true
    }

    pub fn is_checked(&self, item_id: ItemId) -> bool {
        self.checked.contains(&item_id)
    }

    pub fn custom_price(&self, item_id: ItemId) -> Option<u64> {
        self.custom_prices.get(&item_id).copied()
    }

    /// True when an override exists and differs from the catalog base price.
    pub fn is_overridden(&self, item: &Item) -> bool {
        self.custom_price(item.id)
            .map(|price| price != item.ruby)
            .unwrap_or(false)
    }

    pub fn checked(&self) -> &BTreeSet<ItemId> {
        &self.checked
    }

    pub fn custom_prices(&self) -> &BTreeMap<ItemId, u64> {
        &self.custom_prices
    }

    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }
}

/// Parses a price typed by the user. Anything that is not a non-negative integer is refused.
pub fn parse_price_input(input: &str) -> Option<i64> {
    input
        .trim()
        .replace(',', "")
        .parse::<i64>()
        .ok()
        .filter(|price| *price >= 0)
}
