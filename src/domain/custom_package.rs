use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use super::entities::{Catalog, ItemId, Package, PackageItem, PackageKey};

const UNKNOWN_ITEM_NAME: &str = "Unknown item";

/// A package the player assembled locally to compare against the shop's offers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomPackage {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub items: Vec<DraftLine>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLine {
    pub item_id: ItemId,
    pub quantity: u32,
}

impl CustomPackage {
    /// Resolves display data through the current catalog so it can be valued like any package.
    pub fn to_package(&self, catalog: &Catalog) -> Package {
        Package {
            key: PackageKey::Custom(self.id),
            name: self.name.clone(),
            price: self.price,
            items: package_lines(&self.items, catalog),
        }
    }
}

fn package_lines(lines: &[DraftLine], catalog: &Catalog) -> Vec<PackageItem> {
    lines
        .iter()
        .map(|line| {
            let (item_name, img_url) = catalog
                .get(line.item_id)
                .map(|item| (item.name.clone(), item.img_url.clone()))
                .unwrap_or_else(|| (UNKNOWN_ITEM_NAME.to_string(), String::new()));
            PackageItem {
                item_id: line.item_id,
                item_name,
                img_url,
                quantity: line.quantity,
            }
        })
        .collect()
}

fn parse_package_price(input: &str) -> Option<f64> {
    input
        .trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price > 0.0)
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("enter a package name")]
    EmptyName,
    #[error("enter a valid package price")]
    InvalidPrice,
    #[error("add at least one item")]
    NoItems,
}

/// Form state for a custom package being assembled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomPackageDraft {
    pub name: String,
    pub price_input: String,
    items: Vec<DraftLine>,
}

impl CustomPackageDraft {
    pub fn new(name: impl Into<String>, price_input: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price_input: price_input.into(),
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[DraftLine] {
        &self.items
    }

    pub fn contains(&self, item_id: ItemId) -> bool {
        self.items.iter().any(|line| line.item_id == item_id)
    }

    /// Adds one unit of an item; an item already in the draft is left alone.
    pub fn add_item(&mut self, item_id: ItemId) -> bool {
        if self.contains(item_id) {
            return false;
        }
        self.items.push(DraftLine {
            item_id,
            quantity: 1,
        });
        true
    }

    pub fn increment(&mut self, item_id: ItemId) {
        if let Some(line) = self.line_mut(item_id) {
            line.quantity = line.quantity.saturating_add(1);
        }
    }

    /// Never drops below one; use `remove_item` to take a line out.
    pub fn decrement(&mut self, item_id: ItemId) {
        if let Some(line) = self.line_mut(item_id) {
            line.quantity = line.quantity.saturating_sub(1).max(1);
        }
    }

    pub fn remove_item(&mut self, item_id: ItemId) {
        self.items.retain(|line| line.item_id != item_id);
    }

    /// The draft as it would be valued once saved. An unparsable price
    /// becomes NaN, which the engine reports as not applicable.
    pub fn preview_package(&self, catalog: &Catalog) -> Package {
        Package {
            key: PackageKey::Custom(Uuid::nil()),
            name: self.name.trim().to_string(),
            price: parse_package_price(&self.price_input).unwrap_or(f64::NAN),
            items: package_lines(&self.items, catalog),
        }
    }

    pub fn validate(&self) -> Result<CustomPackage, DraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DraftError::EmptyName);
        }
        let price = parse_package_price(&self.price_input).ok_or(DraftError::InvalidPrice)?;
        if self.items.is_empty() {
            return Err(DraftError::NoItems);
        }

        Ok(CustomPackage {
            id: Uuid::new_v4(),
            name: name.to_string(),
            price,
            items: self.items.clone(),
            created_at: OffsetDateTime::now_utc(),
        })
    }

    fn line_mut(&mut self, item_id: ItemId) -> Option<&mut DraftLine> {
        self.items.iter_mut().find(|line| line.item_id == item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Item;
    use crate::domain::selection::ItemSelections;
    use crate::domain::valuation::{assess_package, EfficiencyStatus, ValuationConfig};

    fn catalog() -> Catalog {
        Catalog::new(vec![Item {
            id: 1,
            name: "Gem pouch".to_string(),
            ruby: 30,
            img_url: "gem.png".to_string(),
        }])
    }

    fn filled_draft() -> CustomPackageDraft {
        let mut draft = CustomPackageDraft::new("  Weekly bundle ", "1,500");
        draft.add_item(1);
        draft
    }

    #[test]
    fn validate_reports_first_problem() {
        let mut draft = CustomPackageDraft::default();
        assert_eq!(draft.validate(), Err(DraftError::EmptyName));
        draft.name = "Bundle".to_string();
        draft.price_input = "free".to_string();
        assert_eq!(draft.validate(), Err(DraftError::InvalidPrice));
        draft.price_input = "0".to_string();
        assert_eq!(draft.validate(), Err(DraftError::InvalidPrice));
        draft.price_input = "10".to_string();
        assert_eq!(draft.validate(), Err(DraftError::NoItems));
    }

    #[test]
    fn validate_builds_package() {
        let package = filled_draft().validate().unwrap();
        assert_eq!(package.name, "Weekly bundle");
        assert_eq!(package.price, 1500.0);
        assert_eq!(package.items, vec![DraftLine { item_id: 1, quantity: 1 }]);
    }

    #[test]
    fn quantities_stay_positive() {
        let mut draft = filled_draft();
        assert!(!draft.add_item(1));
        draft.increment(1);
        draft.increment(1);
        assert_eq!(draft.items()[0].quantity, 3);
        for _ in 0..5 {
            draft.decrement(1);
        }
        assert_eq!(draft.items()[0].quantity, 1);
        draft.remove_item(1);
        assert!(draft.items().is_empty());
    }

    #[test]
    fn to_package_resolves_unknown_items() {
        let mut draft = filled_draft();
        draft.add_item(77);
        draft.increment(1);

        let package = draft.validate().unwrap().to_package(&catalog());
        assert!(package.key.is_custom());
        assert_eq!(package.items[0].item_name, "Gem pouch");
        assert_eq!(package.items[0].quantity, 2);
        assert_eq!(package.items[1].item_name, UNKNOWN_ITEM_NAME);
    }

    #[test]
    fn preview_matches_saved_package() {
        let catalog = Catalog::new(vec![Item {
            id: 1,
            name: "Gem".to_string(),
            ruby: 100,
            img_url: String::new(),
        }]);
        let mut selections = ItemSelections::default();
        selections.toggle_item(1);
        selections.set_custom_price(1, 10);
        let config = ValuationConfig::default();
        let mut draft = CustomPackageDraft::new("Cheap gems", "900");
        draft.add_item(1);

        let preview = assess_package(
            &draft.preview_package(&catalog),
            &catalog,
            &selections,
            &config,
        );
        let saved = draft.validate().unwrap().to_package(&catalog);
        let card = assess_package(&saved, &catalog, &selections, &config);

        assert_eq!(preview.status, card.status);
        assert_eq!(preview.valuation.total_intrinsic_value, 10);
        assert_eq!(card.efficiency().unwrap().percent_display(), "-91.7%");
    }

    #[test]
    fn preview_without_checked_lines_is_not_evaluable() {
        let mut draft = CustomPackageDraft::new("Bundle", "100");
        draft.add_item(1);
        let preview = assess_package(
            &draft.preview_package(&catalog()),
            &catalog(),
            &ItemSelections::default(),
            &ValuationConfig::default(),
        );
        assert_eq!(preview.status, EfficiencyStatus::NotEvaluable);
    }

    #[test]
    fn preview_with_bad_price_is_not_applicable() {
        let mut draft = CustomPackageDraft::new("Bundle", "soon");
        draft.add_item(1);
        let mut selections = ItemSelections::default();
        selections.toggle_item(1);
        let preview = assess_package(
            &draft.preview_package(&catalog()),
            &catalog(),
            &selections,
            &ValuationConfig::default(),
        );
        assert_eq!(preview.status, EfficiencyStatus::NotApplicable);
    }

    #[test]
    fn custom_package_serde_round_trip() {
        let package = filled_draft().validate().unwrap();
        let json = serde_json::to_string(&package).unwrap();
        let restored: CustomPackage = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.id, package.id);
        assert_eq!(restored.items, package.items);
        assert_eq!(restored.created_at.unix_timestamp(), package.created_at.unix_timestamp());
    }
}
