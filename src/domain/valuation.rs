//! Package valuation: price resolution, checked-item value and efficiency.
//!
//! Every surface that shows a price or an efficiency goes through this module
//! so the grid, the detail modal and the checklist always agree.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::entities::{Catalog, ItemId, Package, PackageItem};
use super::selection::ItemSelections;

/// Ruby-to-cash conversion used when no other value is configured.
pub const DEFAULT_CASH_MULTIPLIER: f64 = 7.5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValuationConfig {
    pub cash_multiplier: f64,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            cash_multiplier: DEFAULT_CASH_MULTIPLIER,
        }
    }
}

impl ValuationConfig {
    pub fn is_valid_multiplier(value: f64) -> bool {
        value.is_finite() && value > 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceSource {
    Override,
    Catalog,
    /// Not in the catalog; priced at zero and worth a data-integrity warning.
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceResolution {
    pub price: u64,
    pub source: PriceSource,
}

pub fn resolve_unit_price(
    item_id: ItemId,
    catalog: &Catalog,
    overrides: &BTreeMap<ItemId, u64>,
) -> PriceResolution {
    if let Some(&price) = overrides.get(&item_id) {
        return PriceResolution {
            price,
            source: PriceSource::Override,
        };
    }
    match catalog.get(item_id) {
        Some(item) => PriceResolution {
            price: item.ruby,
            source: PriceSource::Catalog,
        },
        None => PriceResolution {
            price: 0,
            source: PriceSource::Unknown,
        },
    }
}

/// Override if present, else catalog base price, else zero.
pub fn effective_unit_price(
    item_id: ItemId,
    catalog: &Catalog,
    overrides: &BTreeMap<ItemId, u64>,
) -> u64 {
    resolve_unit_price(item_id, catalog, overrides).price
}

#[derive(Clone, Debug, PartialEq)]
pub struct PackageValuation {
    pub checked_items: Vec<PackageItem>,
    pub total_intrinsic_value: u64,
    pub has_any_checked: bool,
    /// Checked package lines whose item is missing from the catalog.
    pub unknown_items: Vec<ItemId>,
}

pub fn value_package(
    package: &Package,
    catalog: &Catalog,
    checked: &BTreeSet<ItemId>,
    overrides: &BTreeMap<ItemId, u64>,
) -> PackageValuation {
    let mut checked_items = Vec::new();
    let mut unknown_items = Vec::new();
    let mut total = 0_u64;

    // Repeated item ids are summed as independent lines.
    for line in package.items.iter().filter(|line| checked.contains(&line.item_id)) {
        let resolution = resolve_unit_price(line.item_id, catalog, overrides);
        if resolution.source == PriceSource::Unknown && !unknown_items.contains(&line.item_id) {
            unknown_items.push(line.item_id);
        }
        total = total.saturating_add(resolution.price.saturating_mul(u64::from(line.quantity)));
        checked_items.push(line.clone());
    }

    PackageValuation {
        has_any_checked: !checked_items.is_empty(),
        checked_items,
        total_intrinsic_value: total,
        unknown_items,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Efficiency {
    pub cash_value: f64,
    pub is_profitable: bool,
    /// `cash_value / asking_price * 100`.
    pub ratio: f64,
    /// Signed deviation from break-even, `ratio - 100`.
    pub percent: f64,
    /// `cash_value - asking_price`.
    pub profit: f64,
}

impl Efficiency {
    pub fn percent_display(&self) -> String {
        format_signed_percent(self.percent)
    }
}

/// Cash equivalent of a ruby total; every surface converts through here.
pub fn cash_value(total_intrinsic_value: u64, cash_multiplier: f64) -> f64 {
    total_intrinsic_value as f64 * cash_multiplier
}

/// Returns `None` when efficiency is not applicable (non-positive or non-finite asking price).
pub fn compute_efficiency(
    total_intrinsic_value: u64,
    asking_price: f64,
    cash_multiplier: f64,
) -> Option<Efficiency> {
    if !asking_price.is_finite() || asking_price <= 0.0 {
        return None;
    }
    let cash_value = cash_value(total_intrinsic_value, cash_multiplier);
    if !cash_value.is_finite() {
        return None;
    }

    let ratio = cash_value / asking_price * 100.0;
    Some(Efficiency {
        cash_value,
        is_profitable: asking_price <= cash_value,
        ratio,
        percent: ratio - 100.0,
        profit: cash_value - asking_price,
    })
}

fn format_signed_percent(percent: f64) -> String {
    // Sign follows the unrounded value so a tiny loss never shows as "+0.0%".
    if percent >= 0.0 {
        format!("+{:.1}%", percent)
    } else {
        format!("-{:.1}%", percent.abs())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EfficiencyStatus {
    /// No package item is checked yet.
    NotEvaluable,
    /// Items are checked but the asking price cannot be compared against.
    NotApplicable,
    Evaluated(Efficiency),
}

#[derive(Clone, Debug, PartialEq)]
pub struct PackageAssessment {
    pub package: Package,
    pub valuation: PackageValuation,
    pub status: EfficiencyStatus,
}

impl PackageAssessment {
    pub fn efficiency(&self) -> Option<&Efficiency> {
        match &self.status {
            EfficiencyStatus::Evaluated(efficiency) => Some(efficiency),
            _ => None,
        }
    }

    pub fn cash_value(&self, config: &ValuationConfig) -> f64 {
        match &self.status {
            EfficiencyStatus::Evaluated(efficiency) => efficiency.cash_value,
            _ => cash_value(self.valuation.total_intrinsic_value, config.cash_multiplier),
        }
    }
}

pub fn assess_package(
    package: &Package,
    catalog: &Catalog,
    selections: &ItemSelections,
    config: &ValuationConfig,
) -> PackageAssessment {
    let valuation = value_package(
        package,
        catalog,
        selections.checked(),
        selections.custom_prices(),
    );
    let status = if !valuation.has_any_checked {
        EfficiencyStatus::NotEvaluable
    } else {
        match compute_efficiency(
            valuation.total_intrinsic_value,
            package.price,
            config.cash_multiplier,
        ) {
            Some(efficiency) => EfficiencyStatus::Evaluated(efficiency),
            None => EfficiencyStatus::NotApplicable,
        }
    };

    PackageAssessment {
        package: package.clone(),
        valuation,
        status,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PackageSort {
    #[default]
    Listed,
    Efficiency,
    PriceAscending,
    Name,
}

impl PackageSort {
    pub const ALL: [PackageSort; 4] = [
        PackageSort::Listed,
        PackageSort::Efficiency,
        PackageSort::PriceAscending,
        PackageSort::Name,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PackageSort::Listed => "Listed",
            PackageSort::Efficiency => "Efficiency",
            PackageSort::PriceAscending => "Price",
            PackageSort::Name => "Name",
        }
    }
}

/// Stable sort; for efficiency, evaluated packages come first (best first),
/// then not-applicable, then not-evaluable.
pub fn rank_packages(assessments: &mut [PackageAssessment], sort: PackageSort) {
    match sort {
        PackageSort::Listed => {}
        PackageSort::Efficiency => assessments.sort_by(|a, b| {
            status_rank(&a.status)
                .cmp(&status_rank(&b.status))
                .then_with(|| match (a.efficiency(), b.efficiency()) {
                    (Some(left), Some(right)) => right
                        .percent
                        .partial_cmp(&left.percent)
                        .unwrap_or(Ordering::Equal),
                    _ => Ordering::Equal,
                })
        }),
        PackageSort::PriceAscending => assessments.sort_by(|a, b| {
            a.package
                .price
                .partial_cmp(&b.package.price)
                .unwrap_or(Ordering::Equal)
        }),
        PackageSort::Name => assessments.sort_by(|a, b| {
            a.package
                .name
                .to_lowercase()
                .cmp(&b.package.name.to_lowercase())
        }),
    }
}

fn status_rank(status: &EfficiencyStatus) -> u8 {
    match status {
        EfficiencyStatus::Evaluated(_) => 0,
        EfficiencyStatus::NotApplicable => 1,
        EfficiencyStatus::NotEvaluable => 2,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectionTotals {
    pub checked_count: usize,
    pub total_ruby: u64,
    pub total_cash: f64,
}

/// Value of every checked catalog item, one unit each.
pub fn selection_totals(
    catalog: &Catalog,
    selections: &ItemSelections,
    config: &ValuationConfig,
) -> SelectionTotals {
    let mut checked_count = 0;
    let mut total_ruby = 0_u64;
    for item in catalog.items().iter().filter(|item| selections.is_checked(item.id)) {
        checked_count += 1;
        total_ruby = total_ruby.saturating_add(effective_unit_price(
            item.id,
            catalog,
            selections.custom_prices(),
        ));
    }

    SelectionTotals {
        checked_count,
        total_ruby,
        total_cash: cash_value(total_ruby, config.cash_multiplier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Item, PackageKey};

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Item {
                id: 1,
                name: "Ruby chest".to_string(),
                ruby: 100,
                img_url: String::new(),
            },
            Item {
                id: 2,
                name: "Stamina potion".to_string(),
                ruby: 50,
                img_url: String::new(),
            },
        ])
    }

    fn line(item_id: ItemId, quantity: u32) -> PackageItem {
        PackageItem {
            item_id,
            item_name: format!("item-{item_id}"),
            img_url: String::new(),
            quantity,
        }
    }

    fn package(price: f64, items: Vec<PackageItem>) -> Package {
        Package {
            key: PackageKey::Server(10),
            name: "Starter".to_string(),
            price,
            items,
        }
    }

    fn checked(ids: &[ItemId]) -> BTreeSet<ItemId> {
        ids.iter().copied().collect()
    }

    #[test]
    fn base_price_without_override() {
        let overrides = BTreeMap::new();
        assert_eq!(effective_unit_price(1, &catalog(), &overrides), 100);
        assert_eq!(effective_unit_price(2, &catalog(), &overrides), 50);
    }

    #[test]
    fn override_wins_over_base() {
        let overrides = BTreeMap::from([(1, 7), (2, 0)]);
        assert_eq!(effective_unit_price(1, &catalog(), &overrides), 7);
        assert_eq!(effective_unit_price(2, &catalog(), &overrides), 0);
    }

    #[test]
    fn reset_override_restores_catalog_price() {
        let mut selections = ItemSelections::default();
        let before = effective_unit_price(1, &catalog(), selections.custom_prices());
        assert_eq!(before, 100);

        selections.set_custom_price(1, 35);
        assert_eq!(effective_unit_price(1, &catalog(), selections.custom_prices()), 35);

        selections.reset_custom_price(1);
        assert_eq!(
            effective_unit_price(1, &catalog(), selections.custom_prices()),
            before
        );
    }

    #[test]
    fn assessment_cash_matches_efficiency() {
        let mut selections = ItemSelections::default();
        selections.check_all([1, 2]);
        let config = ValuationConfig::default();

        let evaluated = assess_package(
            &package(500.0, vec![line(1, 1), line(2, 2)]),
            &catalog(),
            &selections,
            &config,
        );
        let efficiency = evaluated.efficiency().cloned().unwrap();
        assert_eq!(evaluated.cash_value(&config), efficiency.cash_value);
        assert_eq!(efficiency.cash_value, cash_value(200, config.cash_multiplier));

        let free = assess_package(
            &package(0.0, vec![line(1, 1)]),
            &catalog(),
            &selections,
            &config,
        );
        assert_eq!(free.status, EfficiencyStatus::NotApplicable);
        assert_eq!(free.cash_value(&config), 750.0);
    }

    #[test]
    fn unknown_item_resolves_to_zero() {
        let resolution = resolve_unit_price(42, &catalog(), &BTreeMap::new());
        assert_eq!(resolution.price, 0);
        assert_eq!(resolution.source, PriceSource::Unknown);
    }

    #[test]
    fn empty_check_set_is_not_evaluable() {
        let pkg = package(900.0, vec![line(1, 2), line(2, 4)]);
        let valuation = value_package(&pkg, &catalog(), &BTreeSet::new(), &BTreeMap::new());
        assert_eq!(valuation.total_intrinsic_value, 0);
        assert!(!valuation.has_any_checked);

        let assessment = assess_package(
            &pkg,
            &catalog(),
            &ItemSelections::default(),
            &ValuationConfig::default(),
        );
        assert_eq!(assessment.status, EfficiencyStatus::NotEvaluable);
    }

    #[test]
    fn adding_to_check_set_never_decreases_value() {
        let pkg = package(900.0, vec![line(1, 2), line(2, 4), line(3, 1)]);
        let overrides = BTreeMap::from([(2, 0)]);
        let mut set = BTreeSet::new();
        let mut previous = 0;
        for id in [2, 3, 1] {
            set.insert(id);
            let total = value_package(&pkg, &catalog(), &set, &overrides).total_intrinsic_value;
            assert!(total >= previous);
            previous = total;
        }
    }

    #[test]
    fn break_even_counts_as_profitable() {
        let efficiency = compute_efficiency(100, 750.0, 7.5).unwrap();
        assert!(efficiency.is_profitable);
        assert_eq!(efficiency.percent, 0.0);
        assert_eq!(efficiency.percent_display(), "+0.0%");
    }

    #[test]
    fn non_positive_price_is_not_applicable() {
        assert!(compute_efficiency(100, 0.0, 7.5).is_none());
        assert!(compute_efficiency(100, -3.0, 7.5).is_none());
        assert!(compute_efficiency(100, f64::NAN, 7.5).is_none());
        assert!(compute_efficiency(100, f64::INFINITY, 7.5).is_none());
    }

    #[test]
    fn zero_price_with_checked_items_is_not_applicable() {
        let pkg = package(0.0, vec![line(1, 1)]);
        let mut selections = ItemSelections::default();
        selections.toggle_item(1);
        let assessment = assess_package(&pkg, &catalog(), &selections, &ValuationConfig::default());
        assert_eq!(assessment.status, EfficiencyStatus::NotApplicable);
    }

    #[test]
    fn end_to_end_all_checked() {
        let pkg = package(900.0, vec![line(1, 2), line(2, 4)]);
        let valuation = value_package(&pkg, &catalog(), &checked(&[1, 2]), &BTreeMap::new());
        assert_eq!(valuation.total_intrinsic_value, 400);

        let efficiency = compute_efficiency(valuation.total_intrinsic_value, 900.0, 7.5).unwrap();
        assert_eq!(efficiency.cash_value, 3000.0);
        assert!(efficiency.is_profitable);
        assert!((efficiency.percent - 233.333).abs() < 0.01);
        assert_eq!(efficiency.percent_display(), "+233.3%");
        assert_eq!(efficiency.profit, 2100.0);
    }

    #[test]
    fn end_to_end_with_override() {
        let pkg = package(900.0, vec![line(1, 2), line(2, 4)]);
        let overrides = BTreeMap::from([(2, 10)]);
        let valuation = value_package(&pkg, &catalog(), &checked(&[1, 2]), &overrides);
        assert_eq!(valuation.total_intrinsic_value, 240);

        let efficiency = compute_efficiency(valuation.total_intrinsic_value, 900.0, 7.5).unwrap();
        assert_eq!(efficiency.cash_value, 1800.0);
        assert!(efficiency.is_profitable);
    }

    #[test]
    fn end_to_end_partial_check_set() {
        let pkg = package(900.0, vec![line(1, 2), line(2, 4)]);
        let valuation = value_package(&pkg, &catalog(), &checked(&[1]), &BTreeMap::new());
        assert_eq!(valuation.total_intrinsic_value, 200);
        assert!(valuation.has_any_checked);
        assert_eq!(valuation.checked_items, vec![line(1, 2)]);

        let efficiency = compute_efficiency(valuation.total_intrinsic_value, 900.0, 7.5).unwrap();
        assert_eq!(efficiency.cash_value, 1500.0);
        assert!(efficiency.is_profitable);
    }

    #[test]
    fn unprofitable_package_shows_negative_deviation() {
        let efficiency = compute_efficiency(40, 600.0, 7.5).unwrap();
        assert!(!efficiency.is_profitable);
        assert_eq!(efficiency.percent_display(), "-50.0%");
    }

    #[test]
    fn duplicate_lines_are_additive_and_unknowns_reported() {
        let pkg = package(100.0, vec![line(1, 1), line(1, 2), line(9, 5)]);
        let valuation = value_package(&pkg, &catalog(), &checked(&[1, 9]), &BTreeMap::new());
        assert_eq!(valuation.total_intrinsic_value, 300);
        assert_eq!(valuation.checked_items.len(), 3);
        assert_eq!(valuation.unknown_items, vec![9]);
    }

    #[test]
    fn efficiency_sort_puts_best_first() {
        let config = ValuationConfig::default();
        let mut selections = ItemSelections::default();
        selections.toggle_item(1);
        let cheap = package(100.0, vec![line(1, 1)]);
        let pricey = Package {
            name: "Pricey".to_string(),
            ..package(5000.0, vec![line(1, 1)])
        };
        let untouched = Package {
            name: "Potions".to_string(),
            ..package(10.0, vec![line(2, 1)])
        };
        let mut assessments: Vec<_> = [untouched, pricey, cheap]
            .iter()
            .map(|pkg| assess_package(pkg, &catalog(), &selections, &config))
            .collect();

        rank_packages(&mut assessments, PackageSort::Efficiency);
        let prices: Vec<f64> = assessments.iter().map(|a| a.package.price).collect();
        assert_eq!(prices, vec![100.0, 5000.0, 10.0]);
    }

    #[test]
    fn selection_totals_use_overrides() {
        let mut selections = ItemSelections::default();
        selections.check_all([1, 2]);
        selections.set_custom_price(2, 10);
        let totals = selection_totals(&catalog(), &selections, &ValuationConfig::default());
        assert_eq!(totals.checked_count, 2);
        assert_eq!(totals.total_ruby, 110);
        assert_eq!(totals.total_cash, 825.0);
    }
}
