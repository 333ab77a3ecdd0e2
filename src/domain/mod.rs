//! Domain logic for package valuation lives here.

pub mod app_state;
pub mod custom_package;
pub mod entities;
pub mod selection;
pub mod valuation;

#[allow(unused_imports)]
pub use app_state::{AppState, CacheResource, CacheTimestamps, PersistedState};
#[allow(unused_imports)]
pub use custom_package::{CustomPackage, CustomPackageDraft, DraftError, DraftLine};
#[allow(unused_imports)]
pub use entities::{Catalog, Item, ItemId, Package, PackageItem, PackageKey, PackageList};
#[allow(unused_imports)]
pub use selection::{parse_price_input, ItemSelections};
#[allow(unused_imports)]
pub use valuation::{
    assess_package, cash_value, compute_efficiency, effective_unit_price, rank_packages, resolve_unit_price,
    selection_totals, value_package, Efficiency, EfficiencyStatus, PackageAssessment, PackageSort,
    PackageValuation, PriceResolution, PriceSource, SelectionTotals, ValuationConfig,
    DEFAULT_CASH_MULTIPLIER,
};
