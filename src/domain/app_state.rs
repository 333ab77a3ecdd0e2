use std::{
    collections::HashMap,
    time::{Duration, SystemTime},
};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::custom_package::CustomPackage;
use super::entities::{Catalog, Package, PackageList};
use super::selection::ItemSelections;
use super::valuation::{assess_package, PackageAssessment, ValuationConfig};

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub catalog: Catalog,
    pub packages: Vec<Package>,
    /// Server-side timestamp of the last package list change.
    pub packages_updated_at: Option<OffsetDateTime>,
    pub custom_packages: Vec<CustomPackage>,
    pub selections: ItemSelections,
    pub valuation: ValuationConfig,
    pub cache: CacheTimestamps,
}

impl AppState {
    pub fn is_stale(&self, resource: &CacheResource, ttl: Duration) -> bool {
        self.cache.is_stale(resource, ttl)
    }

    pub fn replace_catalog(&mut self, catalog: Catalog, fetched_at: SystemTime) {
        self.catalog = catalog;
        self.cache.record_fetch(CacheResource::Items, fetched_at);
    }

    pub fn replace_packages(&mut self, list: PackageList, fetched_at: SystemTime) {
        self.packages = list.packages;
        self.packages_updated_at = list.last_updated_at;
        self.cache.record_fetch(CacheResource::Packages, fetched_at);
    }

    /// Server packages followed by the player's custom packages.
    pub fn all_packages(&self) -> Vec<Package> {
        self.packages
            .iter()
            .cloned()
            .chain(
                self.custom_packages
                    .iter()
                    .map(|custom| custom.to_package(&self.catalog)),
            )
            .collect()
    }

    pub fn assessments(&self) -> Vec<PackageAssessment> {
        self.all_packages()
            .iter()
            .map(|package| assess_package(package, &self.catalog, &self.selections, &self.valuation))
            .collect()
    }

    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.selections = persisted.selections;
        self.custom_packages = persisted.custom_packages;
        if ValuationConfig::is_valid_multiplier(persisted.valuation.cash_multiplier) {
            self.valuation = persisted.valuation;
        }
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            selections: self.selections.clone(),
            custom_packages: self.custom_packages.clone(),
            valuation: self.valuation.clone(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CacheTimestamps {
    entries: HashMap<CacheResource, SystemTime>,
}

impl CacheTimestamps {
    pub fn record_fetch(&mut self, resource: CacheResource, fetched_at: SystemTime) {
        self.entries.insert(resource, fetched_at);
    }

    pub fn fetched_at(&self, resource: &CacheResource) -> Option<SystemTime> {
        self.entries.get(resource).copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CacheResource, &SystemTime)> {
        self.entries.iter()
    }

    pub fn is_stale(&self, resource: &CacheResource, ttl: Duration) -> bool {
        self.fetched_at(resource)
            .map(|time| time.elapsed().map(|elapsed| elapsed > ttl).unwrap_or(true))
            .unwrap_or(true)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheResource {
    Items,
    Packages,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub selections: ItemSelections,
    #[serde(default)]
    pub custom_packages: Vec<CustomPackage>,
    #[serde(default)]
    pub valuation: ValuationConfig,
}
