//! Localized country and region names.
//!
//! A [`LocalizationTable`] maps ISO country codes to display names and
//! `"<country>-<region>"` subdivision codes to region display names. It is
//! loaded once at startup and never modified.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::attributes::{GeoAttributes, GeoField};
use crate::error_handling::InitializationError;

const KOREAN_TABLE: &str = include_str!("../../data/locale_ko.json");

/// Static code-to-name mappings for one locale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalizationTable {
    #[serde(default)]
    countries: HashMap<String, String>,
    #[serde(default)]
    regions: HashMap<String, String>,
}

impl LocalizationTable {
    /// Builds a table from explicit mappings.
    pub fn new(countries: HashMap<String, String>, regions: HashMap<String, String>) -> Self {
        Self { countries, regions }
    }

    /// The built-in Korean table.
    pub fn korean() -> Result<Self, InitializationError> {
        serde_json::from_str(KOREAN_TABLE).map_err(|e| {
            InitializationError::LocalizationTableError {
                path: "data/locale_ko.json".into(),
                reason: e.to_string(),
            }
        })
    }

    /// Loads a table from a JSON file shaped like
    /// `{"countries": {"KR": "..."}, "regions": {"KR-11": "..."}}`.
    pub async fn from_file(path: &Path) -> Result<Self, InitializationError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            InitializationError::LocalizationTableError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        let table: Self = serde_json::from_str(&content).map_err(|e| {
            InitializationError::LocalizationTableError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        log::info!(
            "Loaded localization table from {} ({} countries, {} regions)",
            path.display(),
            table.countries.len(),
            table.regions.len()
        );
        Ok(table)
    }

    /// Localized name for an ISO country code.
    pub fn country_name(&self, country_code: &str) -> Option<&str> {
        self.countries.get(country_code).map(String::as_str)
    }

    /// Localized name for a region, keyed by country and subdivision code.
    pub fn region_name(&self, country_code: &str, region_code: &str) -> Option<&str> {
        self.regions
            .get(&format!("{}-{}", country_code, region_code))
            .map(String::as_str)
    }

    /// Overwrites the country and region names in `attrs` where the table has
    /// an entry. Codes are never changed and no columns are added.
    pub fn localize(&self, mut attrs: GeoAttributes) -> GeoAttributes {
        let Some(country_code) = attrs.get(GeoField::CountryCode).map(str::to_owned) else {
            return attrs;
        };

        if let Some(name) = self.country_name(&country_code) {
            attrs.set(GeoField::CountryName, Some(name.to_owned()));
        }

        let region_name = attrs
            .get(GeoField::RegionCode)
            .and_then(|region_code| self.region_name(&country_code, region_code))
            .map(str::to_owned);
        if let Some(name) = region_name {
            attrs.set(GeoField::Region, Some(name));
        }

        attrs
    }
}
