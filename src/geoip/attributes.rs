//! Attribute catalogue and the per-record attribute set.
//!
//! Every appended column is a [`GeoField`]. A field knows which database it
//! comes from and where its value lives in the decoded lookup tree. An
//! [`AttributeProfile`] fixes which fields are appended and in what order;
//! the same order is used for header names and data values, which keeps the
//! appended columns aligned.

use serde_json::Value;
use strum_macros::EnumIter as EnumIterMacro;

use super::path::PathSegment::{self, Index, Key};

/// Database a field is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum Source {
    /// GeoLite2-City (or GeoIP2-City)
    City,
    /// GeoLite2-ASN
    Asn,
}

impl Source {
    /// Short display name.
    pub fn label(self) -> &'static str {
        match self {
            Source::City => "City",
            Source::Asn => "ASN",
        }
    }
}

/// A derived attribute that can be appended to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum GeoField {
    GeonameId,
    CountryCode,
    CountryName,
    RegionCode,
    Region,
    City,
    Continent,
    Latitude,
    Longitude,
    AccuracyRadius,
    TimeZone,
    PostalCode,
    AutonomousSystemNumber,
    AutonomousSystemOrganization,
}

impl GeoField {
    /// Database holding this field.
    pub fn source(self) -> Source {
        match self {
            GeoField::AutonomousSystemNumber | GeoField::AutonomousSystemOrganization => {
                Source::Asn
            }
            _ => Source::City,
        }
    }

    /// Location of this field inside the decoded lookup tree.
    pub fn path(self) -> &'static [PathSegment] {
        match self {
            GeoField::GeonameId => &[Key("city"), Key("geoname_id")],
            GeoField::CountryCode => &[Key("country"), Key("iso_code")],
            GeoField::CountryName => &[Key("country"), Key("names"), Key("en")],
            GeoField::RegionCode => &[Key("subdivisions"), Index(0), Key("iso_code")],
            GeoField::Region => &[Key("subdivisions"), Index(0), Key("names"), Key("en")],
            GeoField::City => &[Key("city"), Key("names"), Key("en")],
            GeoField::Continent => &[Key("continent"), Key("names"), Key("en")],
            GeoField::Latitude => &[Key("location"), Key("latitude")],
            GeoField::Longitude => &[Key("location"), Key("longitude")],
            GeoField::AccuracyRadius => &[Key("location"), Key("accuracy_radius")],
            GeoField::TimeZone => &[Key("location"), Key("time_zone")],
            GeoField::PostalCode => &[Key("postal"), Key("code")],
            GeoField::AutonomousSystemNumber => &[Key("autonomous_system_number")],
            GeoField::AutonomousSystemOrganization => &[Key("autonomous_system_organization")],
        }
    }
}

/// Which set of attributes is appended, and in what order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeProfile {
    /// Ten columns: location and network owner.
    #[default]
    Basic,
    /// Fourteen columns: adds geoname id, region code, accuracy radius and time zone.
    Extended,
}

const BASIC_COLUMNS: &[(&str, GeoField)] = &[
    ("countryCode", GeoField::CountryCode),
    ("countryName", GeoField::CountryName),
    ("region", GeoField::Region),
    ("city", GeoField::City),
    ("continent", GeoField::Continent),
    ("latitude", GeoField::Latitude),
    ("longitude", GeoField::Longitude),
    ("postalCode", GeoField::PostalCode),
    ("autonomousSystemNumber", GeoField::AutonomousSystemNumber),
    ("autonomousSystemOrganization", GeoField::AutonomousSystemOrganization),
];

const EXTENDED_COLUMNS: &[(&str, GeoField)] = &[
    ("geonameId", GeoField::GeonameId),
    ("countryCode", GeoField::CountryCode),
    ("countryName", GeoField::CountryName),
    ("regionCode", GeoField::RegionCode),
    ("regionName", GeoField::Region),
    ("city", GeoField::City),
    ("continent", GeoField::Continent),
    ("latitude", GeoField::Latitude),
    ("longitude", GeoField::Longitude),
    ("accuracyRadius", GeoField::AccuracyRadius),
    ("timeZone", GeoField::TimeZone),
    ("postalCode", GeoField::PostalCode),
    ("autonomousSystemNumber", GeoField::AutonomousSystemNumber),
    ("autonomousSystemOrganization", GeoField::AutonomousSystemOrganization),
];

impl AttributeProfile {
    /// Ordered `(column name, field)` pairs appended by this profile.
    pub fn columns(self) -> &'static [(&'static str, GeoField)] {
        match self {
            AttributeProfile::Basic => BASIC_COLUMNS,
            AttributeProfile::Extended => EXTENDED_COLUMNS,
        }
    }

    /// Column names appended to the header record.
    pub fn header_names(self) -> impl Iterator<Item = &'static str> {
        self.columns().iter().map(|(name, _)| *name)
    }

    /// Number of appended columns.
    pub fn width(self) -> usize {
        self.columns().len()
    }

    fn position(self, field: GeoField) -> Option<usize> {
        self.columns().iter().position(|(_, f)| *f == field)
    }
}

/// Attribute values for one record, aligned with a profile's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoAttributes {
    profile: AttributeProfile,
    values: Vec<Option<String>>,
}

impl GeoAttributes {
    /// An attribute set where every value is absent.
    pub fn absent(profile: AttributeProfile) -> Self {
        Self {
            profile,
            values: vec![None; profile.width()],
        }
    }

    /// Profile this set was built for.
    pub fn profile(&self) -> AttributeProfile {
        self.profile
    }

    /// Value of `field`, if the profile carries it and it is present.
    pub fn get(&self, field: GeoField) -> Option<&str> {
        let idx = self.profile.position(field)?;
        self.values[idx].as_deref()
    }

    /// Overwrites `field`. Returns `false` when the profile has no such column.
    pub fn set(&mut self, field: GeoField, value: Option<String>) -> bool {
        match self.profile.position(field) {
            Some(idx) => {
                self.values[idx] = value;
                true
            }
            None => false,
        }
    }

    /// `(column name, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> + '_ {
        self.profile
            .header_names()
            .zip(self.values.iter().map(|v| v.as_deref()))
    }

    /// True when at least one field read from `source` is present.
    pub fn has_data_from(&self, source: Source) -> bool {
        self.profile
            .columns()
            .iter()
            .zip(&self.values)
            .any(|((_, field), value)| field.source() == source && value.is_some())
    }

    /// True when no value is present.
    pub fn is_all_absent(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Consumes the set, yielding values in column order.
    pub fn into_values(self) -> Vec<Option<String>> {
        self.values
    }
}

/// Renders a lookup tree value as CSV field text.
///
/// Strings are used verbatim, numbers and booleans use their JSON text, and
/// nested maps or arrays are emitted as compact JSON.
pub fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn test_profile_widths() {
        assert_eq!(AttributeProfile::Basic.width(), 10);
        assert_eq!(AttributeProfile::Extended.width(), 14);
    }

    #[test]
    fn test_basic_header_order() {
        let names: Vec<_> = AttributeProfile::Basic.header_names().collect();
        assert_eq!(
            names,
            vec![
                "countryCode",
                "countryName",
                "region",
                "city",
                "continent",
                "latitude",
                "longitude",
                "postalCode",
                "autonomousSystemNumber",
                "autonomousSystemOrganization",
            ]
        );
    }

    #[test]
    fn test_extended_profile_covers_every_field_once() {
        let fields: HashSet<_> = AttributeProfile::Extended
            .columns()
            .iter()
            .map(|(_, f)| *f)
            .collect();
        assert_eq!(fields.len(), AttributeProfile::Extended.width());
        for field in GeoField::iter() {
            assert!(fields.contains(&field), "{:?} missing", field);
        }
    }

    #[test]
    fn test_column_names_unique_per_profile() {
        for profile in [AttributeProfile::Basic, AttributeProfile::Extended] {
            let names: HashSet<_> = profile.header_names().collect();
            assert_eq!(names.len(), profile.width());
        }
    }

    #[test]
    fn test_asn_fields_come_from_asn_database() {
        for field in GeoField::iter() {
            let expected = matches!(
                field,
                GeoField::AutonomousSystemNumber | GeoField::AutonomousSystemOrganization
            );
            assert_eq!(field.source() == Source::Asn, expected);
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut attrs = GeoAttributes::absent(AttributeProfile::Basic);
        assert!(attrs.is_all_absent());
        assert!(attrs.set(GeoField::CountryCode, Some("US".to_string())));
        assert_eq!(attrs.get(GeoField::CountryCode), Some("US"));
        assert!(!attrs.is_all_absent());
    }

    #[test]
    fn test_set_field_outside_profile_is_rejected() {
        let mut attrs = GeoAttributes::absent(AttributeProfile::Basic);
        assert!(!attrs.set(GeoField::TimeZone, Some("Asia/Seoul".to_string())));
        assert_eq!(attrs.get(GeoField::TimeZone), None);
        assert_eq!(attrs.into_values().len(), 10);
    }

    #[test]
    fn test_has_data_from_each_source() {
        let mut attrs = GeoAttributes::absent(AttributeProfile::Basic);
        for source in Source::iter() {
            assert!(!attrs.has_data_from(source));
        }

        attrs.set(GeoField::AutonomousSystemNumber, Some("15169".to_string()));
        assert!(attrs.has_data_from(Source::Asn));
        assert!(!attrs.has_data_from(Source::City));

        attrs.set(GeoField::Latitude, Some("37.751".to_string()));
        assert!(attrs.has_data_from(Source::City));
    }

    #[test]
    fn test_source_labels() {
        let labels: Vec<_> = Source::iter().map(Source::label).collect();
        assert_eq!(labels, vec!["City", "ASN"]);
    }

    #[test]
    fn test_iter_pairs_names_with_values() {
        let mut attrs = GeoAttributes::absent(AttributeProfile::Extended);
        attrs.set(GeoField::Region, Some("Seoul".to_string()));
        let pair = attrs.iter().find(|(name, _)| *name == "regionName");
        assert_eq!(pair, Some(("regionName", Some("Seoul"))));
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&json!("Seoul")), Some("Seoul".to_string()));
        assert_eq!(render_value(&json!(15169)), Some("15169".to_string()));
        assert_eq!(render_value(&json!(37.751)), Some("37.751".to_string()));
        assert_eq!(render_value(&json!(true)), Some("true".to_string()));
        assert_eq!(render_value(&json!(null)), None);
        assert_eq!(render_value(&json!(["a"])), Some("[\"a\"]".to_string()));
    }
}
