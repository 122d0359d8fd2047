//! Attribute extraction from city and ASN lookups.

use serde_json::Value;

use super::attributes::{render_value, AttributeProfile, GeoAttributes, Source};
use super::lookup::GeoLookup;
use super::path::read_path;

/// Looks `ip` up in both databases and reads every column of `profile` from the results.
///
/// Each database is queried once. An absent IP, or one the databases do not
/// know, yields a set where every value is absent.
pub fn extract_attributes(
    ip: Option<&str>,
    city_lookup: &dyn GeoLookup,
    asn_lookup: &dyn GeoLookup,
    profile: AttributeProfile,
) -> GeoAttributes {
    let city = ip.and_then(|ip| city_lookup.lookup(ip));
    let asn = ip.and_then(|ip| asn_lookup.lookup(ip));
    attributes_from_trees(city.as_ref(), asn.as_ref(), profile)
}

/// Builds the attribute set from already-fetched lookup trees.
pub fn attributes_from_trees(
    city: Option<&Value>,
    asn: Option<&Value>,
    profile: AttributeProfile,
) -> GeoAttributes {
    let mut attrs = GeoAttributes::absent(profile);
    for (_, field) in profile.columns() {
        let root = match field.source() {
            Source::City => city,
            Source::Asn => asn,
        };
        let value = read_path(root, field.path()).and_then(render_value);
        attrs.set(*field, value);
    }
    attrs
}
