//! Real-estate listing CSV parsing.
//!
//! Listing exports disagree on column spelling (`Property Type`,
//! `Property_Type`, `type`, ...), so every column is matched against
//! several aliases and normalized into one canonical record here.
//! Downstream code never sees the raw spellings.

use std::{fs, path::Path};

use econ_map_economy_models::{PropertyListing, PropertyType};
use econ_map_geography_models::sgc;
use serde::Deserialize;

use crate::{DatasetError, parse_numeric};

/// A raw listing row before validation.
#[derive(Debug, Deserialize)]
struct RawListing {
    #[serde(alias = "City", default)]
    city: Option<String>,
    #[serde(alias = "Province", default)]
    province: Option<String>,
    #[serde(alias = "Price", default)]
    price: Option<String>,
    #[serde(alias = "Number_Beds", alias = "Bedrooms", alias = "beds", default)]
    bedrooms: Option<String>,
    #[serde(alias = "Number_Baths", alias = "Bathrooms", alias = "baths", default)]
    bathrooms: Option<String>,
    #[serde(
        rename = "property_type",
        alias = "Property Type",
        alias = "Property_Type",
        alias = "Type",
        alias = "type",
        default
    )]
    property_type: Option<String>,
    #[serde(alias = "Latitude", alias = "lat", default)]
    latitude: Option<String>,
    #[serde(alias = "Longitude", alias = "lng", alias = "lon", default)]
    longitude: Option<String>,
    #[serde(
        alias = "Square_Footage",
        alias = "Square Footage",
        alias = "sqft",
        default
    )]
    square_footage: Option<String>,
}

impl RawListing {
    /// Converts this raw row into a canonical listing.
    ///
    /// Returns `None` if the row is missing a city, a resolvable
    /// province, a positive price, or in-range coordinates.
    fn to_normalized(&self) -> Option<PropertyListing> {
        let city = self
            .city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())?;

        let province_id = sgc::resolve(self.province.as_deref()?)?;

        let price = parse_numeric(self.price.as_deref()?)?;
        if price <= 0.0 {
            return None;
        }

        let lat = parse_numeric(self.latitude.as_deref()?)?;
        let lng = parse_numeric(self.longitude.as_deref()?)?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return None;
        }

        let property_type = self
            .property_type
            .as_deref()
            .map_or(PropertyType::Other, PropertyType::from_label);

        Some(PropertyListing {
            city: city.to_string(),
            province_id: province_id.to_string(),
            price,
            bedrooms: room_count(self.bedrooms.as_deref()),
            bathrooms: room_count(self.bathrooms.as_deref()),
            property_type,
            lat,
            lng,
            square_footage: self
                .square_footage
                .as_deref()
                .and_then(parse_numeric)
                .filter(|sqft| *sqft > 0.0),
        })
    }
}

/// Parses a room count, rounding half rooms ("2.5 baths") to the
/// nearest whole room and treating a missing column as zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn room_count(field: Option<&str>) -> u32 {
    field
        .and_then(parse_numeric)
        .map_or(0, |count| count.round().max(0.0) as u32)
}

/// Loads real-estate listings from a CSV file.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or the CSV
/// envelope is malformed.
pub fn load_listings(path: &Path) -> Result<Vec<PropertyListing>, DatasetError> {
    let text = fs::read_to_string(path)?;
    let listings = parse_listings(&text)?;

    log::info!(
        "Loaded {} real-estate listings from {}",
        listings.len(),
        path.display()
    );

    Ok(listings)
}

/// Like [`load_listings`], degrading failure to an empty list.
#[must_use]
pub fn load_listings_or_empty(path: &Path) -> Vec<PropertyListing> {
    crate::or_empty(load_listings(path), "real-estate listings")
}

/// Parses real-estate listings from CSV text, skipping rows that fail
/// validation.
///
/// # Errors
///
/// Returns [`DatasetError`] if the CSV header row cannot be read.
pub fn parse_listings(text: &str) -> Result<Vec<PropertyListing>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut listings = Vec::new();

    for result in reader.deserialize::<RawListing>() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                log::trace!("skipping malformed listing row: {e}");
                continue;
            }
        };

        if let Some(listing) = row.to_normalized() {
            listings.push(listing);
        }
    }

    Ok(listings)
}

/// Filters listings to one city, matching names case-insensitively.
#[must_use]
pub fn listings_for_city<'a>(
    listings: &'a [PropertyListing],
    city: &str,
) -> Vec<&'a PropertyListing> {
    let city = city.trim();

    listings
        .iter()
        .filter(|listing| listing.city.eq_ignore_ascii_case(city))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KAGGLE_STYLE: &str = "\
City,Price,Address,Number_Beds,Number_Baths,Province,Population,Latitude,Longitude,Property Type
Calgary,\"639,900\",123 Main St SW,3,2.5,Alberta,1306784,51.0447,-114.0719,Detached House
Calgary,425000,45 River Rd,2,1,Alberta,1306784,51.02,-114.1,Condo Apartment
Toronto,1150000,9 Bay St,4,3,Ontario,2794356,43.6532,-79.3832,Townhouse
Toronto,0,1 Free Ln,1,1,Ontario,2794356,43.6,-79.3,Condo
Nowhere,500000,1 Lost Way,2,1,Atlantis,1,91.0,-79.3,House
";

    #[test]
    fn rows_normalize_to_canonical_records() {
        let listings = parse_listings(KAGGLE_STYLE).unwrap();

        assert_eq!(listings.len(), 3);

        let first = &listings[0];
        assert_eq!(first.city, "Calgary");
        assert_eq!(first.province_id, "ab");
        assert_eq!(first.price, 639_900.0);
        assert_eq!(first.bedrooms, 3);
        assert_eq!(first.bathrooms, 3);
        assert_eq!(first.property_type, PropertyType::House);
    }

    #[test]
    fn zero_price_and_bad_coordinates_are_rejected() {
        let listings = parse_listings(KAGGLE_STYLE).unwrap();

        assert!(listings.iter().all(|listing| listing.price > 0.0));
        assert!(listings.iter().all(|listing| listing.lat <= 90.0));
    }

    #[test]
    fn alternate_header_spellings_match() {
        let listings = parse_listings(
            "city,province,price,beds,baths,type,lat,lon\n\
             Halifax,NS,389000,3,2,Semi-Detached Duplex,44.6488,-63.5752\n",
        )
        .unwrap();

        assert_eq!(listings[0].province_id, "ns");
        assert_eq!(listings[0].property_type, PropertyType::Duplex);
        assert_eq!(listings[0].square_footage, None);
    }

    #[test]
    fn city_filter_is_case_insensitive() {
        let listings = parse_listings(KAGGLE_STYLE).unwrap();

        assert_eq!(listings_for_city(&listings, "calgary").len(), 2);
        assert_eq!(listings_for_city(&listings, " TORONTO ").len(), 1);
        assert_eq!(listings_for_city(&listings, "Vancouver").len(), 0);
    }
}
