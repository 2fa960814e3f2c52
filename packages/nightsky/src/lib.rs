#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Star-field layout for the night-sky property view.
//!
//! Each listing becomes one star: position from lat/lng, size and
//! brightness from price, glyph from the property category, rays from the
//! room count. A second pass joins nearby stars into constellations, and a
//! brute-force scan answers hover hit tests. Everything here is a pure
//! function of the listing slice; the canvas layer only replays the
//! resulting draw calls.

use econ_map_economy_models::{PropertyListing, PropertyType};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Inset between the canvas edge and the outermost star, in pixels.
pub const CANVAS_PADDING: f64 = 40.0;

/// Radius of the cheapest listing's star, in pixels.
pub const MIN_STAR_SIZE: f64 = 2.0;

/// Radius of the most expensive listing's star, in pixels.
pub const MAX_STAR_SIZE: f64 = 8.0;

/// Opacity of the cheapest listing's star.
pub const MIN_BRIGHTNESS: f64 = 0.25;

/// Opacity of the most expensive listing's star.
pub const MAX_BRIGHTNESS: f64 = 1.0;

/// Maximum pixel distance at which two stars are joined by a
/// constellation line.
pub const LINK_DISTANCE: f64 = 100.0;

/// Upper bound on the rays drawn around a star.
pub const MAX_RAYS: u32 = 8;

/// Default cursor radius for hover hit testing, in pixels.
pub const HIT_RADIUS: f64 = 12.0;

/// Glyph drawn for one listing, keyed by its property category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StarShape {
    Star,
    Circle,
    Square,
    Triangle,
    Diamond,
}

impl StarShape {
    #[must_use]
    pub const fn for_property(property_type: PropertyType) -> Self {
        match property_type {
            PropertyType::House => Self::Star,
            PropertyType::Condo => Self::Circle,
            PropertyType::Townhouse => Self::Square,
            PropertyType::Duplex => Self::Triangle,
            PropertyType::Other => Self::Diamond,
        }
    }
}

/// One positioned star, carrying the listing it was plotted from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Star {
    /// Horizontal canvas position in pixels.
    pub x: f64,
    /// Vertical canvas position in pixels, zero at the top.
    pub y: f64,
    /// Glyph radius in pixels, scaled by price.
    pub size: f64,
    /// Opacity between [`MIN_BRIGHTNESS`] and [`MAX_BRIGHTNESS`].
    pub brightness: f64,
    pub shape: StarShape,
    /// Rays around the glyph: `bedrooms + bathrooms`, capped at
    /// [`MAX_RAYS`].
    pub rays: u32,
    /// Compact price caption, e.g. `$1.3M`.
    pub price_label: String,
    /// The listing behind the star, for the hover tooltip.
    pub listing: PropertyListing,
}

/// A faint line joining two stars closer than [`LINK_DISTANCE`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Index of one endpoint in [`StarField::stars`].
    pub from: usize,
    /// Index of the other endpoint in [`StarField::stars`].
    pub to: usize,
    /// Pixel distance between the endpoints.
    pub distance: f64,
}

/// A fully laid-out night sky for one city's listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StarField {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
    pub stars: Vec<Star>,
    pub links: Vec<Link>,
}

impl StarField {
    /// Finds the star nearest to the cursor within `radius` pixels.
    ///
    /// Scans every star on each call; a city carries at most a few hundred
    /// listings, so the linear pass stays well inside a frame budget.
    /// Returns `None` when nothing is in range.
    #[must_use]
    pub fn star_at(&self, x: f64, y: f64, radius: f64) -> Option<&Star> {
        self.stars
            .iter()
            .map(|star| ((star.x - x).hypot(star.y - y), star))
            .filter(|(distance, _)| *distance <= radius)
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, star)| star)
    }
}

/// Min-max range of one listing attribute.
#[derive(Debug, Clone, Copy)]
struct Extent {
    min: f64,
    max: f64,
}

impl Extent {
    fn over(values: impl Iterator<Item = f64>) -> Self {
        let mut extent = Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        };

        for value in values {
            extent.min = extent.min.min(value);
            extent.max = extent.max.max(value);
        }

        extent
    }

    /// Normalizes `value` into `[0, 1]`; a zero-span extent sits
    /// mid-scale, matching the zero-span convention of the chart scales.
    fn unit(self, value: f64) -> f64 {
        let span = self.max - self.min;

        if span > 0.0 {
            (value - self.min) / span
        } else {
            0.5
        }
    }
}

/// Lays out one city's listings on a `width` x `height` canvas.
///
/// Longitude maps left to right and latitude maps with north at the top,
/// both normalized into the rectangle inset by [`CANVAS_PADDING`]. A
/// single listing, or listings sharing one coordinate, center on that
/// axis.
#[must_use]
pub fn star_field(listings: &[PropertyListing], width: f64, height: f64) -> StarField {
    let lng = Extent::over(listings.iter().map(|listing| listing.lng));
    let lat = Extent::over(listings.iter().map(|listing| listing.lat));
    let price = Extent::over(listings.iter().map(|listing| listing.price));

    let inner_width = width - 2.0 * CANVAS_PADDING;
    let inner_height = height - 2.0 * CANVAS_PADDING;

    let stars: Vec<Star> = listings
        .iter()
        .map(|listing| {
            let t = price.unit(listing.price);

            Star {
                x: lng.unit(listing.lng).mul_add(inner_width, CANVAS_PADDING),
                y: (1.0 - lat.unit(listing.lat)).mul_add(inner_height, CANVAS_PADDING),
                size: t.mul_add(MAX_STAR_SIZE - MIN_STAR_SIZE, MIN_STAR_SIZE),
                brightness: t.mul_add(MAX_BRIGHTNESS - MIN_BRIGHTNESS, MIN_BRIGHTNESS),
                shape: StarShape::for_property(listing.property_type),
                rays: (listing.bedrooms + listing.bathrooms).min(MAX_RAYS),
                price_label: price_label(listing.price),
                listing: listing.clone(),
            }
        })
        .collect();

    let links = constellation_links(&stars);

    StarField {
        width,
        height,
        stars,
        links,
    }
}

/// Joins every pair of stars within [`LINK_DISTANCE`] pixels.
///
/// The pairwise scan is quadratic, which is fine at tens to low hundreds
/// of stars; a spatial index would only pay off far beyond that.
#[must_use]
pub fn constellation_links(stars: &[Star]) -> Vec<Link> {
    let mut links = Vec::new();

    for (from, a) in stars.iter().enumerate() {
        for (offset, b) in stars[from + 1..].iter().enumerate() {
            let distance = (a.x - b.x).hypot(a.y - b.y);

            if distance <= LINK_DISTANCE {
                links.push(Link {
                    from,
                    to: from + 1 + offset,
                    distance,
                });
            }
        }
    }

    links
}

/// Compact price caption: `$1.3M` from a million up, `$850K` from a
/// thousand up, `$950` below that.
#[must_use]
pub fn price_label(price: f64) -> String {
    if price >= 1_000_000.0 {
        let millions = (price / 100_000.0).round() / 10.0;
        format!("${millions:.1}M")
    } else if price >= 1_000.0 {
        let thousands = (price / 1_000.0).round();
        format!("${thousands:.0}K")
    } else {
        let dollars = price.round();
        format!("${dollars:.0}")
    }
}
