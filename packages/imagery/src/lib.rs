#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Street-level imagery lookup.
//!
//! Queries a Mapillary-style images endpoint for the photo nearest a city
//! center, so the street-view panel can open on a real image id. The
//! caller treats any failure as "no imagery here" rather than an error
//! the user sees.

use thiserror::Error;

/// Production images endpoint. Tests and self-hosted mirrors pass their
/// own base URL.
pub const DEFAULT_BASE_URL: &str = "https://graph.mapillary.com/images";

/// Half-width of the search box around the requested point, in degrees.
pub const BBOX_MARGIN: f64 = 0.01;

/// Errors that can occur while looking up imagery.
#[derive(Debug, Error)]
pub enum ImageryError {
    /// HTTP request failed.
    #[error("Request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response did not have the expected shape.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of what went wrong.
        message: String,
    },
}

/// Search box around a point as `[min_lng, min_lat, max_lng, max_lat]`.
#[must_use]
pub fn bbox_around(lat: f64, lng: f64) -> [f64; 4] {
    [
        lng - BBOX_MARGIN,
        lat - BBOX_MARGIN,
        lng + BBOX_MARGIN,
        lat + BBOX_MARGIN,
    ]
}

/// Formats a bounding box as the comma-separated `bbox` query value.
#[must_use]
pub fn bbox_param(bbox: [f64; 4]) -> String {
    let [min_lng, min_lat, max_lng, max_lat] = bbox;

    format!("{min_lng},{min_lat},{max_lng},{max_lat}")
}

/// Finds the id of an image near the given coordinate, or `None` when
/// nothing has been captured in the search box.
///
/// # Errors
///
/// Returns [`ImageryError`] if the HTTP request or response parsing
/// fails.
pub async fn nearest_image_id(
    client: &reqwest::Client,
    base_url: &str,
    lat: f64,
    lng: f64,
    access_token: &str,
) -> Result<Option<String>, ImageryError> {
    let bbox = bbox_param(bbox_around(lat, lng));

    let resp = client
        .get(base_url)
        .query(&[
            ("fields", "id"),
            ("bbox", bbox.as_str()),
            ("access_token", access_token),
        ])
        .send()
        .await?;

    let body: serde_json::Value = resp.json().await?;
    let image_id = parse_response(&body)?;

    log::debug!("imagery near ({lat}, {lng}): {image_id:?}");

    Ok(image_id)
}

/// Parses the images response, returning the first image id.
fn parse_response(body: &serde_json::Value) -> Result<Option<String>, ImageryError> {
    let data = body
        .get("data")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| ImageryError::Parse {
            message: "Imagery response has no data array".to_string(),
        })?;

    let Some(first) = data.first() else {
        return Ok(None);
    };

    match first.get("id") {
        Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        _ => Err(ImageryError::Parse {
            message: "Missing id in imagery response".to_string(),
        }),
    }
}
