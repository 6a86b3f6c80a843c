use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{ProviderError, Result};
use crate::config::ProviderConfig;

/// A resolved place to forecast for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

/// Nominatim search result (partial — we only need coordinates and name).
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

/// "lat, lon" with optional signs and decimals.
static COORDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?\d+(?:\.\d+)?)\s*,\s*([+-]?\d+(?:\.\d+)?)\s*$").unwrap()
});

/// Parse a literal "lat, lon" pair.
///
/// `Ok(None)` means the input is not shaped like coordinates (treat it as a
/// place name); a well-formed pair outside the valid range is an error.
pub fn parse_coordinates(input: &str) -> Result<Option<Location>> {
    let Some(caps) = COORDS_RE.captures(input) else {
        return Ok(None);
    };
    let invalid = || ProviderError::InvalidCoordinates(input.trim().to_string());
    let latitude: f64 = caps[1].parse().map_err(|_| invalid())?;
    let longitude: f64 = caps[2].parse().map_err(|_| invalid())?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(invalid());
    }

    Ok(Some(Location {
        latitude,
        longitude,
        display_name: format!("Coordinates: {latitude:.4}, {longitude:.4}"),
    }))
}

/// Turn user input into a location: literal coordinates are used as-is,
/// anything else goes through Nominatim.
pub fn resolve_location(input: &str, config: &ProviderConfig) -> Result<Location> {
    if let Some(loc) = parse_coordinates(input)? {
        log::debug!("Using literal coordinates {input:?}");
        return Ok(loc);
    }

    let agent = super::build_agent(config);
    let places: Vec<NominatimPlace> = agent
        .get(&config.geocode_url)
        .query("format", "json")
        .query("limit", "1")
        .query("q", input.trim())
        .header("Accept", "application/json")
        .header("User-Agent", config.user_agent.as_str())
        .call()
        .map_err(ProviderError::Geocoding)?
        .body_mut()
        .read_json()
        .map_err(ProviderError::Geocoding)?;

    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::PlaceNotFound(input.trim().to_string()))?;
    let loc = place_to_location(place)?;
    log::info!("Resolved {input:?} to {} ({:.4}, {:.4})", loc.display_name, loc.latitude, loc.longitude);
    Ok(loc)
}

fn place_to_location(place: NominatimPlace) -> Result<Location> {
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|_| ProviderError::InvalidResponse(format!("bad coordinate {v:?}")))
    };
    Ok(Location {
        latitude: parse(&place.lat)?,
        longitude: parse(&place.lon)?,
        display_name: place.display_name,
    })
}
