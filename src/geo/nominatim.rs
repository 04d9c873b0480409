//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API for forward and reverse geocoding.
//! Usage policy requires an identifying User-Agent on every request.

use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::geo::{AddressRecord, GeoSearch, SearchCandidate};
use serde::Deserialize;
use tracing::debug;

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
}

/// Nominatim place, shared by the search and reverse endpoints
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    place_id: i64,
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    address: NominatimAddress,
}

/// Address breakdown; Nominatim only sends the keys that apply to the place
#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    country: Option<String>,
    postcode: Option<String>,
}

/// Reverse responses are either a place or `{"error": "Unable to geocode"}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReverseResponse {
    Missing { error: String },
    Found(NominatimPlace),
}

impl NominatimPlace {
    fn into_candidate(self) -> Result<SearchCandidate> {
        Ok(SearchCandidate {
            place_id: self.place_id,
            coordinate: parse_coordinate(&self.lat, &self.lon)?,
            display_name: self.display_name,
        })
    }

    fn into_address(self) -> Result<AddressRecord> {
        let coordinate = parse_coordinate(&self.lat, &self.lon)?;
        let NominatimAddress {
            city,
            town,
            village,
            state,
            country,
            postcode,
        } = self.address;

        Ok(AddressRecord {
            place_id: self.place_id,
            coordinate,
            display_name: self.display_name,
            locality: city.or(town).or(village),
            region: state,
            country,
            postal_code: postcode,
        })
    }
}

/// Provider coordinates arrive as strings; a bad one makes the body unusable
fn parse_coordinate(lat: &str, lon: &str) -> Result<Coordinate> {
    Coordinate::parse(lat, lon)
        .map_err(|e| Error::Provider(format!("Nominatim returned a bad coordinate: {}", e)))
}

impl NominatimBackend {
    /// Create a new Nominatim backend against `base_url`
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, text: &str) -> String {
        format!(
            "{}/search?format=json&q={}",
            self.base_url,
            urlencoding::encode(text)
        )
    }

    fn reverse_url(&self, coordinate: Coordinate) -> String {
        format!(
            "{}/reverse?format=json&lat={}&lon={}",
            self.base_url,
            coordinate.latitude(),
            coordinate.longitude()
        )
    }

    /// GET `url`, returning the body of a 2xx response or `None` on 404
    async fn fetch(&self, url: &str) -> Result<Option<String>> {
        debug!(url, "Nominatim request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Nominatim request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::Provider(format!(
                "Nominatim returned status: {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Provider(format!("Failed to read Nominatim response: {}", e)))?;
        Ok(Some(body))
    }
}

/// Parse a `/search` body into candidates
fn parse_search_body(body: &str) -> Result<Vec<SearchCandidate>> {
    let places: Vec<NominatimPlace> = serde_json::from_str(body)
        .map_err(|e| Error::Provider(format!("Failed to parse Nominatim response: {}", e)))?;

    places
        .into_iter()
        .map(NominatimPlace::into_candidate)
        .collect()
}

/// Parse a `/reverse` body into an address record
fn parse_reverse_body(body: &str, coordinate: Coordinate) -> Result<AddressRecord> {
    let response: ReverseResponse = serde_json::from_str(body)
        .map_err(|e| Error::Provider(format!("Failed to parse Nominatim response: {}", e)))?;

    match response {
        ReverseResponse::Found(place) => place.into_address(),
        ReverseResponse::Missing { error } => Err(Error::NotFound(format!(
            "{} ({})",
            error, coordinate
        ))),
    }
}

impl GeoSearch for NominatimBackend {
    async fn search(&self, text: &str) -> Result<Vec<SearchCandidate>> {
        match self.fetch(&self.search_url(text)).await? {
            Some(body) => parse_search_body(&body),
            None => Err(Error::Provider(
                "Nominatim returned status: 404 Not Found".to_string(),
            )),
        }
    }

    async fn reverse_lookup(&self, coordinate: Coordinate) -> Result<AddressRecord> {
        match self.fetch(&self.reverse_url(coordinate)).await? {
            Some(body) => parse_reverse_body(&body, coordinate),
            None => Err(Error::NotFound(coordinate.to_string())),
        }
    }
}
