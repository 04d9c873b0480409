//! Geocoding module
//!
//! Provides forward geocoding (free text to candidate places), reverse
//! geocoding (coordinate to address) and the current-position capability.

pub mod nominatim;
pub mod position;

use crate::config::ProviderConfig;
use crate::coord::Coordinate;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A forward geocoding match offered to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub place_id: i64,
    pub coordinate: Coordinate,
    pub display_name: String,
}

impl SearchCandidate {
    /// First comma-separated component of the display name
    pub fn primary_name(&self) -> &str {
        self.display_name
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
    }

    /// Everything after the first comma, or empty
    pub fn secondary_name(&self) -> &str {
        self.display_name
            .split_once(',')
            .map(|(_, rest)| rest.trim())
            .unwrap_or_default()
    }
}

/// The address resolved for a coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub place_id: i64,
    pub coordinate: Coordinate,
    pub display_name: String,
    /// First present of city, town, village
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl AddressRecord {
    /// Heading line: the locality, or empty when the place has none
    pub fn heading(&self) -> &str {
        self.locality.as_deref().unwrap_or_default()
    }

    /// "region, country" with absent parts left out
    pub fn subtitle(&self) -> String {
        [self.region.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Place name used to look up an article: locality, then region, then country
    pub fn article_term(&self) -> Option<&str> {
        self.locality
            .as_deref()
            .or(self.region.as_deref())
            .or(self.country.as_deref())
            .filter(|term| !term.trim().is_empty())
    }
}

/// Trait for geocoding backends
///
/// Implementations make a single attempt per call; retry policy belongs to
/// the caller.
pub trait GeoSearch: Send + Sync {
    /// Forward geocode free text; an empty vec when nothing matches
    fn search(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<SearchCandidate>>> + Send;

    /// Reverse geocode a coordinate, failing with `Error::NotFound` when the
    /// provider has no address for it
    fn reverse_lookup(
        &self,
        coordinate: Coordinate,
    ) -> impl std::future::Future<Output = Result<AddressRecord>> + Send;
}

/// Get the default geocoding backend
pub fn get_geocoder(providers: &ProviderConfig) -> Result<nominatim::NominatimBackend> {
    nominatim::NominatimBackend::new(&providers.nominatim_url, &providers.user_agent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> AddressRecord {
        AddressRecord {
            place_id: 1,
            coordinate: Coordinate::new(48.8566, 2.3522).unwrap(),
            display_name: "Paris, Île-de-France, France".to_string(),
            locality: Some("Paris".to_string()),
            region: Some("Île-de-France".to_string()),
            country: Some("France".to_string()),
            postal_code: Some("75001".to_string()),
        }
    }

    #[test]
    fn test_candidate_name_split() {
        let candidate = SearchCandidate {
            place_id: 7,
            coordinate: Coordinate::new(51.5, -0.12).unwrap(),
            display_name: "London, Greater London, England, United Kingdom".to_string(),
        };
        assert_eq!(candidate.primary_name(), "London");
        assert_eq!(
            candidate.secondary_name(),
            "Greater London, England, United Kingdom"
        );
    }

    #[test]
    fn test_candidate_without_comma() {
        let candidate = SearchCandidate {
            place_id: 8,
            coordinate: Coordinate::new(0.0, 0.0).unwrap(),
            display_name: "Null Island".to_string(),
        };
        assert_eq!(candidate.primary_name(), "Null Island");
        assert_eq!(candidate.secondary_name(), "");
    }

    #[test]
    fn test_address_subtitle() {
        let mut address = record();
        assert_eq!(address.heading(), "Paris");
        assert_eq!(address.subtitle(), "Île-de-France, France");

        address.region = None;
        assert_eq!(address.subtitle(), "France");
    }

    #[test]
    fn test_article_term_fallback() {
        let mut address = record();
        assert_eq!(address.article_term(), Some("Paris"));

        address.locality = None;
        assert_eq!(address.article_term(), Some("Île-de-France"));

        address.region = None;
        assert_eq!(address.article_term(), Some("France"));

        address.country = None;
        assert_eq!(address.article_term(), None);
    }

    #[test]
    fn test_address_serialization_skips_missing() {
        let mut address = record();
        address.postal_code = None;
        let json = serde_json::to_value(&address).unwrap();
        assert!(json.get("postal_code").is_none());
        assert_eq!(json["locality"], "Paris");
    }
}
