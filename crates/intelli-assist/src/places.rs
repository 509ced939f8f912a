//! Place lookup through OpenStreetMap Nominatim
//!
//! Queries like "find parks in Berlin" are split into a place type ("parks")
//! and an area ("berlin") and sent as a single free-text Nominatim search.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::PlacesConfig;
use crate::error::{Error, Result};

const ATTRIBUTION: &str = "OpenStreetMap";
const PROVIDER: &str = "openstreetmap";

/// Words dropped from the place type
const FILLER_WORDS: &[&str] = &["find", "show", "me", "nearest", "closest"];

/// A parsed places query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacesQuery {
    /// What to look for ("parks")
    pub query: String,
    /// Where to look ("berlin")
    pub near: Option<String>,
}

impl PlacesQuery {
    /// Naive parse: split on the first " near " (or else " in ") and strip
    /// filler words from the place type
    pub fn parse(text: &str) -> Self {
        let t = text.to_lowercase();

        let (what, near) = match t.split_once(" near ").or_else(|| t.split_once(" in ")) {
            Some((what, near)) => (what.to_string(), Some(near.trim().to_string())),
            None => (t.clone(), None),
        };

        let query = what
            .split_whitespace()
            .filter(|word| !FILLER_WORDS.contains(word))
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            query,
            near: near.filter(|n| !n.is_empty()),
        }
    }

    /// Free-text search string sent to the geocoder
    pub fn search_text(&self) -> String {
        match &self.near {
            Some(near) => format!("{} {}", self.query, near),
            None => self.query.clone(),
        }
    }
}

/// A place found by the geocoder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    /// OSM does not provide ratings
    pub rating: Option<f32>,
    /// OSM does not provide opening state
    pub open_now: Option<bool>,
    pub provider: &'static str,
}

/// Outcome of a places lookup. Failures are reported in `error`.
#[derive(Debug, Clone, Serialize)]
pub struct PlacesResult {
    pub results: Vec<Place>,
    pub attribution: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlacesResult {
    fn found(results: Vec<Place>) -> Self {
        Self {
            results,
            attribution: vec![ATTRIBUTION],
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            attribution: vec![ATTRIBUTION],
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NominatimItem {
    #[serde(default)]
    display_name: String,
    lat: Option<String>,
    lon: Option<String>,
    #[serde(default)]
    namedetails: Option<NameDetails>,
}

#[derive(Debug, Deserialize)]
struct NameDetails {
    name: Option<String>,
}

impl NominatimItem {
    fn into_place(self) -> Result<Place> {
        let lat = parse_coordinate("lat", self.lat.as_deref())?;
        let lon = parse_coordinate("lon", self.lon.as_deref())?;

        let name = self
            .namedetails
            .and_then(|details| details.name)
            .unwrap_or_else(|| {
                self.display_name
                    .split(',')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            });

        Ok(Place {
            name,
            address: self.display_name,
            lat,
            lon,
            rating: None,
            open_now: None,
            provider: PROVIDER,
        })
    }
}

fn parse_coordinate(field: &str, value: Option<&str>) -> Result<f64> {
    let value = value.ok_or_else(|| Error::places(format!("missing {}", field)))?;
    value
        .trim()
        .parse()
        .map_err(|_| Error::places(format!("invalid {}: {}", field, value)))
}

/// Nominatim client
pub struct PlacesResolver {
    client: Client,
    base_url: String,
    limit: usize,
}

impl PlacesResolver {
    pub fn new(config: &PlacesConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limit: config.limit,
        })
    }

    /// Parse the text and search. Never fails; errors land in `error`.
    pub async fn search_from_text(&self, text: &str) -> PlacesResult {
        let parsed = PlacesQuery::parse(text);
        if parsed.query.is_empty() {
            return PlacesResult::failed("Could not parse place type.");
        }

        match self.search(&parsed).await {
            Ok(results) => {
                tracing::debug!("Found {} places for \"{}\"", results.len(), parsed.search_text());
                PlacesResult::found(results)
            }
            Err(e) => {
                tracing::warn!("Places lookup for \"{}\" failed: {}", parsed.search_text(), e);
                PlacesResult::failed(e.to_string())
            }
        }
    }

    /// One Nominatim search request
    pub async fn search(&self, query: &PlacesQuery) -> Result<Vec<Place>> {
        let url = format!("{}/search", self.base_url);
        let limit = self.limit.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query.search_text().as_str()),
                ("format", "json"),
                ("addressdetails", "1"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::places(format!("HTTP error: {}", response.status())));
        }

        let items: Vec<NominatimItem> = response.json().await?;
        items.into_iter().map(NominatimItem::into_place).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_in() {
        let parsed = PlacesQuery::parse("Find parks in Berlin");
        assert_eq!(parsed.query, "parks");
        assert_eq!(parsed.near.as_deref(), Some("berlin"));
        assert_eq!(parsed.search_text(), "parks berlin");
    }

    #[test]
    fn test_parse_near_takes_precedence() {
        let parsed = PlacesQuery::parse("show me the nearest museums in town near Central Station");
        assert_eq!(parsed.query, "the museums in town");
        assert_eq!(parsed.near.as_deref(), Some("central station"));
    }

    #[test]
    fn test_parse_without_area() {
        let parsed = PlacesQuery::parse("closest pharmacy");
        assert_eq!(parsed.query, "pharmacy");
        assert_eq!(parsed.near, None);

        let parsed = PlacesQuery::parse("cafes in ");
        assert_eq!(parsed.near, None);
    }

    #[test]
    fn test_parse_only_filler() {
        assert!(PlacesQuery::parse("find me").query.is_empty());
    }

    #[test]
    fn test_item_mapping() {
        let items: Vec<NominatimItem> = serde_json::from_str(
            r#"[
                {"display_name": "Tiergarten, Mitte, Berlin, Germany", "lat": "52.514", "lon": "13.350"},
                {"display_name": "Volkspark, Berlin", "lat": "52.5", "lon": "13.4",
                 "namedetails": {"name": "Volkspark Friedrichshain"}}
            ]"#,
        )
        .unwrap();

        let places: Vec<Place> = items
            .into_iter()
            .map(|i| i.into_place().unwrap())
            .collect();
        assert_eq!(places[0].name, "Tiergarten");
        assert_eq!(places[0].address, "Tiergarten, Mitte, Berlin, Germany");
        assert!((places[0].lat - 52.514).abs() < 1e-9);
        assert_eq!(places[0].rating, None);
        assert_eq!(places[1].name, "Volkspark Friedrichshain");
        assert_eq!(places[1].provider, "openstreetmap");
    }

    #[test]
    fn test_item_with_bad_coordinates() {
        let item: NominatimItem =
            serde_json::from_str(r#"{"display_name": "Nowhere", "lat": "north"}"#).unwrap();
        assert!(matches!(item.into_place(), Err(Error::Places(_))));
    }

    #[tokio::test]
    async fn test_unparseable_query_reports_error() {
        let resolver = PlacesResolver::new(&PlacesConfig::default()).unwrap();
        let result = resolver.search_from_text("find me").await;
        assert!(result.results.is_empty());
        assert_eq!(result.error.as_deref(), Some("Could not parse place type."));
        assert_eq!(result.attribution, vec!["OpenStreetMap"]);
    }
}
