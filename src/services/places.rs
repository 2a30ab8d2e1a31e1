use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::config::Config;
use crate::models::place::PlaceResult;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub const DEFAULT_RADIUS_METERS: u32 = 2000;

/// Map a search category to an Overpass tag selector.
pub fn category_selector(category: &str) -> Option<&'static str> {
    match category {
        "park" => Some(r#"leisure="park""#),
        "gym" => Some(r#"leisure="fitness_centre""#),
        "meditation" => Some(r#"amenity="place_of_worship""#),
        "cafe" => Some(r#"amenity="cafe""#),
        _ => None,
    }
}

fn build_query(selector: &str, radius: u32, lat: f64, lng: f64) -> String {
    format!(
        "[out:json];\n(\n  node[{sel}](around:{radius},{lat},{lng});\n  way[{sel}](around:{radius},{lat},{lng});\n);\nout tags center;\n",
        sel = selector,
        radius = radius,
        lat = lat,
        lng = lng,
    )
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

impl OverpassElement {
    fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => self.center.as_ref().map(|c| (c.lat, c.lon)),
        }
    }
}

/// Assemble a display address from structured `addr:*` tags. None when
/// the element carries no address tags at all.
fn assemble_address(tags: &HashMap<String, String>) -> Option<String> {
    let parts: Vec<&str> = [
        "addr:housenumber",
        "addr:street",
        "addr:suburb",
        "addr:city",
        "addr:postcode",
    ]
    .iter()
    .filter_map(|key| tags.get(*key).map(|s| s.as_str()))
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    display_name: Option<String>,
}

#[derive(Clone)]
pub struct PlacesClient {
    client: reqwest::Client,
    overpass_url: String,
    nominatim_url: String,
}

impl PlacesClient {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("mindease-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            overpass_url: config.overpass_url.clone(),
            nominatim_url: config.nominatim_url.clone(),
        }
    }

    /// Search points of interest around a coordinate. Results without
    /// structured address tags get one best-effort reverse-geocode
    /// lookup each; lookup failures degrade to a placeholder address.
    pub async fn search(
        &self,
        lat: f64,
        lng: f64,
        selector: &'static str,
        radius: u32,
    ) -> Result<Vec<PlaceResult>, anyhow::Error> {
        let query = build_query(selector, radius, lat, lng);

        let response = self
            .client
            .post(&self.overpass_url)
            .header("content-type", "text/plain")
            .body(query)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("Overpass API error {}", response.status());
        }

        let data: OverpassResponse = response.json().await?;

        let mut results = Vec::with_capacity(data.elements.len());
        for element in &data.elements {
            let Some((place_lat, place_lng)) = element.coordinates() else {
                continue;
            };

            let name = element
                .tags
                .get("name")
                .cloned()
                .unwrap_or_else(|| "Unnamed place".to_string());

            let address = match assemble_address(&element.tags) {
                Some(address) => address,
                None => self
                    .reverse_geocode(place_lat, place_lng)
                    .await
                    .unwrap_or_else(|| "Address not available".to_string()),
            };

            results.push(PlaceResult {
                name,
                address,
                lat: place_lat,
                lng: place_lng,
                rating: None,
            });
        }

        Ok(results)
    }

    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Option<String> {
        let url = format!(
            "{}/reverse?format=jsonv2&lat={}&lon={}",
            self.nominatim_url, lat, lng
        );

        let response = match self.client.get(&url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::debug!(status = %r.status(), "Reverse geocode refused");
                return None;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Reverse geocode failed");
                return None;
            }
        };

        response
            .json::<NominatimReverse>()
            .await
            .ok()
            .and_then(|r| r.display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_selector_known() {
        assert_eq!(category_selector("park"), Some(r#"leisure="park""#));
        assert_eq!(category_selector("cafe"), Some(r#"amenity="cafe""#));
    }

    #[test]
    fn test_category_selector_unknown() {
        assert_eq!(category_selector("arcade"), None);
    }

    #[test]
    fn test_build_query_targets_both_nodes_and_ways() {
        let q = build_query(r#"leisure="park""#, 1500, 40.7, -74.0);
        assert!(q.contains(r#"node[leisure="park"](around:1500,40.7,-74)"#));
        assert!(q.contains(r#"way[leisure="park"](around:1500,40.7,-74)"#));
        assert!(q.contains("out tags center"));
    }

    #[test]
    fn test_assemble_address_joins_present_tags() {
        let mut tags = HashMap::new();
        tags.insert("addr:housenumber".to_string(), "12".to_string());
        tags.insert("addr:street".to_string(), "Main St".to_string());
        tags.insert("addr:city".to_string(), "Springfield".to_string());

        assert_eq!(
            assemble_address(&tags),
            Some("12, Main St, Springfield".to_string())
        );
    }

    #[test]
    fn test_assemble_address_empty() {
        let tags = HashMap::new();
        assert_eq!(assemble_address(&tags), None);
    }

    #[test]
    fn test_element_coordinates_prefers_node_then_center() {
        let node = OverpassElement {
            lat: Some(1.0),
            lon: Some(2.0),
            center: None,
            tags: HashMap::new(),
        };
        assert_eq!(node.coordinates(), Some((1.0, 2.0)));

        let way = OverpassElement {
            lat: None,
            lon: None,
            center: Some(OverpassCenter { lat: 3.0, lon: 4.0 }),
            tags: HashMap::new(),
        };
        assert_eq!(way.coordinates(), Some((3.0, 4.0)));
    }
}
