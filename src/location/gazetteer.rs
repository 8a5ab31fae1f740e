//! Gazetteer: read-only reference data mapping place names to coordinates.
//!
//! Three tables: cities (with neighbourhood aliases), full state names, and
//! two-letter USPS abbreviations. Abbreviations point at a full state name
//! rather than carrying their own coordinates.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use super::types::LocatorError;
use crate::geo::GeoPoint;

/// One named place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazetteerEntry {
    pub name: String,
    #[serde(flatten)]
    pub point: GeoPoint,
}

/// Immutable, ordered place tables. Table order matters to the resolver.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    cities: Vec<GazetteerEntry>,
    city_index: HashMap<String, usize>,
    states: Vec<GazetteerEntry>,
    state_index: HashMap<String, usize>,
    abbreviations: HashMap<String, String>,
}

impl Gazetteer {
    pub fn builder() -> GazetteerBuilder {
        GazetteerBuilder::default()
    }

    /// The built-in US table.
    pub fn builtin() -> Self {
        let cities = BUILTIN_CITIES
            .iter()
            .flat_map(|c| {
                c.names.iter().map(move |name| GazetteerEntry {
                    name: name.to_string(),
                    point: GeoPoint::from_degrees(c.lat, c.lon),
                })
            })
            .collect();
        let states = US_STATES
            .iter()
            .map(|s| GazetteerEntry {
                name: s.name.to_string(),
                point: GeoPoint::from_degrees(s.lat, s.lon),
            })
            .collect();
        let abbreviations = US_STATES
            .iter()
            .map(|s| (s.abbr.to_string(), s.name.to_string()))
            .collect();
        Self::from_parts(cities, states, abbreviations)
    }

    fn from_parts(
        cities: Vec<GazetteerEntry>,
        states: Vec<GazetteerEntry>,
        abbreviations: HashMap<String, String>,
    ) -> Self {
        let city_index = name_index(&cities);
        let state_index = name_index(&states);
        Self {
            cities,
            city_index,
            states,
            state_index,
            abbreviations,
        }
    }

    /// Load a gazetteer from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, LocatorError> {
        let data = fs::read_to_string(path).map_err(|source| LocatorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self, LocatorError> {
        let file: GazetteerFile = serde_json::from_str(data)?;
        let mut builder = Self::builder();
        for c in file.cities {
            builder = builder.city(c.name, c.point.latitude, c.point.longitude);
        }
        for s in file.states {
            builder = builder.state(s.name, s.point.latitude, s.point.longitude);
        }
        for (abbr, state) in file.abbreviations {
            builder = builder.abbreviation(abbr, state);
        }
        builder.build()
    }

    pub fn cities(&self) -> &[GazetteerEntry] {
        &self.cities
    }

    pub fn states(&self) -> &[GazetteerEntry] {
        &self.states
    }

    pub fn city(&self, name: &str) -> Option<&GazetteerEntry> {
        self.city_index.get(name).map(|&i| &self.cities[i])
    }

    pub fn state(&self, name: &str) -> Option<&GazetteerEntry> {
        self.state_index.get(name).map(|&i| &self.states[i])
    }

    /// Full state name for an uppercase two-letter abbreviation.
    pub fn state_for_abbreviation(&self, abbr: &str) -> Option<&str> {
        self.abbreviations.get(abbr).map(String::as_str)
    }

    pub fn abbreviation_count(&self) -> usize {
        self.abbreviations.len()
    }
}

/// On-disk gazetteer shape.
#[derive(Debug, Deserialize)]
struct GazetteerFile {
    #[serde(default)]
    cities: Vec<GazetteerEntry>,
    #[serde(default)]
    states: Vec<GazetteerEntry>,
    #[serde(default)]
    abbreviations: BTreeMap<String, String>,
}

/// Collects entries and validates them into a [`Gazetteer`].
#[derive(Debug, Default)]
pub struct GazetteerBuilder {
    cities: Vec<(String, f64, f64)>,
    states: Vec<(String, f64, f64)>,
    abbreviations: Vec<(String, String)>,
}

impl GazetteerBuilder {
    pub fn city(mut self, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        self.cities.push((name.into(), latitude, longitude));
        self
    }

    pub fn state(mut self, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        self.states.push((name.into(), latitude, longitude));
        self
    }

    pub fn abbreviation(mut self, abbr: impl Into<String>, state: impl Into<String>) -> Self {
        self.abbreviations.push((abbr.into(), state.into()));
        self
    }

    pub fn build(self) -> Result<Gazetteer, LocatorError> {
        let cities = validate_entries("city", self.cities)?;
        let states = validate_entries("state", self.states)?;

        let mut abbreviations = HashMap::with_capacity(self.abbreviations.len());
        for (abbr, state) in self.abbreviations {
            if abbr.len() != 2 || !abbr.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(LocatorError::InvalidGazetteer(format!(
                    "abbreviation '{}' must be two uppercase ASCII letters",
                    abbr
                )));
            }
            if !states.iter().any(|s| s.name == state) {
                return Err(LocatorError::InvalidGazetteer(format!(
                    "abbreviation '{}' refers to unknown state '{}'",
                    abbr, state
                )));
            }
            abbreviations.insert(abbr, state);
        }

        Ok(Gazetteer::from_parts(cities, states, abbreviations))
    }
}

fn validate_entries(
    kind: &str,
    raw: Vec<(String, f64, f64)>,
) -> Result<Vec<GazetteerEntry>, LocatorError> {
    let mut entries: Vec<GazetteerEntry> = Vec::with_capacity(raw.len());
    for (name, lat, lon) in raw {
        if name.trim().is_empty() {
            return Err(LocatorError::InvalidGazetteer(format!("empty {} name", kind)));
        }
        let point = GeoPoint::new(lat, lon)?;
        if entries.iter().any(|e| e.name == name) {
            return Err(LocatorError::InvalidGazetteer(format!(
                "duplicate {} '{}'",
                kind, name
            )));
        }
        entries.push(GazetteerEntry { name, point });
    }
    Ok(entries)
}

fn name_index(entries: &[GazetteerEntry]) -> HashMap<String, usize> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.name.clone(), i))
        .collect()
}

// ─── Built-in dataset ───────────────────────────────────────────

struct BuiltinCity {
    names: &'static [&'static str], // canonical + aliases
    lat: f64,
    lon: f64,
}

// Neighbourhoods precede the city whose name they contain, so a first-listed
// substring scan sees "West Hollywood" before "Hollywood".
const BUILTIN_CITIES: &[BuiltinCity] = &[
    BuiltinCity { names: &["West Hollywood"], lat: 34.0900, lon: -118.3617 },
    BuiltinCity { names: &["Beverly Hills"], lat: 34.0736, lon: -118.4004 },
    BuiltinCity { names: &["Santa Monica"], lat: 34.0195, lon: -118.4912 },
    BuiltinCity { names: &["Hollywood"], lat: 34.0928, lon: -118.3287 },
    BuiltinCity { names: &["Long Beach"], lat: 33.7701, lon: -118.1937 },
    BuiltinCity { names: &["Pasadena"], lat: 34.1478, lon: -118.1445 },
    BuiltinCity { names: &["Los Angeles", "Downtown LA"], lat: 34.0522, lon: -118.2437 },
    BuiltinCity { names: &["San Diego"], lat: 32.7157, lon: -117.1611 },
    BuiltinCity { names: &["San Jose"], lat: 37.3382, lon: -121.8863 },
    BuiltinCity { names: &["San Francisco"], lat: 37.7749, lon: -122.4194 },
    BuiltinCity { names: &["Oakland"], lat: 37.8044, lon: -122.2712 },
    BuiltinCity { names: &["Sacramento"], lat: 38.5816, lon: -121.4944 },
    BuiltinCity { names: &["Fresno"], lat: 36.7378, lon: -119.7871 },
    BuiltinCity { names: &["Seattle"], lat: 47.6062, lon: -122.3321 },
    BuiltinCity { names: &["Portland"], lat: 45.5152, lon: -122.6784 },
    BuiltinCity { names: &["Las Vegas"], lat: 36.1699, lon: -115.1398 },
    BuiltinCity { names: &["Phoenix"], lat: 33.4484, lon: -112.0740 },
    BuiltinCity { names: &["Denver"], lat: 39.7392, lon: -104.9903 },
    BuiltinCity { names: &["Salt Lake City"], lat: 40.7608, lon: -111.8910 },
    BuiltinCity { names: &["Albuquerque"], lat: 35.0844, lon: -106.6504 },
    BuiltinCity { names: &["Kansas City"], lat: 39.0997, lon: -94.5786 },
    BuiltinCity { names: &["Dallas"], lat: 32.7767, lon: -96.7970 },
    BuiltinCity { names: &["Fort Worth"], lat: 32.7555, lon: -97.3308 },
    BuiltinCity { names: &["Houston"], lat: 29.7604, lon: -95.3698 },
    BuiltinCity { names: &["Austin"], lat: 30.2672, lon: -97.7431 },
    BuiltinCity { names: &["San Antonio"], lat: 29.4241, lon: -98.4936 },
    BuiltinCity { names: &["Oklahoma City"], lat: 35.4676, lon: -97.5164 },
    BuiltinCity { names: &["Minneapolis"], lat: 44.9778, lon: -93.2650 },
    BuiltinCity { names: &["Chicago"], lat: 41.8781, lon: -87.6298 },
    BuiltinCity { names: &["Detroit"], lat: 42.3314, lon: -83.0458 },
    BuiltinCity { names: &["Milwaukee"], lat: 43.0389, lon: -87.9065 },
    BuiltinCity { names: &["St. Louis"], lat: 38.6270, lon: -90.1994 },
    BuiltinCity { names: &["Nashville"], lat: 36.1627, lon: -86.7816 },
    BuiltinCity { names: &["Memphis"], lat: 35.1495, lon: -90.0490 },
    BuiltinCity { names: &["New Orleans"], lat: 29.9511, lon: -90.0715 },
    BuiltinCity { names: &["Atlanta"], lat: 33.7490, lon: -84.3880 },
    BuiltinCity { names: &["Charlotte"], lat: 35.2271, lon: -80.8431 },
    BuiltinCity { names: &["Miami"], lat: 25.7617, lon: -80.1918 },
    BuiltinCity { names: &["Orlando"], lat: 28.5383, lon: -81.3792 },
    BuiltinCity { names: &["Tampa"], lat: 27.9506, lon: -82.4572 },
    BuiltinCity { names: &["Jacksonville"], lat: 30.3322, lon: -81.6557 },
    BuiltinCity { names: &["Brooklyn"], lat: 40.6782, lon: -73.9442 },
    BuiltinCity { names: &["Manhattan"], lat: 40.7831, lon: -73.9712 },
    BuiltinCity { names: &["Queens"], lat: 40.7282, lon: -73.7949 },
    BuiltinCity { names: &["Bronx"], lat: 40.8448, lon: -73.8648 },
    BuiltinCity { names: &["Staten Island"], lat: 40.5795, lon: -74.1502 },
    BuiltinCity { names: &["New York", "NYC"], lat: 40.7128, lon: -74.0060 },
    BuiltinCity { names: &["Newark"], lat: 40.7357, lon: -74.1724 },
    BuiltinCity { names: &["Philadelphia"], lat: 39.9526, lon: -75.1652 },
    BuiltinCity { names: &["Pittsburgh"], lat: 40.4406, lon: -79.9959 },
    BuiltinCity { names: &["Baltimore"], lat: 39.2904, lon: -76.6122 },
    BuiltinCity { names: &["Boston"], lat: 42.3601, lon: -71.0589 },
    BuiltinCity { names: &["Columbus"], lat: 39.9612, lon: -82.9988 },
    BuiltinCity { names: &["Cleveland"], lat: 41.4993, lon: -81.6944 },
    BuiltinCity { names: &["Indianapolis"], lat: 39.7684, lon: -86.1581 },
    BuiltinCity { names: &["Honolulu"], lat: 21.3069, lon: -157.8583 },
    BuiltinCity { names: &["Anchorage"], lat: 61.2181, lon: -149.9003 },
];

struct BuiltinState {
    name: &'static str,
    abbr: &'static str,
    lat: f64,
    lon: f64,
}

/// Approximate geographic centroids.
const US_STATES: &[BuiltinState] = &[
    BuiltinState { name: "Alabama", abbr: "AL", lat: 32.8067, lon: -86.7911 },
    BuiltinState { name: "Alaska", abbr: "AK", lat: 61.3707, lon: -152.4044 },
    BuiltinState { name: "Arizona", abbr: "AZ", lat: 33.7298, lon: -111.4312 },
    BuiltinState { name: "Arkansas", abbr: "AR", lat: 34.9697, lon: -92.3731 },
    BuiltinState { name: "California", abbr: "CA", lat: 36.1162, lon: -119.6816 },
    BuiltinState { name: "Colorado", abbr: "CO", lat: 39.0598, lon: -105.3111 },
    BuiltinState { name: "Connecticut", abbr: "CT", lat: 41.5978, lon: -72.7554 },
    BuiltinState { name: "Delaware", abbr: "DE", lat: 39.3185, lon: -75.5071 },
    BuiltinState { name: "District of Columbia", abbr: "DC", lat: 38.8974, lon: -77.0268 },
    BuiltinState { name: "Florida", abbr: "FL", lat: 27.7663, lon: -81.6868 },
    BuiltinState { name: "Georgia", abbr: "GA", lat: 33.0406, lon: -83.6431 },
    BuiltinState { name: "Hawaii", abbr: "HI", lat: 21.0943, lon: -157.4983 },
    BuiltinState { name: "Idaho", abbr: "ID", lat: 44.2405, lon: -114.4788 },
    BuiltinState { name: "Illinois", abbr: "IL", lat: 40.3495, lon: -88.9861 },
    BuiltinState { name: "Indiana", abbr: "IN", lat: 39.8494, lon: -86.2583 },
    BuiltinState { name: "Iowa", abbr: "IA", lat: 42.0115, lon: -93.2105 },
    BuiltinState { name: "Kansas", abbr: "KS", lat: 38.5266, lon: -96.7265 },
    BuiltinState { name: "Kentucky", abbr: "KY", lat: 37.6681, lon: -84.6701 },
    BuiltinState { name: "Louisiana", abbr: "LA", lat: 31.1695, lon: -91.8678 },
    BuiltinState { name: "Maine", abbr: "ME", lat: 44.6939, lon: -69.3819 },
    BuiltinState { name: "Maryland", abbr: "MD", lat: 39.0639, lon: -76.8021 },
    BuiltinState { name: "Massachusetts", abbr: "MA", lat: 42.2302, lon: -71.5301 },
    BuiltinState { name: "Michigan", abbr: "MI", lat: 43.3266, lon: -84.5361 },
    BuiltinState { name: "Minnesota", abbr: "MN", lat: 45.6945, lon: -93.9002 },
    BuiltinState { name: "Mississippi", abbr: "MS", lat: 32.7416, lon: -89.6787 },
    BuiltinState { name: "Missouri", abbr: "MO", lat: 38.4561, lon: -92.2884 },
    BuiltinState { name: "Montana", abbr: "MT", lat: 46.9219, lon: -110.4544 },
    BuiltinState { name: "Nebraska", abbr: "NE", lat: 41.1254, lon: -98.2681 },
    BuiltinState { name: "Nevada", abbr: "NV", lat: 38.3135, lon: -117.0554 },
    BuiltinState { name: "New Hampshire", abbr: "NH", lat: 43.4525, lon: -71.5639 },
    BuiltinState { name: "New Jersey", abbr: "NJ", lat: 40.2989, lon: -74.5210 },
    BuiltinState { name: "New Mexico", abbr: "NM", lat: 34.8405, lon: -106.2485 },
    BuiltinState { name: "New York", abbr: "NY", lat: 42.1657, lon: -74.9481 },
    BuiltinState { name: "North Carolina", abbr: "NC", lat: 35.6301, lon: -79.8064 },
    BuiltinState { name: "North Dakota", abbr: "ND", lat: 47.5289, lon: -99.7840 },
    BuiltinState { name: "Ohio", abbr: "OH", lat: 40.3888, lon: -82.7649 },
    BuiltinState { name: "Oklahoma", abbr: "OK", lat: 35.5653, lon: -96.9289 },
    BuiltinState { name: "Oregon", abbr: "OR", lat: 44.5720, lon: -122.0709 },
    BuiltinState { name: "Pennsylvania", abbr: "PA", lat: 40.5908, lon: -77.2098 },
    BuiltinState { name: "Rhode Island", abbr: "RI", lat: 41.6809, lon: -71.5118 },
    BuiltinState { name: "South Carolina", abbr: "SC", lat: 33.8569, lon: -80.9450 },
    BuiltinState { name: "South Dakota", abbr: "SD", lat: 44.2998, lon: -99.4388 },
    BuiltinState { name: "Tennessee", abbr: "TN", lat: 35.7478, lon: -86.6923 },
    BuiltinState { name: "Texas", abbr: "TX", lat: 31.0545, lon: -97.5635 },
    BuiltinState { name: "Utah", abbr: "UT", lat: 40.1500, lon: -111.8624 },
    BuiltinState { name: "Vermont", abbr: "VT", lat: 44.0459, lon: -72.7107 },
    BuiltinState { name: "Virginia", abbr: "VA", lat: 37.7693, lon: -78.1700 },
    BuiltinState { name: "Washington", abbr: "WA", lat: 47.4009, lon: -121.4905 },
    BuiltinState { name: "West Virginia", abbr: "WV", lat: 38.4912, lon: -80.9545 },
    BuiltinState { name: "Wisconsin", abbr: "WI", lat: 44.2685, lon: -89.6165 },
    BuiltinState { name: "Wyoming", abbr: "WY", lat: 42.7560, lon: -107.3025 },
];

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_is_valid() {
        let g = Gazetteer::builtin();
        assert_eq!(g.states().len(), 51);
        assert_eq!(g.abbreviation_count(), 51);
        assert!(g.cities().len() >= 50);
    }

    #[test]
    fn test_builtin_passes_builder_validation() {
        let g = Gazetteer::builtin();
        let mut builder = Gazetteer::builder();
        for c in g.cities() {
            builder = builder.city(c.name.clone(), c.point.latitude, c.point.longitude);
        }
        for s in g.states() {
            builder = builder.state(s.name.clone(), s.point.latitude, s.point.longitude);
        }
        for (abbr, state) in &g.abbreviations {
            builder = builder.abbreviation(abbr.clone(), state.clone());
        }
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_builtin_aliases_share_coordinates() {
        let g = Gazetteer::builtin();
        let la = g.city("Los Angeles").unwrap();
        let dtla = g.city("Downtown LA").unwrap();
        assert_eq!(la.point, dtla.point);
        assert_eq!(g.city("NYC").unwrap().point, g.city("New York").unwrap().point);
    }

    #[test]
    fn test_builtin_neighbourhood_before_city() {
        let g = Gazetteer::builtin();
        let pos = |n: &str| g.cities().iter().position(|e| e.name == n).unwrap();
        assert!(pos("West Hollywood") < pos("Hollywood"));
    }

    #[test]
    fn test_abbreviation_points_at_state() {
        let g = Gazetteer::builtin();
        assert_eq!(g.state_for_abbreviation("UT"), Some("Utah"));
        assert_eq!(g.state_for_abbreviation("ut"), None);
        assert!(g.state("Utah").is_some());
    }

    #[test]
    fn test_builder_rejects_unknown_state() {
        let err = Gazetteer::builder()
            .state("Texas", 31.0, -97.5)
            .abbreviation("UT", "Utah")
            .build()
            .unwrap_err();
        assert!(matches!(err, LocatorError::InvalidGazetteer(_)));
    }

    #[test]
    fn test_builder_rejects_bad_abbreviation() {
        let err = Gazetteer::builder()
            .state("Texas", 31.0, -97.5)
            .abbreviation("TEX", "Texas")
            .build()
            .unwrap_err();
        assert!(matches!(err, LocatorError::InvalidGazetteer(_)));
    }

    #[test]
    fn test_builder_rejects_bad_coordinates() {
        let err = Gazetteer::builder().city("Nowhere", 95.0, 0.0).build().unwrap_err();
        assert!(matches!(err, LocatorError::InvalidCoordinates { .. }));
    }

    #[test]
    fn test_builder_rejects_empty_and_duplicate_names() {
        assert!(Gazetteer::builder().city("  ", 0.0, 0.0).build().is_err());
        assert!(Gazetteer::builder()
            .city("Austin", 30.0, -97.0)
            .city("Austin", 30.1, -97.1)
            .build()
            .is_err());
    }

    #[test]
    fn test_from_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gazetteer.json");
        let json = r#"{
            "cities": [{ "name": "Boise", "latitude": 43.615, "longitude": -116.2023 }],
            "states": [{ "name": "Idaho", "latitude": 44.2405, "longitude": -114.4788 }],
            "abbreviations": { "ID": "Idaho" }
        }"#;
        fs::write(&path, json).unwrap();

        let g = Gazetteer::from_json_file(&path).unwrap();
        assert_eq!(g.cities().len(), 1);
        assert_eq!(g.city("Boise").unwrap().point.latitude, 43.615);
        assert_eq!(g.state_for_abbreviation("ID"), Some("Idaho"));
    }

    #[test]
    fn test_from_json_file_missing() {
        let dir = TempDir::new().unwrap();
        let err = Gazetteer::from_json_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, LocatorError::Io { .. }));
    }

    #[test]
    fn test_from_json_rejects_out_of_range_point() {
        let json = r#"{
            "cities": [{ "name": "Nowhere", "latitude": 95.0, "longitude": 0.0 }],
            "states": [],
            "abbreviations": {}
        }"#;
        let err = Gazetteer::from_json_str(json).unwrap_err();
        assert!(matches!(err, LocatorError::Json(_)));
    }

    #[test]
    fn test_from_json_malformed() {
        let err = Gazetteer::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, LocatorError::Json(_)));
    }
}
