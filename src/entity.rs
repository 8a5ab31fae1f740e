//! Records the core locates, and their annotated form.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Anything with an identifier and a free-text location.
pub trait Locatable {
    fn id(&self) -> &str;
    fn location(&self) -> &str;
}

/// A barber listing as supplied by the data-listing collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barber {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Locatable for Barber {
    fn id(&self) -> &str {
        &self.id
    }

    fn location(&self) -> &str {
        &self.location
    }
}

/// An entity together with its resolved coordinates and, once a reference
/// point is known, its distance in miles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEntity<T> {
    #[serde(flatten)]
    pub entity: T,
    pub coordinates: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub distance: Option<f64>,
}

impl<T> ResolvedEntity<T> {
    pub fn new(entity: T, coordinates: Option<GeoPoint>) -> Self {
        Self {
            entity,
            coordinates,
            distance: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.coordinates.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barber_json_shape() {
        let json = r#"{"id":"b1","name":"Fade Masters","location":"Downtown LA, CA","rating":4.8}"#;
        let barber: Barber = serde_json::from_str(json).unwrap();
        assert_eq!(barber.location(), "Downtown LA, CA");
        assert!(barber.image_url.is_none());

        let resolved = ResolvedEntity {
            entity: barber,
            coordinates: Some(GeoPoint::from_degrees(34.0522, -118.2437)),
            distance: Some(1.5),
        };
        let v = serde_json::to_value(&resolved).unwrap();
        assert_eq!(v["id"], "b1");
        assert_eq!(v["coordinates"]["latitude"], 34.0522);
        assert_eq!(v["distance"], 1.5);
    }

    #[test]
    fn test_distance_omitted_when_absent() {
        let barber = Barber {
            id: "b2".into(),
            name: "Nowhere Cuts".into(),
            location: "Atlantis".into(),
            rating: 3.0,
            image_url: None,
        };
        let v = serde_json::to_value(ResolvedEntity::new(barber, None)).unwrap();
        assert!(v.get("distance").is_none());
        assert!(v["coordinates"].is_null());
    }
}
