//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::geo::GeoPoint;

/// Which rule of the resolver produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    ExactCity,
    CitySubstring,
    StateName,
    StateAbbreviation,
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactCity => write!(f, "exact city"),
            Self::CitySubstring => write!(f, "city substring"),
            Self::StateName => write!(f, "state name"),
            Self::StateAbbreviation => write!(f, "state abbreviation"),
        }
    }
}

/// How ambiguous substring hits within one rule are settled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// The first gazetteer entry in table order wins. Compatible with the
    /// legacy map view, but "Charleston, West Virginia" lands on Virginia.
    #[default]
    FirstListed,
    /// The longest contained name wins; ties go to the earlier entry.
    LongestMatch,
}

/// A successful resolution with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub point: GeoPoint,
    pub rule: MatchRule,
    /// Gazetteer name that matched (for abbreviations, the full state name).
    pub matched: String,
}

/// Failures that are not ordinary "no match" outcomes.
#[derive(Debug, thiserror::Error)]
pub enum LocatorError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid coordinates ({latitude}, {longitude}). Lat: -90..90, Lon: -180..180")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
    #[error("Invalid gazetteer: {0}")]
    InvalidGazetteer(String),
    #[error("Server error on {addr}: {source}")]
    Server {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
