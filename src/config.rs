//! User configuration at `<config dir>/barber-locator/config.json`.
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! A file that exists but does not parse is an error.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::geo::GeoPoint;
use crate::location::{Gazetteer, LocationResolver, LocatorError, MatchPolicy};

/// Map center used until the user's position is known (Los Angeles).
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::from_degrees(34.0522, -118.2437);

pub const DEFAULT_RADIUS_MILES: f64 = 25.0;

pub const RADIUS_OPTIONS_MILES: &[f64] = &[5.0, 10.0, 20.0, 25.0, 50.0, 100.0];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    pub default_radius_miles: f64,
    pub radius_options: Vec<f64>,
    pub default_center: GeoPoint,
    pub match_policy: MatchPolicy,
    /// JSON gazetteer to use instead of the built-in US table.
    pub gazetteer_path: Option<PathBuf>,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            default_radius_miles: DEFAULT_RADIUS_MILES,
            radius_options: RADIUS_OPTIONS_MILES.to_vec(),
            default_center: DEFAULT_CENTER,
            match_policy: MatchPolicy::default(),
            gazetteer_path: None,
            server: ServerConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

impl LocatorConfig {
    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self, LocatorError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("no config directory on this platform; using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from a specific path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, LocatorError> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config file not found; using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(LocatorError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config: Self = serde_json::from_str(&data)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("barber-locator").join("config.json"))
    }

    /// The gazetteer this config selects.
    pub fn gazetteer(&self) -> Result<Gazetteer, LocatorError> {
        match &self.gazetteer_path {
            Some(path) => Gazetteer::from_json_file(path),
            None => Ok(Gazetteer::builtin()),
        }
    }

    /// A resolver over the configured gazetteer and match policy.
    pub fn resolver(&self) -> Result<LocationResolver, LocatorError> {
        Ok(LocationResolver::new(Arc::new(self.gazetteer()?)).with_policy(self.match_policy))
    }
}
