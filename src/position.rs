//! The user's position as reported by the device, in three states.
//!
//! A position request is one-shot. Denial, timeout and missing platform
//! support all collapse to `Unavailable`; there are no retries here.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geo::GeoPoint;
use crate::proximity::Reference;

/// Why no position could be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionFailure {
    Denied,
    Timeout,
    Unsupported,
}

impl fmt::Display for PositionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Denied => write!(f, "permission denied"),
            Self::Timeout => write!(f, "timed out"),
            Self::Unsupported => write!(f, "geolocation unsupported"),
        }
    }
}

/// Pending, known or unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PositionState {
    #[default]
    Pending,
    Known(GeoPoint),
    Unavailable {
        #[serde(default = "default_failure")]
        reason: PositionFailure,
    },
}

fn default_failure() -> PositionFailure {
    PositionFailure::Unsupported
}

impl PositionState {
    /// Convert the single answer of a platform position request.
    pub fn from_report(report: Result<GeoPoint, PositionFailure>) -> Self {
        match report {
            Ok(point) => Self::Known(point),
            Err(reason) => Self::Unavailable { reason },
        }
    }

    pub fn known(point: GeoPoint) -> Self {
        Self::Known(point)
    }

    pub fn point(&self) -> Option<GeoPoint> {
        match self {
            Self::Known(point) => Some(*point),
            _ => None,
        }
    }

    /// Distance reference for the proximity filter. Only a known position
    /// is a reference; pending and unavailable both mean "no position".
    pub fn reference(&self) -> Reference {
        Reference::from(self.point())
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LA: GeoPoint = GeoPoint::from_degrees(34.0522, -118.2437);

    #[test]
    fn test_from_report() {
        assert_eq!(PositionState::from_report(Ok(LA)), PositionState::known(LA));
        assert_eq!(
            PositionState::from_report(Err(PositionFailure::Denied)),
            PositionState::Unavailable { reason: PositionFailure::Denied }
        );
    }

    #[test]
    fn test_reference_mapping() {
        assert_eq!(PositionState::known(LA).reference(), Reference::Known(LA));
        assert_eq!(PositionState::Pending.reference(), Reference::Unknown);
        for reason in [PositionFailure::Denied, PositionFailure::Timeout, PositionFailure::Unsupported] {
            assert_eq!(PositionState::Unavailable { reason }.reference(), Reference::Unknown);
        }
    }

    #[test]
    fn test_json_shape() {
        let known: PositionState =
            serde_json::from_str(r#"{"status":"known","latitude":34.0522,"longitude":-118.2437}"#).unwrap();
        assert_eq!(known, PositionState::known(LA));

        let pending: PositionState = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert!(pending.is_pending());

        let denied: PositionState =
            serde_json::from_str(r#"{"status":"unavailable","reason":"denied"}"#).unwrap();
        assert_eq!(denied, PositionState::Unavailable { reason: PositionFailure::Denied });

        let bare: PositionState = serde_json::from_str(r#"{"status":"unavailable"}"#).unwrap();
        assert_eq!(bare.point(), None);
    }

    #[test]
    fn test_default_is_pending() {
        assert!(PositionState::default().is_pending());
    }
}
