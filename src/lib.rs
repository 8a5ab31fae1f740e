//! Location resolution and radius filtering for a barber-discovery app.
//!
//! [`location::LocationResolver`] turns free-text addresses into coordinates
//! over an injected [`location::Gazetteer`]; [`proximity`] measures, filters
//! and orders the results against the user's [`position::PositionState`];
//! [`locator::BarberLocator`] composes the two for UI collaborators.

pub mod config;
pub mod entity;
pub mod geo;
pub mod location;
pub mod locator;
pub mod position;
pub mod proximity;
pub mod server;

pub use entity::{Barber, Locatable, ResolvedEntity};
pub use geo::{haversine_miles, GeoPoint, EARTH_RADIUS_MILES};
pub use location::{Gazetteer, LocationResolver, LocatorError, MatchPolicy};
pub use locator::{BarberLocator, LocateOutcome, ViewMode};
pub use position::{PositionFailure, PositionState};
pub use proximity::{filter_by_radius, ProximityFilter, Reference};
