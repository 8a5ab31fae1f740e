//! Composition of resolver and proximity filter for UI collaborators.
//!
//! Flow: resolve every entity's location, then filter or annotate against
//! the user's position according to the view mode. While the position is
//! pending or unavailable no radius is applied and no distances appear.

use serde::{Deserialize, Serialize};

use tracing::debug;

use crate::entity::{Locatable, ResolvedEntity};
use crate::geo::GeoPoint;
use crate::location::LocationResolver;
use crate::position::PositionState;
use crate::proximity::{self, ProximityFilter, Reference};

/// The "show all" / "nearby only" toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[serde(alias = "all")]
    ShowAll,
    #[default]
    #[serde(alias = "nearby")]
    NearbyOnly,
}

/// What a collaborator needs to render a list or map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocateOutcome<T> {
    pub entities: Vec<ResolvedEntity<T>>,
    /// Ids of entities whose location did not resolve.
    pub unresolved: Vec<String>,
    /// True when a radius filter was actually applied.
    pub filtered: bool,
    pub radius_miles: f64,
    /// Where to center the map: the user's position, or the default center.
    pub center: GeoPoint,
    pub position: PositionState,
}

#[derive(Debug, Clone)]
pub struct BarberLocator {
    resolver: LocationResolver,
    default_center: GeoPoint,
}

impl BarberLocator {
    pub fn new(resolver: LocationResolver, default_center: GeoPoint) -> Self {
        Self {
            resolver,
            default_center,
        }
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    /// Attach coordinates to every entity. Unresolved ones are kept with
    /// `coordinates = None`.
    pub fn resolve_all<T: Locatable + Clone>(&self, entities: &[T]) -> Vec<ResolvedEntity<T>> {
        entities
            .iter()
            .map(|e| ResolvedEntity::new(e.clone(), self.resolver.resolve(e.location())))
            .collect()
    }

    pub fn locate<T: Locatable + Clone>(
        &self,
        entities: &[T],
        position: &PositionState,
        mode: ViewMode,
        radius_miles: f64,
    ) -> LocateOutcome<T> {
        self.locate_resolved(self.resolve_all(entities), position, mode, radius_miles)
    }

    /// As [`locate`](Self::locate), for entities the caller already resolved
    /// (e.g. through a [`ResolutionCache`](crate::location::ResolutionCache)).
    pub fn locate_resolved<T: Locatable + Clone>(
        &self,
        resolved: Vec<ResolvedEntity<T>>,
        position: &PositionState,
        mode: ViewMode,
        radius_miles: f64,
    ) -> LocateOutcome<T> {
        let unresolved: Vec<String> = resolved
            .iter()
            .filter(|e| !e.is_resolved())
            .map(|e| e.entity.id().to_string())
            .collect();

        let reference = position.reference();
        let (entities, filtered) = match (mode, reference) {
            (ViewMode::NearbyOnly, Reference::Known(_)) => {
                (ProximityFilter::new(radius_miles).apply(reference, &resolved), true)
            }
            (ViewMode::ShowAll, Reference::Known(point)) => {
                (proximity::annotate(point, &resolved), false)
            }
            (_, Reference::Unknown) => (proximity::without_reference(&resolved), false),
        };

        debug!(
            total = resolved.len(),
            unresolved = unresolved.len(),
            returned = entities.len(),
            filtered,
            "located entities"
        );

        LocateOutcome {
            entities,
            unresolved,
            filtered,
            radius_miles,
            center: position.point().unwrap_or(self.default_center),
            position: *position,
        }
    }
}
