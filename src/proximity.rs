//! Proximity filter: distance annotation, radius cut-off and ordering.
//!
//! Unresolved entities never reach the output. Output is ordered by
//! ascending distance with ties kept in input order. A radius of zero or
//! less (or NaN) yields an empty result, not an error.

use std::cmp::Ordering;

use crate::entity::ResolvedEntity;
use crate::geo::{haversine_miles, GeoPoint};

/// The point distances are measured from, or the explicit absence of one.
///
/// `Unknown` replaces any "sentinel coordinate" convention: no distances are
/// ever computed from a placeholder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reference {
    Known(GeoPoint),
    Unknown,
}

impl From<Option<GeoPoint>> for Reference {
    fn from(point: Option<GeoPoint>) -> Self {
        point.map_or(Reference::Unknown, Reference::Known)
    }
}

/// A radius filter in miles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityFilter {
    radius_miles: f64,
}

impl ProximityFilter {
    pub fn new(radius_miles: f64) -> Self {
        Self { radius_miles }
    }

    pub fn radius_miles(&self) -> f64 {
        self.radius_miles
    }

    /// Filter against `reference`. With no reference the full resolved set
    /// comes back in input order, distances left empty.
    pub fn apply<T: Clone>(
        &self,
        reference: Reference,
        entities: &[ResolvedEntity<T>],
    ) -> Vec<ResolvedEntity<T>> {
        match reference {
            Reference::Known(point) => filter_by_radius(point, entities, self.radius_miles),
            Reference::Unknown => without_reference(entities),
        }
    }

    /// As [`apply`](Self::apply), with a caller-chosen order for the
    /// no-reference case.
    pub fn apply_with_fallback_order<T, F>(
        &self,
        reference: Reference,
        entities: &[ResolvedEntity<T>],
        compare: F,
    ) -> Vec<ResolvedEntity<T>>
    where
        T: Clone,
        F: FnMut(&T, &T) -> Ordering,
    {
        match reference {
            Reference::Known(point) => filter_by_radius(point, entities, self.radius_miles),
            Reference::Unknown => without_reference_by(entities, compare),
        }
    }
}

/// Entities within `radius_miles` of `reference` (inclusive), nearest first.
pub fn filter_by_radius<T: Clone>(
    reference: GeoPoint,
    entities: &[ResolvedEntity<T>],
    radius_miles: f64,
) -> Vec<ResolvedEntity<T>> {
    if radius_miles.is_nan() || radius_miles <= 0.0 {
        return Vec::new();
    }
    // annotate() sorts; filtering keeps that order.
    annotate(reference, entities)
        .into_iter()
        .filter(|e| e.distance.is_some_and(|d| d <= radius_miles))
        .collect()
}

/// Every resolved entity with its distance from `reference`, nearest first.
/// No radius is applied.
pub fn annotate<T: Clone>(
    reference: GeoPoint,
    entities: &[ResolvedEntity<T>],
) -> Vec<ResolvedEntity<T>> {
    let mut annotated: Vec<ResolvedEntity<T>> = entities
        .iter()
        .filter_map(|e| {
            let point = e.coordinates?;
            Some(ResolvedEntity {
                entity: e.entity.clone(),
                coordinates: Some(point),
                distance: Some(haversine_miles(reference, point)),
            })
        })
        .collect();
    // Vec::sort_by is stable: equal distances keep input order.
    annotated.sort_by(|a, b| by_distance(a.distance, b.distance));
    annotated
}

/// The no-reference view: resolved entities in input order, no distances.
pub fn without_reference<T: Clone>(entities: &[ResolvedEntity<T>]) -> Vec<ResolvedEntity<T>> {
    entities
        .iter()
        .filter(|e| e.is_resolved())
        .map(|e| ResolvedEntity {
            entity: e.entity.clone(),
            coordinates: e.coordinates,
            distance: None,
        })
        .collect()
}

/// The no-reference view ordered by a caller-supplied key (stable).
pub fn without_reference_by<T, F>(
    entities: &[ResolvedEntity<T>],
    mut compare: F,
) -> Vec<ResolvedEntity<T>>
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let mut all = without_reference(entities);
    all.sort_by(|a, b| compare(&a.entity, &b.entity));
    all
}

fn by_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const LA: GeoPoint = GeoPoint::from_degrees(34.0522, -118.2437);
    const SANTA_MONICA: GeoPoint = GeoPoint::from_degrees(34.0195, -118.4912);
    const PASADENA: GeoPoint = GeoPoint::from_degrees(34.1478, -118.1445);
    const SAN_DIEGO: GeoPoint = GeoPoint::from_degrees(32.7157, -117.1611);

    fn entity(id: &'static str, point: Option<GeoPoint>) -> ResolvedEntity<&'static str> {
        ResolvedEntity::new(id, point)
    }

    fn ids<T: Copy>(v: &[ResolvedEntity<T>]) -> Vec<T> {
        v.iter().map(|e| e.entity).collect()
    }

    #[test]
    fn test_filter_sorts_by_distance() {
        let input = vec![
            entity("san-diego", Some(SAN_DIEGO)),
            entity("santa-monica", Some(SANTA_MONICA)),
            entity("pasadena", Some(PASADENA)),
        ];
        let out = filter_by_radius(LA, &input, 50.0);
        assert_eq!(ids(&out), vec!["pasadena", "santa-monica"]);
        assert!(out[0].distance.unwrap() <= out[1].distance.unwrap());
    }

    #[test]
    fn test_unresolved_excluded() {
        let input = vec![entity("nowhere", None), entity("here", Some(LA))];
        let out = filter_by_radius(LA, &input, 5.0);
        assert_eq!(ids(&out), vec!["here"]);
        assert_eq!(out[0].distance, Some(0.0));
    }

    #[test]
    fn test_radius_boundary_inclusive() {
        let d = haversine_miles(LA, PASADENA);
        let input = vec![entity("pasadena", Some(PASADENA))];
        assert_eq!(filter_by_radius(LA, &input, d).len(), 1);
        assert!(filter_by_radius(LA, &input, d * 0.999).is_empty());
    }

    #[test]
    fn test_zero_and_negative_radius_empty() {
        let input = vec![entity("here", Some(LA))];
        assert!(filter_by_radius(LA, &input, 0.0).is_empty());
        assert!(filter_by_radius(LA, &input, -5.0).is_empty());
        assert!(filter_by_radius(LA, &input, f64::NAN).is_empty());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let input = vec![
            entity("second-shop", Some(PASADENA)),
            entity("first-shop", Some(SANTA_MONICA)),
            entity("third-shop", Some(PASADENA)),
            entity("fourth-shop", Some(PASADENA)),
        ];
        let out = filter_by_radius(PASADENA, &input, 100.0);
        assert_eq!(
            ids(&out),
            vec!["second-shop", "third-shop", "fourth-shop", "first-shop"]
        );
    }

    #[test]
    fn test_annotate_keeps_out_of_radius_entities() {
        let input = vec![
            entity("san-diego", Some(SAN_DIEGO)),
            entity("nowhere", None),
            entity("here", Some(LA)),
        ];
        let out = annotate(LA, &input);
        assert_eq!(ids(&out), vec!["here", "san-diego"]);
        assert_relative_eq!(
            out[1].distance.unwrap(),
            haversine_miles(LA, SAN_DIEGO),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_unknown_reference_returns_full_resolved_set() {
        let input = vec![
            entity("san-diego", Some(SAN_DIEGO)),
            entity("nowhere", None),
            entity("here", Some(LA)),
        ];
        let out = ProximityFilter::new(5.0).apply(Reference::Unknown, &input);
        assert_eq!(ids(&out), vec!["san-diego", "here"]);
        assert!(out.iter().all(|e| e.distance.is_none()));
    }

    #[test]
    fn test_known_reference_filters() {
        let input = vec![entity("san-diego", Some(SAN_DIEGO)), entity("here", Some(LA))];
        let out = ProximityFilter::new(5.0).apply(Reference::Known(LA), &input);
        assert_eq!(ids(&out), vec!["here"]);
    }

    #[test]
    fn test_fallback_order_applies_only_without_reference() {
        let input = vec![
            entity("b", Some(SAN_DIEGO)),
            entity("a", Some(PASADENA)),
            entity("c", Some(LA)),
        ];
        let filter = ProximityFilter::new(500.0);
        let unknown = filter.apply_with_fallback_order(Reference::Unknown, &input, |x, y| x.cmp(y));
        assert_eq!(ids(&unknown), vec!["a", "b", "c"]);

        let known = filter.apply_with_fallback_order(Reference::Known(LA), &input, |x, y| x.cmp(y));
        assert_eq!(ids(&known), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_reference_from_option() {
        assert_eq!(Reference::from(None), Reference::Unknown);
        assert_eq!(Reference::from(Some(LA)), Reference::Known(LA));
    }

    #[test]
    fn test_empty_input() {
        let input: Vec<ResolvedEntity<&str>> = Vec::new();
        assert!(filter_by_radius(LA, &input, 10.0).is_empty());
        assert!(annotate(LA, &input).is_empty());
    }
}
