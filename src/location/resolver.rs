//! Location resolver: free text to coordinates over an injected gazetteer.
//!
//! Rule order: exact city → city substring → state name → state abbreviation
//! → unresolved. The first rule that matches wins.
//!
//! City and state names compare case-sensitively. Only the abbreviation rule
//! uppercases its tokens, so "ut" finds Utah while "utah" does not; and
//! ordinary words that happen to be abbreviations ("in", "or", "me") do
//! match on that path.

use std::sync::Arc;

use tracing::debug;

use super::gazetteer::{Gazetteer, GazetteerEntry};
use super::types::{MatchPolicy, MatchRule, Resolution};
use crate::geo::GeoPoint;

/// Pure, stateless resolver. Cheap to clone; shares its gazetteer.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    gazetteer: Arc<Gazetteer>,
    policy: MatchPolicy,
}

impl LocationResolver {
    pub fn new(gazetteer: Arc<Gazetteer>) -> Self {
        Self {
            gazetteer,
            policy: MatchPolicy::default(),
        }
    }

    /// Resolver over the built-in US gazetteer.
    pub fn builtin() -> Self {
        Self::new(Arc::new(Gazetteer::builtin()))
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    /// Map a location string to coordinates, or `None` when nothing matches.
    pub fn resolve(&self, location: &str) -> Option<GeoPoint> {
        self.resolve_detailed(location).map(|r| r.point)
    }

    /// Like [`resolve`](Self::resolve), but also reports which rule fired.
    pub fn resolve_detailed(&self, location: &str) -> Option<Resolution> {
        if location.trim().is_empty() {
            return None;
        }

        // 1. Exact city key
        if let Some(entry) = self.gazetteer.city(location) {
            return Some(self.hit(location, MatchRule::ExactCity, entry));
        }

        // 2. City name contained in the string
        if let Some(entry) = self.find_contained(location, self.gazetteer.cities()) {
            return Some(self.hit(location, MatchRule::CitySubstring, entry));
        }

        // 3. Full state name contained in the string
        if let Some(entry) = self.find_contained(location, self.gazetteer.states()) {
            return Some(self.hit(location, MatchRule::StateName, entry));
        }

        // 4. Two-letter abbreviation token, resolved through the state table
        for token in tokens(location) {
            let upper = token.to_uppercase();
            let entry = self
                .gazetteer
                .state_for_abbreviation(&upper)
                .and_then(|state| self.gazetteer.state(state));
            if let Some(entry) = entry {
                return Some(self.hit(location, MatchRule::StateAbbreviation, entry));
            }
        }

        debug!(location, "location unresolved");
        None
    }

    fn find_contained<'g>(
        &self,
        location: &str,
        entries: &'g [GazetteerEntry],
    ) -> Option<&'g GazetteerEntry> {
        let mut hits = entries.iter().filter(|e| location.contains(e.name.as_str()));
        match self.policy {
            MatchPolicy::FirstListed => hits.next(),
            MatchPolicy::LongestMatch => {
                let mut best: Option<&'g GazetteerEntry> = None;
                for e in hits {
                    // Strictly longer only, so ties keep the earlier entry.
                    if best.map_or(true, |b| e.name.len() > b.name.len()) {
                        best = Some(e);
                    }
                }
                best
            }
        }
    }

    fn hit(&self, location: &str, rule: MatchRule, entry: &GazetteerEntry) -> Resolution {
        debug!(location, %rule, matched = %entry.name, "location resolved");
        Resolution {
            point: entry.point,
            rule,
            matched: entry.name.clone(),
        }
    }
}

fn tokens(location: &str) -> impl Iterator<Item = &str> {
    location
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
}
