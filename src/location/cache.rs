//! In-memory memo of resolver results.
//!
//! Keys are the raw location strings, compared case-sensitively like the
//! resolver itself. Misses are remembered too. On reaching capacity the
//! whole map is dropped rather than tracking recency.

use std::collections::HashMap;

use super::resolver::LocationResolver;
use super::types::Resolution;

const DEFAULT_CAPACITY: usize = 4096;

/// The resolution cache.
#[derive(Debug)]
pub struct ResolutionCache {
    entries: HashMap<String, Option<Resolution>>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ResolutionCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Return the memoized result for `location`, resolving on a miss.
    pub fn resolve(&mut self, resolver: &LocationResolver, location: &str) -> Option<Resolution> {
        if let Some(cached) = self.entries.get(location) {
            self.hits += 1;
            return cached.clone();
        }

        self.misses += 1;
        let result = resolver.resolve_detailed(location);
        if self.entries.len() >= self.capacity {
            self.entries.clear();
        }
        self.entries.insert(location.to_string(), result.clone());
        result
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_memoizes_hits() {
        let resolver = LocationResolver::builtin();
        let mut cache = ResolutionCache::default();

        let first = cache.resolve(&resolver, "Chicago, IL");
        let second = cache.resolve(&resolver, "Chicago, IL");
        assert_eq!(first, second);
        assert_eq!(first.unwrap().matched, "Chicago");
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_cache_remembers_misses() {
        let resolver = LocationResolver::builtin();
        let mut cache = ResolutionCache::default();

        assert!(cache.resolve(&resolver, "Atlantis").is_none());
        assert!(cache.resolve(&resolver, "Atlantis").is_none());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_cache_keys_are_case_sensitive() {
        let resolver = LocationResolver::builtin();
        let mut cache = ResolutionCache::default();

        cache.resolve(&resolver, "Denver");
        cache.resolve(&resolver, "denver");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_cache_clears_at_capacity() {
        let resolver = LocationResolver::builtin();
        let mut cache = ResolutionCache::with_capacity(2);

        cache.resolve(&resolver, "Denver");
        cache.resolve(&resolver, "Boston");
        assert_eq!(cache.len(), 2);
        cache.resolve(&resolver, "Miami");
        assert_eq!(cache.len(), 1);
    }
}
