//! Location resolution subsystem.
//!
//! Turns free-text barber addresses into coordinates using an injected
//! gazetteer, with an optional memo for long-running services.

pub mod cache;
pub mod gazetteer;
pub mod resolver;
pub mod types;

pub use cache::ResolutionCache;
pub use gazetteer::{Gazetteer, GazetteerBuilder, GazetteerEntry};
pub use resolver::LocationResolver;
pub use types::{LocatorError, MatchPolicy, MatchRule, Resolution};
