//! Intent classification: the catalog, the fuzzy matcher and the forced-fallback
//! filter that runs ahead of it.

pub mod catalog;
pub mod fallback;
pub mod matcher;
pub mod similarity;

pub use catalog::{Action, Catalog, Intent, IntentId, IntentKind, LaunchTarget, Response, FAREWELL};
pub use fallback::ForcedFallbackFilter;
pub use matcher::{FuzzyMatcher, LengthGuard, MatchKind, MatchResult, Scorer};
