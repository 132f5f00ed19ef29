//! Lexical lookup engine.
//!
//! Resolves user input (Arabic headwords, conjugated surface forms or Russian
//! glosses) against a read-only word store: ranked search, root resolution,
//! root-family grouping and prefix autocomplete.

mod engine;
mod forms;
mod grouping;
mod model;
mod ranking;
mod repository;
mod resolver;

#[cfg(test)]
mod testing;

pub use engine::{Lexicon, LookupConfig, LookupError, MAX_SUGGEST_LIMIT};
pub use forms::enrich_forms;
pub use grouping::{group_by_part_of_speech, OTHER_BUCKET};
pub use model::{
    Entry, ExampleRecord, GroupedEntries, LookupOutcome, PosGroup, RootFamily, SearchOutcome,
    Suggestion, UsageExample, VerbForm, VerbFormRecord, WordId, WordRecord,
};
pub use ranking::{match_tier, rank_candidates, MatchTier, QueryTerms};
pub use repository::{RepositoryError, WordRepository};
pub use resolver::{
    DirectRoot, ExactSurfaceForm, RootCandidateStrategy, RootQuery, RootResolver,
    SurfaceFormPrefix,
};
