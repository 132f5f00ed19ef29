//! Root resolution.
//!
//! Callers may hand over a bare root, a headword or a conjugated surface
//! form. Strategies are tried in order and the first candidate wins; when
//! none matches, the input is kept as the root.

use std::collections::BTreeSet;

use kalima_text::normalize;
use tracing::debug;

use crate::model::{WordId, WordRecord};
use crate::repository::{RepositoryError, WordRepository};

/// Input handed to every strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootQuery<'a> {
    pub raw: &'a str,
    pub normalized: String,
}

impl<'a> RootQuery<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            normalized: normalize(raw),
        }
    }
}

pub trait RootCandidateStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// The root this strategy proposes, if any.
    fn candidate(
        &self,
        repo: &dyn WordRepository,
        query: &RootQuery<'_>,
    ) -> Result<Option<String>, RepositoryError>;
}

/// Some entry carries the input verbatim as its root.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectRoot;

impl RootCandidateStrategy for DirectRoot {
    fn name(&self) -> &'static str {
        "direct-root"
    }

    fn candidate(
        &self,
        repo: &dyn WordRepository,
        query: &RootQuery<'_>,
    ) -> Result<Option<String>, RepositoryError> {
        if repo.find_by_root(query.raw)?.is_empty() {
            return Ok(None);
        }
        Ok(Some(query.raw.to_string()))
    }
}

/// A conjugated form or a headword equals the input after normalization.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactSurfaceForm;

impl RootCandidateStrategy for ExactSurfaceForm {
    fn name(&self) -> &'static str {
        "exact-surface-form"
    }

    fn candidate(
        &self,
        repo: &dyn WordRepository,
        query: &RootQuery<'_>,
    ) -> Result<Option<String>, RepositoryError> {
        if query.normalized.is_empty() {
            return Ok(None);
        }
        let form_owners: Vec<WordId> = repo
            .find_forms_by_normalized_prefix(&query.normalized)?
            .into_iter()
            .filter(|form| form.form_ar_normalized == query.normalized)
            .map(|form| form.word_id)
            .collect();
        let mut candidates = dedup_ids(form_owners);

        candidates.extend(
            repo.find_by_normalized_prefix(&query.normalized)?
                .into_iter()
                .filter(|word| word.word_ar_normalized == query.normalized)
                .map(|word| word.id),
        );

        first_root(repo, &candidates)
    }
}

/// A conjugated form starts with the normalized input.
#[derive(Debug, Default, Clone, Copy)]
pub struct SurfaceFormPrefix;

impl RootCandidateStrategy for SurfaceFormPrefix {
    fn name(&self) -> &'static str {
        "surface-form-prefix"
    }

    fn candidate(
        &self,
        repo: &dyn WordRepository,
        query: &RootQuery<'_>,
    ) -> Result<Option<String>, RepositoryError> {
        if query.normalized.is_empty() {
            return Ok(None);
        }
        let owners = repo
            .find_forms_by_normalized_prefix(&query.normalized)?
            .into_iter()
            .map(|form| form.word_id);
        first_root(repo, &dedup_ids(owners))
    }
}

fn dedup_ids(ids: impl IntoIterator<Item = WordId>) -> BTreeSet<WordId> {
    ids.into_iter().collect()
}

/// Root of the lowest-id candidate that has one.
fn first_root(
    repo: &dyn WordRepository,
    candidates: &BTreeSet<WordId>,
) -> Result<Option<String>, RepositoryError> {
    if candidates.is_empty() {
        return Ok(None);
    }
    let ids: Vec<WordId> = candidates.iter().copied().collect();
    let mut words: Vec<WordRecord> = repo.find_by_ids(&ids)?;
    words.sort_by_key(|word| word.id);
    Ok(words
        .iter()
        .find_map(|word| word.root().map(str::to_string)))
}

/// Ordered strategy chain.
pub struct RootResolver {
    strategies: Vec<Box<dyn RootCandidateStrategy>>,
}

impl Default for RootResolver {
    fn default() -> Self {
        Self {
            strategies: vec![
                Box::new(DirectRoot),
                Box::new(ExactSurfaceForm),
                Box::new(SurfaceFormPrefix),
            ],
        }
    }
}

impl RootResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver with no strategies; every input resolves to itself.
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Append a strategy after the existing ones.
    pub fn with_strategy(mut self, strategy: impl RootCandidateStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Resolve `input` to a root, echoing it back when no strategy matches.
    pub fn resolve(
        &self,
        repo: &dyn WordRepository,
        input: &str,
    ) -> Result<String, RepositoryError> {
        let query = RootQuery::new(input);
        for strategy in &self.strategies {
            if let Some(root) = strategy.candidate(repo, &query)? {
                debug!(input, root = %root, strategy = strategy.name(), "resolved root");
                return Ok(root);
            }
        }
        debug!(input, "no root candidate, keeping input");
        Ok(input.to_string())
    }
}
