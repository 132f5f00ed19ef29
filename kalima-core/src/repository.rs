use std::sync::Arc;

use crate::model::{ExampleRecord, VerbFormRecord, WordId, WordRecord};

#[derive(Debug, Clone, thiserror::Error)]
pub enum RepositoryError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only access to the word, verb form and example tables.
///
/// Every method returns rows ordered by id. An empty prefix or term matches
/// nothing. Implementations must be safe to share across concurrent requests.
pub trait WordRepository: Send + Sync {
    /// Words whose precomputed normalized headword starts with `prefix`.
    fn find_by_normalized_prefix(&self, prefix: &str) -> Result<Vec<WordRecord>, RepositoryError>;

    /// Words whose Russian gloss contains `term`, ignoring case.
    fn find_by_russian_substring(&self, term: &str) -> Result<Vec<WordRecord>, RepositoryError>;

    /// Verb forms whose normalized surface form starts with `prefix`.
    fn find_forms_by_normalized_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<VerbFormRecord>, RepositoryError>;

    /// Words whose root equals `root` verbatim.
    fn find_by_root(&self, root: &str) -> Result<Vec<WordRecord>, RepositoryError>;

    fn find_by_ids(&self, ids: &[WordId]) -> Result<Vec<WordRecord>, RepositoryError>;

    fn forms_for(&self, word_ids: &[WordId]) -> Result<Vec<VerbFormRecord>, RepositoryError>;

    fn examples_for(&self, word_ids: &[WordId]) -> Result<Vec<ExampleRecord>, RepositoryError>;
}

impl<T: WordRepository + ?Sized> WordRepository for Arc<T> {
    fn find_by_normalized_prefix(&self, prefix: &str) -> Result<Vec<WordRecord>, RepositoryError> {
        (**self).find_by_normalized_prefix(prefix)
    }

    fn find_by_russian_substring(&self, term: &str) -> Result<Vec<WordRecord>, RepositoryError> {
        (**self).find_by_russian_substring(term)
    }

    fn find_forms_by_normalized_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<VerbFormRecord>, RepositoryError> {
        (**self).find_forms_by_normalized_prefix(prefix)
    }

    fn find_by_root(&self, root: &str) -> Result<Vec<WordRecord>, RepositoryError> {
        (**self).find_by_root(root)
    }

    fn find_by_ids(&self, ids: &[WordId]) -> Result<Vec<WordRecord>, RepositoryError> {
        (**self).find_by_ids(ids)
    }

    fn forms_for(&self, word_ids: &[WordId]) -> Result<Vec<VerbFormRecord>, RepositoryError> {
        (**self).forms_for(word_ids)
    }

    fn examples_for(&self, word_ids: &[WordId]) -> Result<Vec<ExampleRecord>, RepositoryError> {
        (**self).examples_for(word_ids)
    }
}
