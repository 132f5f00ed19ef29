use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use kalima_text::QueryScript;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::forms::enrich_forms;
use crate::grouping::group_by_part_of_speech;
use crate::model::{
    Entry, LookupOutcome, RootFamily, SearchOutcome, Suggestion, UsageExample, VerbFormRecord,
    WordId, WordRecord,
};
use crate::ranking::{rank_candidates, MatchTier, QueryTerms};
use crate::repository::{RepositoryError, WordRepository};
use crate::resolver::RootResolver;

/// Upper bound for `suggest_limit`; autocomplete stays a short list.
pub const MAX_SUGGEST_LIMIT: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LookupConfig {
    pub search_limit: usize,
    pub suggest_limit: usize,
    /// Autocomplete prefixes shorter than this (in chars) return nothing.
    pub min_suggest_chars: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            search_limit: 20,
            suggest_limit: 2,
            min_suggest_chars: 2,
        }
    }
}

impl LookupConfig {
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit.max(1);
        self
    }

    pub fn with_suggest_limit(mut self, limit: usize) -> Self {
        self.suggest_limit = limit.clamp(1, MAX_SUGGEST_LIMIT);
        self
    }
}

/// Lookup engine over a read-only word store.
#[derive(Clone)]
pub struct Lexicon {
    repo: Arc<dyn WordRepository>,
    resolver: Arc<RootResolver>,
    config: LookupConfig,
}

impl Lexicon {
    pub fn new(repo: Arc<dyn WordRepository>) -> Self {
        Self::with_config(repo, LookupConfig::default())
    }

    pub fn with_config(repo: Arc<dyn WordRepository>, config: LookupConfig) -> Self {
        Self {
            repo,
            resolver: Arc::new(RootResolver::default()),
            config,
        }
    }

    pub fn with_resolver(mut self, resolver: RootResolver) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Ranked entries matching a headword, a conjugated form or a Russian gloss.
    pub fn search(&self, raw_query: &str) -> Result<SearchOutcome, LookupError> {
        let query = raw_query.trim();
        if query.is_empty() {
            return Err(LookupError::InvalidQuery("query must not be empty".into()));
        }

        let terms = QueryTerms::parse(query);
        let words: Vec<WordRecord> = self
            .candidates(&terms)?
            .into_iter()
            .take(self.config.search_limit)
            .map(|(_, word)| word)
            .collect();

        let results = self.assemble(words)?;
        debug!(query = %query, total = results.len(), "search finished");
        Ok(SearchOutcome {
            total: results.len(),
            results,
        })
    }

    /// Canonical root for a bare root, headword or conjugated form.
    pub fn resolve_root(&self, input: &str) -> Result<String, LookupError> {
        Ok(self.resolver.resolve(self.repo.as_ref(), input)?)
    }

    /// Every entry of the resolved root family, bucketed by part of speech.
    pub fn by_root(&self, input: &str) -> Result<RootFamily, LookupError> {
        let original_input = input.trim();
        if original_input.is_empty() {
            return Err(LookupError::InvalidQuery("root must not be empty".into()));
        }

        let root = self.resolve_root(original_input)?;
        let words = self.repo.find_by_root(&root)?;
        let entries = self.assemble(words)?;
        debug!(input = %original_input, root = %root, entries = entries.len(), "root family assembled");

        Ok(RootFamily {
            root,
            original_input: original_input.to_string(),
            grouped: group_by_part_of_speech(entries),
        })
    }

    /// Short labeled candidate list for a typed prefix.
    pub fn suggest(&self, prefix: &str) -> Result<Vec<Suggestion>, LookupError> {
        let prefix = prefix.trim();
        if prefix.chars().count() < self.config.min_suggest_chars {
            return Ok(Vec::new());
        }

        let terms = QueryTerms::parse(prefix);
        let suggestions = self
            .candidates(&terms)?
            .into_iter()
            .take(self.config.suggest_limit)
            .map(|(_, word)| suggestion(word, terms.script))
            .collect::<Vec<_>>();
        debug!(prefix = %prefix, suggestions = suggestions.len(), "suggestions ready");
        Ok(suggestions)
    }

    /// Search, then the root family of the best hit when it has a root.
    pub fn lookup(&self, raw_query: &str) -> Result<LookupOutcome, LookupError> {
        let SearchOutcome { results, total } = self.search(raw_query)?;
        let family = match results.first().and_then(|entry| entry.root_ar.as_deref()) {
            Some(root) if !root.trim().is_empty() => Some(self.by_root(root)?),
            _ => None,
        };
        Ok(LookupOutcome {
            results,
            total,
            family,
        })
    }

    /// Direct headword/gloss matches plus entries reached through their
    /// conjugated forms, deduplicated and ranked.
    fn candidates(
        &self,
        terms: &QueryTerms,
    ) -> Result<Vec<(MatchTier, WordRecord)>, RepositoryError> {
        let mut direct: BTreeMap<WordId, WordRecord> = BTreeMap::new();
        if !terms.pattern.is_empty() {
            for word in self.repo.find_by_normalized_prefix(&terms.pattern)? {
                direct.insert(word.id, word);
            }
        }
        if !terms.gloss.is_empty() {
            for word in self.repo.find_by_russian_substring(&terms.gloss)? {
                direct.insert(word.id, word);
            }
        }

        if !terms.pattern.is_empty() {
            let via_forms: BTreeSet<WordId> = self
                .repo
                .find_forms_by_normalized_prefix(&terms.pattern)?
                .into_iter()
                .map(|form| form.word_id)
                .filter(|id| !direct.contains_key(id))
                .collect();
            if !via_forms.is_empty() {
                let ids: Vec<WordId> = via_forms.into_iter().collect();
                for word in self.repo.find_by_ids(&ids)? {
                    direct.insert(word.id, word);
                }
            }
        }

        Ok(rank_candidates(direct.into_values(), terms))
    }

    /// Attach enriched forms and examples, keeping the order of `words`.
    fn assemble(&self, words: Vec<WordRecord>) -> Result<Vec<Entry>, RepositoryError> {
        if words.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<WordId> = words.iter().map(|word| word.id).collect();

        let mut forms: HashMap<WordId, Vec<VerbFormRecord>> = HashMap::new();
        for form in self.repo.forms_for(&ids)? {
            forms.entry(form.word_id).or_default().push(form);
        }
        let mut examples: HashMap<WordId, Vec<UsageExample>> = HashMap::new();
        for example in self.repo.examples_for(&ids)? {
            examples
                .entry(example.word_id)
                .or_default()
                .push(example.into());
        }

        Ok(words
            .into_iter()
            .map(|word| {
                let verb_forms = enrich_forms(forms.remove(&word.id).unwrap_or_default());
                let examples = examples.remove(&word.id).unwrap_or_default();
                Entry::assemble(word, verb_forms, examples)
            })
            .collect())
    }
}

fn suggestion(word: WordRecord, script: QueryScript) -> Suggestion {
    let label = match script {
        QueryScript::Arabic => format!("{} — {}", word.word_ar, word.word_ru),
        QueryScript::Russian => format!("{} — {}", word.word_ru, word.word_ar),
    };
    Suggestion {
        word_ar: word.word_ar,
        word_ru: word.word_ru,
        root_ar: word.root_ar,
        label,
    }
}
