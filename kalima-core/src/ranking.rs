//! Match specificity tiers.
//!
//! Candidates are fetched first and ordered afterwards, so the tie-break
//! rules can be checked without a store.

use kalima_text::{normalize, QueryScript};
use serde::{Deserialize, Serialize};

use crate::model::WordRecord;

/// Comparison terms derived from a raw query.
///
/// Exactly one of `pattern` (Arabic) and `gloss` (Russian) is in use for a
/// given query; the other is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTerms {
    pub script: QueryScript,
    /// Normalized Arabic pattern, compared against normalized headwords and forms.
    pub pattern: String,
    /// Case-folded Russian term, matched as a substring of glosses.
    pub gloss: String,
}

impl QueryTerms {
    pub fn parse(raw: &str) -> Self {
        let script = QueryScript::detect(raw);
        let folded = normalize(raw);
        match script {
            QueryScript::Arabic => Self {
                script,
                pattern: folded,
                gloss: String::new(),
            },
            QueryScript::Russian => Self {
                script,
                pattern: String::new(),
                gloss: folded,
            },
        }
    }

    /// No term left to compare, e.g. a query made only of diacritics.
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty() && self.gloss.is_empty()
    }
}

/// Lower tiers rank first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatchTier {
    /// Normalized headword equals the pattern.
    Exact = 0,
    /// Normalized headword starts with the pattern.
    Prefix = 1,
    /// Reached through a conjugated form only.
    FormOnly = 2,
    /// Russian gloss contains the term.
    Gloss = 3,
    Other = 4,
}

pub fn match_tier(word: &WordRecord, terms: &QueryTerms) -> MatchTier {
    if !terms.pattern.is_empty() {
        if word.word_ar_normalized == terms.pattern {
            return MatchTier::Exact;
        }
        if word.word_ar_normalized.starts_with(&terms.pattern) {
            return MatchTier::Prefix;
        }
        return MatchTier::FormOnly;
    }
    if !terms.gloss.is_empty() && word.word_ru.to_lowercase().contains(&terms.gloss) {
        return MatchTier::Gloss;
    }
    MatchTier::Other
}

/// Order candidates by tier, then by id.
pub fn rank_candidates(
    candidates: impl IntoIterator<Item = WordRecord>,
    terms: &QueryTerms,
) -> Vec<(MatchTier, WordRecord)> {
    let mut ranked: Vec<(MatchTier, WordRecord)> = candidates
        .into_iter()
        .map(|word| (match_tier(&word, terms), word))
        .collect();
    ranked.sort_by(|(tier_a, word_a), (tier_b, word_b)| {
        tier_a.cmp(tier_b).then(word_a.id.cmp(&word_b.id))
    });
    ranked
}
