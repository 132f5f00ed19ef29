//! Seed document
//!
//! The three relational tables serialized as one JSON document:
//! `{ "words": [...], "verb_forms": [...], "examples": [...] }`.

use std::collections::HashSet;

use kalima_core::{ExampleRecord, VerbFormRecord, WordRecord};
use kalima_text::normalize;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::StorageError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    pub words: Vec<WordRecord>,
    #[serde(default)]
    pub verb_forms: Vec<VerbFormRecord>,
    #[serde(default)]
    pub examples: Vec<ExampleRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedOptions {
    /// Reject headwords whose stored normalized form disagrees with `normalize`.
    pub strict: bool,
}

impl SeedOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

impl Seed {
    /// Check keys and ownership, and fill in missing normalized columns.
    pub(crate) fn prepare(mut self, options: SeedOptions) -> Result<Self, StorageError> {
        let mut word_ids = HashSet::with_capacity(self.words.len());
        for word in &mut self.words {
            if !word_ids.insert(word.id) {
                return Err(StorageError::DuplicateId {
                    table: "words",
                    id: word.id,
                });
            }

            let expected = normalize(&word.word_ar);
            if word.word_ar_normalized.is_empty() {
                word.word_ar_normalized = expected;
            } else if word.word_ar_normalized != expected {
                if options.strict {
                    return Err(StorageError::InconsistentNormalization {
                        id: word.id,
                        stored: word.word_ar_normalized.clone(),
                        expected,
                    });
                }
                warn!(
                    id = word.id,
                    stored = %word.word_ar_normalized,
                    expected = %expected,
                    "stored normalized headword disagrees with normalizer"
                );
            }
        }

        let mut form_ids = HashSet::with_capacity(self.verb_forms.len());
        for form in &mut self.verb_forms {
            if !form_ids.insert(form.id) {
                return Err(StorageError::DuplicateId {
                    table: "verb_forms",
                    id: form.id,
                });
            }
            if !word_ids.contains(&form.word_id) {
                return Err(StorageError::DanglingReference {
                    table: "verb_forms",
                    id: form.id,
                    word_id: form.word_id,
                });
            }
            // derived column, always recomputed
            form.form_ar_normalized = normalize(&form.form_ar);
        }

        let mut example_ids = HashSet::with_capacity(self.examples.len());
        for example in &self.examples {
            if !example_ids.insert(example.id) {
                return Err(StorageError::DuplicateId {
                    table: "examples",
                    id: example.id,
                });
            }
            if !word_ids.contains(&example.word_id) {
                return Err(StorageError::DanglingReference {
                    table: "examples",
                    id: example.id,
                    word_id: example.word_id,
                });
            }
        }

        self.words.sort_by_key(|word| word.id);
        self.verb_forms.sort_by_key(|form| form.id);
        self.examples.sort_by_key(|example| example.id);
        Ok(self)
    }
}
