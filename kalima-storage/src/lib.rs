use kalima_core::{
    ExampleRecord, RepositoryError, VerbFormRecord, WordId, WordRecord, WordRepository,
};
use metrics::{counter, gauge};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

mod seed;

pub use seed::{Seed, SeedOptions};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("duplicate id {id} in {table}")]
    DuplicateId { table: &'static str, id: u64 },

    #[error("{table} row {id} references missing word {word_id}")]
    DanglingReference {
        table: &'static str,
        id: u64,
        word_id: WordId,
    },

    #[error("word {id}: stored normalized form {stored:?} differs from {expected:?}")]
    InconsistentNormalization {
        id: WordId,
        stored: String,
        expected: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreStats {
    pub words: usize,
    pub verb_forms: usize,
    pub examples: usize,
    pub roots: usize,
}

/// Read-only, in-memory copy of the word, verb form and example tables.
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Debug)]
pub struct Storage {
    words: Vec<WordRecord>,
    /// Lowercased `word_ru`, parallel to `words`.
    folded_glosses: Vec<String>,
    forms: Vec<VerbFormRecord>,
    examples: Vec<ExampleRecord>,
    word_index: HashMap<WordId, usize>,
    forms_by_word: HashMap<WordId, Vec<usize>>,
    examples_by_word: HashMap<WordId, Vec<usize>>,
}

impl Storage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::open_with(path, SeedOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: SeedOptions) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let seed: Seed = serde_json::from_reader(BufReader::new(file))?;
        let storage = Self::from_seed(seed, options)?;
        let stats = storage.stats();
        info!(
            path = %path.display(),
            words = stats.words,
            verb_forms = stats.verb_forms,
            examples = stats.examples,
            roots = stats.roots,
            "seed loaded"
        );
        Ok(storage)
    }

    pub fn from_seed(seed: Seed, options: SeedOptions) -> Result<Self, StorageError> {
        let Seed {
            words,
            verb_forms,
            examples,
        } = seed.prepare(options)?;

        let folded_glosses = words.iter().map(|w| w.word_ru.to_lowercase()).collect();
        let word_index = words
            .iter()
            .enumerate()
            .map(|(position, word)| (word.id, position))
            .collect();

        let mut forms_by_word: HashMap<WordId, Vec<usize>> = HashMap::new();
        for (position, form) in verb_forms.iter().enumerate() {
            forms_by_word.entry(form.word_id).or_default().push(position);
        }
        let mut examples_by_word: HashMap<WordId, Vec<usize>> = HashMap::new();
        for (position, example) in examples.iter().enumerate() {
            examples_by_word
                .entry(example.word_id)
                .or_default()
                .push(position);
        }

        let storage = Self {
            words,
            folded_glosses,
            forms: verb_forms,
            examples,
            word_index,
            forms_by_word,
            examples_by_word,
        };
        storage.record_row_gauges();
        Ok(storage)
    }

    pub fn stats(&self) -> StoreStats {
        let roots: BTreeSet<&str> = self.words.iter().filter_map(|w| w.root()).collect();
        StoreStats {
            words: self.words.len(),
            verb_forms: self.forms.len(),
            examples: self.examples.len(),
            roots: roots.len(),
        }
    }

    /// Headwords whose stored normalized form disagrees with the normalizer.
    pub fn normalization_mismatches(&self) -> Vec<WordId> {
        self.words
            .iter()
            .filter(|w| kalima_text::normalize(&w.word_ar) != w.word_ar_normalized)
            .map(|w| w.id)
            .collect()
    }

    fn record_row_gauges(&self) {
        gauge!("store_rows", "table" => "words").set(self.words.len() as f64);
        gauge!("store_rows", "table" => "verb_forms").set(self.forms.len() as f64);
        gauge!("store_rows", "table" => "examples").set(self.examples.len() as f64);
    }

    fn record_query(query: &'static str) {
        counter!("store_queries_total", "query" => query).increment(1);
    }

    /// Words at the given positions of `words`, which are already id-ordered.
    fn words_at(&self, mut positions: Vec<usize>) -> Vec<WordRecord> {
        positions.sort_unstable();
        positions
            .into_iter()
            .map(|position| self.words[position].clone())
            .collect()
    }

    fn owned_rows<T: Clone>(
        rows: &[T],
        index: &HashMap<WordId, Vec<usize>>,
        word_ids: &[WordId],
    ) -> Vec<T> {
        let mut positions: Vec<usize> = word_ids
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|id| index.get(id))
            .flatten()
            .copied()
            .collect();
        positions.sort_unstable();
        positions.into_iter().map(|p| rows[p].clone()).collect()
    }
}

impl WordRepository for Storage {
    fn find_by_normalized_prefix(&self, prefix: &str) -> Result<Vec<WordRecord>, RepositoryError> {
        Self::record_query("find_by_normalized_prefix");
        if prefix.is_empty() {
            return Ok(Vec::new());
        }
        let positions = self
            .words
            .par_iter()
            .enumerate()
            .filter(|(_, word)| word.word_ar_normalized.starts_with(prefix))
            .map(|(position, _)| position)
            .collect();
        Ok(self.words_at(positions))
    }

    fn find_by_russian_substring(&self, term: &str) -> Result<Vec<WordRecord>, RepositoryError> {
        Self::record_query("find_by_russian_substring");
        if term.is_empty() {
            return Ok(Vec::new());
        }
        let term = term.to_lowercase();
        let positions = self
            .folded_glosses
            .par_iter()
            .enumerate()
            .filter(|(_, gloss)| gloss.contains(&term))
            .map(|(position, _)| position)
            .collect();
        Ok(self.words_at(positions))
    }

    fn find_forms_by_normalized_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<VerbFormRecord>, RepositoryError> {
        Self::record_query("find_forms_by_normalized_prefix");
        if prefix.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .forms
            .par_iter()
            .filter(|form| form.form_ar_normalized.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn find_by_root(&self, root: &str) -> Result<Vec<WordRecord>, RepositoryError> {
        Self::record_query("find_by_root");
        Ok(self
            .words
            .iter()
            .filter(|word| word.root_ar.as_deref() == Some(root))
            .cloned()
            .collect())
    }

    fn find_by_ids(&self, ids: &[WordId]) -> Result<Vec<WordRecord>, RepositoryError> {
        Self::record_query("find_by_ids");
        let positions = ids
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|id| self.word_index.get(id).copied())
            .collect();
        Ok(self.words_at(positions))
    }

    fn forms_for(&self, word_ids: &[WordId]) -> Result<Vec<VerbFormRecord>, RepositoryError> {
        Self::record_query("forms_for");
        Ok(Self::owned_rows(&self.forms, &self.forms_by_word, word_ids))
    }

    fn examples_for(&self, word_ids: &[WordId]) -> Result<Vec<ExampleRecord>, RepositoryError> {
        Self::record_query("examples_for");
        Ok(Self::owned_rows(
            &self.examples,
            &self.examples_by_word,
            word_ids,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn sample_seed() -> Seed {
        serde_json::from_value(json!({
            "words": [
                {"id": 2, "word_ar": "كِتَاب", "word_ru": "Книга", "root_ar": "كتب", "part_of_speech": "noun"},
                {"id": 1, "word_ar": "كَتَبَ", "word_ru": "писать, записывать", "root_ar": "كتب", "part_of_speech": "verb"},
                {"id": 3, "word_ar": "فِي", "word_ru": "в"}
            ],
            "verb_forms": [
                {"id": 11, "word_id": 1, "form_number": 3, "form_ar": "كَاتَبَ", "meaning_ru": "переписываться"},
                {"id": 10, "word_id": 1, "form_number": 1, "form_ar": "يَكْتُبُ", "meaning_ru": "пишет"}
            ],
            "examples": [
                {"id": 5, "word_id": 2, "example_type": "example", "text_ar": "كِتَابٌ", "text_ru": "книга"}
            ]
        }))
        .unwrap()
    }

    fn storage() -> Storage {
        Storage::from_seed(sample_seed(), SeedOptions::default()).unwrap()
    }

    #[test]
    fn fills_normalized_columns_and_orders_by_id() {
        let storage = storage();
        let words = storage.find_by_normalized_prefix("كت").unwrap();
        let ids: Vec<WordId> = words.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(words[0].word_ar_normalized, "كتب");
        assert!(storage.normalization_mismatches().is_empty());
    }

    #[test]
    fn russian_substring_ignores_case() {
        let storage = storage();
        let words = storage.find_by_russian_substring("КНИГ").unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].id, 2);
        assert!(storage.find_by_russian_substring("").unwrap().is_empty());
    }

    #[test]
    fn forms_are_matched_on_normalized_surface() {
        let storage = storage();
        let forms = storage.find_forms_by_normalized_prefix("يكت").unwrap();
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].word_id, 1);
        assert!(storage.find_forms_by_normalized_prefix("").unwrap().is_empty());

        let owned: Vec<u64> = storage.forms_for(&[1, 1]).unwrap().iter().map(|f| f.id).collect();
        assert_eq!(owned, vec![10, 11]);
    }

    #[test]
    fn root_lookup_is_verbatim() {
        let storage = storage();
        assert_eq!(storage.find_by_root("كتب").unwrap().len(), 2);
        assert!(storage.find_by_root("كَتَبَ").unwrap().is_empty());
        assert_eq!(storage.stats().roots, 1);
    }

    #[test]
    fn unknown_ids_are_skipped() {
        let storage = storage();
        let words = storage.find_by_ids(&[3, 99, 1]).unwrap();
        let ids: Vec<WordId> = words.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(storage.examples_for(&[99]).unwrap().is_empty());
    }

    #[test]
    fn rejects_dangling_forms() {
        let mut seed = sample_seed();
        seed.verb_forms[0].word_id = 42;
        let err = Storage::from_seed(seed, SeedOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            StorageError::DanglingReference { table: "verb_forms", word_id: 42, .. }
        ));
    }

    #[test]
    fn rejects_duplicate_words() {
        let mut seed = sample_seed();
        seed.words[2].id = 1;
        let err = Storage::from_seed(seed, SeedOptions::default()).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateId { table: "words", id: 1 }));
    }

    #[test]
    fn strict_mode_rejects_stale_normalized_headwords() {
        let mut seed = sample_seed();
        seed.words[0].word_ar_normalized = "كِتَاب".into();

        let lenient = Storage::from_seed(seed.clone(), SeedOptions::default()).unwrap();
        assert_eq!(lenient.normalization_mismatches(), vec![2]);

        let err = Storage::from_seed(seed, SeedOptions::strict()).unwrap_err();
        assert!(matches!(
            err,
            StorageError::InconsistentNormalization { id: 2, .. }
        ));
    }

    #[test]
    fn opens_seed_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(serde_json::to_string(&sample_seed()).unwrap().as_bytes())
            .unwrap();
        drop(file);

        let storage = Storage::open(&path).unwrap();
        assert_eq!(storage.stats().words, 3);

        assert!(matches!(
            Storage::open(dir.path().join("missing.json")).unwrap_err(),
            StorageError::Io(_)
        ));
    }
}
