use kalima_text::normalize;

use crate::model::{ExampleRecord, VerbFormRecord, WordId, WordRecord};
use crate::repository::{RepositoryError, WordRepository};

/// Vec-backed repository for unit tests.
#[derive(Debug, Default, Clone)]
pub struct FixtureRepository {
    pub words: Vec<WordRecord>,
    pub forms: Vec<VerbFormRecord>,
    pub examples: Vec<ExampleRecord>,
}

impl FixtureRepository {
    pub fn word(mut self, id: WordId, word_ar: &str, word_ru: &str, root: Option<&str>, pos: Option<&str>) -> Self {
        self.words.push(WordRecord {
            id,
            word_ar: word_ar.into(),
            word_ar_normalized: normalize(word_ar),
            word_ru: word_ru.into(),
            root_ar: root.map(Into::into),
            part_of_speech: pos.map(Into::into),
        });
        self
    }

    pub fn form(mut self, id: u64, word_id: WordId, form_number: i32, form_ar: &str, meaning_ru: &str) -> Self {
        self.forms.push(VerbFormRecord {
            id,
            word_id,
            form_number,
            form_ar: form_ar.into(),
            form_ar_normalized: normalize(form_ar),
            meaning_ru: meaning_ru.into(),
        });
        self
    }

    pub fn example(mut self, id: u64, word_id: WordId, text_ar: &str, text_ru: &str) -> Self {
        self.examples.push(ExampleRecord {
            id,
            word_id,
            example_type: "example".into(),
            text_ar: text_ar.into(),
            text_ru: text_ru.into(),
            context: None,
        });
        self
    }

    fn sorted_words(&self, keep: impl Fn(&WordRecord) -> bool) -> Vec<WordRecord> {
        let mut words: Vec<WordRecord> = self.words.iter().filter(|w| keep(w)).cloned().collect();
        words.sort_by_key(|w| w.id);
        words
    }
}

pub fn sample_repository() -> FixtureRepository {
    FixtureRepository::default()
        .word(1, "كَتَبَ", "писать, записывать", Some("كتب"), Some("verb"))
        .word(2, "كِتَاب", "книга", Some("كتب"), Some("noun"))
        .word(3, "مَكْتَبَة", "библиотека", Some("كتب"), Some("noun"))
        .word(4, "مَكْتُوب", "написанный; письмо", Some("كتب"), Some("adjective"))
        .word(5, "فِي", "в", None, Some("particle"))
        .word(6, "قَرَأَ", "читать", Some("قرأ"), Some("verb"))
        .word(7, "كُتُبِيّ", "книжный", Some("كتب"), None)
        .word(8, "دَرَسَ", "учиться, изучать", Some("درس"), Some("verb"))
        .form(1, 1, 1, "يَكْتُبُ", "пишет")
        .form(2, 1, 3, "كَاتَبَ", "переписываться")
        .form(3, 1, 10, "اِسْتَكْتَبَ", "просить написать")
        .form(4, 8, 2, "دَرَّسَ", "преподавать")
        .example(1, 1, "كَتَبَ رِسَالَةً", "написать письмо")
        .example(2, 2, "كِتَابٌ جَدِيدٌ", "новая книга")
}

impl WordRepository for FixtureRepository {
    fn find_by_normalized_prefix(&self, prefix: &str) -> Result<Vec<WordRecord>, RepositoryError> {
        if prefix.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.sorted_words(|w| w.word_ar_normalized.starts_with(prefix)))
    }

    fn find_by_russian_substring(&self, term: &str) -> Result<Vec<WordRecord>, RepositoryError> {
        if term.is_empty() {
            return Ok(Vec::new());
        }
        let term = term.to_lowercase();
        Ok(self.sorted_words(|w| w.word_ru.to_lowercase().contains(&term)))
    }

    fn find_forms_by_normalized_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<VerbFormRecord>, RepositoryError> {
        if prefix.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .forms
            .iter()
            .filter(|f| f.form_ar_normalized.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn find_by_root(&self, root: &str) -> Result<Vec<WordRecord>, RepositoryError> {
        Ok(self.sorted_words(|w| w.root_ar.as_deref() == Some(root)))
    }

    fn find_by_ids(&self, ids: &[WordId]) -> Result<Vec<WordRecord>, RepositoryError> {
        Ok(self.sorted_words(|w| ids.contains(&w.id)))
    }

    fn forms_for(&self, word_ids: &[WordId]) -> Result<Vec<VerbFormRecord>, RepositoryError> {
        Ok(self
            .forms
            .iter()
            .filter(|f| word_ids.contains(&f.word_id))
            .cloned()
            .collect())
    }

    fn examples_for(&self, word_ids: &[WordId]) -> Result<Vec<ExampleRecord>, RepositoryError> {
        Ok(self
            .examples
            .iter()
            .filter(|e| word_ids.contains(&e.word_id))
            .cloned()
            .collect())
    }
}

/// Repository whose every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingRepository;

fn unavailable<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("connection refused".into()))
}

impl WordRepository for FailingRepository {
    fn find_by_normalized_prefix(&self, _prefix: &str) -> Result<Vec<WordRecord>, RepositoryError> {
        unavailable()
    }

    fn find_by_russian_substring(&self, _term: &str) -> Result<Vec<WordRecord>, RepositoryError> {
        unavailable()
    }

    fn find_forms_by_normalized_prefix(
        &self,
        _prefix: &str,
    ) -> Result<Vec<VerbFormRecord>, RepositoryError> {
        unavailable()
    }

    fn find_by_root(&self, _root: &str) -> Result<Vec<WordRecord>, RepositoryError> {
        unavailable()
    }

    fn find_by_ids(&self, _ids: &[WordId]) -> Result<Vec<WordRecord>, RepositoryError> {
        unavailable()
    }

    fn forms_for(&self, _word_ids: &[WordId]) -> Result<Vec<VerbFormRecord>, RepositoryError> {
        unavailable()
    }

    fn examples_for(&self, _word_ids: &[WordId]) -> Result<Vec<ExampleRecord>, RepositoryError> {
        unavailable()
    }
}
