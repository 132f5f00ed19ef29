use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub type WordId = u64;

/// A dictionary headword row as held by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordRecord {
    pub id: WordId,
    pub word_ar: String,
    /// Precomputed `normalize(word_ar)`; filled in by the store when a seed omits it.
    #[serde(default)]
    pub word_ar_normalized: String,
    pub word_ru: String,
    #[serde(default)]
    pub root_ar: Option<String>,
    #[serde(default)]
    pub part_of_speech: Option<String>,
}

impl WordRecord {
    /// Root usable for a family lookup; blank roots count as missing.
    pub fn root(&self) -> Option<&str> {
        self.root_ar
            .as_deref()
            .map(str::trim)
            .filter(|root| !root.is_empty())
    }
}

/// A conjugated form row owned by exactly one word.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerbFormRecord {
    pub id: u64,
    pub word_id: WordId,
    pub form_number: i32,
    pub form_ar: String,
    #[serde(default)]
    pub form_ar_normalized: String,
    #[serde(default)]
    pub meaning_ru: String,
}

/// A usage example or set expression row owned by exactly one word.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExampleRecord {
    pub id: u64,
    pub word_id: WordId,
    pub example_type: String,
    pub text_ar: String,
    pub text_ru: String,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerbForm {
    pub form_number: i32,
    pub form_ar: String,
    pub meaning_ru: String,
    pub form_roman: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageExample {
    pub id: u64,
    pub example_type: String,
    pub text_ar: String,
    pub text_ru: String,
    pub context: Option<String>,
}

impl From<ExampleRecord> for UsageExample {
    fn from(record: ExampleRecord) -> Self {
        Self {
            id: record.id,
            example_type: record.example_type,
            text_ar: record.text_ar,
            text_ru: record.text_ru,
            context: record.context,
        }
    }
}

/// A fully assembled entry as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    pub id: WordId,
    pub word_ar: String,
    pub word_ru: String,
    pub root_ar: Option<String>,
    pub part_of_speech: Option<String>,
    pub verb_forms: Vec<VerbForm>,
    pub examples: Vec<UsageExample>,
}

impl Entry {
    pub fn assemble(word: WordRecord, verb_forms: Vec<VerbForm>, examples: Vec<UsageExample>) -> Self {
        Self {
            id: word.id,
            word_ar: word.word_ar,
            word_ru: word.word_ru,
            root_ar: word.root_ar,
            part_of_speech: word.part_of_speech,
            verb_forms,
            examples,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Suggestion {
    pub word_ar: String,
    pub word_ru: String,
    pub root_ar: Option<String>,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchOutcome {
    pub results: Vec<Entry>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RootFamily {
    pub root: String,
    pub original_input: String,
    pub grouped: GroupedEntries,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LookupOutcome {
    pub results: Vec<Entry>,
    pub total: usize,
    pub family: Option<RootFamily>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosGroup {
    pub part_of_speech: String,
    pub entries: Vec<Entry>,
}

/// Part-of-speech buckets in display order.
///
/// Serializes as a JSON object whose keys keep the bucket order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedEntries(Vec<PosGroup>);

impl GroupedEntries {
    pub fn new(groups: Vec<PosGroup>) -> Self {
        Self(groups)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, part_of_speech: &str) -> Option<&[Entry]> {
        self.0
            .iter()
            .find(|group| group.part_of_speech == part_of_speech)
            .map(|group| group.entries.as_slice())
    }

    pub fn labels(&self) -> Vec<&str> {
        self.0
            .iter()
            .map(|group| group.part_of_speech.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PosGroup> {
        self.0.iter()
    }
}

impl Serialize for GroupedEntries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for group in &self.0 {
            map.serialize_entry(&group.part_of_speech, &group.entries)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for GroupedEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GroupsVisitor;

        impl<'de> Visitor<'de> for GroupsVisitor {
            type Value = GroupedEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of part of speech to entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut groups = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((part_of_speech, entries)) =
                    access.next_entry::<String, Vec<Entry>>()?
                {
                    groups.push(PosGroup {
                        part_of_speech,
                        entries,
                    });
                }
                Ok(GroupedEntries(groups))
            }
        }

        deserializer.deserialize_map(GroupsVisitor)
    }
}
