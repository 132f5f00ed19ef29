//! Schema mirrors for the response bodies.
//!
//! The engine types stay free of utoipa; these structs only describe the
//! JSON they serialize to.

use std::collections::HashMap;

use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct VerbForm {
    /// Pattern number, 1 to 15
    pub form_number: i32,
    pub form_ar: String,
    pub meaning_ru: String,
    /// Roman numeral for `form_number`, the decimal string outside 1..=15
    pub form_roman: String,
}

#[derive(ToSchema)]
pub struct UsageExample {
    pub id: u64,
    pub example_type: String,
    pub text_ar: String,
    pub text_ru: String,
    pub context: Option<String>,
}

#[derive(ToSchema)]
pub struct Entry {
    pub id: u64,
    pub word_ar: String,
    pub word_ru: String,
    pub root_ar: Option<String>,
    pub part_of_speech: Option<String>,
    pub verb_forms: Vec<VerbForm>,
    pub examples: Vec<UsageExample>,
}

#[derive(ToSchema)]
pub struct SearchOutcome {
    pub results: Vec<Entry>,
    pub total: usize,
}

#[derive(ToSchema)]
pub struct RootFamily {
    /// Resolved root, or the trimmed input when nothing matched
    pub root: String,
    pub original_input: String,
    /// Part of speech to entries; "verb" then "noun" lead, "other" collects untagged words
    pub grouped: HashMap<String, Vec<Entry>>,
}

#[derive(ToSchema)]
pub struct LookupOutcome {
    pub results: Vec<Entry>,
    pub total: usize,
    /// Root family of the best hit, null when it has no root
    pub family: Option<RootFamily>,
}

#[derive(ToSchema)]
pub struct Suggestion {
    pub word_ar: String,
    pub word_ru: String,
    pub root_ar: Option<String>,
    /// Display label, query language first
    pub label: String,
}

#[derive(ToSchema)]
pub struct AutocompleteResponse {
    pub suggestions: Vec<Suggestion>,
}

#[derive(ToSchema)]
pub struct ErrorBody {
    pub error: String,
}
