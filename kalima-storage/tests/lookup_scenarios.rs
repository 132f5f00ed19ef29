//! End-to-end lookups against the bundled seed.

use std::path::PathBuf;
use std::sync::Arc;

use kalima_core::{match_tier, Lexicon, MatchTier, QueryTerms, WordRecord, WordRepository};
use kalima_storage::{Seed, SeedOptions, Storage};
use kalima_text::normalize;
use serde_json::json;

fn seed_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../data/seed.json")
}

fn lexicon() -> Lexicon {
    let storage = Storage::open(seed_path()).unwrap();
    Lexicon::new(Arc::new(storage))
}

fn ids<T>(items: &[T], id: impl Fn(&T) -> u64) -> Vec<u64> {
    items.iter().map(id).collect()
}

#[test]
fn bundled_seed_is_consistent() {
    let storage = Storage::open_with(seed_path(), SeedOptions::strict()).unwrap();
    assert!(storage.normalization_mismatches().is_empty());

    let words: Vec<WordRecord> = storage.find_by_ids(&(1..=100).collect::<Vec<_>>()).unwrap();
    assert_eq!(words.len(), storage.stats().words);
    for word in words {
        assert_eq!(normalize(&word.word_ar), word.word_ar_normalized, "word {}", word.id);
    }
}

#[test]
fn exact_headword_outranks_form_only_owner() {
    let seed: Seed = serde_json::from_value(json!({
        "words": [
            {"id": 1, "word_ar": "كَاتِب", "word_ru": "писатель", "root_ar": "كتب", "part_of_speech": "noun"},
            {"id": 2, "word_ar": "كَتَبَ", "word_ru": "писать", "root_ar": "كتب", "part_of_speech": "verb"}
        ],
        "verb_forms": [
            {"id": 1, "word_id": 1, "form_number": 1, "form_ar": "كَتَبُوا", "meaning_ru": "они написали"}
        ]
    }))
    .unwrap();
    let storage = Storage::from_seed(seed, SeedOptions::default()).unwrap();
    let lexicon = Lexicon::new(Arc::new(storage));

    let outcome = lexicon.search("كتب").unwrap();
    assert_eq!(ids(&outcome.results, |e| e.id), vec![2, 1]);
}

#[test]
fn headword_match_outranks_same_surface_form() {
    // "كاتب" is both a noun headword and form III of "كتب"
    let outcome = lexicon().search("كاتب").unwrap();
    assert_eq!(ids(&outcome.results, |e| e.id), vec![4, 1]);
}

#[test]
fn conjugated_search_round_trips_to_root_family() {
    let lexicon = lexicon();
    let outcome = lexicon.search("يكتب").unwrap();
    assert_eq!(ids(&outcome.results, |e| e.id), vec![1]);
    assert_eq!(outcome.results[0].root_ar.as_deref(), Some("كتب"));

    let family = lexicon.by_root("يكتب").unwrap();
    assert_eq!(family.root, "كتب");
    assert_eq!(family.original_input, "يكتب");
    assert_eq!(family.grouped.labels()[0], "verb");
    let nouns = family.grouped.get("noun").unwrap();
    assert_eq!(ids(nouns, |e| e.id), vec![2, 3, 4, 6]);
    assert_eq!(family.grouped.get("other").unwrap()[0].id, 18);
}

#[test]
fn russian_gloss_lands_in_gloss_tier() {
    let outcome = lexicon().search("писать").unwrap();
    assert_eq!(ids(&outcome.results, |e| e.id), vec![1]);

    let storage = Storage::open(seed_path()).unwrap();
    let word = storage.find_by_ids(&[1]).unwrap().remove(0);
    assert_eq!(match_tier(&word, &QueryTerms::parse("писать")), MatchTier::Gloss);
}

#[test]
fn root_resolution_falls_through_the_chain() {
    let lexicon = lexicon();
    // headword without hamza lands on the stored root with hamza
    assert_eq!(lexicon.resolve_root("قرا").unwrap(), "قرأ");
    // exact conjugated form
    assert_eq!(lexicon.resolve_root("تَعَلَّمَ").unwrap(), "علم");
    // conjugated form prefix
    assert_eq!(lexicon.resolve_root("استع").unwrap(), "علم");
    // nothing matches
    assert_eq!(lexicon.resolve_root("زحلف").unwrap(), "زحلف");
}

#[test]
fn empty_family_is_not_an_error() {
    let family = lexicon().by_root("زحلف").unwrap();
    assert!(family.grouped.is_empty());
    assert_eq!(
        serde_json::to_value(&family.grouped).unwrap(),
        json!({})
    );
}

#[test]
fn autocomplete_spans_scripts() {
    let lexicon = lexicon();
    assert!(lexicon.suggest("م").unwrap().is_empty());

    let arabic = lexicon.suggest("مك").unwrap();
    assert_eq!(
        arabic.iter().map(|s| s.word_ar.as_str()).collect::<Vec<_>>(),
        vec!["مَكْتَبَة", "مَكْتُوب"]
    );

    let russian = lexicon.suggest("кн").unwrap();
    assert_eq!(russian.len(), 2);
    assert_eq!(russian[0].label, "книга — كِتَاب");
}

#[test]
fn maksura_and_hamza_spellings_meet() {
    let lexicon = lexicon();
    assert_eq!(ids(&lexicon.search("على").unwrap().results, |e| e.id), vec![17]);
    assert_eq!(ids(&lexicon.search("علي").unwrap().results, |e| e.id), vec![17]);
    assert_eq!(ids(&lexicon.search("اسلام").unwrap().results, |e| e.id), vec![14]);
}
