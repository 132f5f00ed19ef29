//! Text primitives for the Kalima lookup engine.
//!
//! Everything here is pure and allocation-light:
//! - Arabic orthographic normalization used for every comparison
//! - Script detection for routing a query to the Arabic or Russian path
//! - Roman-numeral labels for verb form indices

mod normalize;
mod script;
mod verb_forms;

pub use normalize::normalize;
pub use script::{contains_arabic, is_arabic_char, QueryScript};
pub use verb_forms::{to_roman, MAX_VERB_FORM, ROMAN_NUMERALS};
