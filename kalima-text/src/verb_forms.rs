//! Verb form labels
//!
//! Conjugation patterns are stored by index (1 to 15) and presented with
//! their conventional Roman numeral.

/// Highest verb form index with a fixed label.
pub const MAX_VERB_FORM: i64 = 15;

pub const ROMAN_NUMERALS: [&str; MAX_VERB_FORM as usize] = [
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII", "XIII", "XIV", "XV",
];

/// Roman label for a verb form index, or the decimal string when the index
/// falls outside 1..=15.
pub fn to_roman(n: i64) -> String {
    if (1..=MAX_VERB_FORM).contains(&n) {
        ROMAN_NUMERALS[(n - 1) as usize].to_string()
    } else {
        n.to_string()
    }
}
