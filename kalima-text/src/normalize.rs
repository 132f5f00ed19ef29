//! Arabic Text Normalizer
//!
//! Maps raw text to the canonical form stored alongside every headword:
//! - Diacritics (tashkeel) and superscript alef removal
//! - Hamza-seat alef unification
//! - Alef maksura to yaa
//! - Zero-width joiner/non-joiner and BOM stripping
//! - Whitespace trimming and lowercase folding

const BARE_ALEF: char = '\u{0627}';
const YAA: char = '\u{064A}';
const ALEF_MAKSURA: char = '\u{0649}';

/// Normalize text for comparison against precomputed headword forms.
///
/// Total and idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for ch in text.chars() {
        if is_arabic_diacritic(ch) || is_invisible_joiner(ch) {
            continue;
        }

        if is_hamza_alef(ch) {
            result.push(BARE_ALEF);
            continue;
        }

        if ch == ALEF_MAKSURA {
            result.push(YAA);
            continue;
        }

        result.push(ch);
    }

    result.trim().to_lowercase()
}

/// Short vowels, tanwin, shadda, sukun and the rest of the combining block.
fn is_arabic_diacritic(ch: char) -> bool {
    matches!(ch,
        '\u{064B}'..='\u{065F}' | // Fathatan to wavy hamza below
        '\u{0670}'                // Superscript alef
    )
}

fn is_hamza_alef(ch: char) -> bool {
    matches!(ch,
        '\u{0622}' | // Alef with madda
        '\u{0623}' | // Alef with hamza above
        '\u{0625}'   // Alef with hamza below
    )
}

fn is_invisible_joiner(ch: char) -> bool {
    matches!(ch, '\u{200C}' | '\u{200D}' | '\u{FEFF}')
}
