use kalima_text::to_roman;

use crate::model::{VerbForm, VerbFormRecord};

/// Attach the presentation label to each stored form. The numeric index is
/// carried through unchanged.
pub fn enrich_forms(forms: Vec<VerbFormRecord>) -> Vec<VerbForm> {
    forms
        .into_iter()
        .map(|form| VerbForm {
            form_roman: to_roman(i64::from(form.form_number)),
            form_number: form.form_number,
            form_ar: form.form_ar,
            meaning_ru: form.meaning_ru,
        })
        .collect()
}
