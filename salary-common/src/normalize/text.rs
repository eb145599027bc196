//! Categorical text cleanup
//!
//! Trims, collapses whitespace, rewrites known synonyms and typos from a
//! static table, and title-cases everything else.

use crate::record::Field;

/// Known spellings keyed by lower-cased input
static NATIONALITY_SYNONYMS: &[(&str, &str)] = &[
    ("zambia", "Zambian"),
    ("zambain", "Zambian"),
    ("zambien", "Zambian"),
    ("zimbabwe", "Zimbabwean"),
    ("malawi", "Malawian"),
    ("kenya", "Kenyan"),
    ("nigeria", "Nigerian"),
    ("tanzania", "Tanzanian"),
    ("uganda", "Ugandan"),
    ("botswana", "Motswana"),
    ("namibia", "Namibian"),
    ("angola", "Angolan"),
    ("mozambique", "Mozambican"),
    ("south africa", "South African"),
    ("drc", "Congolese"),
    ("congo", "Congolese"),
    ("india", "Indian"),
    ("uk", "British"),
    ("united kingdom", "British"),
    ("usa", "American"),
    ("united states", "American"),
];

static INDUSTRY_SYNONYMS: &[(&str, &str)] = &[
    ("it", "IT"),
    ("ict", "ICT"),
    ("ngo", "NGO"),
    ("fintech", "FinTech"),
    ("fin tech", "FinTech"),
    ("telecom", "Telecommunications"),
    ("telecoms", "Telecommunications"),
    ("fmcg", "FMCG"),
];

static LOCATION_SYNONYMS: &[(&str, &str)] = &[
    ("drc", "DRC"),
    ("uk", "UK"),
    ("usa", "USA"),
    ("uae", "UAE"),
    ("zambai", "Zambia"),
];

fn synonyms_for(field: Field) -> &'static [(&'static str, &'static str)] {
    match field {
        Field::Nationality => NATIONALITY_SYNONYMS,
        Field::Industry => INDUSTRY_SYNONYMS,
        Field::CompanyLocation | Field::YourLocation => LOCATION_SYNONYMS,
        _ => &[],
    }
}

/// Whether `field` gets synonym rewriting and title-casing
pub fn is_categorical(field: Field) -> bool {
    matches!(
        field,
        Field::CompanyLocation | Field::YourLocation | Field::Nationality | Field::Industry
    )
}

/// Trim and collapse runs of whitespace to single spaces
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Upper-case the first letter of every word, lower-case the rest.
/// Apostrophes stay inside words ("Director's").
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for c in value.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = c != '\'';
        }
    }
    out
}

/// Canonical spelling of a categorical value
pub fn canonical(field: Field, value: &str) -> String {
    let collapsed = collapse_whitespace(value);
    if !is_categorical(field) {
        return collapsed;
    }

    let key = collapsed.to_lowercase();
    if let Some((_, canonical)) = synonyms_for(field).iter().find(|(k, _)| *k == key) {
        return (*canonical).to_string();
    }

    title_case(&collapsed)
}
