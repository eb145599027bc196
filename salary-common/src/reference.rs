//! Reference lists offered as submission-form choices
//!
//! Each list is a one-column CSV in the reference folder. A missing or
//! unreadable file yields an empty list; the form then falls back to
//! free-text entry.

use csv::ReaderBuilder;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, warn};

pub const INDUSTRIES_FILE: &str = "Industries.csv";
pub const NATIONALITIES_FILE: &str = "Nationalities.csv";
pub const LOCATIONS_FILE: &str = "worldcities.csv";

/// Sorted, de-duplicated choices for the submission form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReferenceLists {
    pub industries: Vec<String>,
    pub nationalities: Vec<String>,
    pub locations: Vec<String>,
}

impl ReferenceLists {
    /// Read every list from `dir`
    pub fn load(dir: &Path) -> Self {
        let lists = Self {
            industries: read_list(&dir.join(INDUSTRIES_FILE), "Industry"),
            nationalities: read_list(&dir.join(NATIONALITIES_FILE), "Nationality"),
            locations: read_list(&dir.join(LOCATIONS_FILE), "Location"),
        };
        info!(
            "Reference lists from {}: {} industries, {} nationalities, {} locations",
            dir.display(),
            lists.industries.len(),
            lists.nationalities.len(),
            lists.locations.len()
        );
        lists
    }
}

/// Values of the `column` column (or the first column when absent)
///
/// Entries are trimmed of whitespace and quotes; blanks, `nan`/`none`
/// and repeats of the header name are dropped.
pub fn read_list(path: &Path, column: &str) -> Vec<String> {
    if !path.exists() {
        debug!("Reference list not present: {}", path.display());
        return Vec::new();
    }

    let mut rdr = match ReaderBuilder::new().flexible(true).from_path(path) {
        Ok(rdr) => rdr,
        Err(e) => {
            warn!("Cannot read reference list {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let index = match rdr.byte_headers() {
        Ok(headers) => headers
            .iter()
            .position(|h| String::from_utf8_lossy(h).trim() == column)
            .unwrap_or(0),
        Err(e) => {
            warn!("Cannot read reference list {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let mut values = BTreeSet::new();
    for row in rdr.byte_records().flatten() {
        let Some(raw) = row.get(index) else {
            continue;
        };
        let value = String::from_utf8_lossy(raw);
        let value = value.trim().trim_matches('"').trim();
        if value.is_empty()
            || value.eq_ignore_ascii_case("nan")
            || value.eq_ignore_ascii_case("none")
            || value.eq_ignore_ascii_case(column)
        {
            continue;
        }
        values.insert(value.to_string());
    }

    values.into_iter().collect()
}
