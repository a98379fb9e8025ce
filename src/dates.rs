use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use crate::job::NOT_AVAILABLE;

/// Accepted closing-date layouts, tried in order.
const FORMATS: [&str; 4] = ["%d/%m/%Y", "%d-%m-%Y", "%d %b %Y", "%d %B %Y"];

const OUTPUT_FORMAT: &str = "%d/%m/%Y";

fn label_pattern() -> &'static Regex {
    static LABEL: OnceLock<Regex> = OnceLock::new();
    LABEL.get_or_init(|| {
        Regex::new(r"(?i)posted|last\s*date[:\-]?").expect("label pattern is valid")
    })
}

/// Outcome of normalising a closing date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedDate {
    Parsed(NaiveDate),
    /// Label-stripped text that matched none of the formats.
    Unparsed(String),
}

impl NormalizedDate {
    pub fn render(&self) -> String {
        match self {
            NormalizedDate::Parsed(date) => date.format(OUTPUT_FORMAT).to_string(),
            NormalizedDate::Unparsed(text) => text.clone(),
        }
    }
}

/// Strips the "Posted" / "Last date:" label and parses what is left.
pub fn normalize(raw: &str) -> NormalizedDate {
    let trimmed = raw.trim();
    if trimmed == NOT_AVAILABLE {
        return NormalizedDate::Unparsed(trimmed.to_string());
    }

    let cleaned = label_pattern().replace_all(trimmed, "");
    let cleaned = cleaned.trim();

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cleaned, fmt).ok())
        .map(NormalizedDate::Parsed)
        .unwrap_or_else(|| NormalizedDate::Unparsed(cleaned.to_string()))
}

/// [`normalize`] rendered back to text.
pub fn normalize_date(raw: &str) -> String {
    normalize(raw).render()
}
