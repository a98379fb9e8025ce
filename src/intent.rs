use crate::filter::{JobFilter, KnowledgeBase};

/// Picks the filter for a chat message by substring search.
///
/// The first known category and the first known location (in table order)
/// found anywhere in the lower-cased message win. This is a heuristic: a
/// location that is also a common word ("Salem", "Una") matches ordinary
/// sentences too.
pub fn detect_filter(message: &str, kb: &KnowledgeBase) -> JobFilter {
    let lowered = message.to_lowercase();

    let category = kb
        .categories()
        .iter()
        .find(|cat| lowered.contains(&cat.to_lowercase()))
        .cloned();

    let location = kb
        .locations()
        .iter()
        .find(|loc| lowered.contains(loc.as_str()))
        .cloned();

    JobFilter {
        category,
        location,
        min_salary: None,
    }
}
