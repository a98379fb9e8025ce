//! Narrows the loaded jobs table before it is handed to the assistant.

use std::collections::HashMap;

use crate::job::JobRecord;
use crate::utils::title_case;

/// Filter criteria. Stages run category → location → salary; unset
/// criteria are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub category: Option<String>,
    pub location: Option<String>,
    pub min_salary: Option<i64>,
}

impl JobFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.location.is_none() && self.min_salary.is_none()
    }
}

/// Category key used for grouping and lookup.
pub fn normalize_category(category: &str) -> String {
    title_case(category.trim())
}

/// Concatenates every ASCII digit in `salary` into one integer; no digits
/// gives 0 and overflow saturates.
///
/// Ranges are not understood: "50,000-70,000" reads as 5000070000.
pub fn parse_salary(salary: &str) -> u64 {
    salary
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(u64::from(d)))
}

/// Jobs table indexed by normalised category, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    jobs: Vec<JobRecord>,
    categories: Vec<String>,
    by_category: HashMap<String, Vec<usize>>,
    locations: Vec<String>,
}

impl KnowledgeBase {
    pub fn new(jobs: Vec<JobRecord>) -> Self {
        let mut categories = Vec::new();
        let mut by_category: HashMap<String, Vec<usize>> = HashMap::new();
        let mut locations: Vec<String> = Vec::new();

        for (idx, job) in jobs.iter().enumerate() {
            let key = normalize_category(&job.category);
            if !by_category.contains_key(&key) {
                categories.push(key.clone());
            }
            by_category.entry(key).or_default().push(idx);

            let location = job.location.to_lowercase();
            if !locations.contains(&location) {
                locations.push(location);
            }
        }

        Self {
            jobs,
            categories,
            by_category,
            locations,
        }
    }

    pub fn jobs(&self) -> &[JobRecord] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Normalised category names in the order they first appear.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Distinct lower-cased locations in the order they first appear.
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Applies `filter`. An unknown category or a stage that removes
    /// everything yields an empty result, never an error.
    /// Blank category or location text counts as not given.
    pub fn filter(&self, filter: &JobFilter) -> Vec<&JobRecord> {
        let category = filter.category.as_deref().filter(|c| !c.trim().is_empty());
        let location = filter.location.as_deref().filter(|l| !l.trim().is_empty());

        let mut working: Vec<&JobRecord> = match category {
            Some(category) => self
                .by_category
                .get(&normalize_category(category))
                .map(|idxs| idxs.iter().map(|&i| &self.jobs[i]).collect())
                .unwrap_or_default(),
            None => self.jobs.iter().collect(),
        };

        if let Some(location) = location {
            let needle = location.to_lowercase();
            working.retain(|job| job.location.to_lowercase().contains(&needle));
        }

        if let Some(min) = filter.min_salary.filter(|&m| m > 0) {
            working.retain(|job| i128::from(parse_salary(&job.salary)) >= i128::from(min));
        }

        working
    }
}
