use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::title_case;

/// Placeholder for a field the extractor could not find.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder the cleaner writes into missing cells.
pub const NOT_DISCLOSED: &str = "Not Disclosed";

/// Column order of the persisted table.
pub const COLUMNS: [&str; 9] = [
    "title",
    "organization",
    "salary",
    "experience",
    "qualification",
    "location",
    "tags",
    "last_date",
    "category",
];

/// The job domains JobYaari partitions its listings into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Engineering,
    Science,
    Commerce,
    Education,
}

impl Category {
    /// Scrape order.
    pub const ALL: [Category; 4] = [
        Category::Engineering,
        Category::Science,
        Category::Commerce,
        Category::Education,
    ];

    /// URL path segment, also the value stamped on scraped records.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Engineering => "engineering",
            Category::Science => "science",
            Category::Commerce => "commerce",
            Category::Education => "education",
        }
    }

    pub fn display_name(&self) -> String {
        title_case(self.slug())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// One row of the jobs table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub organization: String,
    pub salary: String,
    pub experience: String,
    pub qualification: String,
    pub location: String,
    pub tags: String,
    pub last_date: String,
    pub category: String,
}

impl JobRecord {
    /// The eight scraped cells, i.e. everything but `category`.
    pub fn scraped_fields(&self) -> [&str; 8] {
        [
            &self.title,
            &self.organization,
            &self.salary,
            &self.experience,
            &self.qualification,
            &self.location,
            &self.tags,
            &self.last_date,
        ]
    }

    pub fn scraped_fields_mut(&mut self) -> [&mut String; 8] {
        [
            &mut self.title,
            &mut self.organization,
            &mut self.salary,
            &mut self.experience,
            &mut self.qualification,
            &mut self.location,
            &mut self.tags,
            &mut self.last_date,
        ]
    }
}

/// One exchange in the dashboard chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub user: String,
    pub bot: String,
}
