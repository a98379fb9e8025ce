use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::dates::normalize_date;
use crate::error::ExtractError;
use crate::job::{JobRecord, NOT_AVAILABLE};
use crate::utils::stripped_text;

/// One listing fragment on a category page.
pub const CARD_SELECTOR: &str = "div.drop__card";

/// Scraped fields of a listing card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Organization,
    Salary,
    Experience,
    Qualification,
    Location,
    Tags,
    LastDate,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Title,
        Field::Organization,
        Field::Salary,
        Field::Experience,
        Field::Qualification,
        Field::Location,
        Field::Tags,
        Field::LastDate,
    ];

    pub fn selector(&self) -> &'static str {
        match self {
            Field::Title => ".ribbon1-shape span",
            Field::Organization => ".drop__profession",
            Field::Salary => ".salary-price span:last-child",
            Field::Experience => ".drop__exp span:last-child",
            Field::Qualification => ".salary",
            Field::Location => ".location span:last-child",
            Field::Tags => ".tags-item",
            Field::LastDate => ".post-item",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Organization => "organization",
            Field::Salary => "salary",
            Field::Experience => "experience",
            Field::Qualification => "qualification",
            Field::Location => "location",
            Field::Tags => "tags",
            Field::LastDate => "last_date",
        }
    }
}

fn compile(selector: &'static str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError {
        selector,
        reason: e.to_string(),
    })
}

/// Compiled selectors, built once per scrape.
pub struct CardSelectors {
    card: Selector,
    fields: Vec<(Field, Selector)>,
}

impl CardSelectors {
    pub fn new() -> Result<Self, ExtractError> {
        let card = compile(CARD_SELECTOR)?;
        let fields = Field::ALL
            .iter()
            .map(|field| Ok((*field, compile(field.selector())?)))
            .collect::<Result<Vec<_>, ExtractError>>()?;
        Ok(Self { card, fields })
    }

    fn field(&self, field: Field) -> &Selector {
        // `fields` is built from `Field::ALL` in declaration order.
        &self.fields[field as usize].1
    }
}

/// A record pulled from one card, plus the fields that fell back to the
/// sentinel.
#[derive(Debug, Clone)]
pub struct CardExtraction {
    pub record: JobRecord,
    pub defaulted: Vec<Field>,
}

impl CardExtraction {
    pub fn is_complete(&self) -> bool {
        self.defaulted.is_empty()
    }
}

/// Extracts the eight fields from a listing card. Never fails: a selector
/// miss (or a match with no text) leaves `"N/A"` in that field and is
/// reported in `defaulted`.
/// `category` is left empty for the assembler to stamp.
pub fn extract_card(card: &ElementRef<'_>, selectors: &CardSelectors) -> CardExtraction {
    let mut defaulted = Vec::new();

    let mut single = |field: Field| -> String {
        let text = card
            .select(selectors.field(field))
            .next()
            .map(|el| stripped_text(&el))
            .filter(|t| !t.is_empty());
        match text {
            Some(text) => text,
            None => {
                defaulted.push(field);
                NOT_AVAILABLE.to_string()
            }
        }
    };

    let title = single(Field::Title);
    let organization = single(Field::Organization);
    let salary = single(Field::Salary);
    let experience = single(Field::Experience);
    let qualification = single(Field::Qualification);
    let location = single(Field::Location);
    let raw_date = single(Field::LastDate);

    let tags: Vec<String> = card
        .select(selectors.field(Field::Tags))
        .map(|el| stripped_text(&el))
        .filter(|t| !t.is_empty())
        .collect();
    let tags = if tags.is_empty() {
        defaulted.push(Field::Tags);
        NOT_AVAILABLE.to_string()
    } else {
        tags.join(", ")
    };

    if !defaulted.is_empty() {
        let missing: Vec<&str> = defaulted.iter().map(Field::name).collect();
        debug!(?missing, title = %title, "card fields defaulted to sentinel");
    }

    CardExtraction {
        record: JobRecord {
            title,
            organization,
            salary,
            experience,
            qualification,
            location,
            tags,
            last_date: normalize_date(&raw_date),
            category: String::new(),
        },
        defaulted,
    }
}

/// Extracts every listing card on a parsed category page.
pub fn extract_cards(document: &Html, selectors: &CardSelectors) -> Vec<CardExtraction> {
    let cards: Vec<CardExtraction> = document
        .select(&selectors.card)
        .map(|card| extract_card(&card, selectors))
        .collect();

    let partial = cards.iter().filter(|c| !c.is_complete()).count();
    if partial > 0 {
        warn!(cards = cards.len(), partial, "some listing cards were missing fields");
    }
    cards
}
