use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::{Config, FetchConfig};
use crate::dataset::{assemble, clean, load_table, save_table, CleanReport, JobTable};
use crate::error::{ExtractError, FetchError};
use crate::extract::{extract_cards, CardSelectors};
use crate::fetch::Fetcher;
use crate::job::{Category, JobRecord};

/// What one scrape pass produced.
#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    pub table: JobTable,
    /// Cards found per category, in scrape order.
    pub counts: Vec<(Category, usize)>,
    /// Categories whose page could not be fetched.
    pub failed: Vec<(Category, FetchError)>,
}

impl ScrapeOutcome {
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

pub struct Scraper {
    fetcher: Fetcher,
    selectors: CardSelectors,
}

#[derive(Debug, thiserror::Error)]
pub enum ScraperInitError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl Scraper {
    pub fn new(config: &FetchConfig) -> Result<Self, ScraperInitError> {
        Ok(Self {
            fetcher: Fetcher::new(config)?,
            selectors: CardSelectors::new()?,
        })
    }

    /// Scrapes one category. Cards come back without a category stamp.
    pub fn scrape_category(&self, category: Category) -> Result<Vec<JobRecord>, FetchError> {
        info!(category = %category, "scraping category");
        let document = self.fetcher.fetch_category(category)?;
        let records: Vec<JobRecord> = extract_cards(&document, &self.selectors)
            .into_iter()
            .map(|card| card.record)
            .collect();
        info!(category = %category, cards = records.len(), "found job cards");
        Ok(records)
    }

    /// Scrapes every category in order. A failed category is skipped and
    /// reported; it never stops the others.
    pub fn scrape(&self) -> ScrapeOutcome {
        info!("starting JobYaari scrape");
        let mut batches = Vec::with_capacity(Category::ALL.len());
        let mut outcome = ScrapeOutcome::default();

        for category in Category::ALL {
            match self.scrape_category(category) {
                Ok(records) => {
                    outcome.counts.push((category, records.len()));
                    batches.push((category, records));
                }
                Err(e) => outcome.failed.push((category, e)),
            }
        }

        outcome.table = assemble(batches);
        if outcome.is_empty() {
            warn!("no data extracted");
        } else {
            info!(jobs = outcome.table.len(), "extracted job postings");
        }
        outcome
    }
}

/// Scrape → persist raw → clean → persist cleaned. Returns the cleaned
/// table. When nothing was scraped the files on disk are left alone and an
/// empty table is returned.
pub fn refresh(scraper: &Scraper, config: &Config) -> Result<(JobTable, CleanReport)> {
    let outcome = scraper.scrape();
    if outcome.is_empty() {
        return Ok((JobTable::default(), CleanReport::default()));
    }

    save_table(&outcome.table, &config.raw_table_path())?;
    let (cleaned, report) = clean(outcome.table);
    info!(
        original = report.original_rows,
        cleaned = report.cleaned_rows(),
        filled = report.filled_cells,
        "cleaned jobs table"
    );
    save_table(&cleaned, &config.cleaned_table_path())?;
    Ok((cleaned, report))
}

/// Re-cleans the persisted raw table into the cleaned table without
/// scraping.
pub fn clean_saved(config: &Config) -> Result<(JobTable, CleanReport)> {
    let raw = load_table(&config.raw_table_path())
        .context("run `scrape` first to produce the raw table")?;
    let (cleaned, report) = clean(raw);
    save_table(&cleaned, &config.cleaned_table_path())?;
    info!(
        original = report.original_rows,
        cleaned = report.cleaned_rows(),
        "cleaned saved jobs table"
    );
    Ok((cleaned, report))
}
