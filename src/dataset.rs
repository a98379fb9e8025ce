use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{self, File};
use std::path::Path;
use tracing::info;

use crate::job::{Category, JobRecord, NOT_AVAILABLE, NOT_DISCLOSED};

/// Flat jobs table. Row position is the index; it is always dense.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobTable {
    rows: Vec<JobRecord>,
}

impl JobTable {
    pub fn new(rows: Vec<JobRecord>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[JobRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<JobRecord> {
        self.rows
    }
}

/// Concatenates per-category records in the order given, stamping each
/// record with the category it was scraped from.
pub fn assemble(batches: Vec<(Category, Vec<JobRecord>)>) -> JobTable {
    let rows = batches
        .into_iter()
        .flat_map(|(category, records)| {
            records.into_iter().map(move |mut record| {
                record.category = category.slug().to_string();
                record
            })
        })
        .collect();
    JobTable::new(rows)
}

/// A cell the cleaner treats as absent.
pub fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || cell == NOT_AVAILABLE
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub original_rows: usize,
    pub dropped_rows: usize,
    pub filled_cells: usize,
}

impl CleanReport {
    pub fn cleaned_rows(&self) -> usize {
        self.original_rows - self.dropped_rows
    }
}

/// Drops rows with nothing but a category, fills remaining missing cells
/// with "Not Disclosed" and re-indexes. Running it on its own output changes
/// nothing.
pub fn clean(table: JobTable) -> (JobTable, CleanReport) {
    let mut report = CleanReport {
        original_rows: table.len(),
        ..Default::default()
    };

    let mut rows = Vec::with_capacity(table.len());
    for mut row in table.into_rows() {
        if row.scraped_fields().iter().all(|cell| is_missing(cell)) {
            report.dropped_rows += 1;
            continue;
        }
        for cell in row.scraped_fields_mut() {
            if is_missing(cell) {
                *cell = NOT_DISCLOSED.to_string();
                report.filled_cells += 1;
            }
        }
        if is_missing(&row.category) {
            row.category = NOT_DISCLOSED.to_string();
            report.filled_cells += 1;
        }
        rows.push(row);
    }

    (JobTable::new(rows), report)
}

/// Overwrites `path` with the table as CSV, creating the parent directory.
pub fn save_table(table: &JobTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating data directory {}", parent.display()))?;
    }

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(file);
    for record in table.rows() {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    info!(rows = table.len(), path = %path.display(), "saved jobs table");
    Ok(())
}

/// Reads a table written by [`save_table`]. Empty cells load as empty
/// strings so the cleaner sees them as missing.
pub fn load_table(path: &Path) -> Result<JobTable> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: JobRecord =
            result.with_context(|| format!("malformed row in {}", path.display()))?;
        rows.push(record);
    }
    Ok(JobTable::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, salary: &str, category: &str) -> JobRecord {
        JobRecord {
            title: title.into(),
            organization: String::new(),
            salary: salary.into(),
            experience: String::new(),
            qualification: String::new(),
            location: String::new(),
            tags: String::new(),
            last_date: String::new(),
            category: category.into(),
        }
    }

    #[test]
    fn assemble_keeps_category_order_and_stamps() {
        let table = assemble(vec![
            (Category::Engineering, vec![record("a", "", ""), record("b", "", "")]),
            (Category::Science, vec![]),
            (Category::Commerce, vec![record("c", "", "stale")]),
        ]);
        let got: Vec<(&str, &str)> = table
            .rows()
            .iter()
            .map(|r| (r.title.as_str(), r.category.as_str()))
            .collect();
        assert_eq!(got, vec![("a", "engineering"), ("b", "engineering"), ("c", "commerce")]);
    }

    #[test]
    fn drops_rows_blank_outside_category() {
        let table = JobTable::new(vec![
            record("", "", "science"),
            record("N/A", " ", "science"),
            record("", "₹30,000", "science"),
        ]);
        let (cleaned, report) = clean(table);
        assert_eq!(report.original_rows, 3);
        assert_eq!(report.dropped_rows, 2);
        assert_eq!(report.cleaned_rows(), 1);

        let row = &cleaned.rows()[0];
        assert_eq!(row.salary, "₹30,000");
        assert_eq!(row.title, NOT_DISCLOSED);
        assert_eq!(row.tags, NOT_DISCLOSED);
        assert_eq!(row.category, "science");
        assert_eq!(report.filled_cells, 7);
    }

    #[test]
    fn cleaning_is_idempotent() {
        let table = JobTable::new(vec![
            record("Clerk", "", "commerce"),
            record("", "", "commerce"),
            record("Lecturer", "N/A", ""),
        ]);
        let (once, _) = clean(table);
        let (twice, report) = clean(once.clone());
        assert_eq!(once, twice);
        assert_eq!(report.dropped_rows, 0);
        assert_eq!(report.filled_cells, 0);
    }
}
