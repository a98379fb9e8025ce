mod common;

use common::{Reply, StubServer};
use jobyaari_board::config::{Config, FetchConfig};
use jobyaari_board::dataset::{load_table, save_table, JobTable};
use jobyaari_board::job::{Category, JobRecord, COLUMNS, NOT_AVAILABLE, NOT_DISCLOSED};
use jobyaari_board::scrape::{clean_saved, refresh, Scraper};

const ENGINEERING: &str = r#"<html><body>
  <div class="drop__card">
    <div class="ribbon1-shape"><span>Junior Engineer</span></div>
    <p class="drop__profession">Indian Railways</p>
    <div class="salary-price"><span>Salary</span><span>₹45,000</span></div>
    <div class="drop__exp"><span>Exp</span><span>0-2 Years</span></div>
    <p class="salary">B.Tech</p>
    <div class="location"><span>Loc</span><span>Bengaluru, Karnataka</span></div>
    <span class="tags-item">Railway</span>
    <span class="post-item">Last date: 05 Jan 2024</span>
  </div>
  <div class="drop__card">
    <div class="ribbon1-shape"><span>Assistant Engineer</span></div>
    <p class="drop__profession">PWD</p>
    <span class="post-item">Posted 15-02-2024</span>
  </div>
</body></html>"#;

const COMMERCE: &str = r#"<html><body>
  <div class="drop__card"><div class="unrelated">ad slot</div></div>
  <div class="drop__card">
    <p class="drop__profession">SBI</p>
    <div class="location"><span>Mumbai</span></div>
  </div>
</body></html>"#;

fn stub_site() -> StubServer {
    StubServer::start(|req| match req.path.as_str() {
        "/category/engineering" => Reply::Respond {
            status: 200,
            body: ENGINEERING.to_string(),
        },
        "/category/commerce" => Reply::Respond {
            status: 200,
            body: COMMERCE.to_string(),
        },
        "/category/education" => Reply::Respond {
            status: 200,
            body: "<html><body><p>No openings</p></body></html>".to_string(),
        },
        _ => Reply::Respond {
            status: 500,
            body: "boom".to_string(),
        },
    })
}

fn config_for(server: &StubServer, data_dir: &std::path::Path) -> Config {
    Config {
        fetch: FetchConfig {
            base_url: format!("{}/category", server.base_url),
            ..FetchConfig::default()
        },
        data_dir: data_dir.to_path_buf(),
        ..Config::default()
    }
}

#[test]
fn scrape_skips_failed_category_and_keeps_order() {
    let server = stub_site();
    let dir = tempfile::TempDir::new().unwrap();
    let config = config_for(&server, dir.path());
    let scraper = Scraper::new(&config.fetch).unwrap();

    let outcome = scraper.scrape();

    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].0, Category::Science);
    assert!(outcome.failed[0].1.to_string().contains("500"));
    assert_eq!(
        outcome.counts,
        vec![
            (Category::Engineering, 2),
            (Category::Commerce, 2),
            (Category::Education, 0),
        ]
    );

    let rows = outcome.table.rows();
    let categories: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(categories, vec!["engineering", "engineering", "commerce", "commerce"]);
    assert_eq!(rows[0].last_date, "05/01/2024");
    assert_eq!(rows[1].last_date, "15/02/2024");
    assert_eq!(rows[1].salary, "N/A");
    for row in rows {
        assert!(row.scraped_fields().iter().all(|f| !f.is_empty()));
    }

    let requests = server.requests();
    assert!(requests.iter().all(|r| r.method == "GET"));
    assert!(requests
        .iter()
        .all(|r| r.header("user-agent").is_some_and(|ua| ua.starts_with("Mozilla/5.0"))));
}

#[test]
fn refresh_persists_raw_and_cleaned_tables() {
    let server = stub_site();
    let dir = tempfile::TempDir::new().unwrap();
    let config = config_for(&server, dir.path());
    let scraper = Scraper::new(&config.fetch).unwrap();

    let (cleaned, report) = refresh(&scraper, &config).unwrap();

    // The ad-slot card in commerce has nothing but its category.
    assert_eq!(report.original_rows, 4);
    assert_eq!(report.dropped_rows, 1);
    assert_eq!(cleaned.len(), 3);
    assert_eq!(cleaned.rows()[1].salary, NOT_DISCLOSED);
    assert_eq!(cleaned.rows()[2].organization, "SBI");
    assert_eq!(cleaned.rows()[2].location, "Mumbai");

    let raw = load_table(&config.raw_table_path()).unwrap();
    assert_eq!(raw.len(), 4);
    assert_eq!(raw.rows()[2].title, "N/A");

    let persisted = load_table(&config.cleaned_table_path()).unwrap();
    assert_eq!(persisted, cleaned);

    let header = std::fs::read_to_string(config.cleaned_table_path()).unwrap();
    assert!(header.starts_with(&COLUMNS.join(",")));
}

#[test]
fn unreachable_site_yields_empty_outcome() {
    let server = StubServer::start(|_| Reply::Respond {
        status: 503,
        body: String::new(),
    });
    let dir = tempfile::TempDir::new().unwrap();
    let config = config_for(&server, dir.path());
    let scraper = Scraper::new(&config.fetch).unwrap();

    let (table, _) = refresh(&scraper, &config).unwrap();
    assert!(table.is_empty());
    assert!(!config.cleaned_table_path().exists());
}

fn raw_row(title: &str, salary: &str) -> JobRecord {
    JobRecord {
        title: title.into(),
        organization: "BHEL".into(),
        salary: salary.into(),
        experience: NOT_AVAILABLE.into(),
        qualification: "B.E".into(),
        location: "Bhopal".into(),
        tags: "PSU".into(),
        last_date: "05/01/2024".into(),
        category: "engineering".into(),
    }
}

#[test]
fn clean_saved_rewrites_cleaned_table_from_raw() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    let mut blank = raw_row(NOT_AVAILABLE, NOT_AVAILABLE);
    for cell in blank.scraped_fields_mut() {
        *cell = NOT_AVAILABLE.into();
    }
    let raw = JobTable::new(vec![raw_row("Engineer Trainee", "₹50,000"), blank]);
    save_table(&raw, &config.raw_table_path()).unwrap();

    let (cleaned, report) = clean_saved(&config).unwrap();
    assert_eq!(report.original_rows, 2);
    assert_eq!(report.cleaned_rows(), 1);
    assert_eq!(cleaned.rows()[0].experience, NOT_DISCLOSED);

    let persisted = load_table(&config.cleaned_table_path()).unwrap();
    assert_eq!(persisted, cleaned);
    assert_eq!(load_table(&config.raw_table_path()).unwrap(), raw);
}

#[test]
fn clean_saved_without_raw_table_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    let err = clean_saved(&config).unwrap_err();
    assert!(format!("{err:#}").contains("run `scrape` first"));
    assert!(!config.cleaned_table_path().exists());
}
