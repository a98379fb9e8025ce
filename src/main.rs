use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::{self, File};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use jobyaari_board::assistant::Assistant;
use jobyaari_board::config::Config;
use jobyaari_board::dataset::{load_table, save_table};
use jobyaari_board::scrape::{clean_saved, refresh, Scraper};
use jobyaari_board::session::Session;

#[derive(Parser)]
#[command(name = "jobyaari-board", about = "Live JobYaari jobs and chatbot")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape every category and write the raw table
    Scrape,
    /// Clean the raw table into the cleaned table
    Clean,
    /// Ask one question against the cleaned table
    Chat {
        /// The question, e.g. "engineering jobs in Bengaluru"
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Scrape, then open the interactive dashboard (default)
    Dashboard,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    let command = cli.command.unwrap_or(Command::Dashboard);

    // The dashboard owns the terminal, so its logs go to a file.
    if matches!(command, Command::Dashboard) {
        init_file_logging(&config)?;
    } else {
        init_stderr_logging();
    }

    match command {
        Command::Scrape => {
            let scraper = Scraper::new(&config.fetch)?;
            let outcome = scraper.scrape();
            for (category, count) in &outcome.counts {
                println!("{:<12} {} jobs", category.display_name(), count);
            }
            for (category, err) in &outcome.failed {
                eprintln!("{:<12} skipped: {}", category.display_name(), err);
            }
            if outcome.is_empty() {
                println!("No data extracted");
                return Ok(());
            }
            save_table(&outcome.table, &config.raw_table_path())?;
            println!(
                "Saved {} jobs to {}",
                outcome.table.len(),
                config.raw_table_path().display()
            );
        }
        Command::Clean => {
            let (_, report) = clean_saved(&config)?;
            println!("Original rows: {}", report.original_rows);
            println!("Cleaned rows:  {}", report.cleaned_rows());
            println!("Filled cells:  {}", report.filled_cells);
        }
        Command::Chat { message } => {
            let table = load_table(&config.cleaned_table_path())
                .context("run `scrape` and `clean` first to produce the cleaned table")?;
            let assistant = Assistant::new(config.assistant.clone())?;
            let mut session = Session::new(table);
            if let Some(turn) = session.submit(&message.join(" "), &assistant) {
                println!("{}", turn.bot);
            }
        }
        Command::Dashboard => {
            let scraper = Scraper::new(&config.fetch)?;
            let assistant = Assistant::new(config.assistant.clone())?;
            println!("Scraping JobYaari...");
            let (table, _) = refresh(&scraper, &config)?;
            let session = Session::new(table);
            jobyaari_board::dashboard::run_dashboard(&config, &scraper, &assistant, session)?;
        }
    }

    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn init_file_logging(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating {}", config.data_dir.display()))?;
    let log_path = config.log_path();
    let file = File::create(&log_path)
        .with_context(|| format!("creating log file {}", log_path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
