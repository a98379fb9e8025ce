//! JobYaari listing scraper, cleaner and chat assistant.
//!
//! The pipeline runs one way:
//! fetch → extract → assemble → clean → persist → filter → assistant.
//! The terminal dashboard in [`dashboard`] glues it together behind a
//! [`session::Session`].

pub mod assistant;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod dates;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod intent;
pub mod job;
pub mod scrape;
pub mod session;
pub mod utils;

pub use config::Config;
pub use error::{AssistantError, ExtractError, FetchError};
pub use job::{Category, ChatTurn, JobRecord};
