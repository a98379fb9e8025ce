use std::error::Error as StdError;

use thiserror::Error;

/// Joins an error with its sources so the root cause ("operation timed out",
/// "connection refused") survives into user-facing strings.
pub fn chain(err: &dyn StdError) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Failure to obtain a category page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not build HTTP client: {0}")]
    Client(String),

    #[error("request to {url} failed: {}", chain(.source))]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Selector strings that cannot be compiled. Only reachable when the
/// built-in selector table is edited into something invalid.
#[derive(Debug, Error)]
#[error("invalid selector `{selector}`: {reason}")]
pub struct ExtractError {
    pub selector: &'static str,
    pub reason: String,
}

/// Failure talking to the completion endpoint.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("GROQ_API_KEY is not set")]
    MissingApiKey,

    #[error("network error: {}", chain(.0))]
    Network(#[from] reqwest::Error),

    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Parse(String),
}
