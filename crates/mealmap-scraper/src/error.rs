use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to launch browser: {reason}")]
    Launch { reason: String },

    #[error("browser error at {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("page load timed out: {url}")]
    Timeout { url: String },

    #[error("extraction error: {0}")]
    Parse(String),
}
