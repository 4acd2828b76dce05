//! Typed error kinds for the devtools commands.

use std::path::PathBuf;

use thiserror::Error;

/// Domain errors raised by the generators and the changelog aggregator.
#[derive(Error, Debug)]
pub enum DevtoolsError {
    /// A test source carries neither `goog.provide()` nor `goog.module()`.
    #[error(
        "goog.provide() or goog.module() not found in file: {}",
        .path.display()
    )]
    MissingDeclaration { path: PathBuf },

    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] tera::Error),

    #[error(
        "Github API token is required: pass --token=<token> or set GITHUB_TOKEN"
    )]
    MissingToken,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Datetime parse error: {0}")]
    ChronoParseError(#[from] chrono::ParseError),

    #[error("Regular expression error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Network request failed: {0}")]
    NetworkError(String),

    #[error("API authentication failed: {0}")]
    AuthenticationError(String),

    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using DevtoolsError, for modules whose callers match
/// on specific error kinds.
pub type Result<T> = std::result::Result<T, DevtoolsError>;

impl DevtoolsError {
    pub fn missing_declaration(path: impl Into<PathBuf>) -> Self {
        Self::MissingDeclaration { path: path.into() }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

// Generic I/O errors wrap into the report variant.
impl From<std::io::Error> for DevtoolsError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}

// Classify GitHub API failures so auth and rate-limit problems surface as
// their own kinds instead of a generic network error.
impl From<octocrab::Error> for DevtoolsError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. } => {
                let status = source.status_code;
                if status == reqwest::StatusCode::UNAUTHORIZED
                    || status == reqwest::StatusCode::FORBIDDEN
                {
                    Self::AuthenticationError(err.to_string())
                } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS
                    || source.message.contains("rate limit")
                {
                    Self::RateLimitExceeded
                } else {
                    Self::NetworkError(format!("GitHub API error: {}", err))
                }
            }
            _ => Self::NetworkError(format!("GitHub API error: {}", err)),
        }
    }
}

impl From<reqwest::Error> for DevtoolsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_status() {
            match err.status() {
                Some(status)
                    if status.as_u16() == 401 || status.as_u16() == 403 =>
                {
                    Self::AuthenticationError(err.to_string())
                }
                Some(status) if status.as_u16() == 429 => {
                    Self::RateLimitExceeded
                }
                _ => Self::NetworkError(err.to_string()),
            }
        } else {
            Self::NetworkError(err.to_string())
        }
    }
}
