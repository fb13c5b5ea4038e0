use thiserror::Error;

/// The only way a fetch can fail. Network errors, non-success status codes
/// and undecodable bodies all land here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: String },
}

impl FetchError {
    pub fn failed(url: impl Into<String>, reason: impl ToString) -> Self {
        FetchError::FetchFailed {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            FetchError::FetchFailed { url, .. } => url,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            FetchError::FetchFailed { reason, .. } => reason,
        }
    }
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("poll interval for {0} must be greater than zero")]
    InvalidInterval(String),

    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
