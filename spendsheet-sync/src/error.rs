use thiserror::Error;

/// Why a sheet could not be fetched
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sheet responded with status {status}")]
    Status { status: u16 },

    #[error("invalid sheet configuration: {0}")]
    Config(String),

    #[error("sheet unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;
