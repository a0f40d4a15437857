//! Error types shared by the data sources, configuration and favorites store.
//!
//! The layout, highlight and recommendation engines are pure and never fail;
//! everything here originates at an I/O boundary.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The upstream graph or directory payload could not be obtained.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
