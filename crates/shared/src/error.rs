//! Error types shared across the site

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SiteError {
    #[error("Unknown subscription tier: {0}")]
    UnknownTier(String),
}
