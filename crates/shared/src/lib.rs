//! Web Design Initiative Shared Types
//!
//! This crate contains the tier catalog and error types shared by the billing
//! crate and the API server.

pub mod error;
pub mod types;

pub use error::*;
pub use types::*;
