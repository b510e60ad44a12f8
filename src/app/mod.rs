//! Binary-local application wiring.
//!
//! `main.rs` stays small: it parses flags, sets up logging, and hands off to
//! [`entry::run`], which builds the collaborators and runs the session.

pub(crate) mod entry;

use std::fmt;
use toolgate::error::{CatalogError, ConfigError, FrontendError};

/// Anything that ends the process with a non-zero status.
#[derive(Debug)]
pub(crate) enum AppError {
    Config(ConfigError),
    /// Tool discovery failed before the first prompt.
    Catalog(CatalogError),
    Frontend(FrontendError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Catalog(e) => write!(f, "loading tools: {e}"),
            Self::Frontend(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

impl From<FrontendError> for AppError {
    fn from(e: FrontendError) -> Self {
        Self::Frontend(e)
    }
}
