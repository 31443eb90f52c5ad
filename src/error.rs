//! Call-surface errors for catalog operations

use thiserror::Error;

use crate::infrastructure::http_client::FetchError;
use crate::infrastructure::parsing::ParsingError;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// Caller input rejected before any request was made
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Transport failure, passed through untouched
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A detail page was fetched but could not be turned into a book.
    ///
    /// `document` holds the raw page so a markup change can be diagnosed.
    #[error("Failed to extract book '{book_id}': {source}")]
    Extraction {
        book_id: String,
        #[source]
        source: ParsingError,
        document: String,
    },

    /// A listing page was fetched but one of its rows could not be parsed
    #[error("Failed to parse search results from {url}: {source}")]
    Listing {
        url: String,
        #[source]
        source: ParsingError,
    },

    /// The page came back but does not have the expected shape
    #[error("Expected content not found at {url}")]
    NotFound { url: String },
}

impl CatalogError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// The underlying parsing error, for extraction and listing failures
    pub const fn parsing_error(&self) -> Option<&ParsingError> {
        match self {
            Self::Extraction { source, .. } | Self::Listing { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
