//! Infrastructure layer: configuration, logging, HTTP fetching and HTML parsing
//!
//! Everything here is independent of how queries are assembled; the
//! application layer wires these pieces together.

pub mod config; // Configuration loading and site constants
pub mod http_client;
pub mod logging; // Logging infrastructure
pub mod parsing; // Detail page and listing parsers
pub mod parsing_error;

// Re-export commonly used items
pub use config::{AppConfig, LoggingConfig, qidian};
pub use http_client::{FetchError, FetchRequest, Fetcher, HttpClient, HttpClientConfig};
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
pub use parsing::{
    BookDetailParser, ContextualParser, ParsingConfig, ParsingError, ParsingResult,
    SearchResultParser,
};
