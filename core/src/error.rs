//! Error types for the recoverable failures of the cheat and search engines.
//!
//! A malformed database line is skipped and an insert into a full table is
//! a no-op; only the conditions a caller can act on are surfaced here.

/// Errors reported by byte-range tables and the memory search engine.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SearchError {
    /// Not enough memory for the search tables of the chosen CPU.
    #[error("search tables need {needed} more bytes (0x{needed:X}) of free memory")]
    OutOfMemory { needed: usize },

    /// Two byte-range tables with different region layouts were combined.
    #[error("byte-range tables have different layouts")]
    LayoutMismatch,

    /// A search step was requested before any search was started.
    #[error("no search has been started")]
    NotStarted,
}

/// Errors opening a cheat database explicitly.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("cannot open cheat database {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}
