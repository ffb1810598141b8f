//! Record persistence
//!
//! Records are appended to per-keyword CSV destinations. Each keyword gets one
//! destination per pipeline stage; appends are incremental so partial runs and
//! re-invocations leave the files well-formed (re-running a stage appends, it
//! never dedups).

mod csv_sink;

pub use csv_sink::CsvSink;

use thiserror::Error;

/// Errors that can occur during sink operations
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("no records to write to '{destination}'")]
    EmptyBatch { destination: String },

    #[error("failed to persist records to '{destination}': {source}")]
    Persist {
        destination: String,
        source: csv::Error,
    },

    #[error("failed to read records from '{destination}': {source}")]
    Read {
        destination: String,
        source: csv::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Pipeline stage a destination belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Search-result stubs from the crawl stage
    Search,
    /// Enriched records from the detail scrape stage
    Detail,
}

/// Resolves the destination filename for a keyword and stage
///
/// Spaces in the keyword become hyphens. The search stage keeps the bare
/// `<keyword>.csv` name; the detail stage carries a `-details` suffix.
pub fn destination_for(keyword: &str, stage: Stage) -> String {
    let slug = keyword.replace(' ', "-");
    match stage {
        Stage::Search => format!("{}.csv", slug),
        Stage::Detail => format!("{}-details.csv", slug),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_for_search() {
        assert_eq!(destination_for("grilling", Stage::Search), "grilling.csv");
    }

    #[test]
    fn test_destination_for_detail() {
        assert_eq!(
            destination_for("grilling", Stage::Detail),
            "grilling-details.csv"
        );
    }

    #[test]
    fn test_destination_replaces_all_spaces() {
        assert_eq!(
            destination_for("camp fire cooking", Stage::Search),
            "camp-fire-cooking.csv"
        );
    }
}
