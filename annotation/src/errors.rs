use std::path::PathBuf;

/// Fatal errors while loading a GTF file. Any of these aborts the whole parse.
/// Line numbers are 1-based.
#[derive(Debug, thiserror::Error)]
pub enum GtfError {
    #[error("Could not read the GTF file {path:?}")]
    FileUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed reading line {line} of the GTF file")]
    Read {
        line: usize,
        source: std::io::Error,
    },

    #[error(
        "GTF file has invalid start coordinate at line: {line}. \
         The start coordinate must be an integer value > 0"
    )]
    InvalidStartCoordinate { line: usize },

    #[error(
        "GTF file has invalid end coordinate at line: {line}. \
         The end coordinate must be an integer value > 0"
    )]
    InvalidEndCoordinate { line: usize },

    #[error(
        "GTF file has an exon at line: {line} whose start coordinate {start} \
         is greater than its end coordinate {end}"
    )]
    InvalidExonRange { line: usize, start: u64, end: u64 },

    #[error(
        "Attributes column on line: {line} is missing required information. \
         Required information includes transcript_id and gene_id"
    )]
    MissingRequiredAttributes { line: usize },
}

impl GtfError {
    /// The 1-based line the error was raised on, if it concerns a single line.
    pub fn line(&self) -> Option<usize> {
        match self {
            GtfError::FileUnreadable { .. } => None,
            GtfError::Read { line, .. }
            | GtfError::InvalidStartCoordinate { line }
            | GtfError::InvalidEndCoordinate { line }
            | GtfError::InvalidExonRange { line, .. }
            | GtfError::MissingRequiredAttributes { line } => Some(*line),
        }
    }
}
