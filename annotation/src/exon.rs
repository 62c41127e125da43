use std::fmt;

/// An exon on a chromosome. Coordinates are 1-based and inclusive, as they
/// appear in the GTF.
#[derive(Hash, Eq, PartialEq, Debug, Clone, Copy, Ord, PartialOrd)]
pub struct Exon {
    start: u64,
    end: u64,
}

/// Returned when an exon would end before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("exon start {start} is greater than its end {end}")]
pub struct InvalidExonRange {
    pub start: u64,
    pub end: u64,
}

impl Exon {
    pub fn new(start: u64, end: u64) -> Result<Exon, InvalidExonRange> {
        if start > end {
            return Err(InvalidExonRange { start, end });
        }
        Ok(Exon { start, end })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of nucleotides covered by the exon, never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

impl fmt::Display for Exon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
