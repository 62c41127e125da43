//! Gene / isoform / exon model and the GTF loader that builds it.

mod errors;
mod exon;
mod gene;
mod gene_table;
mod isoform;
pub mod parse_gtf;
mod shared;

pub use crate::errors::GtfError;
pub use crate::exon::{Exon, InvalidExonRange};
pub use crate::gene::Gene;
pub use crate::gene_table::{GeneTable, ParseStats};
pub use crate::isoform::Isoform;
pub use crate::shared::{LogSink, MessageSink, SharedGeneTable};
