//! Classify genes by how their isoforms are expressed across cell clusters:
//! dominant isoform switching, differential expression and
//! category-specific expression.

mod cse;
mod de;
mod dis;
mod engine;
mod max_fold_change;
pub mod params;

pub use crate::engine::{GeneFilter, GeneFilterEngine};
pub use crate::max_fold_change::{GeneMaxFoldChange, MaxFoldChangeCache};
pub use crate::params::{CseThresholds, DeThresholds, DisThresholds, FilterConfigError, FilterParams};
