//! Cell clusters, the cell × isoform expression matrix and the per-cluster
//! statistics computed from them.

mod cluster;
mod dataset;
mod matrix;
pub mod stats;

pub use crate::cluster::{Cluster, LabelSet};
pub use crate::dataset::{Dataset, DatasetPaths};
pub use crate::matrix::{ExpressionMatrix, MatrixError};
pub use crate::stats::{ClusterIsoformStats, ExpressionSource};
