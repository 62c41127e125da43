//! Per-cluster summaries of one isoform's expression.

use crate::cluster::Cluster;

/// Anything that can report the expression level of an isoform in a cell.
pub trait ExpressionSource {
    /// Expression of `isoform_id` in the cell at matrix row `cell`. Isoforms
    /// the source knows nothing about read as 0.
    fn expression_level(&self, isoform_id: &str, cell: usize) -> f64;
}

impl<S: ExpressionSource + ?Sized> ExpressionSource for &S {
    fn expression_level(&self, isoform_id: &str, cell: usize) -> f64 {
        (**self).expression_level(isoform_id, cell)
    }
}

/// Mean or median expression of an isoform over the cells of a cluster.
///
/// With `include_zeros == false` only expressing cells are summarised.
/// Returns `None` if no cells are left to summarise.
pub fn aggregate_expression<S: ExpressionSource + ?Sized>(
    source: &S,
    isoform_id: &str,
    cluster: &Cluster,
    use_median: bool,
    include_zeros: bool,
) -> Option<f64> {
    let mut levels: Vec<f64> = cluster
        .cells()
        .map(|cell| source.expression_level(isoform_id, cell))
        .filter(|&level| include_zeros || level > 0.0)
        .collect();
    if levels.is_empty() {
        return None;
    }
    if use_median {
        Some(median(&mut levels))
    } else {
        Some(mean(&levels))
    }
}

/// Number of cells in the cluster with non-zero expression of the isoform.
pub fn num_expressing_cells<S: ExpressionSource + ?Sized>(
    source: &S,
    isoform_id: &str,
    cluster: &Cluster,
) -> usize {
    cluster
        .cells()
        .filter(|&cell| source.expression_level(isoform_id, cell) > 0.0)
        .count()
}

/// Percentage (0 to 100) of the cluster's cells expressing the isoform.
/// An empty cluster has 0% expressing.
pub fn percent_expressing<S: ExpressionSource + ?Sized>(
    source: &S,
    isoform_id: &str,
    cluster: &Cluster,
) -> f64 {
    percent_ratio(num_expressing_cells(source, isoform_id, cluster), cluster.len())
}

/// What the filters need to know about one isoform in one cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterIsoformStats {
    /// Mean over expressing cells; `None` if no cell expresses the isoform.
    pub expression: Option<f64>,
    pub percent_expressing: f64,
}

impl ClusterIsoformStats {
    pub fn compute<S: ExpressionSource + ?Sized>(
        source: &S,
        isoform_id: &str,
        cluster: &Cluster,
    ) -> ClusterIsoformStats {
        ClusterIsoformStats {
            expression: aggregate_expression(source, isoform_id, cluster, false, false),
            percent_expressing: percent_expressing(source, isoform_id, cluster),
        }
    }

    /// Expression with "no expressing cells" read as 0.
    pub fn expression_or_zero(&self) -> f64 {
        self.expression.unwrap_or(0.0)
    }
}

fn mean(v: &[f64]) -> f64 {
    v.iter().sum::<f64>() / v.len() as f64
}

// v must be non-empty
fn median(v: &mut [f64]) -> f64 {
    v.sort_unstable_by(f64::total_cmp);
    let mid = v.len() / 2;
    if v.len() % 2 == 0 {
        (v[mid - 1] + v[mid]) / 2.0
    } else {
        v[mid]
    }
}

fn percent_ratio(a: usize, b: usize) -> f64 {
    if b == 0 {
        0.0
    } else {
        100.0 * a as f64 / b as f64
    }
}
