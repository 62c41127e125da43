use crate::params::{CseThresholds, DeThresholds, DisThresholds, FilterConfigError};
use annotation::{Gene, GeneTable};
use expression::{Cluster, ClusterIsoformStats, ExpressionSource};

/// Which genes to keep.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneFilter {
    /// Keep every gene.
    None,
    DominantIsoformSwitching(DisThresholds),
    DifferentialExpression {
        categories: Vec<String>,
        thresholds: DeThresholds,
    },
    CategorySpecificExpression {
        categories: Vec<String>,
        thresholds: CseThresholds,
    },
}

impl GeneFilter {
    /// Check thresholds and categories against the clusters of the active
    /// label set. The engine itself assumes a valid filter.
    pub fn validate(&self, clusters: &[Cluster]) -> Result<(), FilterConfigError> {
        match self {
            GeneFilter::None => Ok(()),
            GeneFilter::DominantIsoformSwitching(thresholds) => thresholds.validate(),
            GeneFilter::DifferentialExpression {
                categories,
                thresholds,
            } => {
                thresholds.validate()?;
                if categories.len() < 2 {
                    return Err(FilterConfigError::TooFewDeCategories);
                }
                check_categories(categories, clusters)
            }
            GeneFilter::CategorySpecificExpression {
                categories,
                thresholds,
            } => {
                thresholds.validate()?;
                if categories.is_empty() {
                    return Err(FilterConfigError::NoCseCategories);
                }
                check_categories(categories, clusters)
            }
        }
    }
}

fn check_categories(categories: &[String], clusters: &[Cluster]) -> Result<(), FilterConfigError> {
    match categories
        .iter()
        .find(|name| !clusters.iter().any(|c| c.name() == name.as_str()))
    {
        Some(name) => Err(FilterConfigError::UnknownCategory(name.clone())),
        None => Ok(()),
    }
}

/// Classifies genes by how their isoforms are expressed across the clusters
/// of one label set.
pub struct GeneFilterEngine<'a, S: ?Sized> {
    source: &'a S,
    clusters: &'a [Cluster],
}

impl<'a, S: ExpressionSource + ?Sized> GeneFilterEngine<'a, S> {
    pub fn new(source: &'a S, clusters: &'a [Cluster]) -> Self {
        GeneFilterEngine { source, clusters }
    }

    pub fn clusters(&self) -> &'a [Cluster] {
        self.clusters
    }

    /// Mean expression (zeros excluded) and percent expressing of an
    /// isoform in a cluster.
    pub fn stats(&self, isoform_id: &str, cluster: &Cluster) -> ClusterIsoformStats {
        ClusterIsoformStats::compute(self.source, isoform_id, cluster)
    }

    pub fn gene_passes(&self, gene: &Gene, filter: &GeneFilter) -> bool {
        match filter {
            GeneFilter::None => true,
            GeneFilter::DominantIsoformSwitching(t) => {
                self.gene_has_isoform_switches(gene, t.min_tpm, t.min_percent_expressing)
            }
            GeneFilter::DifferentialExpression {
                categories,
                thresholds: t,
            } => self.gene_is_differentially_expressed(
                gene,
                categories,
                t.min_fold_change,
                t.min_tpm,
                t.min_percent_expressing,
            ),
            GeneFilter::CategorySpecificExpression {
                categories,
                thresholds: t,
            } => self.gene_has_category_specific_expression(
                gene,
                categories,
                t.min_tpm,
                t.min_percent_expressing,
                t.max_tpm,
                t.max_percent_expressing,
            ),
        }
    }

    /// Genes of `table` that pass `filter`, in gene id order.
    pub fn filter_genes<'g>(&self, table: &'g GeneTable, filter: &GeneFilter) -> Vec<&'g Gene> {
        table
            .iter()
            .filter(|gene| self.gene_passes(gene, filter))
            .collect()
    }
}

pub(crate) fn is_selected(cluster: &Cluster, categories: &[String]) -> bool {
    categories.iter().any(|name| name == cluster.name())
}
