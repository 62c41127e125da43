//! The largest change in expression of any isoform of a gene between two
//! clusters, used to rank genes.

use crate::engine::GeneFilterEngine;
use annotation::{Gene, GeneTable};
use expression::{ExpressionSource, LabelSet};
use log::info;
use ordered_float::OrderedFloat;
use std::collections::HashMap;
use std::fmt;

/// Ordered by fold change, ties broken by percent expressing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeneMaxFoldChange {
    pub max_fold_change: OrderedFloat<f64>,
    pub max_percent_expressing: OrderedFloat<f64>,
}

impl GeneMaxFoldChange {
    pub fn new(max_fold_change: f64, max_percent_expressing: f64) -> Self {
        GeneMaxFoldChange {
            max_fold_change: OrderedFloat(max_fold_change),
            max_percent_expressing: OrderedFloat(max_percent_expressing),
        }
    }
}

impl fmt::Display for GeneMaxFoldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.max_fold_change)
    }
}

impl<'a, S: ExpressionSource + ?Sized> GeneFilterEngine<'a, S> {
    /// Over all isoforms of `gene`, the highest ratio between its most and
    /// least expressed cluster. A cluster without expressing cells counts as
    /// 0, so an isoform absent from some cluster has an infinite fold change.
    pub fn gene_max_fold_change(&self, gene: &Gene) -> GeneMaxFoldChange {
        let mut result = GeneMaxFoldChange::default();
        for isoform in gene.isoforms() {
            let mut max = 0.0_f64;
            let mut min = f64::INFINITY;
            for cluster in self.clusters() {
                let stats = self.stats(isoform.id(), cluster);
                let expr = stats.expression_or_zero();
                max = max.max(expr);
                min = min.min(expr);
                result.max_percent_expressing =
                    result.max_percent_expressing.max(OrderedFloat(stats.percent_expressing));
            }
            result.max_fold_change = result.max_fold_change.max(OrderedFloat(fold_change(max, min)));
        }
        result
    }
}

fn fold_change(max: f64, min: f64) -> f64 {
    if max == 0.0 {
        0.0
    } else if min == 0.0 {
        f64::INFINITY
    } else {
        max / min
    }
}

/// Max fold change of every gene, per label set.
#[derive(Debug, Default, Clone)]
pub struct MaxFoldChangeCache {
    by_label_set: HashMap<String, HashMap<String, GeneMaxFoldChange>>,
}

impl MaxFoldChangeCache {
    pub fn new() -> Self {
        MaxFoldChangeCache::default()
    }

    /// Compute and store the max fold change of every gene in `table` over
    /// the clusters of `label_set`, replacing anything stored for it before.
    pub fn calculate<S: ExpressionSource + ?Sized>(
        &mut self,
        table: &GeneTable,
        source: &S,
        label_set: &LabelSet,
    ) {
        let engine = GeneFilterEngine::new(source, label_set.clusters());
        let values = table
            .iter()
            .map(|gene| (gene.id().to_string(), engine.gene_max_fold_change(gene)))
            .collect();
        info!(
            "computed max fold change of {} genes over label set {:?}",
            table.len(),
            label_set.name()
        );
        self.by_label_set.insert(label_set.name().to_string(), values);
    }

    pub fn get(&self, label_set: &str, gene_id: &str) -> Option<GeneMaxFoldChange> {
        self.by_label_set.get(label_set)?.get(gene_id).copied()
    }

    pub fn contains_label_set(&self, label_set: &str) -> bool {
        self.by_label_set.contains_key(label_set)
    }

    /// Forget a label set that is no longer available.
    pub fn remove_label_set(&mut self, label_set: &str) {
        self.by_label_set.remove(label_set);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::engine::test::{clusters, gene, Levels};
    use pretty_assertions::assert_eq;

    #[test]
    fn largest_ratio_over_isoforms() {
        let g = gene("G", &["T1", "T2"]);
        let cl = clusters(&["a", "b"], 2);
        let mut src = Levels::default();
        src.set("T1", 0..2, 30.0);
        src.set("T1", 2..4, 10.0);
        src.set("T2", 0..2, 8.0);
        src.set("T2", 2..3, 2.0);
        let engine = GeneFilterEngine::new(&src, &cl);
        assert_eq!(engine.gene_max_fold_change(&g), GeneMaxFoldChange::new(4.0, 100.0));
    }

    #[test]
    fn absent_and_silent_isoforms() {
        let cl = clusters(&["a", "b"], 2);
        let mut src = Levels::default();
        src.set("T1", 0..1, 5.0);
        let engine = GeneFilterEngine::new(&src, &cl);
        let fc = engine.gene_max_fold_change(&gene("G", &["T1"]));
        assert_eq!(fc.max_fold_change.0, f64::INFINITY);
        assert_eq!(fc.max_percent_expressing.0, 50.0);

        let fc = engine.gene_max_fold_change(&gene("G", &["T9"]));
        assert_eq!(fc, GeneMaxFoldChange::new(0.0, 0.0));
    }

    #[test]
    fn ordering() {
        let mut v = vec![
            GeneMaxFoldChange::new(2.0, 90.0),
            GeneMaxFoldChange::new(f64::INFINITY, 10.0),
            GeneMaxFoldChange::new(2.0, 10.0),
            GeneMaxFoldChange::new(1.5, 100.0),
        ];
        v.sort();
        assert_eq!(
            v,
            [
                GeneMaxFoldChange::new(1.5, 100.0),
                GeneMaxFoldChange::new(2.0, 10.0),
                GeneMaxFoldChange::new(2.0, 90.0),
                GeneMaxFoldChange::new(f64::INFINITY, 10.0),
            ]
        );
        assert_eq!(GeneMaxFoldChange::new(2.5, 1.0).to_string(), "2.5");
    }

    #[test]
    fn cache_per_label_set() -> anyhow::Result<()> {
        let gtf = "chr1\ts\texon\t1\t10\t.\t+\t.\tgene_id \"G1\"; transcript_id \"T1\";\n";
        let table = GeneTable::from_reader(gtf.as_bytes())?;
        let mut src = Levels::default();
        src.set("T1", 0..2, 10.0);
        src.set("T1", 2..4, 5.0);
        let by_pair = LabelSet::new("pairs", clusters(&["a", "b"], 2));
        let everything = LabelSet::new("all", clusters(&["all"], 4));

        let mut cache = MaxFoldChangeCache::new();
        cache.calculate(&table, &src, &by_pair);
        cache.calculate(&table, &src, &everything);
        assert_eq!(cache.get("pairs", "G1"), Some(GeneMaxFoldChange::new(2.0, 100.0)));
        assert_eq!(cache.get("all", "G1"), Some(GeneMaxFoldChange::new(1.0, 100.0)));
        assert_eq!(cache.get("all", "G2"), None);

        cache.remove_label_set("pairs");
        assert!(!cache.contains_label_set("pairs"));
        assert_eq!(cache.get("pairs", "G1"), None);
        Ok(())
    }
}
