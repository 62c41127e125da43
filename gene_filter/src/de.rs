use crate::engine::{is_selected, GeneFilterEngine};
use annotation::{Gene, Isoform};
use expression::ExpressionSource;

impl<'a, S: ExpressionSource + ?Sized> GeneFilterEngine<'a, S> {
    /// True if any isoform of `gene` is differentially expressed between the
    /// clusters named in `categories`.
    pub fn gene_is_differentially_expressed(
        &self,
        gene: &Gene,
        categories: &[String],
        min_fold_change: f64,
        min_expr: f64,
        min_pct_expr: f64,
    ) -> bool {
        gene.isoforms().any(|isoform| {
            self.isoform_is_differentially_expressed(
                isoform,
                categories,
                min_fold_change,
                min_expr,
                min_pct_expr,
            )
        })
    }

    /// Scanning the selected clusters in order, a cluster that is expressed
    /// above the running maximum and clears both thresholds raises the
    /// maximum; any other cluster can only lower the running minimum. The
    /// isoform passes if maximum / minimum reaches `min_fold_change`.
    pub fn isoform_is_differentially_expressed(
        &self,
        isoform: &Isoform,
        categories: &[String],
        min_fold_change: f64,
        min_expr: f64,
        min_pct_expr: f64,
    ) -> bool {
        let mut max = 0.0;
        let mut min = f64::INFINITY;
        for cluster in self.clusters().iter().filter(|c| is_selected(c, categories)) {
            let stats = self.stats(isoform.id(), cluster);
            // no expressing cells: nothing to compare
            let Some(expr) = stats.expression else {
                continue;
            };
            if expr > max && expr > min_expr && stats.percent_expressing > min_pct_expr {
                max = expr;
            } else if expr < min {
                min = expr;
            }
        }
        max / min >= min_fold_change
    }
}

#[cfg(test)]
mod test {
    use crate::engine::test::{clusters, gene, Levels};
    use crate::engine::GeneFilterEngine;

    fn names(categories: &[&str]) -> Vec<String> {
        categories.iter().map(ToString::to_string).collect()
    }

    fn three_clusters(levels: [f64; 3]) -> Levels {
        let mut src = Levels::default();
        for (i, level) in levels.into_iter().enumerate() {
            src.set("T1", 2 * i..2 * i + 2, level);
        }
        src
    }

    #[test]
    fn fold_change_boundary_is_inclusive() {
        let g = gene("G", &["T1"]);
        let cl = clusters(&["a", "b", "c"], 2);
        let cats = names(&["a", "b", "c"]);
        let src = three_clusters([10.0, 10.0, 20.0]);
        let engine = GeneFilterEngine::new(&src, &cl);
        assert!(engine.gene_is_differentially_expressed(&g, &cats, 2.0, 5.0, 0.0));
        assert!(!engine.gene_is_differentially_expressed(&g, &cats, 2.01, 5.0, 0.0));
    }

    #[test]
    fn only_selected_categories_count() {
        let g = gene("G", &["T1"]);
        let cl = clusters(&["a", "b", "c"], 2);
        let src = three_clusters([1.0, 100.0, 50.0]);
        let engine = GeneFilterEngine::new(&src, &cl);
        assert!(engine.gene_is_differentially_expressed(&g, &names(&["a", "b"]), 10.0, 5.0, 0.0));
        assert!(!engine.gene_is_differentially_expressed(&g, &names(&["b", "c"]), 10.0, 5.0, 0.0));
    }

    #[test]
    fn needs_a_cluster_on_each_side() {
        let g = gene("G", &["T1"]);
        let cl = clusters(&["a", "b", "c"], 2);
        let cats = names(&["a", "b", "c"]);

        // every cluster clears the thresholds in rising order, so min stays infinite
        let engine_src = three_clusters([20.0, 40.0, 80.0]);
        let engine = GeneFilterEngine::new(&engine_src, &cl);
        assert!(!engine.gene_is_differentially_expressed(&g, &cats, 1.0, 5.0, 0.0));

        // no cluster clears the thresholds
        let engine_src = three_clusters([1.0, 2.0, 3.0]);
        let engine = GeneFilterEngine::new(&engine_src, &cl);
        assert!(!engine.gene_is_differentially_expressed(&g, &cats, 1.0, 5.0, 0.0));

        // a cluster with no expressing cells is skipped rather than read as 0
        let engine_src = three_clusters([0.0, 100.0, 10.0]);
        let engine = GeneFilterEngine::new(&engine_src, &cl);
        assert!(engine.gene_is_differentially_expressed(&g, &cats, 10.0, 5.0, 0.0));
        assert!(!engine.gene_is_differentially_expressed(&g, &cats, 11.0, 5.0, 0.0));
    }
}
