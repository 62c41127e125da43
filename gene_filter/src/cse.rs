use crate::engine::{is_selected, GeneFilterEngine};
use annotation::{Gene, Isoform};
use expression::ExpressionSource;

impl<'a, S: ExpressionSource + ?Sized> GeneFilterEngine<'a, S> {
    /// True if any isoform of `gene` is expressed specifically in the
    /// clusters named in `categories`.
    pub fn gene_has_category_specific_expression(
        &self,
        gene: &Gene,
        categories: &[String],
        min_expr: f64,
        min_pct_expr: f64,
        max_expr: f64,
        max_pct_expr: f64,
    ) -> bool {
        gene.isoforms().any(|isoform| {
            self.isoform_has_category_specific_expression(
                isoform,
                categories,
                min_expr,
                min_pct_expr,
                max_expr,
                max_pct_expr,
            )
        })
    }

    /// Every selected cluster must reach `min_expr` or `min_pct_expr`, and
    /// no other cluster may exceed both `max_expr` and `max_pct_expr`.
    /// Stops at the first cluster that fails.
    pub fn isoform_has_category_specific_expression(
        &self,
        isoform: &Isoform,
        categories: &[String],
        min_expr: f64,
        min_pct_expr: f64,
        max_expr: f64,
        max_pct_expr: f64,
    ) -> bool {
        self.clusters().iter().all(|cluster| {
            let stats = self.stats(isoform.id(), cluster);
            let expr = stats.expression_or_zero();
            let pct = stats.percent_expressing;
            if is_selected(cluster, categories) {
                !(expr < min_expr && pct < min_pct_expr)
            } else {
                !(expr > max_expr && pct > max_pct_expr)
            }
        })
    }
}
