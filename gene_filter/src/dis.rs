//! Dominant isoform switching: a gene whose most expressed isoforms differ
//! between clusters.

use crate::engine::GeneFilterEngine;
use annotation::Gene;
use expression::{Cluster, ExpressionSource};
use itertools::Itertools;
use log::debug;
use std::collections::BTreeSet;

/// Expression ratio beyond which one isoform clearly dominates another.
const DOMINANCE_RATIO: f64 = 1.1;

impl<'a, S: ExpressionSource + ?Sized> GeneFilterEngine<'a, S> {
    /// True if the dominant isoforms of `gene` are not the same in every
    /// cluster. Clusters with no dominant isoform are left out of the
    /// comparison.
    pub fn gene_has_isoform_switches(&self, gene: &Gene, min_expr: f64, min_pct_expr: f64) -> bool {
        let switches = self
            .clusters()
            .iter()
            .map(|cluster| self.dominant_isoforms(gene, cluster, min_expr, min_pct_expr))
            .filter(|dominant| !dominant.is_empty())
            .dedup()
            .nth(1)
            .is_some();
        if switches {
            debug!("{} switches dominant isoform between clusters", gene.id());
        }
        switches
    }

    /// Isoforms of `gene` that dominate expression in `cluster`.
    ///
    /// Isoforms are considered in id order. An eligible isoform is compared
    /// with each isoform already found dominant: a clearly higher expression
    /// evicts the incumbent, a clearly lower one rejects the candidate, and
    /// a near tie is decided by the percentage of expressing cells.
    pub fn dominant_isoforms<'g>(
        &self,
        gene: &'g Gene,
        cluster: &Cluster,
        min_expr: f64,
        min_pct_expr: f64,
    ) -> BTreeSet<&'g str> {
        // (isoform id, expression, percent expressing)
        let mut dominant: Vec<(&'g str, f64, f64)> = Vec::new();

        'candidates: for isoform in gene.isoforms() {
            let stats = self.stats(isoform.id(), cluster);
            let expr = match stats.expression {
                Some(expr) if expr >= min_expr => expr,
                _ => continue,
            };
            let pct = stats.percent_expressing;
            if pct < min_pct_expr {
                continue;
            }

            // Incumbents evicted before a rejection stay evicted.
            while let Some(&(_, inc_expr, inc_pct)) = dominant.first() {
                match compare(expr, pct, inc_expr, inc_pct) {
                    Outcome::RejectCandidate => continue 'candidates,
                    Outcome::RemoveIncumbent => {
                        dominant.remove(0);
                    }
                }
            }
            dominant.push((isoform.id(), expr, pct));
        }
        dominant.into_iter().map(|(id, _, _)| id).collect()
    }
}

enum Outcome {
    RejectCandidate,
    RemoveIncumbent,
}

fn compare(expr: f64, pct: f64, inc_expr: f64, inc_pct: f64) -> Outcome {
    let ratio = expr / inc_expr;
    if ratio < 1.0 / DOMINANCE_RATIO {
        Outcome::RejectCandidate
    } else if ratio > DOMINANCE_RATIO {
        Outcome::RemoveIncumbent
    } else if ratio > 1.0 {
        if pct >= inc_pct {
            Outcome::RemoveIncumbent
        } else {
            Outcome::RejectCandidate
        }
    } else if inc_pct >= pct {
        Outcome::RejectCandidate
    } else {
        Outcome::RemoveIncumbent
    }
}
