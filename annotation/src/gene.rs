use crate::exon::Exon;
use crate::isoform::Isoform;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A gene and the isoforms annotated for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gene {
    id: String,
    name: Option<String>,
    chromosome: String,
    on_positive_strand: bool,
    // Span over every exon of every isoform. Starts out inverted so the first
    // exon sets both ends.
    start: u64,
    end: u64,
    isoforms: BTreeMap<String, Isoform>,
}

impl Gene {
    pub fn new(
        id: impl Into<String>,
        chromosome: impl Into<String>,
        on_positive_strand: bool,
    ) -> Gene {
        Gene {
            id: id.into(),
            name: None,
            chromosome: chromosome.into(),
            on_positive_strand,
            start: u64::MAX,
            end: 0,
            isoforms: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name to show for the gene: its name if it has one, else its id.
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or(&self.id)
    }

    pub fn set_name_if_absent(&mut self, name: impl Into<String>) -> bool {
        if self.name.is_some() {
            return false;
        }
        self.name = Some(name.into());
        true
    }

    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    pub fn is_on_positive_strand(&self) -> bool {
        self.on_positive_strand
    }

    /// Smallest exon start. `u64::MAX` until an exon has been added.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Largest exon end. `0` until an exon has been added.
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Add an exon to the isoform `isoform_id`, creating the isoform if this
    /// gene has not seen it yet, and widen the gene span to cover the exon.
    pub fn add_exon(&mut self, isoform_id: &str, exon: Exon) -> &mut Isoform {
        self.start = self.start.min(exon.start());
        self.end = self.end.max(exon.end());

        let isoform = self
            .isoforms
            .entry(isoform_id.to_string())
            .or_insert_with(|| Isoform::new(isoform_id));
        isoform.add_exon(exon);
        isoform
    }

    pub fn has_isoform(&self, isoform_id: &str) -> bool {
        self.isoforms.contains_key(isoform_id)
    }

    pub fn isoform(&self, isoform_id: &str) -> Option<&Isoform> {
        self.isoforms.get(isoform_id)
    }

    /// Isoforms in id order.
    pub fn isoforms(&self) -> impl Iterator<Item = &Isoform> {
        self.isoforms.values()
    }

    pub fn isoforms_map(&self) -> &BTreeMap<String, Isoform> {
        &self.isoforms
    }

    pub fn num_isoforms(&self) -> usize {
        self.isoforms.len()
    }

    pub fn has_isoform_with_junctions(&self) -> bool {
        self.isoforms().any(Isoform::has_junctions)
    }

    pub fn isoforms_with_junctions(&self) -> impl Iterator<Item = &Isoform> {
        self.isoforms().filter(|iso| iso.has_junctions())
    }
}

impl PartialOrd for Gene {
    fn partial_cmp(&self, other: &Gene) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Gene {
    fn cmp(&self, other: &Gene) -> Ordering {
        self.id.cmp(&other.id)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn span_covers_all_exons_in_any_order() {
        let records = [("T1", 100, 200), ("T2", 50, 90), ("T1", 300, 400)];
        for order in records.iter().permutations(records.len()) {
            let mut gene = Gene::new("G1", "chr1", true);
            for &(tx, start, end) in order {
                gene.add_exon(tx, Exon::new(start, end).unwrap());
            }
            assert_eq!(gene.start(), 50);
            assert_eq!(gene.end(), 400);
            assert_eq!(gene.num_isoforms(), 2);
            assert!(gene.has_isoform_with_junctions());
            assert_eq!(
                gene.isoforms_with_junctions()
                    .map(Isoform::id)
                    .collect::<Vec<_>>(),
                ["T1"]
            );
        }
    }

    #[test]
    fn empty_gene_span_is_inverted() {
        let gene = Gene::new("G1", "chr1", false);
        assert_eq!(gene.start(), u64::MAX);
        assert_eq!(gene.end(), 0);
        assert!(!gene.is_on_positive_strand());
    }

    #[test]
    fn genes_order_by_id() {
        let mut genes = vec![
            Gene::new("G2", "chr1", true),
            Gene::new("G10", "chr2", true),
            Gene::new("G1", "chr3", false),
        ];
        genes.sort();
        let ids: Vec<_> = genes.iter().map(Gene::id).collect();
        assert_eq!(ids, ["G1", "G10", "G2"]);
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let mut gene = Gene::new("ENSG1", "chr1", true);
        assert_eq!(gene.display_name(), "ENSG1");
        gene.set_name_if_absent("ACTB");
        gene.set_name_if_absent("OTHER");
        assert_eq!(gene.display_name(), "ACTB");
    }
}
