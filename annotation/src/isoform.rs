use crate::exon::Exon;

/// A transcript of a gene, defined by its exons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Isoform {
    id: String,
    name: Option<String>,
    // Kept sorted by coordinate and free of duplicates.
    exons: Vec<Exon>,
}

impl Isoform {
    pub fn new(id: impl Into<String>) -> Isoform {
        Isoform {
            id: id.into(),
            name: None,
            exons: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the display name unless one was already set. Returns true if the
    /// name was stored.
    pub fn set_name_if_absent(&mut self, name: impl Into<String>) -> bool {
        if self.name.is_some() {
            return false;
        }
        self.name = Some(name.into());
        true
    }

    /// Add an exon, ignoring it if an identical exon is already present.
    pub fn add_exon(&mut self, exon: Exon) {
        if let Err(pos) = self.exons.binary_search(&exon) {
            self.exons.insert(pos, exon);
        }
    }

    /// Exons in ascending coordinate order.
    pub fn exons(&self) -> &[Exon] {
        &self.exons
    }

    pub fn exon_count(&self) -> usize {
        self.exons.len()
    }

    /// An isoform with two or more exons has at least one splice junction.
    pub fn has_junctions(&self) -> bool {
        self.exons.len() > 1
    }

    pub fn start(&self) -> Option<u64> {
        self.exons.first().map(Exon::start)
    }

    pub fn end(&self) -> Option<u64> {
        self.exons.iter().map(Exon::end).max()
    }
}
