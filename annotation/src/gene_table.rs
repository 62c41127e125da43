use crate::errors::GtfError;
use crate::exon::Exon;
use crate::gene::Gene;
use crate::isoform::Isoform;
use crate::parse_gtf::{split_gtf_line, strip_comment};
use flate2::read::MultiGzDecoder;
use log::{debug, info, warn};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Every gene of one annotation file, keyed by gene id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneTable {
    genes: BTreeMap<String, Gene>,
}

/// Line counts from one pass over a GTF file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: usize,
    pub exon_records: usize,
    pub skipped_malformed: usize,
}

impl GeneTable {
    /// Read a GTF file, decompressing it if the path ends in `.gz`.
    pub fn from_path(path: &Path) -> Result<GeneTable, GtfError> {
        GeneTable::from_path_with_stats(path).map(|(table, _)| table)
    }

    pub fn from_path_with_stats(path: &Path) -> Result<(GeneTable, ParseStats), GtfError> {
        let file = File::open(path).map_err(|source| GtfError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let (table, stats) = if is_gzipped(path) {
            GeneTable::from_reader_with_stats(BufReader::new(MultiGzDecoder::new(file)))?
        } else {
            GeneTable::from_reader_with_stats(BufReader::new(file))?
        };
        info!(
            "loaded {} genes from {} ({} exon records on {} lines, {} malformed lines skipped)",
            table.len(),
            path.display(),
            stats.exon_records,
            stats.lines,
            stats.skipped_malformed,
        );
        Ok((table, stats))
    }

    /// Read an uncompressed GTF stream.
    pub fn from_reader(reader: impl BufRead) -> Result<GeneTable, GtfError> {
        GeneTable::from_reader_with_stats(reader).map(|(table, _)| table)
    }

    pub fn from_reader_with_stats(
        mut reader: impl BufRead,
    ) -> Result<(GeneTable, ParseStats), GtfError> {
        load_from_gtf_reader(&mut reader)
    }

    pub fn genes(&self) -> &BTreeMap<String, Gene> {
        &self.genes
    }

    pub fn get(&self, gene_id: &str) -> Option<&Gene> {
        self.genes.get(gene_id)
    }

    /// Genes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Gene> {
        self.genes.values()
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Find an isoform by id and the gene that owns it.
    pub fn isoform(&self, isoform_id: &str) -> Option<(&Gene, &Isoform)> {
        self.iter()
            .find_map(|gene| gene.isoform(isoform_id).map(|iso| (gene, iso)))
    }

    pub fn genes_with_junctions(&self) -> impl Iterator<Item = &Gene> {
        self.iter().filter(|gene| gene.has_isoform_with_junctions())
    }
}

fn is_gzipped(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Build a `GeneTable` from the `exon` records of a GTF stream. Lines
/// without nine columns are skipped with a warning; other feature types are
/// skipped silently.
fn load_from_gtf_reader(in_gtf: &mut dyn BufRead) -> Result<(GeneTable, ParseStats), GtfError> {
    let mut genes: BTreeMap<String, Gene> = BTreeMap::new();
    let mut stats = ParseStats::default();

    for (line_idx, line) in in_gtf.lines().enumerate() {
        let line_num = line_idx + 1;
        let line = line.map_err(|source| GtfError::Read {
            line: line_num,
            source,
        })?;
        stats.lines = line_num;

        let data = strip_comment(&line);
        let Some(rec) = split_gtf_line(data) else {
            if !data.trim().is_empty() {
                warn!("skipping GTF line {line_num}: expected 9 tab-separated columns");
                stats.skipped_malformed += 1;
            }
            continue;
        };
        if !rec.is_exon() {
            continue;
        }
        stats.exon_records += 1;

        let start = rec
            .start()
            .ok_or(GtfError::InvalidStartCoordinate { line: line_num })?;
        let end = rec
            .end()
            .ok_or(GtfError::InvalidEndCoordinate { line: line_num })?;
        let exon = Exon::new(start, end).map_err(|err| GtfError::InvalidExonRange {
            line: line_num,
            start: err.start,
            end: err.end,
        })?;

        let attrs = rec.exon_attributes();
        let (Some(gene_id), Some(transcript_id)) = (attrs.gene_id, attrs.transcript_id) else {
            return Err(GtfError::MissingRequiredAttributes { line: line_num });
        };

        // chromosome and strand come from the first record of a gene
        let gene = match genes.entry(gene_id.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!("new gene {gene_id} on {} at line {line_num}", rec.seqname);
                entry.insert(Gene::new(gene_id, rec.seqname, rec.is_positive_strand()))
            }
        };

        let isoform = gene.add_exon(transcript_id, exon);
        if let Some(name) = attrs.transcript_name {
            isoform.set_name_if_absent(name);
        }
        if let Some(name) = attrs.gene_name {
            gene.set_name_if_absent(name);
        }
    }

    Ok((GeneTable { genes }, stats))
}
