use anyhow::{Context, Result};
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A named group of cells. Cells are identified by their row in the
/// expression matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    name: String,
    cells: BTreeSet<usize>,
}

impl Cluster {
    pub fn new(name: impl Into<String>) -> Cluster {
        Cluster {
            name: name.into(),
            cells: BTreeSet::new(),
        }
    }

    pub fn with_cells(name: impl Into<String>, cells: impl IntoIterator<Item = usize>) -> Cluster {
        Cluster {
            name: name.into(),
            cells: cells.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_cell(&mut self, cell: usize) {
        self.cells.insert(cell);
    }

    pub fn contains(&self, cell: usize) -> bool {
        self.cells.contains(&cell)
    }

    /// Cells in ascending row order.
    pub fn cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// One way of assigning every cell to a cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    name: String,
    clusters: Vec<Cluster>,
}

impl LabelSet {
    pub fn new(name: impl Into<String>, clusters: Vec<Cluster>) -> LabelSet {
        LabelSet {
            name: name.into(),
            clusters,
        }
    }

    /// Build a label set from one label per cell. Clusters are ordered by the
    /// first cell that carries their label.
    pub fn from_cell_labels<S: AsRef<str>>(name: impl Into<String>, labels: &[S]) -> LabelSet {
        let mut clusters: Vec<Cluster> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for (cell, label) in labels.iter().enumerate() {
            let label = label.as_ref();
            let idx = *index.entry(label).or_insert_with(|| {
                clusters.push(Cluster::new(label));
                clusters.len() - 1
            });
            clusters[idx].add_cell(cell);
        }
        LabelSet::new(name, clusters)
    }

    /// Read a cell labels file: one label per line, line `i` labelling matrix
    /// row `i`.
    pub fn from_path(name: impl Into<String>, path: &Path) -> Result<LabelSet> {
        let file = File::open(path).with_context(|| path.display().to_string())?;
        let labels = read_lines(BufReader::new(file)).with_context(|| path.display().to_string())?;
        Ok(LabelSet::from_cell_labels(name, &labels))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn cluster(&self, name: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.name == name)
    }

    /// The cluster a cell belongs to.
    pub fn cluster_of(&self, cell: usize) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.contains(cell))
    }

    /// Total number of cells over all clusters.
    pub fn num_cells(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }
}

/// Lines of a text file with surrounding whitespace trimmed.
pub(crate) fn read_lines(reader: impl BufRead) -> std::io::Result<Vec<String>> {
    reader
        .lines()
        .map(|line| line.map(|l| l.trim().to_string()))
        .collect()
}
