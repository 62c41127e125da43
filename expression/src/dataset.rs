use crate::cluster::LabelSet;
use crate::matrix::ExpressionMatrix;
use annotation::GeneTable;
use anyhow::{bail, Context, Result};
use log::info;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// The files making up a dataset, as listed in a dataset description JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasetPaths {
    pub gtf: PathBuf,
    pub matrix: PathBuf,
    #[serde(rename = "isoform ids")]
    pub isoform_ids: PathBuf,
    #[serde(rename = "label sets", default)]
    pub label_sets: BTreeMap<String, PathBuf>,
}

impl DatasetPaths {
    pub fn from_path(path: &Path) -> Result<DatasetPaths> {
        let file = File::open(path).with_context(|| path.display().to_string())?;
        let paths: DatasetPaths = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing dataset description {}", path.display()))?;
        Ok(paths.relative_to(path.parent().unwrap_or_else(|| Path::new(""))))
    }

    /// Resolve relative paths against `dir`.
    pub fn relative_to(self, dir: &Path) -> DatasetPaths {
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { dir.join(p) };
        DatasetPaths {
            gtf: resolve(self.gtf),
            matrix: resolve(self.matrix),
            isoform_ids: resolve(self.isoform_ids),
            label_sets: self
                .label_sets
                .into_iter()
                .map(|(name, p)| (name, resolve(p)))
                .collect(),
        }
    }
}

/// Everything needed to filter genes: annotation, expression and the ways
/// cells have been clustered.
#[derive(Debug)]
pub struct Dataset {
    pub genes: GeneTable,
    pub matrix: ExpressionMatrix,
    pub label_sets: Vec<LabelSet>,
}

impl Dataset {
    /// Load the dataset described by the JSON file at `path`.
    pub fn load(path: &Path) -> Result<Dataset> {
        let paths = DatasetPaths::from_path(path)?;
        Dataset::from_paths(&paths)
    }

    pub fn from_paths(paths: &DatasetPaths) -> Result<Dataset> {
        let genes = GeneTable::from_path(&paths.gtf)?;
        let matrix = ExpressionMatrix::from_paths(&paths.matrix, &paths.isoform_ids)
            .with_context(|| format!("loading expression matrix {}", paths.matrix.display()))?;

        let mut label_sets = Vec::with_capacity(paths.label_sets.len());
        for (name, labels) in &paths.label_sets {
            let set = LabelSet::from_path(name.as_str(), labels)?;
            matrix
                .check_row_labels(set.num_cells())
                .with_context(|| format!("label set {name:?}"))?;
            label_sets.push(set);
        }
        if label_sets.is_empty() {
            bail!("dataset has no label sets");
        }
        info!(
            "dataset: {} genes, {} cells, {} label sets",
            genes.len(),
            matrix.num_cells(),
            label_sets.len()
        );
        Ok(Dataset {
            genes,
            matrix,
            label_sets,
        })
    }

    pub fn label_set(&self, name: &str) -> Option<&LabelSet> {
        self.label_sets.iter().find(|s| s.name() == name)
    }
}
