use crate::cluster::read_lines;
use crate::stats::ExpressionSource;
use log::info;
use ndarray::Array2;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum MatrixError {
    #[error("Could not read {path:?}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed expression matrix")]
    Csv(#[from] csv::Error),

    #[error("Expression matrix value {value:?} at row {row}, column {column} is not a number")]
    NotANumber {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("Given expression matrix has a size of 0x0 (smallest size allowed: 1x1)")]
    SizeZero,

    #[error(
        "Row {row} of the expression matrix has {found} columns, \
         but the first row has {expected}"
    )]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error(
        "Given expression matrix has negative isoform expression values \
         (first at row {row}, column {column}). This is not allowed"
    )]
    NegativeExpression { row: usize, column: usize },

    #[error(
        "The number of column labels ({labels}) does not equal the number of \
         columns in the expression matrix ({columns})"
    )]
    ColumnLabelsLength { labels: usize, columns: usize },

    #[error(
        "The label \"{label}\" is in the column labels file more than once. \
         All column labels should be unique"
    )]
    DuplicateColumnLabel { label: String },

    #[error(
        "The number of row labels ({labels}) does not equal the number of \
         rows in the matrix ({rows})"
    )]
    RowLabelsLength { labels: usize, rows: usize },
}

/// Cell × isoform expression levels. Rows are cells, columns are isoforms.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionMatrix {
    values: Array2<f64>,
    isoform_ids: Vec<String>,
    isoform_index: HashMap<String, usize>,
}

impl ExpressionMatrix {
    /// Wrap a matrix and its column labels. Fails if the labels don't match
    /// the columns, a label repeats, the matrix is empty or any value is
    /// negative.
    pub fn new(values: Array2<f64>, isoform_ids: Vec<String>) -> Result<ExpressionMatrix, MatrixError> {
        let (rows, columns) = values.dim();
        if rows == 0 || columns == 0 {
            return Err(MatrixError::SizeZero);
        }
        if let Some(((row, column), _)) = values.indexed_iter().find(|(_, &v)| v < 0.0) {
            return Err(MatrixError::NegativeExpression { row, column });
        }
        if isoform_ids.len() != columns {
            return Err(MatrixError::ColumnLabelsLength {
                labels: isoform_ids.len(),
                columns,
            });
        }
        let mut isoform_index = HashMap::with_capacity(columns);
        for (idx, id) in isoform_ids.iter().enumerate() {
            if isoform_index.insert(id.clone(), idx).is_some() {
                return Err(MatrixError::DuplicateColumnLabel { label: id.clone() });
            }
        }
        Ok(ExpressionMatrix {
            values,
            isoform_ids,
            isoform_index,
        })
    }

    /// Load a tab-separated matrix and the file naming its columns, one
    /// isoform id per line.
    pub fn from_paths(matrix_path: &Path, ids_path: &Path) -> Result<ExpressionMatrix, MatrixError> {
        let values = read_tsv_matrix(open(matrix_path)?)?;
        let ids = read_lines(BufReader::new(open(ids_path)?)).map_err(|source| {
            MatrixError::Unreadable {
                path: ids_path.to_path_buf(),
                source,
            }
        })?;
        let matrix = ExpressionMatrix::new(values, ids)?;
        info!(
            "loaded {} cells x {} isoforms from {}",
            matrix.num_cells(),
            matrix.num_isoforms(),
            matrix_path.display(),
        );
        Ok(matrix)
    }

    pub fn num_cells(&self) -> usize {
        self.values.nrows()
    }

    pub fn num_isoforms(&self) -> usize {
        self.values.ncols()
    }

    pub fn isoform_ids(&self) -> &[String] {
        &self.isoform_ids
    }

    pub fn has_isoform(&self, isoform_id: &str) -> bool {
        self.isoform_index.contains_key(isoform_id)
    }

    /// Fails unless there is exactly one row label per cell.
    pub fn check_row_labels(&self, labels: usize) -> Result<(), MatrixError> {
        if labels != self.num_cells() {
            return Err(MatrixError::RowLabelsLength {
                labels,
                rows: self.num_cells(),
            });
        }
        Ok(())
    }
}

impl ExpressionSource for ExpressionMatrix {
    fn expression_level(&self, isoform_id: &str, cell: usize) -> f64 {
        match self.isoform_index.get(isoform_id) {
            Some(&col) if cell < self.values.nrows() => self.values[[cell, col]],
            _ => 0.0,
        }
    }
}

fn open(path: &Path) -> Result<File, MatrixError> {
    File::open(path).map_err(|source| MatrixError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a headerless tab-separated matrix of numbers.
fn read_tsv_matrix(reader: impl Read) -> Result<Array2<f64>, MatrixError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut values = Vec::new();
    let mut columns = None;
    let mut rows = 0;
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let expected = *columns.get_or_insert(record.len());
        if record.len() != expected {
            return Err(MatrixError::RaggedRow {
                row,
                expected,
                found: record.len(),
            });
        }
        for (column, field) in record.iter().enumerate() {
            let value = field
                .trim()
                .parse::<f64>()
                .map_err(|_| MatrixError::NotANumber {
                    row,
                    column,
                    value: field.to_string(),
                })?;
            values.push(value);
        }
        rows += 1;
    }
    let columns = columns.unwrap_or(0);
    Array2::from_shape_vec((rows, columns), values).map_err(|_| MatrixError::SizeZero)
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn looks_up_by_isoform_and_cell() -> anyhow::Result<()> {
        let m = ExpressionMatrix::new(array![[1.0, 0.0], [2.5, 3.0]], ids(&["T1", "T2"]))?;
        assert_eq!(m.expression_level("T1", 1), 2.5);
        assert_eq!(m.expression_level("T2", 0), 0.0);
        assert_eq!(m.expression_level("unknown", 0), 0.0);
        assert_eq!(m.expression_level("T1", 99), 0.0);
        assert!(m.check_row_labels(2).is_ok());
        assert!(matches!(
            m.check_row_labels(3),
            Err(MatrixError::RowLabelsLength { labels: 3, rows: 2 })
        ));
        Ok(())
    }

    #[test]
    fn rejects_bad_matrices() {
        assert!(matches!(
            ExpressionMatrix::new(Array2::zeros((0, 0)), vec![]),
            Err(MatrixError::SizeZero)
        ));
        assert!(matches!(
            ExpressionMatrix::new(array![[1.0, -0.5]], ids(&["T1", "T2"])),
            Err(MatrixError::NegativeExpression { row: 0, column: 1 })
        ));
        assert!(matches!(
            ExpressionMatrix::new(array![[1.0, 2.0]], ids(&["T1"])),
            Err(MatrixError::ColumnLabelsLength {
                labels: 1,
                columns: 2
            })
        ));
        let err = ExpressionMatrix::new(array![[1.0, 2.0]], ids(&["T1", "T1"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The label \"T1\" is in the column labels file more than once. \
             All column labels should be unique"
        );
    }

    #[test]
    fn parses_tsv() -> anyhow::Result<()> {
        let m = read_tsv_matrix("1\t2\t3\n4\t5\t6\n".as_bytes())?;
        assert_eq!(m, array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);

        assert!(matches!(
            read_tsv_matrix("1\t2\n3\n".as_bytes()),
            Err(MatrixError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        ));
        assert!(matches!(
            read_tsv_matrix("1\tx\n".as_bytes()),
            Err(MatrixError::NotANumber { row: 0, column: 1, .. })
        ));
        Ok(())
    }

    #[test]
    fn loads_from_files() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let matrix = dir.path().join("matrix.tsv");
        let labels = dir.path().join("isoforms.txt");
        std::fs::write(&matrix, "0\t10\n5\t0\n")?;
        std::fs::write(&labels, "T1\nT2\n")?;
        let m = ExpressionMatrix::from_paths(&matrix, &labels)?;
        assert_eq!(m.num_cells(), 2);
        assert_eq!(m.isoform_ids(), ["T1", "T2"]);
        assert!(m.has_isoform("T2"));
        assert_eq!(m.expression_level("T2", 0), 10.0);
        Ok(())
    }
}
