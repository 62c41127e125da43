//! Publishing a loaded `GeneTable` to readers on other threads.
//!
//! A table is built completely by one parse and then swapped in as a whole.
//! Readers take an `Arc` snapshot, so a filter pass that is already running
//! keeps the table it started with even if a new one is published meanwhile.

use crate::errors::GtfError;
use crate::gene_table::GeneTable;
use log::{error, info};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Where user-facing errors and status messages are reported.
pub trait MessageSink {
    fn error(&self, message: &str);
    fn message(&self, message: &str);
}

/// A sink that forwards to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn error(&self, message: &str) {
        error!("{message}");
    }

    fn message(&self, message: &str) {
        info!("{message}");
    }
}

#[derive(Debug, Default, Clone)]
pub struct SharedGeneTable {
    current: Arc<RwLock<Option<Arc<GeneTable>>>>,
}

impl SharedGeneTable {
    pub fn new() -> SharedGeneTable {
        SharedGeneTable::default()
    }

    /// Replace the current table.
    pub fn publish(&self, table: GeneTable) -> Arc<GeneTable> {
        let table = Arc::new(table);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(table.clone());
        table
    }

    /// Drop the current table, leaving nothing loaded.
    pub fn clear(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn snapshot(&self) -> Option<Arc<GeneTable>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Parse the GTF at `path` and publish it. On failure the previously
    /// loaded table is cleared and the error is reported to `sink`.
    pub fn load(&self, path: &Path, sink: &dyn MessageSink) -> Result<Arc<GeneTable>, GtfError> {
        match GeneTable::from_path(path) {
            Ok(table) => {
                let table = self.publish(table);
                sink.message(&format!(
                    "Loaded {} genes from {}",
                    table.len(),
                    path.display()
                ));
                Ok(table)
            }
            Err(err) => {
                self.clear();
                sink.error(&err.to_string());
                Err(err)
            }
        }
    }
}
