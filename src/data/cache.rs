use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::LoadError;
use super::loader::load_csv;
use super::model::Dataset;
use crate::config::ColumnMapping;

/// Keeps successfully loaded datasets in memory so interactions never go
/// back to disk. Failed loads are not remembered.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<(PathBuf, ColumnMapping), Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `(path, columns)`, loading it on a miss.
    pub fn get_or_load(
        &mut self,
        path: &Path,
        columns: &ColumnMapping,
    ) -> Result<Arc<Dataset>, LoadError> {
        let key = (path.to_path_buf(), columns.clone());
        if let Some(ds) = self.entries.get(&key) {
            log::debug!("Cache hit for {}", path.display());
            return Ok(Arc::clone(ds));
        }
        let dataset = Arc::new(load_csv(path, columns)?);
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Forget every entry for `path`; the next request re-reads the file.
    pub fn invalidate(&mut self, path: &Path) {
        self.entries.retain(|(p, _), _| p != path);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
