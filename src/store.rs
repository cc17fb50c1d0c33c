/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The level store: persists and retrieves product/remainder-tree levels
//! as one file per element under a root directory.
//!
//! The layout is deliberately simple — `<root>/level<N>/<i>.<ext>`, one
//! [`crate::bigint`] raw record per file — trading inode pressure for O(1)
//! random single-element reads during the remainder-tree descent, which
//! never needs more than one element of a lower level at a time.

use crate::bigint;
use crate::error::CoreError;
use log::debug;
use rug::Integer;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// A level store rooted at a directory. Cheap to construct; all state is
/// the filesystem itself.
#[derive(Debug, Clone)]
pub struct LevelStore {
    root: PathBuf,
    ext: String,
}

impl LevelStore {
    /// Creates (or reuses) `root` as the tree directory. Does not touch
    /// any pre-existing contents; callers that want a clean run should
    /// remove `root` themselves first.
    pub fn new(root: impl AsRef<Path>, ext: impl Into<String>) -> Result<Self, CoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| {
            CoreError::storage(root.clone(), format!("could not create tree root: {e}"))
        })?;
        Ok(LevelStore {
            root,
            ext: ext.into(),
        })
    }

    fn level_dir(&self, level: usize) -> PathBuf {
        self.root.join(format!("level{level}"))
    }

    fn element_path(&self, level: usize, index: usize) -> PathBuf {
        self.level_dir(level).join(format!("{index}.{}", self.ext))
    }

    /// Persists `values` as `level`, one file per element, overwriting any
    /// pre-existing files at those paths.
    pub fn write_level(&self, level: usize, values: &[Integer]) -> Result<(), CoreError> {
        let dir = self.level_dir(level);
        fs::create_dir_all(&dir)
            .map_err(|e| CoreError::storage(dir.clone(), format!("could not create level dir: {e}")))?;
        for (i, value) in values.iter().enumerate() {
            let path = self.element_path(level, i);
            let file = File::create(&path)
                .map_err(|e| CoreError::storage(path.clone(), format!("could not create file: {e}")))?;
            let mut w = BufWriter::new(file);
            bigint::write_raw(value, &mut w)
                .map_err(|e| CoreError::storage(path.clone(), format!("could not write record: {e}")))?;
        }
        debug!("wrote level {level} ({} elements) under {}", values.len(), dir.display());
        Ok(())
    }

    /// Reads back `count` previously-written elements of `level`, in order.
    pub fn read_level(&self, level: usize, count: usize) -> Result<Vec<Integer>, CoreError> {
        (0..count).map(|i| self.read_one(level, i)).collect()
    }

    /// Reads a single element at `level`/`index`.
    pub fn read_one(&self, level: usize, index: usize) -> Result<Integer, CoreError> {
        let path = self.element_path(level, index);
        let file = File::open(&path)
            .map_err(|e| CoreError::storage(path.clone(), format!("could not open file: {e}")))?;
        let mut r = BufReader::new(file);
        bigint::read_raw(&mut r)
            .map_err(|e| CoreError::storage(path.clone(), format!("truncated or corrupt record: {e}")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_level() {
        let dir = tempfile::tempdir().unwrap();
        let store = LevelStore::new(dir.path(), "gmp").unwrap();
        let values: Vec<Integer> = (0..5).map(|i| Integer::from(i * i + 1)).collect();
        store.write_level(0, &values).unwrap();
        let back = store.read_level(0, values.len()).unwrap();
        assert_eq!(values, back);
        assert_eq!(store.read_one(0, 2).unwrap(), values[2]);
    }

    #[test]
    fn missing_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = LevelStore::new(dir.path(), "gmp").unwrap();
        assert!(matches!(store.read_one(0, 0), Err(CoreError::Storage { .. })));
    }

    #[test]
    fn overwrites_pre_existing_level() {
        let dir = tempfile::tempdir().unwrap();
        let store = LevelStore::new(dir.path(), "gmp").unwrap();
        store.write_level(0, &[Integer::from(1), Integer::from(2)]).unwrap();
        store.write_level(0, &[Integer::from(99)]).unwrap();
        assert_eq!(store.read_level(0, 1).unwrap(), vec![Integer::from(99)]);
    }
}
