/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The product-tree builder: a bottom-up fold of the input leaves
//! into a pairwise-product tree, streaming each level to the [`LevelStore`]
//! as it is computed so peak memory never holds more than two levels.

use crate::error::CoreError;
use crate::model::LevelManifest;
use crate::store::LevelStore;
use dsi_progress_logger::prelude::*;
use log::info;
use rug::Integer;

/// Builds the product tree for `inputs`, persisting every level (including
/// the single-element root) via `store`. Returns the number of levels `L`
/// and the manifest of per-level element counts.
///
/// `inputs` is consumed: once level 0 is persisted the backing `Vec` is
/// dropped before the first pairwise multiplication, so that RAM is
/// available for the larger products higher in the tree.
pub fn build_product_tree(
    store: &LevelStore,
    inputs: Vec<Integer>,
) -> Result<(usize, LevelManifest), CoreError> {
    if inputs.is_empty() {
        return Err(CoreError::invariant("product tree requires at least one input"));
    }

    let mut manifest = LevelManifest::new();
    let mut pl = ProgressLogger::default();
    pl.display_memory(true)
        .item_name("level")
        .expected_updates(None);
    pl.start("Building product tree");

    let mut current = inputs;
    let mut level = 0usize;
    loop {
        let count = current.len();
        manifest.push(count);
        store.write_level(level, &current)?;

        if count == 1 {
            info!("product tree complete: {} levels", level + 1);
            pl.done();
            return Ok((level + 1, manifest));
        }

        let next_len = count.div_ceil(2);
        let mut next = Vec::with_capacity(next_len);
        let mut pairs = current.into_iter();
        // level 0's Vec is dropped here (drained by the iterator above)
        // before the products for level 1 are materialized.
        loop {
            let Some(a) = pairs.next() else { break };
            match pairs.next() {
                Some(b) => next.push(Integer::from(&a * &b)),
                // orphan carry: a lone trailing node is promoted unchanged.
                None => next.push(a),
            }
        }
        debug_assert_eq!(next.len(), next_len);

        current = next;
        level += 1;
        pl.light_update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(vals: &[i64]) -> Vec<Integer> {
        vals.iter().map(|&v| Integer::from(v)).collect()
    }

    #[test]
    fn single_leaf_tree_has_one_level() {
        let dir = tempfile::tempdir().unwrap();
        let store = LevelStore::new(dir.path(), "gmp").unwrap();
        let (levels, manifest) = build_product_tree(&store, ints(&[7])).unwrap();
        assert_eq!(levels, 1);
        assert_eq!(manifest.get(0), Some(1));
        assert_eq!(store.read_one(0, 0).unwrap(), Integer::from(7));
    }

    #[test]
    fn odd_input_carries_the_orphan() {
        // S3: N = [6, 10, 15]. Level 1: [60, 15]. Level 2: [900].
        let dir = tempfile::tempdir().unwrap();
        let store = LevelStore::new(dir.path(), "gmp").unwrap();
        let (levels, manifest) = build_product_tree(&store, ints(&[6, 10, 15])).unwrap();
        assert_eq!(levels, 3);
        assert_eq!(manifest.get(0), Some(3));
        assert_eq!(manifest.get(1), Some(2));
        assert_eq!(manifest.get(2), Some(1));

        assert_eq!(store.read_level(1, 2).unwrap(), ints(&[60, 15]));
        assert_eq!(store.read_one(2, 0).unwrap(), Integer::from(900));
    }

    #[test]
    fn root_equals_the_full_product() {
        let dir = tempfile::tempdir().unwrap();
        let store = LevelStore::new(dir.path(), "gmp").unwrap();
        let inputs = ints(&[15, 21, 77, 143, 221]);
        let expected: Integer = inputs.iter().fold(Integer::from(1), |acc, v| Integer::from(&acc * v));
        let (levels, _manifest) = build_product_tree(&store, inputs).unwrap();
        assert_eq!(store.read_one(levels - 1, 0).unwrap(), expected);
    }

    #[test]
    fn every_level_halves_by_ceiling() {
        let dir = tempfile::tempdir().unwrap();
        let store = LevelStore::new(dir.path(), "gmp").unwrap();
        let inputs = ints(&(1..=13).collect::<Vec<_>>());
        let (levels, manifest) = build_product_tree(&store, inputs).unwrap();
        assert_eq!(levels, 5); // ceil(log2(13)) + 1
        assert_eq!(manifest.get(0), Some(13));
        assert_eq!(manifest.get(1), Some(7));
        assert_eq!(manifest.get(2), Some(4));
        assert_eq!(manifest.get(3), Some(2));
        assert_eq!(manifest.get(4), Some(1));
    }
}
