/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The remainder-tree descender: given the product tree `build_product_tree`
//! persisted, computes `R[i] = Z mod Nᵢ²` for every leaf `i`.
//!
//! Two variants are offered: [`compute_remainders_frugal`] is the
//! memory-minimal default; [`compute_remainders_fast`] is the true
//! top-down remainder-tree traversal, holding more per iteration in
//! exchange for never touching an `Integer` larger than the current
//! subtree's squared product.

use crate::error::CoreError;
use crate::model::LevelManifest;
use crate::store::LevelStore;
use dsi_progress_logger::prelude::*;
use log::info;
use rug::Integer;

/// `R[i] := Z mod Nᵢ²` computed directly from the leaves and the root.
/// O(k) reductions against the full product `Z`; minimal memory, no use of
/// intermediate levels. Reads exactly `leaf_count` leaves and the single
/// root element.
pub fn compute_remainders_frugal(
    store: &LevelStore,
    levels: usize,
    leaf_count: usize,
) -> Result<Vec<Integer>, CoreError> {
    let leaves = store.read_level(0, leaf_count)?;
    let z = store.read_one(levels - 1, 0)?;

    let mut pl = ProgressLogger::default();
    pl.display_memory(true)
        .item_name("remainder")
        .expected_updates(Some(leaves.len()));
    pl.start("Computing remainders (frugal variant)");

    let mut out = Vec::with_capacity(leaves.len());
    for leaf in &leaves {
        let square = Integer::from(leaf * leaf);
        out.push(Integer::from(&z % &square));
        pl.light_update();
    }
    pl.done();
    info!("computed {} remainders (frugal)", out.len());
    Ok(out)
}

/// The true Bernstein remainder-tree traversal: starts from the root and
/// descends level by level, carrying `R[i] = Z mod (Lℓ[i])²` down to the
/// leaves, where it specializes to `Z mod Nᵢ²`.
pub fn compute_remainders_fast(
    store: &LevelStore,
    levels: usize,
    manifest: &LevelManifest,
) -> Result<Vec<Integer>, CoreError> {
    let root_count = manifest
        .get(levels - 1)
        .ok_or_else(|| CoreError::invariant("manifest has no entry for the top level"))?;
    if root_count != 1 {
        return Err(CoreError::invariant(
            "incomplete product tree: top level does not hold exactly one element",
        ));
    }

    let mut pl = ProgressLogger::default();
    pl.display_memory(true)
        .item_name("level")
        .expected_updates(Some(levels));
    pl.start("Computing remainders (fast variant)");

    let mut current = vec![store.read_one(levels - 1, 0)?];
    for level in (0..levels - 1).rev() {
        let count = manifest
            .get(level)
            .ok_or_else(|| CoreError::invariant(format!("manifest has no entry for level {level}")))?;
        let mut next = Vec::with_capacity(count);
        for i in 0..count {
            let y = store.read_one(level, i)?;
            let square = Integer::from(&y * &y);
            let parent = &current[i / 2];
            next.push(Integer::from(parent % &square));
        }
        current = next;
        pl.light_update();
    }
    pl.done();
    info!("computed {} remainders (fast)", current.len());
    Ok(current)
}
