/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Orchestrates the three stages (product tree, remainders, gcd) strictly
//! in order: remainder descent cannot start until the product tree has
//! finished, and gcd extraction cannot start until remainders are ready.

use crate::error::CoreError;
use crate::gcd;
use crate::model::{CompromisedModulus, Modulus, RemainderVariant};
use crate::remainder;
use crate::store::LevelStore;
use crate::tree;
use std::path::PathBuf;

/// Where the tree is persisted and which remainder variant to run. CSV
/// ingestion happens before this is constructed — `moduli` is already in
/// memory.
pub struct ScanConfig {
    pub tree_dir: PathBuf,
    pub ext: String,
    pub variant: RemainderVariant,
}

pub struct ScanReport {
    pub total: usize,
    pub compromised: Vec<CompromisedModulus>,
}

/// Runs the product tree, remainder descent, and gcd extraction stages in
/// order over `moduli`, which is consumed: the tree builder releases it
/// after level 0 is persisted.
pub fn run(config: &ScanConfig, moduli: Vec<Modulus>) -> Result<ScanReport, CoreError> {
    let total = moduli.len();
    let ids: Vec<i64> = moduli.iter().map(|m| m.id).collect();
    let leaf_values = moduli.into_iter().map(|m| m.value).collect::<Vec<_>>();

    let store = LevelStore::new(&config.tree_dir, config.ext.as_str())?;
    let (levels, manifest) = tree::build_product_tree(&store, leaf_values)?;

    let remainders = match config.variant {
        RemainderVariant::Frugal => remainder::compute_remainders_frugal(&store, levels, total)?,
        RemainderVariant::Fast => remainder::compute_remainders_fast(&store, levels, &manifest)?,
    };

    // Re-read the leaves from level 0 rather than keeping the caller's
    // `moduli` alive across the tree build: the builder has already dropped
    // its own copy, and gcd extraction needs the id/value pairing back to
    // report results.
    let leaf_values = store.read_level(0, total)?;
    let leaves: Vec<Modulus> = ids
        .into_iter()
        .zip(leaf_values)
        .map(|(id, value)| Modulus { id, value })
        .collect();

    let compromised = gcd::extract(&leaves, &remainders)?;
    Ok(ScanReport { total, compromised })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modulus(id: i64, v: i64) -> Modulus {
        Modulus {
            id,
            value: rug::Integer::from(v),
        }
    }

    #[test]
    fn end_to_end_scenario_s2_both_variants() {
        for variant in [RemainderVariant::Frugal, RemainderVariant::Fast] {
            let dir = tempfile::tempdir().unwrap();
            let config = ScanConfig {
                tree_dir: dir.path().to_path_buf(),
                ext: "gmp".into(),
                variant,
            };
            let moduli = vec![modulus(1, 15), modulus(2, 21)];
            let report = run(&config, moduli).unwrap();
            assert_eq!(report.total, 2);
            assert_eq!(report.compromised.len(), 2);
        }
    }
}
