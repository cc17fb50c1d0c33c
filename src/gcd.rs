/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The gcd extractor: turns the remainders vector produced by the
//! remainder-tree descender into the set of moduli that share a prime
//! factor with some other modulus in the batch.

use crate::bigint;
use crate::error::CoreError;
use crate::model::{CompromisedModulus, Modulus};
use log::info;
use rug::Integer;

/// For every `i`, divides `R[i]` by `N[i]` (exact by construction, since
/// `R[i] = Z mod Nᵢ²` and `Nᵢ | Z`) and takes the gcd with `N[i]`. Any
/// result greater than 1 is a non-trivial factor of a compromised modulus.
pub fn extract(leaves: &[Modulus], remainders: &[Integer]) -> Result<Vec<CompromisedModulus>, CoreError> {
    if leaves.len() != remainders.len() {
        return Err(CoreError::invariant(format!(
            "leaf count {} does not match remainder count {}",
            leaves.len(),
            remainders.len()
        )));
    }

    let mut compromised = Vec::new();
    for (leaf, r) in leaves.iter().zip(remainders) {
        let quotient = bigint::divide_exact(r, &leaf.value)?;
        let factor = quotient.gcd(&leaf.value);
        if factor != 1 {
            compromised.push(CompromisedModulus {
                id: leaf.id,
                factor,
            });
        }
    }
    info!("gcd extraction complete: {} of {} moduli compromised", compromised.len(), leaves.len());
    Ok(compromised)
}
