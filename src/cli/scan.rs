/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::gcd;
use crate::ingest;
use crate::model::{Modulus, RemainderVariant};
use crate::remainder;
use crate::store::LevelStore;
use crate::tree;
use anyhow::{Context, Result};
use clap::{ArgMatches, Args, Command, FromArgMatches, ValueEnum};
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

pub const COMMAND_NAME: &str = "scan";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliVariant {
    Frugal,
    Fast,
}

#[derive(Args, Debug)]
#[command(
    about = "Run the product tree, remainder descent, and gcd extraction stages over a CSV table of RSA moduli.",
    long_about = None
)]
struct CliArgs {
    /// Path to the input CSV (`id, <ignored>, modulus_decimal` per row).
    #[arg(long, default_value = "data/moduli.csv")]
    input: PathBuf,

    /// Root directory for the on-disk product tree.
    #[arg(long, default_value = "data/product_tree")]
    tree_dir: PathBuf,

    /// File extension for persisted level files.
    #[arg(long, default_value = "gmp")]
    ext: String,

    /// Which remainder-tree variant to run.
    #[arg(long, value_enum, default_value_t = CliVariant::Frugal)]
    variant: CliVariant,

    /// Remove the tree directory before starting, instead of reusing it.
    #[arg(long, default_value_t = false)]
    fresh: bool,
}

pub fn cli(command: Command) -> Command {
    command.subcommand(CliArgs::augment_args(Command::new(COMMAND_NAME)))
}

/// Runs the product tree, remainder, and gcd stages in order, each wrapped
/// with a stage-tagged [`anyhow::Context`] so a failure anywhere reports a
/// single human-readable line naming the stage and the cause.
pub fn main(submatches: &ArgMatches) -> Result<()> {
    let args = CliArgs::from_arg_matches(submatches)?;

    if args.fresh && args.tree_dir.exists() {
        std::fs::remove_dir_all(&args.tree_dir)
            .with_context(|| format!("could not remove stale tree directory {}", args.tree_dir.display()))?;
    }

    let file = File::open(&args.input)
        .with_context(|| format!("ingest: could not open input csv {}", args.input.display()))?;
    let moduli: Vec<Modulus> =
        ingest::read_moduli(BufReader::new(file)).context("ingest: malformed input csv")?;
    let total = moduli.len();
    let ids: Vec<i64> = moduli.iter().map(|m| m.id).collect();
    let leaf_values = moduli.into_iter().map(|m| m.value).collect::<Vec<_>>();

    let store =
        LevelStore::new(&args.tree_dir, args.ext.as_str()).context("product tree: could not open tree store")?;
    let (levels, manifest) =
        tree::build_product_tree(&store, leaf_values).context("product tree: build failed")?;

    let remainders = match args.variant {
        CliVariant::Frugal => remainder::compute_remainders_frugal(&store, levels, total)
            .context("remainders: frugal variant failed")?,
        CliVariant::Fast => remainder::compute_remainders_fast(&store, levels, &manifest)
            .context("remainders: fast variant failed")?,
    };

    let leaf_values = store.read_level(0, total).context("gcd: could not reload leaves")?;
    let leaves: Vec<Modulus> = ids
        .into_iter()
        .zip(leaf_values)
        .map(|(id, value)| Modulus { id, value })
        .collect();

    let compromised = gcd::extract(&leaves, &remainders).context("gcd: extraction failed")?;

    info!(
        "scan complete: {} of {} moduli compromised",
        compromised.len(),
        total
    );
    println!("{}", compromised.len());
    Ok(())
}
