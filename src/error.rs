/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Error kinds surfaced by the core. The run is single-pass and single-
//! threaded: the first error aborts the pipeline, so these variants only
//! need to carry enough context for a human-readable report, not for retry
//! logic.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// A malformed CSV row, non-numeric field, or wrong column count.
    #[error("malformed input at row {row}: {detail}")]
    InputFormat { row: usize, detail: String },

    /// The level store could not create/open/read/write a file, or a
    /// raw record was truncated mid-read.
    #[error("storage failure at {}: {detail}", path.display())]
    Storage { path: PathBuf, detail: String },

    /// A structural invariant of the product/remainder tree was violated:
    /// the top level does not hold exactly one element, a manifest/count
    /// mismatch on read, or an input modulus of zero.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// Propagated from the arbitrary-precision arithmetic layer, e.g. a
    /// division that should have been exact but was not.
    #[error("arithmetic failure: {0}")]
    Arithmetic(String),
}

impl CoreError {
    pub fn storage(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        CoreError::Storage {
            path: path.into(),
            detail: detail.into(),
        }
    }

    pub fn input_format(row: usize, detail: impl Into<String>) -> Self {
        CoreError::InputFormat {
            row,
            detail: detail.into(),
        }
    }

    pub fn invariant(detail: impl Into<String>) -> Self {
        CoreError::Invariant(detail.into())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
