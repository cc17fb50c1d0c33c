/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! CSV ingestion: reads the input moduli table. Streams the file line by
//! line rather than buffering it whole, since the input table itself can
//! run into the millions of rows.

use crate::bigint;
use crate::error::CoreError;
use crate::model::Modulus;
use dsi_progress_logger::prelude::*;
use log::info;
use std::io::BufRead;

/// Reads `id, _, modulus_decimal` rows (only columns 0 and 2 are used;
/// column 1 is tolerated and ignored) from `reader`. Fails the whole run
/// on the first malformed row, a non-numeric field, or a zero modulus.
pub fn read_moduli(reader: impl BufRead) -> Result<Vec<Modulus>, CoreError> {
    let mut moduli = Vec::new();
    let mut pl = ProgressLogger::default();
    pl.display_memory(true).item_name("row").expected_updates(None);
    pl.start("Reading moduli CSV");

    for (idx, line) in reader.lines().enumerate() {
        let row = idx + 1;
        let line = line.map_err(|e| CoreError::input_format(row, format!("could not read line: {e}")))?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 3 {
            return Err(CoreError::input_format(
                row,
                format!("expected at least 3 comma-separated columns, found {}", fields.len()),
            ));
        }

        let id: i64 = fields[0]
            .trim()
            .parse()
            .map_err(|e| CoreError::input_format(row, format!("column 0 (id) is not an integer: {e}")))?;
        let value = bigint::parse_decimal(fields[2].trim())
            .map_err(|e| CoreError::input_format(row, format!("column 2 (modulus) is not a decimal integer: {e}")))?;
        if value.cmp0() == std::cmp::Ordering::Equal {
            return Err(CoreError::invariant(format!("row {row}: modulus is zero")));
        }

        moduli.push(Modulus { id, value });
        pl.light_update();
    }
    pl.done();
    info!("ingested {} moduli", moduli.len());
    Ok(moduli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rug::Integer;
    use std::io::Cursor;

    #[test]
    fn reads_id_and_modulus_ignoring_middle_column() {
        let csv = "1,ignored,15\n2,whatever,77\n";
        let moduli = read_moduli(Cursor::new(csv)).unwrap();
        assert_eq!(moduli.len(), 2);
        assert_eq!(moduli[0].id, 1);
        assert_eq!(moduli[0].value, Integer::from(15));
        assert_eq!(moduli[1].id, 2);
        assert_eq!(moduli[1].value, Integer::from(77));
    }

    #[test]
    fn rejects_wrong_column_count() {
        let csv = "1,15\n";
        assert!(matches!(read_moduli(Cursor::new(csv)), Err(CoreError::InputFormat { row: 1, .. })));
    }

    #[test]
    fn rejects_non_numeric_id() {
        let csv = "abc,ignored,15\n";
        assert!(matches!(read_moduli(Cursor::new(csv)), Err(CoreError::InputFormat { row: 1, .. })));
    }

    #[test]
    fn rejects_zero_modulus() {
        let csv = "1,ignored,0\n";
        assert!(matches!(read_moduli(Cursor::new(csv)), Err(CoreError::Invariant(_))));
    }

    #[test]
    fn skips_blank_lines() {
        let csv = "1,ignored,15\n\n2,ignored,21\n";
        let moduli = read_moduli(Cursor::new(csv)).unwrap();
        assert_eq!(moduli.len(), 2);
    }
}
