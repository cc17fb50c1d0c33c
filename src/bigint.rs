/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! A narrow bridge to the arbitrary-precision integer primitive
//! ([`rug::Integer`], GMP-backed). The rest of the crate never calls into
//! `rug` directly for serialization so that the on-disk raw format stays in
//! one place.
//!
//! The raw format is a one-byte sign tag (`0` zero, `1` positive, `2`
//! negative), a little-endian `u32` magnitude-byte count, and the magnitude
//! itself in most-significant-byte-first order. It carries no checksum and
//! is not meant to outlive a single run (see [`crate::store`]).

use crate::error::CoreError;
use rug::integer::Order;
use rug::Integer;
use std::cmp::Ordering;
use std::io::{self, Read, Write};
use std::str::FromStr;

const SIGN_ZERO: u8 = 0;
const SIGN_POS: u8 = 1;
const SIGN_NEG: u8 = 2;

/// Writes the raw byte-exact round-trip form of `value`.
pub fn write_raw(value: &Integer, w: &mut impl Write) -> io::Result<()> {
    let sign = match value.cmp0() {
        Ordering::Equal => SIGN_ZERO,
        Ordering::Greater => SIGN_POS,
        Ordering::Less => SIGN_NEG,
    };
    w.write_all(&[sign])?;
    if sign == SIGN_ZERO {
        return w.write_all(&0u32.to_le_bytes());
    }
    let magnitude = value.clone().abs();
    let digits: Vec<u8> = magnitude.to_digits(Order::Msf);
    let len = u32::try_from(digits.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "integer too large to persist"))?;
    w.write_all(&len.to_le_bytes())?;
    w.write_all(&digits)
}

/// Reads back a value written by [`write_raw`]. Fails with
/// [`io::ErrorKind::UnexpectedEof`] on a truncated record.
pub fn read_raw(r: &mut impl Read) -> io::Result<Integer> {
    let mut sign_buf = [0u8; 1];
    r.read_exact(&mut sign_buf)?;
    let mut len_buf = [0u8; 4];
    r.read_exact(&mut len_buf)?;
    let len = u32::from_le_bytes(len_buf) as usize;
    if sign_buf[0] == SIGN_ZERO {
        return Ok(Integer::new());
    }
    let mut digits = vec![0u8; len];
    r.read_exact(&mut digits)?;
    let magnitude = Integer::from_digits(&digits, Order::Msf);
    Ok(if sign_buf[0] == SIGN_NEG {
        -magnitude
    } else {
        magnitude
    })
}

/// Parses a base-10 string into an [`Integer`]. The only entry point
/// ingestion uses to turn a modulus column into a value, so the parsing
/// rules live in one place alongside the rest of the bridge to `rug`.
pub fn parse_decimal(s: &str) -> Result<Integer, CoreError> {
    Integer::from_str(s).map_err(|e| CoreError::Arithmetic(format!("not a decimal integer: {e}")))
}

/// `numerator / divisor`, failing loudly (as [`CoreError::Arithmetic`]) if
/// the division is not exact. Used by the gcd extractor, where `N[i]` is
/// expected to divide `R[i]` by construction.
pub fn divide_exact(numerator: &Integer, divisor: &Integer) -> Result<Integer, CoreError> {
    if divisor.cmp0() == Ordering::Equal {
        return Err(CoreError::Arithmetic("division by zero".into()));
    }
    if !numerator.is_divisible(divisor) {
        return Err(CoreError::Arithmetic(format!(
            "{divisor} does not evenly divide {numerator}"
        )));
    }
    Ok(numerator.clone().div_exact(divisor))
}
