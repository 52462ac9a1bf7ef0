// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! Export of big integers as minimal big endian byte strings

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::{Error, Result};

/// Exports a big integer as a minimal length big endian byte buffer.
///
/// The integer zero has no significant bytes and is reported as an
/// encoding failure instead of an empty buffer.
pub fn to_bytes(b: &BigUint) -> Result<Vec<u8>> {
    if b.is_zero() {
        return Err(Error::encoding(
            "big integer exported to zero bytes".to_string(),
        ));
    }
    let v = b.to_bytes_be();
    debug_assert_eq!(v.len() as u64, (b.bits() + 7) / 8);
    Ok(v)
}

/// Parses an unsigned big endian integer, possibly zero padded, and
/// exports it in minimal form
pub fn minimal_bytes(data: &[u8]) -> Result<Vec<u8>> {
    to_bytes(&BigUint::from_bytes_be(data))
}
