// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! ASN.1 structures for DSA domain parameters

use crate::error::{Error, Result};

use asn1;

/// DSA domain parameters
///
/// Defined in [RFC 3279](https://www.rfc-editor.org/rfc/rfc3279) as
/// `Dss-Parms`, this is also the content of a PEM
/// `DSA PARAMETERS` block.
#[derive(asn1::Asn1Read, asn1::Asn1Write)]
pub struct DssParms<'a> {
    /// The prime modulus
    pub p: asn1::BigUint<'a>,
    /// The prime divisor of p - 1
    pub q: asn1::BigUint<'a>,
    /// The generator
    pub g: asn1::BigUint<'a>,
}

impl<'a> DssParms<'a> {
    /// Parses the DER encoded Dss-Parms at the start of `data`
    ///
    /// Anything after the first element is ignored.
    pub fn parse(data: &'a [u8]) -> Option<DssParms<'a>> {
        let (tlv, _extra) = asn1::strip_tlv(data).ok()?;
        tlv.parse::<DssParms>().ok()
    }

    /// Builds the structure from big endian unsigned integers
    ///
    /// Values with the top bit set must be passed with a leading zero
    /// byte, as DER requires.
    pub fn new(p: &'a [u8], q: &'a [u8], g: &'a [u8]) -> Result<DssParms<'a>> {
        let big = |v: &'a [u8], name: &str| match asn1::BigUint::new(v) {
            Some(b) => Ok(b),
            None => Err(Error::encoding(format!(
                "{} is not a valid DER unsigned integer",
                name
            ))),
        };
        Ok(DssParms {
            p: big(p, "p")?,
            q: big(q, "q")?,
            g: big(g, "g")?,
        })
    }

    /// DER encodes the structure
    pub fn to_der(&self) -> Result<Vec<u8>> {
        asn1::write_single(self)
            .map_err(|e| Error::encoding(format!("DER encoding failed: {:?}", e)))
    }
}
