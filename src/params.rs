// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! Loading of DSA domain parameters
//!
//! Parameter files are not identified by name: each decoder in
//! [DECODERS] is tried in turn until one recognizes the content.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::bigint;
use crate::error::{Error, ErrorKind, Result};
use crate::kasn1::DssParms;
use crate::observer::{Event, Observer};

const PEM_TAG: &str = "DSA PARAMETERS";

/// Encodings a parameter file can be in
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ParamFormat {
    /// Binary Dss-Parms
    Der,
    /// Base64 armored Dss-Parms
    Pem,
}

impl fmt::Display for ParamFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParamFormat::Der => write!(f, "DER"),
            ParamFormat::Pem => write!(f, "PEM"),
        }
    }
}

/// The p, q, g values shared by a DSA key pair
///
/// Each value is a minimal big endian unsigned integer and is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainParameters {
    p: Vec<u8>,
    q: Vec<u8>,
    g: Vec<u8>,
}

impl DomainParameters {
    /// Builds the parameters checking that each of p, q and g is non
    /// empty
    pub fn new(p: Vec<u8>, q: Vec<u8>, g: Vec<u8>) -> Result<DomainParameters> {
        for (name, v) in [("p", &p), ("q", &q), ("g", &g)] {
            if v.is_empty() {
                return Err(Error::invalid_domain_parameters(name));
            }
        }
        Ok(DomainParameters { p: p, q: q, g: g })
    }

    /// The prime modulus
    pub fn p(&self) -> &[u8] {
        &self.p
    }

    /// The subprime
    pub fn q(&self) -> &[u8] {
        &self.q
    }

    /// The base
    pub fn g(&self) -> &[u8] {
        &self.g
    }

    /// Exports the DER parameters, zero length integers in the encoding
    /// are reported as invalid parameters
    fn from_dss_parms(parms: &DssParms) -> Result<DomainParameters> {
        let export = |name: &str, data: &[u8]| match bigint::minimal_bytes(data)
        {
            Ok(v) => Ok(v),
            Err(e) if e.kind() == ErrorKind::Encoding => {
                Err(Error::invalid_domain_parameters(name))
            }
            Err(e) => Err(e),
        };
        DomainParameters::new(
            export("p", parms.p.as_bytes())?,
            export("q", parms.q.as_bytes())?,
            export("g", parms.g.as_bytes())?,
        )
    }
}

/// Outcome of a single decoding attempt
pub enum Decoded {
    /// The decoder recognized the file
    Found(DomainParameters),
    /// The content is not in this decoder's format
    TryNext,
}

/// A parameter file decoder
pub trait ParamDecoder: Sync {
    /// The format this decoder understands
    fn format(&self) -> ParamFormat;

    /// Reads `path` and tries to decode it.
    ///
    /// I/O failures are errors, unrecognized content is `TryNext`.
    fn decode(&self, path: &Path) -> Result<Decoded>;
}

/// Reads the file as raw bytes holding DER Dss-Parms
pub struct DerDecoder;

impl ParamDecoder for DerDecoder {
    fn format(&self) -> ParamFormat {
        ParamFormat::Der
    }

    fn decode(&self, path: &Path) -> Result<Decoded> {
        let data = fs::read(path)
            .map_err(|e| Error::parameter_io(&path.display().to_string(), e))?;
        decode_der(&data)
    }
}

/// Reads the file as text holding a PEM `DSA PARAMETERS` block
pub struct PemDecoder;

impl ParamDecoder for PemDecoder {
    fn format(&self) -> ParamFormat {
        ParamFormat::Pem
    }

    fn decode(&self, path: &Path) -> Result<Decoded> {
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                return Ok(Decoded::TryNext)
            }
            Err(e) => {
                return Err(Error::parameter_io(&path.display().to_string(), e))
            }
        };
        let blocks = match pem::parse_many(&text) {
            Ok(b) => b,
            Err(_) => return Ok(Decoded::TryNext),
        };
        match blocks.iter().find(|b| b.tag() == PEM_TAG) {
            Some(block) => decode_der(block.contents()),
            None => Ok(Decoded::TryNext),
        }
    }
}

fn decode_der(data: &[u8]) -> Result<Decoded> {
    match DssParms::parse(data) {
        Some(parms) => Ok(Decoded::Found(DomainParameters::from_dss_parms(
            &parms,
        )?)),
        None => Ok(Decoded::TryNext),
    }
}

/// Decoders in the order they are attempted
pub static DECODERS: [&dyn ParamDecoder; 2] = [&DerDecoder, &PemDecoder];

/// Loads DSA domain parameters from a file in any known format
pub fn load(path: &Path, observer: &dyn Observer) -> Result<DomainParameters> {
    load_with(path, &DECODERS, observer)
}

/// Loads DSA domain parameters trying the given decoders in order
pub fn load_with(
    path: &Path,
    decoders: &[&dyn ParamDecoder],
    observer: &dyn Observer,
) -> Result<DomainParameters> {
    for d in decoders {
        match d.decode(path)? {
            Decoded::Found(params) => {
                observer.notify(&Event::FormatDetected(d.format()));
                return Ok(params);
            }
            Decoded::TryNext => continue,
        }
    }
    Err(Error::parameter_format(&path.display().to_string()))
}
