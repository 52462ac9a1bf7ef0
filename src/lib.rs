// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

#![warn(missing_docs)]

//! This is dsakeygen
//!
//! Generates DSA key pairs on PKCS#11 tokens. Domain parameters are read
//! from a DER or PEM file, default templates are built for both key
//! objects, caller supplied attributes are merged in, and the token is
//! asked to generate the pair. In token-for-wrapping mode persistent
//! copies of the session keys are made afterwards.
//!
//! ```no_run
//! use dsakeygen::{generate_dsa_key_pair, FunctionListToken, GenerationMode};
//! use dsakeygen::{Attribute, LogObserver};
//! use dsakeygen::pkcs11::*;
//! # fn run(fns: &CK_FUNCTION_LIST, session: CK_SESSION_HANDLE) -> dsakeygen::Result<()> {
//! let mut token = FunctionListToken::new(fns, session);
//! let outcome = generate_dsa_key_pair(
//!     &mut token,
//!     "k1",
//!     std::path::Path::new("dsa.params"),
//!     &[Attribute::from_bool(CKA_EXTRACTABLE, true)],
//!     GenerationMode::TokenForWrapping,
//!     &LogObserver,
//! )?;
//! for w in &outcome.warnings {
//!     eprintln!("***Warning: {}", w);
//! }
//! # Ok(())
//! # }
//! ```

pub mod attribute;
pub mod bigint;
pub mod config;
pub mod error;
pub mod kasn1;
pub mod keygen;
pub mod observer;
pub mod params;
pub mod pkcs11;
pub mod template;
pub mod token;

#[cfg(feature = "trace")]
pub mod logger;

pub use attribute::{AttrType, Attribute, AttributeSet};
pub use config::RequestConfig;
pub use error::{Error, ErrorKind, Result};
pub use keygen::{
    generate_dsa_key_pair, KeyGenerationRequest, KeyPairOutcome,
    PersistentCopies,
};
pub use observer::{
    DuplicationWarning, Event, KeyObject, LogObserver, Observer,
    RecordingObserver,
};
pub use params::DomainParameters;
pub use template::GenerationMode;
pub use token::{FunctionListToken, KeyHandlePair, Token};

#[cfg(test)]
mod tests;
