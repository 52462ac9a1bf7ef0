// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! Default DSA key pair templates

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, AttributeSet, IgnoreReason};
use crate::error::{Error, Result};
use crate::observer::{Event, KeyObject, Observer};
use crate::params::DomainParameters;
use crate::pkcs11::*;

/// Where the generated objects live and whether they are meant to wrap
/// other keys
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    /// Session objects
    Session,
    /// Token (persistent) objects
    Token,
    /// Session objects, the private key is extractable
    SessionForWrapping,
    /// Session objects, then persistent copies are made
    TokenForWrapping,
}

impl GenerationMode {
    /// Whether the generated objects themselves are token objects
    pub fn is_persistent(&self) -> bool {
        *self == GenerationMode::Token
    }

    /// Whether the generated private key is extractable by default
    pub fn is_extractable(&self) -> bool {
        *self == GenerationMode::SessionForWrapping
    }

    /// Whether persistent copies are made after generation
    pub fn needs_copies(&self) -> bool {
        *self == GenerationMode::TokenForWrapping
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            GenerationMode::Session => "session",
            GenerationMode::Token => "token",
            GenerationMode::SessionForWrapping => "session-for-wrapping",
            GenerationMode::TokenForWrapping => "token-for-wrapping",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for GenerationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<GenerationMode> {
        match s {
            "session" => Ok(GenerationMode::Session),
            "token" => Ok(GenerationMode::Token),
            "session-for-wrapping" => Ok(GenerationMode::SessionForWrapping),
            "token-for-wrapping" => Ok(GenerationMode::TokenForWrapping),
            _ => Err(Error::config(format!("unknown generation mode {}", s))),
        }
    }
}

/// The public and private templates for one key pair
#[derive(Debug, Clone)]
pub struct KeyTemplates {
    /// Template of the public key
    pub public: AttributeSet,
    /// Template of the private key
    pub private: AttributeSet,
}

impl KeyTemplates {
    /// Builds the default templates for a DSA key pair
    pub fn new(
        label: &str,
        id: &[u8],
        params: &DomainParameters,
        mode: GenerationMode,
    ) -> Result<KeyTemplates> {
        let public = AttributeSet::fixed(vec![
            Attribute::from_bool(CKA_TOKEN, mode.is_persistent()),
            Attribute::from_string(CKA_LABEL, label),
            Attribute::from_bytes(CKA_ID, id.to_vec()),
            /* key params */
            Attribute::from_bytes(CKA_PRIME, params.p().to_vec()),
            Attribute::from_bytes(CKA_SUBPRIME, params.q().to_vec()),
            Attribute::from_bytes(CKA_BASE, params.g().to_vec()),
            /* what can we do with this key */
            Attribute::from_bool(CKA_VERIFY, false),
        ])?;
        let private = AttributeSet::fixed(vec![
            Attribute::from_bool(CKA_TOKEN, mode.is_persistent()),
            Attribute::from_bool(CKA_PRIVATE, true),
            Attribute::from_bool(CKA_SENSITIVE, true),
            Attribute::from_bool(CKA_EXTRACTABLE, mode.is_extractable()),
            Attribute::from_string(CKA_LABEL, label),
            Attribute::from_bytes(CKA_ID, id.to_vec()),
            Attribute::from_bool(CKA_SIGN, false),
        ])?;
        Ok(KeyTemplates {
            public: public,
            private: private,
        })
    }

    /// Merges the same overrides into both templates independently and
    /// reports whatever was left out
    ///
    /// An attribute that only one of the templates carries is not
    /// reported for the other one, attributes unknown to both are
    /// reported once.
    pub fn apply_overrides(
        &mut self,
        overrides: &[Attribute],
        observer: &dyn Observer,
    ) {
        let private = self.private.apply(overrides);
        let public = self.public.apply(overrides);
        for ign in private {
            if ign.reason == IgnoreReason::NotInTemplate
                && self.public.find(ign.ck_type).is_some()
            {
                continue;
            }
            observer.notify(&Event::OverrideIgnored(KeyObject::Private, ign));
        }
        for ign in public {
            if ign.reason == IgnoreReason::NotInTemplate {
                continue;
            }
            observer.notify(&Event::OverrideIgnored(KeyObject::Public, ign));
        }
    }
}

/// Template used to copy the private key into token storage
pub fn private_copy_template(extractable: bool) -> Result<AttributeSet> {
    AttributeSet::fixed(vec![
        Attribute::from_bool(CKA_TOKEN, true),
        Attribute::from_bool(CKA_EXTRACTABLE, extractable),
    ])
}

/// Template used to copy the public key into token storage
///
/// CKA_EXTRACTABLE only applies to private and secret keys.
pub fn public_copy_template() -> Result<AttributeSet> {
    AttributeSet::fixed(vec![Attribute::from_bool(CKA_TOKEN, true)])
}
