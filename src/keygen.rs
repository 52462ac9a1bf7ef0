// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! DSA key pair generation and post generation copies

use std::path::Path;

use crate::attribute::{Attribute, AttributeSet};
use crate::error::Result;
use crate::observer::{DuplicationWarning, Event, KeyObject, Observer};
use crate::params::{self, DomainParameters};
use crate::pkcs11::*;
use crate::template::{self, GenerationMode, KeyTemplates};
use crate::token::{KeyHandlePair, Token};

/// Everything needed to generate one key pair
#[derive(Debug, Clone)]
pub struct KeyGenerationRequest {
    /// CKA_LABEL of both objects
    pub label: String,
    /// CKA_ID of both objects, the label bytes when None
    pub id: Option<Vec<u8>>,
    /// DSA domain parameters
    pub params: DomainParameters,
    /// Caller supplied attributes merged into both templates
    pub overrides: Vec<Attribute>,
    /// Generation mode
    pub mode: GenerationMode,
}

impl KeyGenerationRequest {
    /// Creates a request whose CKA_ID is the label
    pub fn new(
        label: &str,
        params: DomainParameters,
        overrides: Vec<Attribute>,
        mode: GenerationMode,
    ) -> KeyGenerationRequest {
        KeyGenerationRequest {
            label: label.to_string(),
            id: None,
            params: params,
            overrides: overrides,
            mode: mode,
        }
    }

    /// Builds the default templates and merges the overrides into them
    pub fn templates(&self, observer: &dyn Observer) -> Result<KeyTemplates> {
        let id = match &self.id {
            Some(id) => id.as_slice(),
            None => self.label.as_bytes(),
        };
        let mut tmpls =
            KeyTemplates::new(&self.label, id, &self.params, self.mode)?;
        tmpls.apply_overrides(&self.overrides, observer);
        Ok(tmpls)
    }
}

/// Handles of the persistent copies made in token-for-wrapping mode
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct PersistentCopies {
    /// Token copy of the public key, if created
    pub public: Option<CK_OBJECT_HANDLE>,
    /// Token copy of the private key, if created
    pub private: Option<CK_OBJECT_HANDLE>,
}

/// The result of a successful request
///
/// The generated handles are always valid, copies and warnings are only
/// populated in token-for-wrapping mode.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct KeyPairOutcome {
    /// The generated pair
    pub handles: KeyHandlePair,
    /// Persistent copies
    pub copies: PersistentCopies,
    /// Copies that could not be made
    pub warnings: Vec<DuplicationWarning>,
}

/// Asks the token for a DSA key pair built from the two templates
///
/// Generation is never retried, a failure carries the token's CK_RV.
pub fn generate(
    token: &mut dyn Token,
    public: &AttributeSet,
    private: &AttributeSet,
    observer: &dyn Observer,
) -> Result<KeyHandlePair> {
    observer.templates(public, private);
    match token.generate_key_pair(CKM_DSA_KEY_PAIR_GEN, public, private) {
        Ok(handles) => {
            observer.notify(&Event::KeyPairGenerated(
                handles.public,
                handles.private,
            ));
            Ok(handles)
        }
        Err(e) => {
            observer.notify(&Event::GenerationFailed(e.rv()));
            Err(e)
        }
    }
}

/// Whether the caller explicitly asked for an extractable private key
///
/// Only overrides the template merge would accept count: a single
/// CK_BBOOL byte. Among those the last one wins, as it does in the
/// template.
pub fn wants_extractable(overrides: &[Attribute]) -> bool {
    overrides
        .iter()
        .rev()
        .find(|a| {
            a.get_type() == CKA_EXTRACTABLE && a.len() == CK_BBOOL_SIZE
        })
        .map(|a| a.get_value()[0] != CK_FALSE)
        .unwrap_or(false)
}

/// Copies freshly generated session keys into token storage
///
/// The private key copy is extractable only if `extractable` is set.
/// Failures are reported as warnings and never undo the generated pair.
pub fn materialize(
    token: &mut dyn Token,
    handles: &KeyHandlePair,
    label: &str,
    extractable: bool,
    observer: &dyn Observer,
) -> Result<(PersistentCopies, Vec<DuplicationWarning>)> {
    let mut copies = PersistentCopies::default();
    let mut warnings = Vec::new();

    let steps = [
        (
            KeyObject::Private,
            handles.private,
            template::private_copy_template(extractable)?,
        ),
        (
            KeyObject::Public,
            handles.public,
            template::public_copy_template()?,
        ),
    ];
    for (obj, handle, tmpl) in steps {
        match token.copy_object(handle, &tmpl) {
            Ok(h) => {
                observer.notify(&Event::CopyCreated(obj, h));
                match obj {
                    KeyObject::Private => copies.private = Some(h),
                    KeyObject::Public => copies.public = Some(h),
                }
            }
            Err(e) => {
                let w = DuplicationWarning {
                    object: obj,
                    label: label.to_string(),
                    rv: e.rv(),
                };
                observer.notify(&Event::Duplication(w.clone()));
                warnings.push(w);
            }
        }
    }
    Ok((copies, warnings))
}

/// Runs a full request: template construction, override merging,
/// generation and, in token-for-wrapping mode, persistent copies
pub fn run(
    token: &mut dyn Token,
    request: &KeyGenerationRequest,
    observer: &dyn Observer,
) -> Result<KeyPairOutcome> {
    let tmpls = request.templates(observer)?;
    let handles = generate(token, &tmpls.public, &tmpls.private, observer)?;
    drop(tmpls);

    let mut outcome = KeyPairOutcome {
        handles: handles,
        ..Default::default()
    };
    if request.mode.needs_copies() {
        let (copies, warnings) = materialize(
            token,
            &handles,
            &request.label,
            wants_extractable(&request.overrides),
            observer,
        )?;
        outcome.copies = copies;
        outcome.warnings = warnings;
    }
    Ok(outcome)
}

/// Generates a DSA key pair on `token`
///
/// The domain parameters are read from `params_path` (DER or PEM). All
/// failures before the generation call leave the token untouched. With the
/// `trace` feature the environment configured logger is installed on the
/// first call.
pub fn generate_dsa_key_pair(
    token: &mut dyn Token,
    label: &str,
    params_path: &Path,
    overrides: &[Attribute],
    mode: GenerationMode,
    observer: &dyn Observer,
) -> Result<KeyPairOutcome> {
    #[cfg(feature = "trace")]
    crate::logger::dsakeygen_log_init();

    let result = params::load(params_path, observer).and_then(|params| {
        let request =
            KeyGenerationRequest::new(label, params, overrides.to_vec(), mode);
        run(token, &request, observer)
    });
    if let Err(e) = &result {
        observer.failed(e);
    }
    result
}
