// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! Diagnostic events emitted while a request is processed
//!
//! Every stage reports through an [Observer] handed in by the caller, the
//! default [LogObserver] forwards events to the `log` facade.

use std::cell::RefCell;
use std::fmt;

use crate::attribute::{attr_name, AttributeSet, IgnoreReason, IgnoredOverride};
use crate::error::{rv_name, Error};
use crate::params::ParamFormat;
use crate::pkcs11::*;

/// Identifies one of the two objects of a key pair
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KeyObject {
    /// The public key
    Public,
    /// The private key
    Private,
}

impl fmt::Display for KeyObject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KeyObject::Public => write!(f, "public"),
            KeyObject::Private => write!(f, "private"),
        }
    }
}

/// A persistent copy of a generated key could not be created
///
/// This never fails the request, the session objects are still returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicationWarning {
    /// The key that was not copied
    pub object: KeyObject,
    /// Label of the key pair
    pub label: String,
    /// What C_CopyObject returned
    pub rv: CK_RV,
}

impl fmt::Display for DuplicationWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "could not create a local copy for {} key '{}' ({}). \
             Retry key generation without wrapping",
            self.object,
            self.label,
            rv_name(self.rv)
        )
    }
}

/// Something worth reporting happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The parameter file was decoded with this format
    FormatDetected(ParamFormat),
    /// An override was not merged into a template
    OverrideIgnored(KeyObject, IgnoredOverride),
    /// The key pair generation call failed
    GenerationFailed(CK_RV),
    /// The token returned a key pair
    KeyPairGenerated(CK_OBJECT_HANDLE, CK_OBJECT_HANDLE),
    /// A persistent copy was created
    CopyCreated(KeyObject, CK_OBJECT_HANDLE),
    /// A persistent copy could not be created
    Duplication(DuplicationWarning),
}

/// Receives diagnostic events
pub trait Observer {
    /// Receives one event
    fn notify(&self, event: &Event);

    /// Receives the final templates before they are sent to the token
    fn templates(&self, _public: &AttributeSet, _private: &AttributeSet) {}

    /// Receives fatal errors before they are returned
    fn failed(&self, _error: &Error) {}
}

/// Forwards events to the `log` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn notify(&self, event: &Event) {
        match event {
            Event::FormatDetected(format) => {
                log::info!("{} format detected", format)
            }
            Event::OverrideIgnored(obj, ign) => match ign.reason {
                IgnoreReason::NotInTemplate => log::warn!(
                    "{} not in {} key template, override ignored",
                    attr_name(ign.ck_type),
                    obj
                ),
                IgnoreReason::LengthMismatch { expected, found } => {
                    log::warn!(
                        "{} override for {} key has length {}, expected {}, ignored",
                        attr_name(ign.ck_type),
                        obj,
                        found,
                        expected
                    )
                }
            },
            Event::GenerationFailed(rv) => {
                log::error!("C_GenerateKeyPair failed: {}", rv_name(*rv))
            }
            Event::KeyPairGenerated(pubh, privh) => {
                log::debug!("generated key pair {}/{}", pubh, privh)
            }
            Event::CopyCreated(obj, h) => {
                log::debug!("created persistent {} key copy {}", obj, h)
            }
            Event::Duplication(w) => log::warn!("{}", w),
        }
    }

    fn templates(&self, public: &AttributeSet, private: &AttributeSet) {
        if log::log_enabled!(log::Level::Debug) {
            for (obj, set) in
                [(KeyObject::Public, public), (KeyObject::Private, private)]
            {
                for a in set {
                    log::debug!(
                        "{} template {} = {}",
                        obj,
                        a.name(),
                        hex::encode(a.get_value())
                    );
                }
            }
        }
    }

    fn failed(&self, error: &Error) {
        log::error!("{}", error);
    }
}

/// Keeps every event in memory, in order
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: RefCell<Vec<Event>>,
}

impl RecordingObserver {
    /// Creates an observer with no events
    pub fn new() -> RecordingObserver {
        RecordingObserver::default()
    }

    /// Returns a copy of the events seen so far
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Returns the duplication warnings seen so far
    pub fn warnings(&self) -> Vec<DuplicationWarning> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Duplication(w) => Some(w.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Observer for RecordingObserver {
    fn notify(&self, event: &Event) {
        self.events.borrow_mut().push(event.clone());
    }
}
