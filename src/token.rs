// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! Access to the token holding the keys
//!
//! The [Token] trait is the only way the generator touches a token. The
//! session behind it is opened, logged in and closed by the caller, and
//! is borrowed mutably for the duration of a request.

use crate::attribute::AttributeSet;
use crate::error::{Error, Result};
use crate::pkcs11::*;

/// The two object handles returned by a key pair generation
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct KeyHandlePair {
    /// Handle of the public key object
    pub public: CK_OBJECT_HANDLE,
    /// Handle of the private key object
    pub private: CK_OBJECT_HANDLE,
}

impl Default for KeyHandlePair {
    fn default() -> KeyHandlePair {
        KeyHandlePair {
            public: CK_INVALID_HANDLE,
            private: CK_INVALID_HANDLE,
        }
    }
}

/// Operations needed from an open token session
pub trait Token {
    /// Generates a key pair with the given mechanism and templates
    fn generate_key_pair(
        &mut self,
        mechanism: CK_MECHANISM_TYPE,
        public: &AttributeSet,
        private: &AttributeSet,
    ) -> Result<KeyHandlePair>;

    /// Copies an object, applying the template to the copy
    fn copy_object(
        &mut self,
        handle: CK_OBJECT_HANDLE,
        template: &AttributeSet,
    ) -> Result<CK_OBJECT_HANDLE>;
}

/// A token reached through a PKCS#11 module function list
///
/// The module must be initialized and `session` must be an open
/// read/write session for the lifetime of this object.
pub struct FunctionListToken<'a> {
    fns: &'a CK_FUNCTION_LIST,
    session: CK_SESSION_HANDLE,
}

impl<'a> FunctionListToken<'a> {
    /// Wraps a function list and an open session
    pub fn new(
        fns: &'a CK_FUNCTION_LIST,
        session: CK_SESSION_HANDLE,
    ) -> FunctionListToken<'a> {
        FunctionListToken {
            fns: fns,
            session: session,
        }
    }

    /// Returns the session handle this token operates on
    pub fn session(&self) -> CK_SESSION_HANDLE {
        self.session
    }
}

impl Token for FunctionListToken<'_> {
    fn generate_key_pair(
        &mut self,
        mechanism: CK_MECHANISM_TYPE,
        public: &AttributeSet,
        private: &AttributeSet,
    ) -> Result<KeyHandlePair> {
        let func = match self.fns.C_GenerateKeyPair {
            Some(f) => f,
            None => {
                return Err(Error::ck_rv(
                    CKR_FUNCTION_NOT_SUPPORTED,
                    "C_GenerateKeyPair",
                ))
            }
        };
        let mut mech = CK_MECHANISM {
            mechanism: mechanism,
            pParameter: std::ptr::null_mut(),
            ulParameterLen: 0,
        };
        let mut pubtmpl = public.to_ck_template()?;
        let mut pritmpl = private.to_ck_template()?;
        let mut pubh: CK_OBJECT_HANDLE = CK_INVALID_HANDLE;
        let mut privh: CK_OBJECT_HANDLE = CK_INVALID_HANDLE;
        let ret = unsafe {
            func(
                self.session,
                &mut mech,
                pubtmpl.as_mut_ptr(),
                CK_ULONG::try_from(pubtmpl.len())?,
                pritmpl.as_mut_ptr(),
                CK_ULONG::try_from(pritmpl.len())?,
                &mut pubh,
                &mut privh,
            )
        };
        if ret != CKR_OK {
            return Err(Error::ck_rv(ret, "C_GenerateKeyPair"));
        }
        Ok(KeyHandlePair {
            public: pubh,
            private: privh,
        })
    }

    fn copy_object(
        &mut self,
        handle: CK_OBJECT_HANDLE,
        template: &AttributeSet,
    ) -> Result<CK_OBJECT_HANDLE> {
        let func = match self.fns.C_CopyObject {
            Some(f) => f,
            None => {
                return Err(Error::ck_rv(
                    CKR_FUNCTION_NOT_SUPPORTED,
                    "C_CopyObject",
                ))
            }
        };
        let mut tmpl = template.to_ck_template()?;
        let mut newh: CK_OBJECT_HANDLE = CK_INVALID_HANDLE;
        let ret = unsafe {
            func(
                self.session,
                handle,
                tmpl.as_mut_ptr(),
                CK_ULONG::try_from(tmpl.len())?,
                &mut newh,
            )
        };
        if ret != CKR_OK {
            return Err(Error::ck_rv(ret, "C_CopyObject"));
        }
        Ok(newh)
    }
}
