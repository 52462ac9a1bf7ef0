// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! Error type shared by every stage of a key generation request.
//!
//! Errors raised before the token is touched (parameter loading and
//! validation) carry `CKR_GENERAL_ERROR` as their return value, token
//! failures carry the exact `CK_RV` the module returned.

use std::error;
use std::fmt;

use crate::pkcs11::*;

/// Crate wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// The error object returned by all fallible operations
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    origin: Option<Box<dyn error::Error + Send + Sync>>,
    errmsg: Option<String>,
    ckrv: CK_RV,
}

/// Classifies an [Error]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The parameter file could not be opened or read
    ParameterIo,
    /// No decoder recognized the parameter file
    ParameterFormat,
    /// One of p, q or g is empty
    InvalidDomainParameters,
    /// A big integer exported to zero bytes
    Encoding,
    /// The token rejected an operation, see ckrv
    TokenOperation,
    /// A request configuration could not be parsed or resolved
    Config,
}

impl Error {
    fn new(kind: ErrorKind, errmsg: Option<String>) -> Error {
        Error {
            kind: kind,
            origin: None,
            errmsg: errmsg,
            ckrv: CKR_GENERAL_ERROR,
        }
    }

    /// The parameter file could not be opened or read
    pub fn parameter_io<E>(path: &str, error: E) -> Error
    where
        E: Into<Box<dyn error::Error + Send + Sync>>,
    {
        Error {
            kind: ErrorKind::ParameterIo,
            origin: Some(error.into()),
            errmsg: Some(format!("cannot read parameter file {}", path)),
            ckrv: CKR_GENERAL_ERROR,
        }
    }

    /// None of the known encodings matched the parameter file
    pub fn parameter_format(path: &str) -> Error {
        Self::new(
            ErrorKind::ParameterFormat,
            Some(format!("unrecognized DSA parameter file {}", path)),
        )
    }

    /// A domain parameter component is empty
    pub fn invalid_domain_parameters(component: &str) -> Error {
        Self::new(
            ErrorKind::InvalidDomainParameters,
            Some(format!("DSA parameter {} has zero length", component)),
        )
    }

    /// A big integer could not be exported
    pub fn encoding(errmsg: String) -> Error {
        Self::new(ErrorKind::Encoding, Some(errmsg))
    }

    /// The token returned an error for the named function
    pub fn ck_rv(ckrv: CK_RV, function: &str) -> Error {
        Error {
            kind: ErrorKind::TokenOperation,
            origin: None,
            errmsg: Some(format!("{} failed: {}", function, rv_name(ckrv))),
            ckrv: ckrv,
        }
    }

    /// A configuration error with a message
    pub fn config(errmsg: String) -> Error {
        Self::new(ErrorKind::Config, Some(errmsg))
    }

    /// A configuration error wrapping the underlying cause
    pub fn config_from_error<E>(error: E) -> Error
    where
        E: Into<Box<dyn error::Error + Send + Sync>>,
    {
        Error {
            kind: ErrorKind::Config,
            origin: Some(error.into()),
            errmsg: None,
            ckrv: CKR_GENERAL_ERROR,
        }
    }

    /// Returns the error classification
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the PKCS#11 return value associated with this error
    pub fn rv(&self) -> CK_RV {
        self.ckrv
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.errmsg, &self.origin) {
            (Some(msg), Some(e)) => write!(f, "{}: {}", msg, e),
            (Some(msg), None) => write!(f, "{}", msg),
            (None, Some(e)) => e.fmt(f),
            (None, None) => write!(f, "{:?}", self.kind),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.origin {
            Some(e) => Some(e.as_ref()),
            None => None,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Error {
        Error::config_from_error(error)
    }
}

impl From<std::num::TryFromIntError> for Error {
    fn from(error: std::num::TryFromIntError) -> Error {
        Error::encoding(error.to_string())
    }
}

impl From<std::convert::Infallible> for Error {
    fn from(error: std::convert::Infallible) -> Error {
        match error {}
    }
}

/// Returns the symbolic name of the most common return values, or the
/// hexadecimal value for anything else
pub fn rv_name(ckrv: CK_RV) -> String {
    let name = match ckrv {
        CKR_OK => "CKR_OK",
        CKR_GENERAL_ERROR => "CKR_GENERAL_ERROR",
        CKR_FUNCTION_FAILED => "CKR_FUNCTION_FAILED",
        CKR_ARGUMENTS_BAD => "CKR_ARGUMENTS_BAD",
        CKR_ATTRIBUTE_READ_ONLY => "CKR_ATTRIBUTE_READ_ONLY",
        CKR_ATTRIBUTE_TYPE_INVALID => "CKR_ATTRIBUTE_TYPE_INVALID",
        CKR_ATTRIBUTE_VALUE_INVALID => "CKR_ATTRIBUTE_VALUE_INVALID",
        CKR_ACTION_PROHIBITED => "CKR_ACTION_PROHIBITED",
        CKR_DEVICE_ERROR => "CKR_DEVICE_ERROR",
        CKR_DEVICE_MEMORY => "CKR_DEVICE_MEMORY",
        CKR_FUNCTION_NOT_SUPPORTED => "CKR_FUNCTION_NOT_SUPPORTED",
        CKR_KEY_SIZE_RANGE => "CKR_KEY_SIZE_RANGE",
        CKR_MECHANISM_INVALID => "CKR_MECHANISM_INVALID",
        CKR_OBJECT_HANDLE_INVALID => "CKR_OBJECT_HANDLE_INVALID",
        CKR_SESSION_HANDLE_INVALID => "CKR_SESSION_HANDLE_INVALID",
        CKR_SESSION_READ_ONLY => "CKR_SESSION_READ_ONLY",
        CKR_TEMPLATE_INCOMPLETE => "CKR_TEMPLATE_INCOMPLETE",
        CKR_TEMPLATE_INCONSISTENT => "CKR_TEMPLATE_INCONSISTENT",
        CKR_USER_NOT_LOGGED_IN => "CKR_USER_NOT_LOGGED_IN",
        CKR_DOMAIN_PARAMS_INVALID => "CKR_DOMAIN_PARAMS_INVALID",
        CKR_CRYPTOKI_NOT_INITIALIZED => "CKR_CRYPTOKI_NOT_INITIALIZED",
        _ => return format!("0x{:08x}", ckrv),
    };
    name.to_string()
}
