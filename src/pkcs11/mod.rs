// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! PKCS#11 types and constants
//!
//! The raw Cryptoki definitions come from the `cryptoki-sys` bindings, this
//! module only adds the handful of helpers needed to build templates.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]

pub use cryptoki_sys::*;

/// Size of a CK_BBOOL attribute value
pub const CK_BBOOL_SIZE: usize = std::mem::size_of::<CK_BBOOL>();

/// Size of a CK_ULONG attribute value
pub const CK_ULONG_SIZE: usize = std::mem::size_of::<CK_ULONG>();
