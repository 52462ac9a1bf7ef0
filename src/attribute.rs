// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! This module provides the owned attribute representation ([Attribute]),
//! the fixed shape templates built from them ([AttributeSet]) and the
//! mapping between PKCS#11 attribute type values, their printable names
//! and the kind of data they hold ([AttrType]).

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::pkcs11::*;

/// List of attribute value kinds we understand
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AttrType {
    /// A single CK_BBOOL byte
    BoolType,
    /// A native endian CK_ULONG
    NumType,
    /// UTF-8 text without terminator
    StringType,
    /// Opaque bytes, big integers included
    BytesType,
}

impl AttrType {
    /// Finds and returns the attribute id and type from the attribute name
    pub fn attr_name_to_id_type(s: &str) -> Result<(CK_ATTRIBUTE_TYPE, AttrType)> {
        match Attrmap::search_by_name(s) {
            Some(a) => Ok((a.id, a.atype)),
            None => Err(Error::config(format!("unknown attribute {}", s))),
        }
    }

    /// Finds the attribute type from the attribute id
    pub fn attr_id_to_attrtype(id: CK_ATTRIBUTE_TYPE) -> Option<AttrType> {
        Attrmap::search_by_id(id).map(|a| a.atype)
    }
}

/// Struct to map a PKCS#11 attribute to a type and a printable name
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Attrmap<'a> {
    id: CK_ATTRIBUTE_TYPE,
    name: &'a str,
    atype: AttrType,
}

impl PartialOrd for Attrmap<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Attrmap<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Attrmap<'_> {
    /// Convenience function to efficiently search for a mapping by id
    fn search_by_id(id: CK_ATTRIBUTE_TYPE) -> Option<&'static Attrmap<'static>> {
        match ATTRMAP.binary_search(&Attrmap {
            id: id,
            name: "",
            atype: AttrType::StringType,
        }) {
            Ok(i) => Some(&ATTRMAP[i]),
            Err(_) => None,
        }
    }

    /// Convenience function to search for a mapping by name
    fn search_by_name(s: &str) -> Option<&'static Attrmap<'static>> {
        ATTRMAP.iter().find(|a| a.name == s)
    }
}

/// Helper macro to populate the static attributes map
macro_rules! attrmap_element {
    ($id:expr; as $attrtype:ident) => {
        Attrmap {
            id: $id,
            name: stringify!($id),
            atype: AttrType::$attrtype,
        }
    };
}

/// Attributes that may appear on key objects, sorted by id
static ATTRMAP: [Attrmap<'_>; 34] = [
    attrmap_element!(CKA_CLASS; as NumType),
    attrmap_element!(CKA_TOKEN; as BoolType),
    attrmap_element!(CKA_PRIVATE; as BoolType),
    attrmap_element!(CKA_LABEL; as StringType),
    attrmap_element!(CKA_APPLICATION; as StringType),
    attrmap_element!(CKA_VALUE; as BytesType),
    attrmap_element!(CKA_KEY_TYPE; as NumType),
    attrmap_element!(CKA_SUBJECT; as BytesType),
    attrmap_element!(CKA_ID; as BytesType),
    attrmap_element!(CKA_SENSITIVE; as BoolType),
    attrmap_element!(CKA_ENCRYPT; as BoolType),
    attrmap_element!(CKA_DECRYPT; as BoolType),
    attrmap_element!(CKA_WRAP; as BoolType),
    attrmap_element!(CKA_UNWRAP; as BoolType),
    attrmap_element!(CKA_SIGN; as BoolType),
    attrmap_element!(CKA_SIGN_RECOVER; as BoolType),
    attrmap_element!(CKA_VERIFY; as BoolType),
    attrmap_element!(CKA_VERIFY_RECOVER; as BoolType),
    attrmap_element!(CKA_DERIVE; as BoolType),
    attrmap_element!(CKA_PUBLIC_KEY_INFO; as BytesType),
    attrmap_element!(CKA_PRIME; as BytesType),
    attrmap_element!(CKA_SUBPRIME; as BytesType),
    attrmap_element!(CKA_BASE; as BytesType),
    attrmap_element!(CKA_VALUE_LEN; as NumType),
    attrmap_element!(CKA_EXTRACTABLE; as BoolType),
    attrmap_element!(CKA_LOCAL; as BoolType),
    attrmap_element!(CKA_NEVER_EXTRACTABLE; as BoolType),
    attrmap_element!(CKA_ALWAYS_SENSITIVE; as BoolType),
    attrmap_element!(CKA_KEY_GEN_MECHANISM; as NumType),
    attrmap_element!(CKA_MODIFIABLE; as BoolType),
    attrmap_element!(CKA_COPYABLE; as BoolType),
    attrmap_element!(CKA_DESTROYABLE; as BoolType),
    attrmap_element!(CKA_ALWAYS_AUTHENTICATE; as BoolType),
    attrmap_element!(CKA_WRAP_WITH_TRUSTED; as BoolType),
];

/// A Rust native, typed attribute that owns its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    ck_type: CK_ATTRIBUTE_TYPE,
    attrtype: AttrType,
    value: Vec<u8>,
}

impl Attribute {
    /// Returns the PKCS#11 attribute 'type' which is the attribute ID
    pub fn get_type(&self) -> CK_ATTRIBUTE_TYPE {
        self.ck_type
    }

    /// Returns the internal attribute type
    pub fn get_attrtype(&self) -> AttrType {
        self.attrtype
    }

    /// Returns a reference to the internal value
    pub fn get_value(&self) -> &[u8] {
        &self.value
    }

    /// The declared length of the value
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Returns the name of the attribute as an allocated String
    pub fn name(&self) -> String {
        attr_name(self.ck_type)
    }

    /// Returns the internal value as a boolean
    ///
    /// Errors if the attribute is not a boolean or the value is not a
    /// single byte
    pub fn to_bool(&self) -> Result<bool> {
        if self.attrtype != AttrType::BoolType
            || self.value.len() != CK_BBOOL_SIZE
        {
            return Err(Error::encoding(format!(
                "{} is not a CK_BBOOL",
                self.name()
            )));
        }
        Ok(self.value[0] != CK_FALSE)
    }

    /// Returns the internal value as a CK_ULONG
    pub fn to_ulong(&self) -> Result<CK_ULONG> {
        if self.attrtype != AttrType::NumType {
            return Err(Error::encoding(format!(
                "{} is not a CK_ULONG",
                self.name()
            )));
        }
        match <[u8; CK_ULONG_SIZE]>::try_from(self.value.as_slice()) {
            Ok(b) => Ok(CK_ULONG::from_ne_bytes(b)),
            Err(_) => Err(Error::encoding(format!(
                "{} has a bad CK_ULONG length",
                self.name()
            ))),
        }
    }

    /// Returns the internal value as a String
    pub fn to_string(&self) -> Result<String> {
        if self.attrtype != AttrType::StringType {
            return Err(Error::encoding(format!(
                "{} is not a string",
                self.name()
            )));
        }
        match std::str::from_utf8(&self.value) {
            Ok(s) => Ok(s.to_string()),
            Err(e) => Err(Error::encoding(format!("{}: {}", self.name(), e))),
        }
    }

    /// Returns a reference to the internal value wrapped in a Result
    pub fn to_bytes(&self) -> Result<&[u8]> {
        if self.attrtype != AttrType::BytesType {
            return Err(Error::encoding(format!(
                "{} is not a byte array",
                self.name()
            )));
        }
        Ok(&self.value)
    }

    /// Constructs an attribute passing in the value as a slice
    pub fn from_attr_slice(
        id: CK_ATTRIBUTE_TYPE,
        at: AttrType,
        val: &[u8],
    ) -> Attribute {
        Attribute {
            ck_type: id,
            attrtype: at,
            value: val.to_vec(),
        }
    }

    /// Creates an attribute of type AttrType::BoolType from a bool
    ///
    /// Note: Does not verify that the attribute id type is correct
    pub fn from_bool(t: CK_ATTRIBUTE_TYPE, val: bool) -> Attribute {
        Attribute {
            ck_type: t,
            attrtype: AttrType::BoolType,
            value: vec![if val { CK_TRUE } else { CK_FALSE }],
        }
    }

    /// Creates an attribute of type AttrType::NumType from a CK_ULONG
    ///
    /// Note: Does not verify that the attribute id type is correct
    pub fn from_ulong(t: CK_ATTRIBUTE_TYPE, val: CK_ULONG) -> Attribute {
        Attribute {
            ck_type: t,
            attrtype: AttrType::NumType,
            value: Vec::from(val.to_ne_bytes()),
        }
    }

    /// Creates an attribute of type AttrType::StringType from a str
    ///
    /// Note: Does not verify that the attribute id type is correct
    pub fn from_string(t: CK_ATTRIBUTE_TYPE, val: &str) -> Attribute {
        Attribute {
            ck_type: t,
            attrtype: AttrType::StringType,
            value: Vec::from(val.as_bytes()),
        }
    }

    /// Creates an attribute of type AttrType::BytesType from a `Vec<u8>`
    ///
    /// Note: Does not verify that the attribute id type is correct
    pub fn from_bytes(t: CK_ATTRIBUTE_TYPE, val: Vec<u8>) -> Attribute {
        Attribute {
            ck_type: t,
            attrtype: AttrType::BytesType,
            value: val,
        }
    }

    /// Converts a caller supplied CK_ATTRIBUTE into an owned Attribute
    ///
    /// Unknown attribute types are kept as raw bytes.
    ///
    /// # Safety
    ///
    /// `attr.pValue` must either be null or point to at least
    /// `attr.ulValueLen` readable bytes.
    pub unsafe fn from_ck_attr(attr: &CK_ATTRIBUTE) -> Result<Attribute> {
        let atype = AttrType::attr_id_to_attrtype(attr.type_)
            .unwrap_or(AttrType::BytesType);
        let len = usize::try_from(attr.ulValueLen)?;
        let value = if attr.pValue.is_null() || len == 0 {
            Vec::new()
        } else {
            std::slice::from_raw_parts(attr.pValue as *const u8, len).to_vec()
        };
        Ok(Attribute {
            ck_type: attr.type_,
            attrtype: atype,
            value: value,
        })
    }
}

/// Returns the printable name of an attribute id
pub fn attr_name(id: CK_ATTRIBUTE_TYPE) -> String {
    match Attrmap::search_by_id(id) {
        Some(a) => a.name.to_string(),
        None => format!("0x{:08x}", id),
    }
}

/// Why an override was left out of a template
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IgnoreReason {
    /// The template has no slot for this attribute type
    NotInTemplate,
    /// The override length differs from the template slot length
    LengthMismatch {
        /// Length of the default value
        expected: usize,
        /// Length of the override value
        found: usize,
    },
}

/// An override that [AttributeSet::apply] did not merge
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct IgnoredOverride {
    /// The attribute type of the override
    pub ck_type: CK_ATTRIBUTE_TYPE,
    /// Why it was left out
    pub reason: IgnoreReason,
}

/// An ordered, type unique, fixed shape list of attributes
///
/// The set owns all of its values. The shape is decided at construction
/// time: values can be replaced via [AttributeSet::apply] but attribute
/// types can never be added or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSet {
    attrs: Vec<Attribute>,
}

impl AttributeSet {
    /// Builds a set from a fixed list of attributes.
    ///
    /// Errors if two attributes share the same type.
    pub fn fixed(attrs: Vec<Attribute>) -> Result<AttributeSet> {
        for (i, a) in attrs.iter().enumerate() {
            if attrs[..i].iter().any(|b| b.ck_type == a.ck_type) {
                return Err(Error::encoding(format!(
                    "duplicate {} in template",
                    a.name()
                )));
            }
        }
        Ok(AttributeSet { attrs: attrs })
    }

    /// Number of attributes in the set
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Iterates over the attributes in template order
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.attrs.iter()
    }

    /// Finds an attribute by attribute id
    pub fn find(&self, typ: CK_ATTRIBUTE_TYPE) -> Option<&Attribute> {
        self.attrs.iter().find(|a| a.ck_type == typ)
    }

    /// Returns the value of a boolean attribute, None if absent or not
    /// a boolean
    pub fn get_bool(&self, typ: CK_ATTRIBUTE_TYPE) -> Option<bool> {
        self.find(typ).and_then(|a| a.to_bool().ok())
    }

    /// Merges overrides into the template.
    ///
    /// An override replaces the value of the slot with the same type only
    /// when both have the same length; the bytes are copied into the set.
    /// Every other override is left out and returned to the caller, the
    /// default value is kept.
    pub fn apply(&mut self, overrides: &[Attribute]) -> Vec<IgnoredOverride> {
        let mut ignored = Vec::new();
        for o in overrides {
            match self.attrs.iter_mut().find(|a| a.ck_type == o.ck_type) {
                Some(slot) if slot.value.len() == o.value.len() => {
                    slot.value.copy_from_slice(&o.value);
                }
                Some(slot) => ignored.push(IgnoredOverride {
                    ck_type: o.ck_type,
                    reason: IgnoreReason::LengthMismatch {
                        expected: slot.value.len(),
                        found: o.value.len(),
                    },
                }),
                None => ignored.push(IgnoredOverride {
                    ck_type: o.ck_type,
                    reason: IgnoreReason::NotInTemplate,
                }),
            }
        }
        ignored
    }

    /// Returns a CK_ATTRIBUTE array pointing into this set
    ///
    /// The returned array borrows the values, it must not outlive the set
    /// and the callee must not write through the pointers.
    pub fn to_ck_template(&self) -> Result<Vec<CK_ATTRIBUTE>> {
        let mut v = Vec::with_capacity(self.attrs.len());
        for a in &self.attrs {
            v.push(CK_ATTRIBUTE {
                type_: a.ck_type,
                pValue: a.value.as_ptr() as *mut std::ffi::c_void,
                ulValueLen: CK_ULONG::try_from(a.value.len())?,
            });
        }
        Ok(v)
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attrs.iter()
    }
}
