// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! Key generation requests stored as TOML files

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::attribute::{AttrType, Attribute};
use crate::error::{Error, Result};
use crate::keygen::KeyGenerationRequest;
use crate::observer::Observer;
use crate::params;
use crate::template::GenerationMode;

use serde::{Deserialize, Serialize};
use toml;

/// File name looked up in the configuration directories
pub const DEFAULT_CONF_NAME: &str = "request.toml";

/// The value of an attribute override, exactly one must be set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Override {
    /// Attribute name, e.g. `CKA_EXTRACTABLE`
    pub attribute: String,
    /// Value of a CK_BBOOL attribute
    pub bool: Option<bool>,
    /// Value of a CK_ULONG attribute
    pub ulong: Option<u64>,
    /// Value of a string attribute
    pub string: Option<String>,
    /// Hex encoded raw value, valid for any attribute
    pub hex: Option<String>,
}

impl Override {
    /// Resolves the attribute name and converts the value to the
    /// attribute's native representation
    pub fn to_attribute(&self) -> Result<Attribute> {
        let (id, atype) = AttrType::attr_name_to_id_type(&self.attribute)?;
        let attr = match (atype, &self.bool, &self.ulong, &self.string, &self.hex)
        {
            (AttrType::BoolType, Some(b), None, None, None) => {
                Attribute::from_bool(id, *b)
            }
            (AttrType::NumType, None, Some(n), None, None) => {
                Attribute::from_ulong(id, (*n).try_into()?)
            }
            (AttrType::StringType, None, None, Some(s), None) => {
                Attribute::from_string(id, s)
            }
            (_, None, None, None, Some(h)) => {
                let v = hex::decode(h).map_err(Error::config_from_error)?;
                Attribute::from_attr_slice(id, atype, &v)
            }
            _ => {
                return Err(Error::config(format!(
                    "bad value for {}, expected a single {:?} value",
                    self.attribute, atype
                )))
            }
        };
        Ok(attr)
    }
}

/// A key generation request as stored in a TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// CKA_LABEL of the key pair
    pub label: String,
    /// Hex encoded CKA_ID
    pub id: Option<String>,
    /// Path of the DSA parameters file
    pub params: String,
    /// Generation mode
    pub mode: GenerationMode,
    /// Attribute overrides, in order
    #[serde(default, rename = "override")]
    pub overrides: Vec<Override>,
    /// Directory relative parameter paths are resolved against
    #[serde(skip)]
    pub basedir: Option<PathBuf>,
}

impl RequestConfig {
    /// Locates the default request file
    pub fn find_conf() -> Result<String> {
        /* First check for our own env var,
         * this has the highest precedence */
        if let Ok(var) = env::var("DSAKEYGEN_CONF") {
            return Ok(var);
        }
        let datafile = match env::var("XDG_CONFIG_HOME") {
            Ok(xdg) => format!("{}/dsakeygen/{}", xdg, DEFAULT_CONF_NAME),
            Err(_) => match env::var("HOME") {
                Ok(home) => {
                    format!("{}/.config/dsakeygen/{}", home, DEFAULT_CONF_NAME)
                }
                Err(_) => {
                    return Err(Error::config(
                        "no configuration directory available".to_string(),
                    ))
                }
            },
        };
        if Path::new(&datafile).is_file() {
            Ok(datafile)
        } else {
            Err(Error::config(format!("{} not found", datafile)))
        }
    }

    /// Parses a request from a TOML string
    pub fn from_str(config_str: &str) -> Result<RequestConfig> {
        let conf: RequestConfig = toml::from_str(config_str)?;
        Ok(conf)
    }

    /// Reads a request file, relative parameter paths will resolve
    /// against the file's directory
    pub fn from_file(filename: &str) -> Result<RequestConfig> {
        let config_str =
            fs::read_to_string(filename).map_err(Error::config_from_error)?;
        let mut conf = Self::from_str(&config_str)?;
        conf.basedir = Path::new(filename).parent().map(|p| p.to_path_buf());
        Ok(conf)
    }

    /// Returns the parameter file path
    pub fn params_path(&self) -> PathBuf {
        let p = PathBuf::from(&self.params);
        match &self.basedir {
            Some(dir) if p.is_relative() => dir.join(p),
            _ => p,
        }
    }

    /// Converts all overrides to attributes
    pub fn override_attributes(&self) -> Result<Vec<Attribute>> {
        self.overrides.iter().map(|o| o.to_attribute()).collect()
    }

    /// Loads the parameters and builds the request
    pub fn into_request(
        self,
        observer: &dyn Observer,
    ) -> Result<KeyGenerationRequest> {
        let overrides = self.override_attributes()?;
        let id = match &self.id {
            Some(h) => Some(hex::decode(h).map_err(Error::config_from_error)?),
            None => None,
        };
        let params = params::load(&self.params_path(), observer)?;
        let mut request =
            KeyGenerationRequest::new(&self.label, params, overrides, self.mode);
        request.id = id;
        Ok(request)
    }
}
