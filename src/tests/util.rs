// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

use std::path::{Path, PathBuf};

macro_rules! ret_or_panic {
    ($ret:expr) => {
        match $ret {
            Ok(r) => r,
            Err(e) => panic!("{e}"),
        }
    };
}

/* DSA 2048/160 parameters, the same values in both encodings */
pub const DSA_PARAMS_DER: &str = "dsa.params";
pub const DSA_PARAMS_PEM: &str = "dsa.pem";

pub fn testdata(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name)
}

/// A scratch file removed when dropped
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    pub fn new(name: &str, data: &[u8]) -> TempFile {
        let path = std::env::temp_dir()
            .join(format!("dsakeygen-{}-{}", std::process::id(), name));
        std::fs::write(&path, data).unwrap();
        TempFile { path: path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        std::fs::remove_file(&self.path).unwrap_or(());
    }
}
