// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! Environment driven logging backend
//!
//! `DSAKEYGEN_TRACE` picks the destination: `stdout`, or the name of a
//! file that is truncated and written to. Without it nothing is logged.
//! `DSAKEYGEN_TRACE_LEVEL` picks the maximum level (`off`, `error`,
//! `warn`, `info`, `debug` or `trace`) and defaults to `error`. A value
//! that is not one of those enables everything.

use std::fs::File;
use std::sync::Once;

use simplelog::{Config, LevelFilter, SimpleLogger, WriteLogger};

const TRACE_VAR: &str = "DSAKEYGEN_TRACE";
const LEVEL_VAR: &str = "DSAKEYGEN_TRACE_LEVEL";

static INIT: Once = Once::new();

fn parse_level(name: Option<&str>) -> LevelFilter {
    match name {
        None => LevelFilter::Error,
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("info") => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        Some(_) => LevelFilter::Trace,
    }
}

/// Installs the global logger described by the environment
///
/// Runs once per process, later calls do nothing. A log file that cannot
/// be created, or a logger already installed by the application, leaves
/// logging as it was; neither is an error for key generation.
pub fn dsakeygen_log_init() {
    INIT.call_once(|| {
        let dest = match std::env::var(TRACE_VAR) {
            Ok(d) => d,
            Err(_) => return,
        };
        let level = parse_level(std::env::var(LEVEL_VAR).ok().as_deref());
        if dest == "stdout" {
            let _ = SimpleLogger::init(level, Config::default());
        } else if let Ok(file) = File::create(&dest) {
            let _ = WriteLogger::init(level, Config::default(), file);
        }
    });
}
