// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! A console logger for following the codec without the host application installing a logger.

use std::{env, io::Write};

/// White on red
const ANSI_ERROR: &str = "\x1b[37m\x1b[41m";
/// Yellow on black
const ANSI_WARN: &str = "\x1b[33m";
/// Blue on black
const ANSI_INFO: &str = "\x1b[36m";
/// Reset code
const ANSI_RESET: &str = "\x1b[0m";

/// Installs an env_logger backed logger. The filter is read from `RUST_OPCUA_LOG` rather than
/// `RUST_LOG`, which is used by cargo and other rust tools, and defaults to `info`.
pub fn init() {
    let filters = env::var("RUST_OPCUA_LOG").unwrap_or_else(|_| "info".to_string());
    let result = env_logger::Builder::new()
        .format(|buf, record| {
            let now = chrono::Utc::now();
            let time_fmt = now.format("%Y-%m-%d %H:%M:%S%.3f");
            let module_path = record.module_path().unwrap_or("");
            let (start, end) = match record.level() {
                log::Level::Error => (ANSI_ERROR, ANSI_RESET),
                log::Level::Warn => (ANSI_WARN, ANSI_RESET),
                log::Level::Info => (ANSI_INFO, ANSI_RESET),
                _ => ("", ""),
            };
            writeln!(
                buf,
                "{} - {}{}{} - {} - {}",
                time_fmt,
                start,
                record.level(),
                end,
                module_path,
                record.args()
            )
        })
        .parse_filters(&filters)
        .try_init();
    match result {
        Ok(_) => info!("Logging is enabled, use RUST_OPCUA_LOG environment variable to control filtering, logging level"),
        Err(err) => eprintln!("Logger error, check error = {}", err),
    }
}
