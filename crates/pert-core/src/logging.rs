//! Subscriber setup shared by the binaries.
//!
//! `PERT_LOG` takes an `EnvFilter` directive (default `pert_cpm=info,warn`,
//! or `pert_cpm=debug,info` when `DEBUG` is set). `PERT_LOG_FORMAT=json`
//! switches to JSON lines. Output always goes to stderr so command output on
//! stdout stays machine-readable.

use std::env;
use std::io;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("PERT_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "pert_cpm=debug,info"
        } else {
            "pert_cpm=info,warn"
        })
    });

    let format = env::var("PERT_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}
