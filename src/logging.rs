// SPDX-License-Identifier: MPL-2.0
//! Structured logging setup.
//!
//! `RUST_LOG` takes precedence; without it only DropPlay's own info-level
//! events are printed.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "dropplay=info";

/// Installs the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A second init only fails because a subscriber already exists
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
