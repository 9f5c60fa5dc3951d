// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tracing setup.

use crate::error::{EditorError, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_directive` when it is set and valid.
pub fn init_tracing(default_directive: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| EditorError::Logging(e.to_string()))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .map_err(|e| EditorError::Logging(e.to_string()))
}
