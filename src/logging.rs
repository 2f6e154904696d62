//! Logging initialization.
//!
//! Uses `tracing` with `tracing-subscriber`. The filter can be overridden via
//! the `RUST_LOG` environment variable:
//!
//! ```bash
//! RUST_LOG=shack_o_target=debug,tower_http=debug shack-o-target
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

pub const DEFAULT_FILTER: &str = "shack_o_target=info,tower_http=info,sqlx=warn";

pub fn init_logging() {
    let fmt_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
