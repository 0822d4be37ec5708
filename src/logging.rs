//! Structured logging bootstrap using `tracing`.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter applied when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVES: &str = "info,tower_http=debug";

/// Install a global tracing subscriber. Repeated calls are no-ops.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_DIRECTIVES))?;

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_level(true)
        .with_line_number(true)
        .with_file(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(fmt_layer).try_init()?;

    tracing::debug!(directives = DEFAULT_DIRECTIVES, "tracing initialised");
    Ok(())
}
