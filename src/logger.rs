//! Tracing subscriber setup for the `focal_mosaic` binary and benches.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    EnvFilter,
};

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber, filtered by `RUST_LOG` or `info`.
pub fn init() {
    init_with_default(DEFAULT_FILTER);
}

/// Install the global subscriber, filtered by `RUST_LOG` or `default_filter`.
///
/// Span close events (with their busy/idle times) are printed when the filter
/// enables debug output. A second call is a no-op.
pub fn init_with_default(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let span_events = if wants_span_timings(&env_filter) {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_span_events(span_events);

    // already installed (e.g. by a test harness)
    let _ = tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init();
}

fn wants_span_timings(filter: &EnvFilter) -> bool {
    let directives = filter.to_string();
    directives.contains("debug") || directives.contains("trace")
}
