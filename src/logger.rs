//! Logging setup for the modv binary.
//!
//! Logs go to stderr so the graph written to stdout can be piped into `dot`
//! untouched. `RUST_LOG` overrides the default filter unless `--verbose` or
//! `--quiet` is given.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter: only warnings from this crate.
const DEFAULT_FILTER: &str = "modv=warn";

/// Picks the filter for the given verbosity flags.
///
/// `verbose` wins over `quiet`.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("modv=debug")
    } else if quiet {
        EnvFilter::new("modv=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the tracing subscriber.
///
/// Must be called once, before any logging occurs.
///
/// # Example
///
/// ```rust,no_run
/// use modv::logger::init_logger;
///
/// // Debug logging, no colors
/// init_logger(true, false, true);
/// ```
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .init();
}
