//! Diagnostics to stderr through `tracing-subscriber`.
//!
//! The core library logs with the `log` facade; `LogTracer` forwards those
//! records into the subscriber so one filter governs both.

use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;

/// Filter used when `--verbose` is given: debug output from our own crates only.
const VERBOSE_DIRECTIVES: &str = "warn,clicdata=debug,clicdata_cli=debug,clicdata_core=debug";
const DEFAULT_DIRECTIVES: &str = "warn";

/// `--verbose` wins; otherwise `RUST_LOG` if it parses, else warnings only.
pub fn build_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new(VERBOSE_DIRECTIVES);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the stderr subscriber. Later calls are ignored.
pub fn init_logging(verbose: bool) {
    if LogTracer::init().is_err() {
        return;
    }

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: could not install logger: {}", e);
    }
}
