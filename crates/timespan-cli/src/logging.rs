//! Tracing subscriber initialization.
//!
//! Diagnostics go to stderr so stdout stays machine-readable. `RUST_LOG`
//! wins when set; otherwise the level is `warn`, or `trace` when tracing was
//! requested on the command line or in the config file.

use tracing_subscriber::EnvFilter;

pub fn init(trace: bool) {
    let default_level = if trace { "trace" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Keep an already installed subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
