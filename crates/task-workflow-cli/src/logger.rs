//! Stderr logging using env_logger
//!
//! The default filter comes from the app config; RUST_LOG takes precedence
//! when set. Output goes to stderr so `--json` output on stdout stays clean.

use env_logger::{Builder, Env, Target};

/// Initialize logging with `default_filter` unless RUST_LOG is set
pub fn init(default_filter: &str) {
    let env = Env::default().default_filter_or(default_filter);

    let result = Builder::from_env(env)
        .target(Target::Stderr)
        .format_timestamp_secs()
        .try_init();

    if let Err(e) = result {
        eprintln!("Logger already initialized: {}", e);
    }
}
