// src/logging.rs

use tracing_subscriber::{fmt, EnvFilter};

/// Install the fmt subscriber used by every binary.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies. Events go to
/// stderr so that reports printed on stdout stay clean.
pub fn init(default_filter: &str) {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}
