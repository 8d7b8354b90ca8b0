use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global fmt subscriber. `RUST_LOG` wins over `default_filter`.
/// Calling it twice is harmless; the second install is ignored.
pub fn init_logging(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = fmt().with_env_filter(env_filter).try_init();
}
