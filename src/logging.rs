use tracing_subscriber::EnvFilter;

/// Initialise logging. The default level is `info`; enabling debug logging
/// in the settings file raises it to `debug` and additionally lets the
/// `RUST_LOG` environment variable take over. When debug logging is off the
/// environment variable is deliberately ignored so a stray `RUST_LOG` cannot
/// flood the log.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
