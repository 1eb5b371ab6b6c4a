use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the console subscriber used by the binary.
///
/// `RUST_LOG` overrides the default `owner_resolution=info` directive.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("owner_resolution=info"));

    // Logs go to stderr so stdout stays clean JSON
    let console_layer = fmt::layer().with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
