use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging on stderr.
///
/// `RUST_LOG` wins when set. Otherwise `importwatch=info`, or
/// `importwatch=error` when `quiet` is true. stdout is left to the reloader.
pub fn init_logging(json: bool, quiet: bool) {
    let default_directive = if quiet {
        "importwatch=error,importwatch_core=error"
    } else {
        "importwatch=info,importwatch_core=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
