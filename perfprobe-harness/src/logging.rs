use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global `tracing` subscriber.
///
/// `quiet` forces error-only output and ignores `RUST_LOG`; otherwise `RUST_LOG` wins over
/// the flag-derived default. Returns `false` if a subscriber was already installed, which
/// is expected when several tests initialise logging in one process.
pub fn init_logging(verbose: bool, quiet: bool) -> bool {
    let env_filter = if quiet {
        EnvFilter::new("error")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose))
    } else {
        default_filter(verbose)
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(verbose)
        .with_thread_ids(verbose)
        .with_ansi(!quiet);

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init().is_ok()
}

fn default_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("perfprobe_harness=debug,perfprobe_client=debug,info")
    } else {
        EnvFilter::new("info")
    }
}
