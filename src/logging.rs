//! Logging setup, powered by `tracing-subscriber`.
//!
//! actix-web logs through the `log` crate; the subscriber's `init()`
//! installs the `log` bridge so those records land here too.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Third-party targets that are too chatty at `info`.
const NOISY_TARGETS: &[(&str, &str)] = &[("actix_server", "warn"), ("actix_web", "warn")];

/// Build the filter from the base level plus noisy-crate overrides.
/// `RUST_LOG`, when set, replaces all of it.
fn build_env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return EnvFilter::try_from_default_env()
            .map_err(|e| anyhow::anyhow!("invalid RUST_LOG: {}", e));
    }

    let mut directives = vec![level.to_string()];
    for (target, lvl) in NOISY_TARGETS {
        directives.push(format!("{}={}", target, lvl));
    }

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str)
        .map_err(|e| anyhow::anyhow!("invalid log filter '{}': {}", filter_str, e))
}

/// Install the global subscriber, writing to stderr.
pub fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = build_env_filter(level)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("logging already initialized: {}", e))?;

    tracing::trace!(level, "logging initialized");
    Ok(())
}
