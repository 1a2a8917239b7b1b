//! Logging setup for the `fintrack` binary
//!
//! Events go to stderr so command output on stdout stays clean for piping.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::Settings;

/// Filter directive: `RUST_LOG` when set, else the configured level
pub fn filter_directive(settings: &Settings, rust_log: Option<&str>) -> String {
    match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directive) => directive.to_string(),
        None => format!("fintrack={}", settings.log_level),
    }
}

/// Install the global subscriber. Safe to call once per process; later
/// calls are ignored.
pub fn init(settings: &Settings) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(settings, rust_log.as_deref());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("fintrack=warn"));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        let mut settings = Settings::default();
        assert_eq!(filter_directive(&settings, None), "fintrack=warn");

        settings.log_level = "debug".into();
        assert_eq!(filter_directive(&settings, Some("  ")), "fintrack=debug");
        assert_eq!(filter_directive(&settings, Some("info")), "info");
    }
}
