//! Telemetry helpers for applications embedding `svg-chart-rs`.
//!
//! Components log through `tracing`: frame builds at `debug`, per-bar and
//! per-step work at `trace`, dropped input at `warn`. This module only
//! offers an opt-in subscriber for hosts that do not install their own.

/// Environment variable read for filter directives before falling back.
pub const LOG_ENV_VAR: &str = "SVG_CHART_LOG";

/// Directives used when neither `SVG_CHART_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_DIRECTIVES: &str = "svg_chart_rs=info";

/// Installs a compact `tracing` subscriber filtered by `SVG_CHART_LOG`,
/// then `RUST_LOG`, then [`DEFAULT_DIRECTIVES`].
///
/// Returns `false` when the `telemetry` feature is disabled or the host
/// already set a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    let directives = std::env::var(LOG_ENV_VAR)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| DEFAULT_DIRECTIVES.to_owned());
    init_tracing_with_directives(&directives)
}

/// Installs a compact subscriber for explicit filter `directives`
/// (e.g. `"svg_chart_rs::api=trace"`). Invalid directives fall back to
/// [`DEFAULT_DIRECTIVES`].
#[must_use]
pub fn init_tracing_with_directives(directives: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_new(directives)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = directives;
        false
    }
}
