use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "dashboard_pipeline=info,campus_dashboard=info,create_sample_data=info";

/// Install the process-wide subscriber. Only binaries call this; library code
/// just emits events.
///
/// Logs go to stderr so stdout carries nothing but the per-building report.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
