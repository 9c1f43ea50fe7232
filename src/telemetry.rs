use tracing_subscriber::EnvFilter;

/// Installs the diagnostic subscriber. Failures inside the assistant flow
/// are logged here and never surfaced to transcripts.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
