use tracing_subscriber::EnvFilter;

/// Installs the stderr `fmt` subscriber; stdout stays reserved for command output.
///
/// `verbose` raises the filter to `debug` regardless of `filter`. Calling this
/// twice is harmless: the second install is ignored.
pub fn init_logging(filter: &str, verbose: bool) {
    let directive = if verbose { "debug" } else { filter };
    let env_filter = EnvFilter::try_new(directive)
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
