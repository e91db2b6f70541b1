use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable that redirects diagnostics into a file.
pub const DIAGNOSTIC_LOG_ENV: &str = "KOORD_DIAGNOSTIC_LOG";

/// Initialize tracing.
///
/// Diagnostics go to stderr unless `KOORD_DIAGNOSTIC_LOG` names a file, in
/// which case they are written to `{path}.{timestamp}.{pid}` so concurrent
/// instances never share a file. `RUST_LOG` overrides the default `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(log_path) = std::env::var_os(DIAGNOSTIC_LOG_ENV) {
        let unique_path = unique_log_path(&log_path.to_string_lossy());
        match std::fs::File::create(&unique_path) {
            Ok(file) => {
                let file_layer = fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true)
                    .with_level(true);
                let _ = tracing_subscriber::registry()
                    .with(filter)
                    .with(file_layer)
                    .try_init();
                return;
            }
            Err(e) => eprintln!("Warning: Failed to create log file {}: {}", unique_path, e),
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .try_init();
}

fn unique_log_path(base: &str) -> String {
    let pid = std::process::id();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{}.{}.{}", base, timestamp, pid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_carries_pid() {
        let path = unique_log_path("/tmp/koord.log");
        assert!(path.starts_with("/tmp/koord.log."));
        assert!(path.ends_with(&format!(".{}", std::process::id())));
    }
}
