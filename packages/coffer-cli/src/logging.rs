//! Tracing setup: human-readable output on stderr, plus the audit trail
//! appended to its own file.
//!
//! ```text
//! registry
//! ├── fmt layer -> stderr       filtered by RUST_LOG (default: info)
//! └── fmt layer -> audit.log    coffer::audit target only, always info+
//! ```

use std::path::Path;

use coffer_core::audit::AUDIT_TARGET;
use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_FILTER: &str = "coffer=info,coffer_core=info";

/// File layer that records only audit events
///
/// The returned guard flushes the writer thread when dropped; keep it alive
/// for as long as events should reach the file.
pub fn audit_layer<S>(path: &Path) -> Result<(impl Layer<S>, WorkerGuard)>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("audit log path {} has no file name", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).wrap_err_with(|| format!("creating {}", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(dir)
        .wrap_err_with(|| format!("opening audit log {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
        .with_filter(Targets::new().with_target(AUDIT_TARGET, Level::INFO));

    Ok((layer, guard))
}

/// Install the global subscriber
///
/// A failure to open the audit log is reported on stderr and leaves only the
/// console layer running.
pub fn init(audit_log: Option<&Path>) -> Option<WorkerGuard> {
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        );

    let (audit, guard, failure) = match audit_log.map(audit_layer) {
        Some(Ok((layer, guard))) => (Some(layer), Some(guard), None),
        Some(Err(e)) => (None, None, Some(e)),
        None => (None, None, None),
    };

    tracing_subscriber::registry().with(console).with(audit).init();

    if let Some(e) = failure {
        tracing::warn!(error = %e, "Audit log disabled");
    }
    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_core::audit::SecurityEvent;

    #[test]
    fn test_audit_events_reach_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/audit.log");

        let (layer, guard) = audit_layer(&path).unwrap();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            SecurityEvent::SignatureRejected { id: "report.pdf.7".into() }.emit();
            tracing::warn!("unrelated warning");
        });
        drop(guard);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("coffer::audit"));
        assert!(text.contains("event=\"signature_rejected\""));
        assert!(text.contains("report.pdf.7"));
        assert!(!text.contains("unrelated warning"));
    }

    #[test]
    fn test_audit_log_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");
        std::fs::write(&path, "earlier run\n").unwrap();

        let (layer, guard) = audit_layer(&path).unwrap();
        tracing::subscriber::with_default(tracing_subscriber::registry().with(layer), || {
            SecurityEvent::UnwrapFailed { id: "a.txt.1".into() }.emit();
        });
        drop(guard);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("earlier run\n"));
        assert!(text.contains("unwrap_failed"));
    }
}
