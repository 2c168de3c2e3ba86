use std::fmt;

use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Progress,
    Success,
    Error,
}

impl fmt::Display for NotifyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyKind::Progress => f.write_str("progress"),
            NotifyKind::Success => f.write_str("success"),
            NotifyKind::Error => f.write_str("error"),
        }
    }
}

/// Receives human-readable status messages. Fire and forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, kind: NotifyKind);
}

/// Forwards status messages to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, kind: NotifyKind) {
        match kind {
            NotifyKind::Error => error!(%kind, "{message}"),
            _ => info!(%kind, "{message}"),
        }
    }
}
