//! Shared output formatting.

use reggen_core::notify::{Notifier, NotifyKind};
use reggen_core::InsertOutcome;

/// Prints workflow status lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, kind: NotifyKind) {
        match kind {
            NotifyKind::Progress => eprintln!("...  {message}"),
            NotifyKind::Success => eprintln!("done {message}"),
            NotifyKind::Error => eprintln!("err  {message}"),
        }
    }
}

/// One-line description of what an insertion did.
pub fn describe_outcome(outcome: &InsertOutcome) -> String {
    match outcome {
        InsertOutcome::ReplacedAtTag { control, ignored_duplicates } => {
            let mut line = format!("replaced content control {}", control.id);
            if let Some(title) = &control.title {
                line.push_str(&format!(" ({title})"));
            }
            if *ignored_duplicates > 0 {
                line.push_str(&format!("; ignored {ignored_duplicates} duplicate(s)"));
            }
            line
        }
        InsertOutcome::FallbackAppended => {
            "placeholder not found; appended paragraph at end of document".to_string()
        }
        InsertOutcome::FallbackPrepended => {
            "placeholder not found; inserted paragraph at start of document".to_string()
        }
        InsertOutcome::ReplacedSelection => "replaced active selection".to_string(),
    }
}
