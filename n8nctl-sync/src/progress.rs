//! Human-readable progress messages and the dry-run guard.

use crate::error::SyncError;

/// Messages collected during a pass, in the order they were produced.
///
/// Each message is also emitted through `tracing` so that `--debug` runs
/// interleave them with request logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    messages: Vec<String>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        self.messages.push(message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }

    pub fn extend(&mut self, other: Progress) {
        self.messages.extend(other.messages);
    }
}

/// Run a mutating `action`, or in dry-run report `dry_run_message` instead.
///
/// `action` returns its value plus the message to report on success. In
/// dry-run mode `action` is never called and `Ok(None)` is returned.
pub fn execute_or_dry_run<T, F>(
    progress: &mut Progress,
    dry_run: bool,
    dry_run_message: String,
    action: F,
) -> Result<Option<T>, SyncError>
where
    F: FnOnce() -> Result<(T, String), SyncError>,
{
    if dry_run {
        progress.say(dry_run_message);
        return Ok(None);
    }

    let (value, message) = action()?;
    if !message.is_empty() {
        progress.say(message);
    }
    Ok(Some(value))
}
