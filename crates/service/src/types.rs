//! Data types for the polling flow.

use std::path::PathBuf;

/// Most ids taken from one inbox listing.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Downloads (and acknowledgements) in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Settings for [`crate::InboxPoller`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Messages are written to `<output_dir>/<message id>.<extension>`.
    pub output_dir: PathBuf,
    pub extension: String,
    pub batch_size: usize,
    pub concurrency: usize,
}

impl PollConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            extension: "dat".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("batch size must be at least 1".into());
        }
        if self.concurrency == 0 {
            return Err("concurrency must be at least 1".into());
        }
        if self.extension.contains(['/', '\\']) {
            return Err(format!("invalid extension: {:?}", self.extension));
        }
        Ok(())
    }

    pub(crate) fn file_name(&self, message_id: &str) -> String {
        let ext = self.extension.trim_start_matches('.');
        if ext.is_empty() {
            message_id.to_string()
        } else {
            format!("{message_id}.{ext}")
        }
    }
}

/// A message that could not be downloaded or acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedMessage {
    pub message_id: String,
    pub error: String,
}

/// Outcome of one [`crate::InboxPoller::poll`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollReport {
    /// Inbox listings processed.
    pub batches: u32,
    /// Downloaded and acknowledged, with the file they were written to.
    pub received: Vec<(String, PathBuf)>,
    /// Downloaded but not acknowledged; the file is kept.
    pub unacknowledged: Vec<FailedMessage>,
    /// Not downloaded; no file is left behind.
    pub failed: Vec<FailedMessage>,
    /// Stopped by the cancellation token.
    pub cancelled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PollConfig::new("/tmp/in");
        assert_eq!(config.batch_size, 500);
        assert_eq!(config.concurrency, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_names() {
        let mut config = PollConfig::new("/tmp/in");
        assert_eq!(config.file_name("M1"), "M1.dat");
        config.extension = ".xml".into();
        assert_eq!(config.file_name("M1"), "M1.xml");
        config.extension = String::new();
        assert_eq!(config.file_name("M1"), "M1");
    }

    #[test]
    fn rejects_zero_limits() {
        let mut config = PollConfig::new("/tmp/in");
        config.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = PollConfig::new("/tmp/in");
        config.concurrency = 0;
        assert!(config.validate().is_err());

        let mut config = PollConfig::new("/tmp/in");
        config.extension = "../x".into();
        assert!(config.validate().is_err());
    }
}
