//! Inbound flow: list, download, acknowledge.

use std::path::PathBuf;

use futures_util::StreamExt;
use futures_util::stream;
use mesh_client::{Client, ClientError, Transport};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::ServiceError;
use crate::types::{FailedMessage, PollConfig, PollReport};

/// Drains a mailbox's inbox into a directory.
pub struct InboxPoller<'a, T> {
    client: &'a Client<T>,
    config: PollConfig,
    cancel: CancellationToken,
}

impl<'a, T: Transport> InboxPoller<'a, T> {
    pub fn new(client: &'a Client<T>, config: PollConfig) -> Result<Self, ServiceError> {
        config.validate().map_err(ServiceError::InvalidConfig)?;
        Ok(Self {
            client,
            config,
            cancel: CancellationToken::new(),
        })
    }

    /// Returns a token that stops polling before the next batch.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Polls until the inbox yields a short batch, a batch makes no
    /// progress, or the token is cancelled.
    ///
    /// Per-message failures are collected in the report. Listing failures
    /// abort the run.
    pub async fn poll(&self) -> Result<PollReport, ServiceError> {
        tokio::fs::create_dir_all(&self.config.output_dir).await?;

        let mut report = PollReport::default();
        loop {
            if self.cancel.is_cancelled() {
                info!(batches = report.batches, "polling cancelled");
                report.cancelled = true;
                break;
            }

            let inbox = self.client.inbox().await?;
            let batch: Vec<String> = inbox
                .messages
                .into_iter()
                .take(self.config.batch_size)
                .collect();
            if batch.is_empty() {
                break;
            }

            let full = batch.len() == self.config.batch_size;
            let acknowledged = self.process_batch(batch, &mut report).await;
            report.batches += 1;

            if !full {
                break;
            }
            if acknowledged == 0 {
                warn!("no message in a full batch could be received, stopping");
                break;
            }
        }

        info!(
            batches = report.batches,
            received = report.received.len(),
            failed = report.failed.len(),
            unacknowledged = report.unacknowledged.len(),
            "polling finished"
        );
        Ok(report)
    }

    /// Downloads a batch, then acknowledges what completed. Returns the
    /// number of acknowledged messages.
    async fn process_batch(&self, batch: Vec<String>, report: &mut PollReport) -> usize {
        debug!(size = batch.len(), "processing batch");

        let downloads: Vec<(String, PathBuf, Result<(), ClientError>)> = stream::iter(batch)
            .map(|id| async move {
                let path = self.config.output_dir.join(self.config.file_name(&id));
                let result = self.client.download_to_file(&id, &path).await.map(|_| ());
                (id, path, result)
            })
            .buffer_unordered(self.config.concurrency)
            .collect()
            .await;

        let mut done = Vec::new();
        for (id, path, result) in downloads {
            match result {
                Ok(()) => done.push((id, path)),
                Err(e) => {
                    warn!(message_id = %id, error = %e, "download failed");
                    report.failed.push(FailedMessage {
                        message_id: id,
                        error: e.to_string(),
                    });
                }
            }
        }

        let acks: Vec<(String, PathBuf, Result<(), ClientError>)> = stream::iter(done)
            .map(|(id, path)| async move {
                let result = self.client.acknowledge(&id).await;
                (id, path, result)
            })
            .buffer_unordered(self.config.concurrency)
            .collect()
            .await;

        let mut acknowledged = 0;
        for (id, path, result) in acks {
            match result {
                Ok(()) => {
                    acknowledged += 1;
                    report.received.push((id, path));
                }
                Err(e) => {
                    warn!(message_id = %id, error = %e, "acknowledge failed");
                    report.unacknowledged.push(FailedMessage {
                        message_id: id,
                        error: e.to_string(),
                    });
                }
            }
        }
        acknowledged
    }
}
