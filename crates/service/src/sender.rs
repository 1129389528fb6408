//! Outbound flow: handshake, then chunked upload.

use std::path::Path;

use mesh_client::{Client, ClientError, OutboundMessage, Payload, Transport};
use tracing::info;

use crate::error::ServiceError;

/// Sends messages from the client's mailbox.
pub struct MessageSender<'a, T> {
    client: &'a Client<T>,
    workflow_id: String,
}

impl<'a, T: Transport> MessageSender<'a, T> {
    pub fn new(client: &'a Client<T>, workflow_id: impl Into<String>) -> Self {
        Self {
            client,
            workflow_id: workflow_id.into(),
        }
    }

    /// Handshakes, then uploads `payload` to `to`. Returns the message id.
    ///
    /// Nothing is uploaded if the handshake fails.
    pub async fn send(
        &self,
        to: &str,
        file_name: &str,
        payload: Payload,
    ) -> Result<String, ServiceError> {
        self.client.handshake().await?;

        let message = OutboundMessage::new(to, self.workflow_id.as_str(), file_name);
        let message_id = self.client.upload(&message, payload).await?;

        info!(message_id = %message_id, to, file = file_name, "message sent");
        Ok(message_id)
    }

    /// Sends a file; its base name becomes `mex-filename`.
    pub async fn send_file(&self, to: &str, path: &Path) -> Result<String, ServiceError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ClientError::Configuration(format!("no usable file name in {}", path.display()))
            })?
            .to_string();

        let payload = Payload::from_file(path)
            .await
            .map_err(ClientError::from)?;
        self.send(to, &file_name, payload).await
    }
}
