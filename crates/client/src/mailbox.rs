//! Single-call mailbox operations: handshake, inbox listing, acknowledgement
//! and standalone sends.

use mesh_auth::CallKind;
use mesh_protocol::constants::status;
use mesh_protocol::{InboxResponse, SendMessageResponse};
use mesh_transfer::{TransferError, validate_message_id};
use tracing::{debug, info};

use crate::client::Client;
use crate::error::ClientError;
use crate::transport::{Request, Response, Transport};
use crate::upload::{OutboundMessage, compress_blocking};

impl<T: Transport> Client<T> {
    /// Checks connectivity and credentials against the mailbox endpoint.
    pub async fn handshake(&self) -> Result<(), ClientError> {
        let url = self.endpoints.handshake(self.mailbox_id());
        let response = self.get(url).await?;
        expect_status(response, status::OK)?;
        info!(mailbox = self.mailbox_id(), "handshake ok");
        Ok(())
    }

    /// Lists message ids waiting in the inbox.
    pub async fn inbox(&self) -> Result<InboxResponse, ClientError> {
        let url = self.endpoints.inbox(self.mailbox_id());
        let response = expect_status(self.get(url).await?, status::OK)?;
        let inbox: InboxResponse = serde_json::from_slice(&response.body)?;
        debug!(
            listed = inbox.messages.len(),
            approx = inbox.approx_inbox_count,
            "inbox listed"
        );
        Ok(inbox)
    }

    /// Marks a message as read. Only call this after its download finished.
    pub async fn acknowledge(&self, message_id: &str) -> Result<(), ClientError> {
        validate_message_id(message_id)?;
        let url = self.endpoints.acknowledge(self.mailbox_id(), message_id);
        let headers = self.headers.build(&self.credentials, CallKind::Inbound)?;
        let response = self.transport.send(Request::put(url, headers)).await?;
        expect_status(response, status::OK)?;
        debug!(message_id, "message acknowledged");
        Ok(())
    }

    /// Sends a message in a single request, without chunk metadata.
    ///
    /// With `compress`, the body is gzipped and `content-encoding: gzip` set.
    /// Returns the server-assigned message id.
    pub async fn send_message(
        &self,
        message: &OutboundMessage,
        data: Vec<u8>,
        compress: bool,
    ) -> Result<String, ClientError> {
        if data.is_empty() {
            return Err(TransferError::EmptyPayload.into());
        }

        let body = if compress {
            compress_blocking(data).await?
        } else {
            data
        };

        let url = self.endpoints.outbox(self.mailbox_id());
        let meta = message.meta(None, compress);
        let headers = self.headers.build(&self.credentials, CallKind::Outbound(&meta))?;
        let response = self.transport.send(Request::post(url, headers, body)).await?;
        let response = expect_status(response, status::ACCEPTED)?;

        let sent: SendMessageResponse = serde_json::from_slice(&response.body)?;
        info!(message_id = %sent.message_id, to = %message.to, "message sent");
        Ok(sent.message_id)
    }

    async fn get(&self, url: String) -> Result<Response, ClientError> {
        let headers = self.headers.build(&self.credentials, CallKind::Inbound)?;
        self.transport.send(Request::get(url, headers)).await
    }
}

fn expect_status(response: Response, expected: u16) -> Result<Response, ClientError> {
    if response.status == expected {
        Ok(response)
    } else {
        Err(response.into_status_error())
    }
}
