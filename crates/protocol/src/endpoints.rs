//! Endpoint URL construction.
//!
//! Every path lives under `/messageexchange/{mailbox}`. Identifiers are
//! inserted verbatim; callers validate them before they get here.

/// Builds request URLs against one service base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    /// Creates a builder. A trailing slash on `base_url` is ignored.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn mailbox(&self, mailbox_id: &str) -> String {
        format!("{}/messageexchange/{mailbox_id}", self.base_url)
    }

    /// `GET /messageexchange/{mailbox}`
    pub fn handshake(&self, mailbox_id: &str) -> String {
        self.mailbox(mailbox_id)
    }

    /// `GET /messageexchange/{mailbox}/inbox`
    pub fn inbox(&self, mailbox_id: &str) -> String {
        format!("{}/inbox", self.mailbox(mailbox_id))
    }

    /// `GET /messageexchange/{mailbox}/inbox/{message}`, the first read of a message.
    pub fn inbox_message(&self, mailbox_id: &str, message_id: &str) -> String {
        format!("{}/inbox/{message_id}", self.mailbox(mailbox_id))
    }

    /// `GET /messageexchange/{mailbox}/inbox/{message}/{chunk}`
    pub fn inbox_chunk(&self, mailbox_id: &str, message_id: &str, chunk: u32) -> String {
        format!("{}/inbox/{message_id}/{chunk}", self.mailbox(mailbox_id))
    }

    /// `PUT /messageexchange/{mailbox}/inbox/{message}/status/acknowledged`
    pub fn acknowledge(&self, mailbox_id: &str, message_id: &str) -> String {
        format!(
            "{}/inbox/{message_id}/status/acknowledged",
            self.mailbox(mailbox_id)
        )
    }

    /// `POST /messageexchange/{mailbox}/outbox`, creates a message (chunk 1).
    pub fn outbox(&self, mailbox_id: &str) -> String {
        format!("{}/outbox", self.mailbox(mailbox_id))
    }

    /// `POST /messageexchange/{mailbox}/outbox/{transfer}/{chunk}`
    pub fn outbox_chunk(&self, mailbox_id: &str, transfer_id: &str, chunk: u32) -> String {
        format!("{}/outbox/{transfer_id}/{chunk}", self.mailbox(mailbox_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> Endpoints {
        Endpoints::new("https://localhost:8700/")
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        assert_eq!(endpoints().base_url(), "https://localhost:8700");
    }

    #[test]
    fn read_paths() {
        let e = endpoints();
        assert_eq!(
            e.handshake("X26ABC1"),
            "https://localhost:8700/messageexchange/X26ABC1"
        );
        assert_eq!(
            e.inbox("X26ABC1"),
            "https://localhost:8700/messageexchange/X26ABC1/inbox"
        );
        assert_eq!(
            e.inbox_message("X26ABC1", "M1"),
            "https://localhost:8700/messageexchange/X26ABC1/inbox/M1"
        );
        assert_eq!(
            e.inbox_chunk("X26ABC1", "M1", 3),
            "https://localhost:8700/messageexchange/X26ABC1/inbox/M1/3"
        );
        assert_eq!(
            e.acknowledge("X26ABC1", "M1"),
            "https://localhost:8700/messageexchange/X26ABC1/inbox/M1/status/acknowledged"
        );
    }

    #[test]
    fn write_paths() {
        let e = endpoints();
        assert_eq!(
            e.outbox("X26ABC1"),
            "https://localhost:8700/messageexchange/X26ABC1/outbox"
        );
        assert_eq!(
            e.outbox_chunk("X26ABC1", "T9", 2),
            "https://localhost:8700/messageexchange/X26ABC1/outbox/T9/2"
        );
    }
}
