use std::fmt;

use crate::AuthError;

/// Mailbox credentials plus the account-wide shared key.
///
/// Immutable for the lifetime of a transfer. Construction fails on any
/// empty field so misconfiguration surfaces before a request is built.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    mailbox_id: String,
    mailbox_password: String,
    shared_key: String,
}

impl Credentials {
    pub fn new(
        mailbox_id: impl Into<String>,
        mailbox_password: impl Into<String>,
        shared_key: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let creds = Self {
            mailbox_id: mailbox_id.into(),
            mailbox_password: mailbox_password.into(),
            shared_key: shared_key.into(),
        };
        if creds.mailbox_id.trim().is_empty() {
            return Err(AuthError::MissingCredential("mailbox id"));
        }
        if creds.mailbox_password.is_empty() {
            return Err(AuthError::MissingCredential("mailbox password"));
        }
        if creds.shared_key.is_empty() {
            return Err(AuthError::MissingCredential("shared key"));
        }
        Ok(creds)
    }

    pub fn mailbox_id(&self) -> &str {
        &self.mailbox_id
    }

    pub(crate) fn mailbox_password(&self) -> &str {
        &self.mailbox_password
    }

    pub(crate) fn shared_key(&self) -> &str {
        &self.shared_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("mailbox_id", &self.mailbox_id)
            .field("mailbox_password", &"<redacted>")
            .field("shared_key", &"<redacted>")
            .finish()
    }
}
