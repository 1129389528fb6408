use crate::TransferError;

/// Validates a server-issued message or transfer id.
///
/// Ids are placed in URL paths and used as local file names, so only
/// `[A-Za-z0-9_.-]` is accepted, and `.`/`..` are rejected.
pub fn validate_message_id(id: &str) -> Result<(), TransferError> {
    if id.is_empty() {
        return Err(TransferError::InvalidMessageId("empty id".into()));
    }

    if id == "." || id == ".." {
        return Err(TransferError::InvalidMessageId(format!(
            "relative path component not allowed: {id}"
        )));
    }

    if let Some(c) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(TransferError::InvalidMessageId(format!(
            "character {c:?} not allowed: {id}"
        )));
    }

    Ok(())
}
