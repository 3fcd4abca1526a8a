use thiserror::Error;

/// Errors at the browser-runtime boundary.
///
/// Every runtime call (tab query, activation, creation, script injection)
/// returns one of these; the monitor logs them and carries on.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid message: {0}")]
    InvalidMessage(#[from] serde_json::Error),

    #[error("Message too large: {size} bytes (max: {max} bytes)")]
    MessageTooLarge { size: usize, max: usize },

    #[error("Extension disconnected")]
    Disconnected,
}
