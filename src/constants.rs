use std::time::Duration;

/// Substring that marks a request as an AI generation call.
pub const GENERATION_URL_MARKER: &str = "GenerateContent";

/// Delay before switching to the distraction tab. Switching immediately can
/// interrupt the outgoing request on some platforms.
pub const SWITCH_DELAY: Duration = Duration::from_millis(500);

/// Chrome limits native messaging frames to 1MB (1024 * 1024 bytes)
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;
