use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Chrome tab identifier.
pub type TabId = i64;

/// Open browser tab as reported by the extension. The host only reads the
/// URL and hands the id back to runtime operations; it never owns the tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    pub url: String,
}

/// Operations the host asks the browser to perform.
///
/// Implemented by the extension bridge in production and by a recording mock
/// in tests.
pub trait BrowserRuntime: Send {
    /// Enumerate every open tab across all windows.
    fn query_tabs(&mut self) -> Result<Vec<Tab>, BridgeError>;

    /// Bring an existing tab to the foreground.
    fn activate_tab(&mut self, id: TabId) -> Result<(), BridgeError>;

    /// Open a new tab at `url`, foreground when `active`.
    fn create_tab(&mut self, url: &str, active: bool) -> Result<(), BridgeError>;

    /// Pause every playable media element in the tab's document.
    fn pause_media(&mut self, id: TabId) -> Result<(), BridgeError>;
}
