use crate::browser::{BrowserRuntime, Tab};
use log::warn;

/// Find the first open tab whose URL contains `pattern` as a substring.
///
/// Substring containment is deliberate: one pattern matches every path
/// variant of a site. A failed enumeration is treated as "no match" rather
/// than propagated.
pub fn find_by_pattern<R: BrowserRuntime>(runtime: &mut R, pattern: &str) -> Option<Tab> {
    match runtime.query_tabs() {
        Ok(tabs) => tabs.into_iter().find(|tab| tab.url.contains(pattern)),
        Err(e) => {
            warn!("Failed to query tabs: {}", e);
            None
        }
    }
}
