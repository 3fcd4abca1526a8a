pub mod types;

pub use types::{BrowserRuntime, Tab, TabId};
