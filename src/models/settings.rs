use log::warn;
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::platforms;

/// User-facing configuration, cached in memory for the lifetime of the host
/// and mirrored to the settings table so a restart picks up the latest values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub enabled: bool,
    /// Platform id as stored. Unknown ids are kept verbatim; resolution to
    /// the default platform happens at lookup time.
    pub platform: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            platform: platforms::default_platform().id.to_string(),
        }
    }
}

impl Settings {
    /// Load settings, falling back per key to the default when a key is
    /// missing or its value does not parse.
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(value) = get_value(conn, "enabled")? {
            match value.as_str() {
                "true" => settings.enabled = true,
                "false" => settings.enabled = false,
                other => warn!("Ignoring unparseable 'enabled' value: {}", other),
            }
        }
        if let Some(value) = get_value(conn, "platform")? {
            settings.platform = value;
        }

        Ok(settings)
    }

    pub fn set_enabled(conn: &Connection, enabled: bool) -> Result<()> {
        set_value(conn, "enabled", if enabled { "true" } else { "false" })
    }

    pub fn set_platform(conn: &Connection, platform: &str) -> Result<()> {
        set_value(conn, "platform", platform)
    }
}

fn get_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM settings WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
}

fn set_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}
