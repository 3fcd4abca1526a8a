pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Values seeded on first run. `value` uses the same textual encoding the
/// settings model reads back ("true"/"false" for booleans).
pub const DEFAULT_SETTINGS: &[(&str, &str)] = &[
    ("enabled", "true"),
    ("platform", "youtube"),
];
