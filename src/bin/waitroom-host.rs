//! Chrome Native Messaging host for Waitroom.
//!
//! The extension shim forwards AI Studio request lifecycle events and settings
//! changes over stdin; this process answers with tab commands on stdout. It
//! runs until the browser closes the connection.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use directories::ProjectDirs;
use log::{error, info};
use simplelog::{Config, LevelFilter, WriteLogger};
use waitroom_lib::bridge::{self, ExtensionBridge};
use waitroom_lib::db::{migrations, Database};
use waitroom_lib::models::Settings;
use waitroom_lib::monitor::{Event, GenerationMonitor};

fn get_data_dir() -> PathBuf {
    let proj_dirs = ProjectDirs::from("com", "waitroom", "Waitroom")
        .expect("Could not determine project directories");
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir).expect("Could not create data directory");
    data_dir.to_path_buf()
}

/// Log to a file in the data dir: stdout carries the messaging protocol.
fn init_logging(data_dir: &Path) {
    let level = std::env::var("WAITROOM_LOG")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(LevelFilter::Info);

    if let Ok(file) = File::create(data_dir.join("waitroom.log")) {
        let _ = WriteLogger::init(level, Config::default(), file);
    }
}

fn main() {
    let data_dir = get_data_dir();
    init_logging(&data_dir);

    let db = Database::open(&data_dir.join("waitroom.db")).expect("Failed to open database");
    migrations::run(db.connection()).expect("Failed to run migrations");

    let settings = match Settings::load(db.connection()) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load settings, using defaults: {}", e);
            Settings::default()
        }
    };
    info!(
        "Waitroom host started (enabled={}, platform={})",
        settings.enabled, settings.platform
    );

    let (events_tx, events_rx) = mpsc::channel();
    let (tabs_tx, tabs_rx) = mpsc::channel();

    let reader = bridge::spawn_reader(io::stdin(), events_tx.clone(), tabs_tx);
    let runtime = ExtensionBridge::new(io::stdout(), tabs_rx);
    let mut monitor = GenerationMonitor::new(runtime, db, settings, events_tx);

    // All events — network, settings, timer ticks — arrive on one channel and
    // are handled on this thread only.
    while let Ok(event) = events_rx.recv() {
        if event == Event::Disconnected {
            break;
        }
        monitor.handle_event(event);
    }

    info!("Extension disconnected, shutting down");
    let _ = reader.join();
}
