use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{info, warn};

use crate::browser::{BrowserRuntime, TabId};
use crate::constants::{GENERATION_URL_MARKER, SWITCH_DELAY};
use crate::db::Database;
use crate::distraction;
use crate::models::Settings;
use crate::platforms;

/// Lifecycle phase of a network request, as forwarded by the extension.
/// Completed and errored requests are handled identically: both mean the
/// generation attempt has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Started,
    Completed,
    Errored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkEvent {
    pub url: String,
    pub method: String,
    pub tab_id: TabId,
    pub phase: RequestPhase,
}

/// Partial settings update from a `storage.onChanged` notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsChange {
    pub enabled: Option<bool>,
    pub platform: Option<String>,
}

/// Everything the monitor reacts to, serialized through one channel and
/// consumed on one thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Network(NetworkEvent),
    SettingsChanged(SettingsChange),
    SwitchDelayElapsed,
    /// The extension closed the connection; the host loop ends on this.
    Disconnected,
}

pub struct MonitorConfig {
    pub switch_delay: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            switch_delay: SWITCH_DELAY,
        }
    }
}

/// One-shot deferred switch. The flag makes the timer cancellable, though the
/// monitor itself never cancels: every scheduled switch fires.
pub struct SwitchTimer {
    cancelled: Arc<AtomicBool>,
}

impl SwitchTimer {
    pub fn schedule(events: Sender<Event>, delay: Duration) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        thread::spawn(move || {
            thread::sleep(delay);
            if !flag.load(Ordering::SeqCst) {
                // The receiver is gone only when the host is shutting down
                let _ = events.send(Event::SwitchDelayElapsed);
            }
        });

        Self { cancelled }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

/// The generation state machine.
///
/// Idle until a request-start passes the enabled/method/marker filter; then
/// the originating tab is remembered and a switch to the distraction platform
/// is scheduled. The matching terminal event pauses the distraction tab and
/// returns focus to the remembered tab.
pub struct GenerationMonitor<R: BrowserRuntime> {
    runtime: R,
    db: Database,
    settings: Settings,
    original_tab_id: Option<TabId>,
    pending_switch: Option<SwitchTimer>,
    events: Sender<Event>,
    config: MonitorConfig,
}

impl<R: BrowserRuntime> GenerationMonitor<R> {
    pub fn new(runtime: R, db: Database, settings: Settings, events: Sender<Event>) -> Self {
        Self::with_config(runtime, db, settings, events, MonitorConfig::default())
    }

    pub fn with_config(
        runtime: R,
        db: Database,
        settings: Settings,
        events: Sender<Event>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            runtime,
            db,
            settings,
            original_tab_id: None,
            pending_switch: None,
            events,
            config,
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Network(ev) => match ev.phase {
                RequestPhase::Started => self.on_generation_start(&ev),
                RequestPhase::Completed | RequestPhase::Errored => self.on_generation_finished(&ev),
            },
            Event::SettingsChanged(change) => self.on_settings_changed(change),
            Event::SwitchDelayElapsed => self.on_switch_delay_elapsed(),
            // Shutdown is the host loop's concern
            Event::Disconnected => {}
        }
    }

    /// Cancel the most recently scheduled switch, if any. Exposed as a
    /// primitive; the normal event flow never calls it.
    pub fn cancel_pending_switch(&mut self) {
        if let Some(timer) = self.pending_switch.take() {
            timer.cancel();
        }
    }

    fn matches_generation(ev: &NetworkEvent) -> bool {
        ev.method == "POST" && ev.url.contains(GENERATION_URL_MARKER)
    }

    fn on_generation_start(&mut self, ev: &NetworkEvent) {
        if !self.settings.enabled {
            return;
        }
        if !Self::matches_generation(ev) {
            return;
        }

        info!("AI generation started in tab {}", ev.tab_id);
        self.set_origin_tab(ev.tab_id);
        self.pending_switch = Some(SwitchTimer::schedule(
            self.events.clone(),
            self.config.switch_delay,
        ));
    }

    /// The single place the origin tab is recorded. A start arriving while an
    /// earlier cycle is still in flight overwrites the previous return target.
    fn set_origin_tab(&mut self, tab_id: TabId) {
        self.original_tab_id = Some(tab_id);
    }

    fn on_switch_delay_elapsed(&mut self) {
        // Resolved at fire time, not schedule time: a platform change made
        // while the timer was pending wins.
        let config = platforms::resolve(&self.settings.platform);
        distraction::switch_to(&mut self.runtime, config);
    }

    fn on_generation_finished(&mut self, ev: &NetworkEvent) {
        if !Self::matches_generation(ev) {
            return;
        }

        info!("AI generation finished");
        let config = platforms::resolve(&self.settings.platform);
        distraction::pause_media(&mut self.runtime, config);
        self.return_to_origin();
    }

    fn return_to_origin(&mut self) {
        let Some(tab_id) = self.original_tab_id else {
            return;
        };
        match self.runtime.activate_tab(tab_id) {
            Ok(()) => info!("Returned to origin tab {}", tab_id),
            // Origin tab might be closed
            Err(e) => warn!("Could not return to origin tab {}: {}", tab_id, e),
        }
    }

    fn on_settings_changed(&mut self, change: SettingsChange) {
        if let Some(enabled) = change.enabled {
            self.settings.enabled = enabled;
            info!("Enabled changed: {}", enabled);
            if let Err(e) = Settings::set_enabled(self.db.connection(), enabled) {
                warn!("Failed to persist 'enabled': {}", e);
            }
        }
        if let Some(platform) = change.platform {
            info!("Platform changed: {}", platform);
            if let Err(e) = Settings::set_platform(self.db.connection(), &platform) {
                warn!("Failed to persist 'platform': {}", e);
            }
            self.settings.platform = platform;
        }
    }
}
