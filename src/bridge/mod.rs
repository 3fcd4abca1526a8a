pub mod codec;

use std::io::Read;
use std::io::Write;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::browser::{BrowserRuntime, Tab, TabId};
use crate::error::BridgeError;
use crate::monitor::{Event, NetworkEvent, RequestPhase, SettingsChange};

/// Messages the extension shim sends to the host.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum IncomingMessage {
    #[serde(rename = "request_started")]
    RequestStarted {
        url: String,
        method: String,
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
    #[serde(rename = "request_completed")]
    RequestCompleted {
        url: String,
        method: String,
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
    #[serde(rename = "request_errored")]
    RequestErrored {
        url: String,
        method: String,
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
    #[serde(rename = "settings_changed")]
    SettingsChanged {
        enabled: Option<bool>,
        platform: Option<String>,
    },
    /// Reply to an outgoing `query_tabs`.
    #[serde(rename = "tabs")]
    Tabs { tabs: Vec<Tab> },
}

/// Commands the host sends to the extension shim.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum OutgoingMessage {
    #[serde(rename = "query_tabs")]
    QueryTabs,
    #[serde(rename = "activate_tab")]
    ActivateTab {
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
    #[serde(rename = "create_tab")]
    CreateTab { url: String, active: bool },
    #[serde(rename = "pause_media")]
    PauseMedia {
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
}

/// Browser runtime backed by the extension over native messaging.
///
/// Tab queries are request/reply: the reader thread routes `tabs` frames into
/// `tab_replies` while everything else goes to the monitor's event channel.
/// The monitor issues at most one query at a time, so replies cannot cross.
pub struct ExtensionBridge<W: Write> {
    writer: W,
    tab_replies: Receiver<Vec<Tab>>,
}

impl<W: Write> ExtensionBridge<W> {
    pub fn new(writer: W, tab_replies: Receiver<Vec<Tab>>) -> Self {
        Self { writer, tab_replies }
    }
}

impl<W: Write + Send> BrowserRuntime for ExtensionBridge<W> {
    fn query_tabs(&mut self) -> Result<Vec<Tab>, BridgeError> {
        codec::write_message(&mut self.writer, &OutgoingMessage::QueryTabs)?;
        self.tab_replies
            .recv()
            .map_err(|_| BridgeError::Disconnected)
    }

    fn activate_tab(&mut self, id: TabId) -> Result<(), BridgeError> {
        codec::write_message(&mut self.writer, &OutgoingMessage::ActivateTab { tab_id: id })
    }

    fn create_tab(&mut self, url: &str, active: bool) -> Result<(), BridgeError> {
        codec::write_message(
            &mut self.writer,
            &OutgoingMessage::CreateTab {
                url: url.to_string(),
                active,
            },
        )
    }

    fn pause_media(&mut self, id: TabId) -> Result<(), BridgeError> {
        codec::write_message(&mut self.writer, &OutgoingMessage::PauseMedia { tab_id: id })
    }
}

enum Routed {
    ToMonitor(Event),
    TabReply(Vec<Tab>),
}

fn route(message: IncomingMessage) -> Routed {
    let network = |url, method, tab_id, phase| {
        Routed::ToMonitor(Event::Network(NetworkEvent {
            url,
            method,
            tab_id,
            phase,
        }))
    };

    match message {
        IncomingMessage::RequestStarted { url, method, tab_id } => {
            network(url, method, tab_id, RequestPhase::Started)
        }
        IncomingMessage::RequestCompleted { url, method, tab_id } => {
            network(url, method, tab_id, RequestPhase::Completed)
        }
        IncomingMessage::RequestErrored { url, method, tab_id } => {
            network(url, method, tab_id, RequestPhase::Errored)
        }
        IncomingMessage::SettingsChanged { enabled, platform } => {
            Routed::ToMonitor(Event::SettingsChanged(SettingsChange { enabled, platform }))
        }
        IncomingMessage::Tabs { tabs } => Routed::TabReply(tabs),
    }
}

/// Read frames from the extension until it disconnects, routing events to the
/// monitor and tab replies to the bridge.
pub fn spawn_reader<R: Read + Send + 'static>(
    mut reader: R,
    events: Sender<Event>,
    tab_replies: Sender<Vec<Tab>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        loop {
            let message = match codec::read_message::<_, IncomingMessage>(&mut reader) {
                Ok(message) => message,
                Err(BridgeError::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    // Browser closed the connection
                    break;
                }
                Err(e) => {
                    // The stream is framed; a bad frame leaves us desynchronized
                    warn!("Stopping reader after invalid frame: {}", e);
                    break;
                }
            };

            let delivered = match route(message) {
                Routed::ToMonitor(event) => events.send(event).is_ok(),
                Routed::TabReply(tabs) => tab_replies.send(tabs).is_ok(),
            };
            if !delivered {
                break;
            }
        }
        let _ = events.send(Event::Disconnected);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;
    use std::sync::mpsc;
    use std::time::Duration;

    fn frame(value: serde_json::Value) -> Vec<u8> {
        let mut buf = Vec::new();
        codec::write_message(&mut buf, &value).unwrap();
        buf
    }

    #[test]
    fn test_reader_routes_request_events() {
        let input = frame(json!({
            "type": "request_started",
            "url": "https://clients6.google.com/GenerateContent",
            "method": "POST",
            "tabId": 7,
        }));

        let (events_tx, events_rx) = mpsc::channel();
        let (tabs_tx, _tabs_rx) = mpsc::channel();
        let handle = spawn_reader(Cursor::new(input), events_tx, tabs_tx);

        let event = events_rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(
            event,
            Event::Network(NetworkEvent {
                url: "https://clients6.google.com/GenerateContent".to_string(),
                method: "POST".to_string(),
                tab_id: 7,
                phase: RequestPhase::Started,
            })
        );

        // EOF after the single frame ends the reader
        handle.join().unwrap();
    }

    #[test]
    fn test_reader_routes_settings_changes() {
        let input = frame(json!({
            "type": "settings_changed",
            "platform": "tiktok",
        }));

        let (events_tx, events_rx) = mpsc::channel();
        let (tabs_tx, _tabs_rx) = mpsc::channel();
        spawn_reader(Cursor::new(input), events_tx, tabs_tx);

        let event = events_rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(
            event,
            Event::SettingsChanged(SettingsChange {
                enabled: None,
                platform: Some("tiktok".to_string()),
            })
        );
    }

    #[test]
    fn test_reader_routes_tab_replies_separately() {
        let mut input = frame(json!({
            "type": "tabs",
            "tabs": [{"id": 3, "url": "https://www.youtube.com/shorts"}],
        }));
        input.extend(frame(json!({
            "type": "request_errored",
            "url": "https://x.google.com/GenerateContent",
            "method": "POST",
            "tabId": 1,
        })));

        let (events_tx, events_rx) = mpsc::channel();
        let (tabs_tx, tabs_rx) = mpsc::channel();
        spawn_reader(Cursor::new(input), events_tx, tabs_tx);

        let tabs = tabs_rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs[0].id, 3);

        let event = events_rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(matches!(
            event,
            Event::Network(NetworkEvent {
                phase: RequestPhase::Errored,
                ..
            })
        ));
    }

    #[test]
    fn test_bridge_query_tabs_round_trip() {
        let (tabs_tx, tabs_rx) = mpsc::channel();
        tabs_tx
            .send(vec![Tab {
                id: 9,
                url: "https://www.tiktok.com/".to_string(),
            }])
            .unwrap();

        let mut bridge = ExtensionBridge::new(Vec::new(), tabs_rx);
        let tabs = bridge.query_tabs().unwrap();

        assert_eq!(tabs[0].id, 9);
        let sent: serde_json::Value =
            codec::read_message(&mut Cursor::new(bridge.writer)).unwrap();
        assert_eq!(sent, json!({"type": "query_tabs"}));
    }

    #[test]
    fn test_bridge_query_without_reply_is_disconnected() {
        let (tabs_tx, tabs_rx) = mpsc::channel::<Vec<Tab>>();
        drop(tabs_tx);

        let mut bridge = ExtensionBridge::new(Vec::new(), tabs_rx);
        assert!(matches!(
            bridge.query_tabs().unwrap_err(),
            BridgeError::Disconnected
        ));
    }

    #[test]
    fn test_outgoing_commands_use_chrome_field_names() {
        let (_tabs_tx, tabs_rx) = mpsc::channel();
        let mut bridge = ExtensionBridge::new(Vec::new(), tabs_rx);

        bridge.activate_tab(7).unwrap();
        bridge.create_tab("https://www.youtube.com/shorts", true).unwrap();
        bridge.pause_media(3).unwrap();

        let mut cursor = Cursor::new(bridge.writer);
        let first: serde_json::Value = codec::read_message(&mut cursor).unwrap();
        let second: serde_json::Value = codec::read_message(&mut cursor).unwrap();
        let third: serde_json::Value = codec::read_message(&mut cursor).unwrap();

        assert_eq!(first, json!({"type": "activate_tab", "tabId": 7}));
        assert_eq!(
            second,
            json!({"type": "create_tab", "url": "https://www.youtube.com/shorts", "active": true})
        );
        assert_eq!(third, json!({"type": "pause_media", "tabId": 3}));
    }
}
