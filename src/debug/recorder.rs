//! # Navigation Recorder
//!
//! Bounded, newest-first record of navigation events.
//!
//! The recorder is an explicit handle: the app creates one at startup and
//! passes it to the registry (and to anything else that wants to log).
//! Clones share the same log.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use chrono::{DateTime, Local};
use log::trace;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_LOG_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Navigation,
    Presentation,
    Dismissal,
    Registration,
    Error,
    Warning,
    Info,
}

impl LogKind {
    pub const ALL: [LogKind; 7] = [
        LogKind::Navigation,
        LogKind::Presentation,
        LogKind::Dismissal,
        LogKind::Registration,
        LogKind::Error,
        LogKind::Warning,
        LogKind::Info,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LogKind::Navigation => "Navigation",
            LogKind::Presentation => "Presentation",
            LogKind::Dismissal => "Dismissal",
            LogKind::Registration => "Registration",
            LogKind::Error => "Error",
            LogKind::Warning => "Warning",
            LogKind::Info => "Info",
        }
    }

    /// Single-glyph marker for text dashboards.
    pub fn icon(&self) -> &'static str {
        match self {
            LogKind::Navigation => "→",
            LogKind::Presentation => "▣",
            LogKind::Dismissal => "✕",
            LogKind::Registration => "+",
            LogKind::Error => "‼",
            LogKind::Warning => "!",
            LogKind::Info => "i",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavigationLogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Local>,
    pub kind: LogKind,
    pub message: String,
    pub router_id: String,
}

impl NavigationLogEntry {
    /// `HH:MM:SS.mmm`, local time.
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format("%H:%M:%S%.3f").to_string()
    }
}

/// Ring buffer holding the newest `capacity` entries, newest at index 0.
#[derive(Debug)]
pub struct NavigationLog {
    entries: VecDeque<NavigationLogEntry>,
    capacity: usize,
}

impl NavigationLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
            capacity,
        }
    }

    pub fn push(&mut self, entry: NavigationLogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &NavigationLogEntry> {
        self.entries.iter()
    }
}

impl Default for NavigationLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

struct RecorderState {
    log: NavigationLog,
    enabled: bool,
}

/// Shared handle to a [`NavigationLog`]. Disabled recorders drop events.
#[derive(Clone)]
pub struct DebugRecorder {
    state: Rc<RefCell<RecorderState>>,
}

impl DebugRecorder {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Rc::new(RefCell::new(RecorderState {
                log: NavigationLog::new(capacity),
                enabled: true,
            })),
        }
    }

    pub fn enable(&self) {
        self.state.borrow_mut().enabled = true;
    }

    pub fn disable(&self) {
        self.state.borrow_mut().enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    pub fn record(&self, kind: LogKind, message: impl Into<String>, router_id: &str) {
        let mut state = self.state.borrow_mut();
        if !state.enabled {
            return;
        }
        let entry = NavigationLogEntry {
            id: Uuid::new_v4(),
            timestamp: Local::now(),
            kind,
            message: message.into(),
            router_id: router_id.to_string(),
        };
        trace!("[{}] {} {}", entry.kind.label(), entry.router_id, entry.message);
        state.log.push(entry);
    }

    pub fn clear(&self) {
        self.state.borrow_mut().log.clear();
    }

    pub fn len(&self) -> usize {
        self.state.borrow().log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().log.is_empty()
    }

    /// All entries, newest first.
    pub fn entries(&self) -> Vec<NavigationLogEntry> {
        self.state.borrow().log.iter().cloned().collect()
    }

    /// Entries for one router, newest first.
    pub fn entries_for(&self, router_id: &str) -> Vec<NavigationLogEntry> {
        self.state
            .borrow()
            .log
            .iter()
            .filter(|entry| entry.router_id == router_id)
            .cloned()
            .collect()
    }

    pub fn entries_of_kind(&self, kind: LogKind) -> Vec<NavigationLogEntry> {
        self.state
            .borrow()
            .log
            .iter()
            .filter(|entry| entry.kind == kind)
            .cloned()
            .collect()
    }

    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries())
    }
}

impl Default for DebugRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_buffer_evicts_oldest() {
        let recorder = DebugRecorder::default();
        for n in 0..1001 {
            recorder.record(LogKind::Info, format!("entry {n}"), "r");
        }
        let entries = recorder.entries();
        assert_eq!(entries.len(), 1000);
        assert_eq!(entries[0].message, "entry 1000");
        assert_eq!(entries[999].message, "entry 1");
        assert!(!entries.iter().any(|e| e.message == "entry 0"));
    }

    #[test]
    fn test_clear_empties_log() {
        let recorder = DebugRecorder::new(10);
        recorder.record(LogKind::Navigation, "a", "r");
        recorder.clear();
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_disabled_recorder_drops_events() {
        let recorder = DebugRecorder::new(10);
        recorder.disable();
        recorder.record(LogKind::Error, "dropped", "r");
        assert!(recorder.is_empty());
        recorder.enable();
        recorder.record(LogKind::Error, "kept", "r");
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn test_clones_share_log() {
        let recorder = DebugRecorder::new(10);
        let handle = recorder.clone();
        handle.record(LogKind::Registration, "registered", "a");
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn test_filters() {
        let recorder = DebugRecorder::new(10);
        recorder.record(LogKind::Navigation, "one", "a");
        recorder.record(LogKind::Dismissal, "two", "b");
        recorder.record(LogKind::Navigation, "three", "b");
        assert_eq!(recorder.entries_for("b").len(), 2);
        assert_eq!(recorder.entries_for("b")[0].message, "three");
        assert_eq!(recorder.entries_of_kind(LogKind::Navigation).len(), 2);
    }

    #[test]
    fn test_formatted_timestamp_shape() {
        let recorder = DebugRecorder::new(10);
        recorder.record(LogKind::Info, "x", "r");
        let stamp = recorder.entries()[0].formatted_timestamp();
        // HH:MM:SS.mmm
        assert_eq!(stamp.len(), 12);
        assert_eq!(&stamp[2..3], ":");
        assert_eq!(&stamp[8..9], ".");
    }

    #[test]
    fn test_export_json_uses_lowercase_kinds() {
        let recorder = DebugRecorder::new(10);
        recorder.record(LogKind::Presentation, "sheet", "home");
        let json = recorder.export_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["kind"], "presentation");
        assert_eq!(value[0]["router_id"], "home");
    }

    #[test]
    fn test_labels_cover_all_kinds() {
        let labels: Vec<&str> = LogKind::ALL.iter().map(LogKind::label).collect();
        assert_eq!(labels.len(), 7);
        assert!(labels.contains(&"Registration"));

        let mut icons: Vec<&str> = LogKind::ALL.iter().map(LogKind::icon).collect();
        icons.sort();
        icons.dedup();
        assert_eq!(icons.len(), 7);
    }
}
