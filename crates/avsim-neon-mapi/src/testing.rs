//! In-memory doubles for the bus and the host.

use crate::bus::MessageBus;
use crate::host_api::HostApi;
use avsim_neon_core::{CoreError, CoreResult, PeerRow};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct RecordingBus {
    connected: Arc<AtomicBool>,
    fail: Arc<AtomicBool>,
    published: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    subscribed: Arc<Mutex<Vec<String>>>,
}

impl RecordingBus {
    pub fn connected() -> Self {
        let bus = Self::default();
        bus.set_connected(true);
        bus
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn fail_requests(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn published(&self) -> Vec<(String, Vec<u8>)> {
        self.published.lock().unwrap().clone()
    }

    pub fn subscriptions(&self) -> Vec<String> {
        self.subscribed.lock().unwrap().clone()
    }
}

impl MessageBus for RecordingBus {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn publish(&self, topic: &str, payload: Vec<u8>) -> CoreResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::Bus("request queue full".to_string()));
        }
        self.published.lock().unwrap().push((topic.to_string(), payload));
        Ok(())
    }

    fn subscribe(&self, topic: &str) -> CoreResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::Bus("request queue full".to_string()));
        }
        self.subscribed.lock().unwrap().push(topic.to_string());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingHost {
    pub statuses: Arc<Mutex<Vec<String>>>,
    pub scenario_stops: Arc<Mutex<usize>>,
    pub peer_updates: Arc<Mutex<Vec<(usize, PeerRow)>>>,
    pub highlights: Arc<Mutex<Vec<Vec<usize>>>>,
}

impl RecordingHost {
    pub fn last_status(&self) -> Option<String> {
        self.statuses.lock().unwrap().last().cloned()
    }
}

impl HostApi for RecordingHost {
    fn show_status(&self, text: &str) {
        self.statuses.lock().unwrap().push(text.to_string());
    }

    fn end_scenario(&self) {
        *self.scenario_stops.lock().unwrap() += 1;
    }

    fn peer_changed(&self, row: usize, peer: &PeerRow) {
        self.peer_updates.lock().unwrap().push((row, peer.clone()));
    }

    fn highlight_changed(&self, rows: &[usize]) {
        self.highlights.lock().unwrap().push(rows.to_vec());
    }
}
