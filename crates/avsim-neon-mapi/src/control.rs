use crate::bus::{BusEvent, ConnectionState, MessageBus};
use crate::dispatcher::{Dispatcher, ExternalHandler, InternalHandler, Route};
use crate::error::{MapiError, MapiResult};
use crate::host_api::HostApi;
use crate::outbound;
use crate::payload::Payload;
use avsim_neon_core::{
    normalize_quotes, CoreConfig, CoreResult, PeerTable, ScenarioTable, TimeMatch,
};
use serde_json::Value;

/// What happened to one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Invoked(ExternalHandler),
    SelfOrigin,
    Dropped,
}

/// Foreground state of the panel. Every method must run on the single
/// thread that owns the row tables; bus events reach it through a queue.
pub struct ControlPanel<B: MessageBus, H: HostApi> {
    dispatcher: Dispatcher,
    bus: B,
    host: H,
    peers: PeerTable,
    scenario: ScenarioTable,
    time_match: TimeMatch,
    state: ConnectionState,
}

impl<B: MessageBus, H: HostApi> ControlPanel<B, H> {
    pub fn new(cfg: &CoreConfig, bus: B, host: H) -> Self {
        Self {
            dispatcher: Dispatcher::new(cfg.app.app_id.clone()),
            bus,
            host,
            peers: PeerTable::new(cfg.app.peers.iter().cloned()),
            scenario: ScenarioTable::new(cfg.scenario.rows.clone()),
            time_match: cfg.scenario.time_match,
            state: ConnectionState::Connecting,
        }
    }

    pub fn app_id(&self) -> &str {
        self.dispatcher.app_id()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn peers(&self) -> &PeerTable {
        &self.peers
    }

    pub fn scenario(&self) -> &ScenarioTable {
        &self.scenario
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn handle_event(&mut self, event: BusEvent) -> Option<Dispatch> {
        match event {
            BusEvent::Connected { code } => {
                self.state = ConnectionState::Connected;
                tracing::info!(code = %code, "connected to broker");
                self.host.show_status(&format!("Connected to Broker({code})"));
                None
            }
            BusEvent::Disconnected { reason } => {
                self.state = ConnectionState::Disconnected;
                tracing::info!(reason = %reason, "disconnected from broker");
                self.host.show_status(&format!("Disconnected to Broker({reason})"));
                None
            }
            BusEvent::Message { topic, payload } => Some(self.on_message(&topic, &payload)),
        }
    }

    /// Runs one inbound message through the dispatcher. Failures are logged
    /// and the message is dropped; nothing propagates to the caller.
    pub fn on_message(&mut self, topic: &str, raw: &[u8]) -> Dispatch {
        let (handler, payload) = match self.dispatcher.route(topic, raw) {
            Ok(Route::External(handler, payload)) => (handler, payload),
            Ok(Route::SelfOrigin) => return Dispatch::SelfOrigin,
            Err(e) => {
                tracing::warn!(topic, error = %e, "MAPI message dropped");
                return Dispatch::Dropped;
            }
        };
        if let Err(e) = self.invoke(handler, &payload) {
            tracing::debug!(topic, app = payload.app(), error = %e, "MAPI handler declined");
        }
        Dispatch::Invoked(handler)
    }

    fn invoke(&mut self, handler: ExternalHandler, payload: &Payload) -> MapiResult<()> {
        match handler {
            ExternalHandler::NotifyActive => self.notify_active(payload),
            ExternalHandler::NotifyStatus => Err(MapiError::NotImplemented("notify_status")),
            ExternalHandler::RecordStart => Err(MapiError::NotImplemented("record_start")),
            ExternalHandler::RecordStop => Err(MapiError::NotImplemented("record_stop")),
        }
    }

    /// `{app, active}`: flips the first co-app row named `app`. A payload
    /// without `active` changes nothing. `true` and the number 1 mean active.
    fn notify_active(&mut self, payload: &Payload) -> MapiResult<()> {
        let Some(active) = payload.get("active") else {
            return Ok(());
        };
        let active = match active {
            Value::Bool(flag) => *flag,
            Value::Number(n) => n.as_f64() == Some(1.0),
            _ => false,
        };
        if let Some(row) = self.peers.set_active(payload.app(), active) {
            self.host.peer_changed(row, &self.peers.rows()[row]);
        }
        Ok(())
    }

    /// Runs a handler from the internal namespace.
    pub fn trigger_internal(&mut self, topic: &str) -> MapiResult<()> {
        match self.dispatcher.internal(topic)? {
            InternalHandler::RequestActive => {
                self.request_active()?;
            }
        }
        Ok(())
    }

    pub fn request_active(&self) -> CoreResult<bool> {
        outbound::request_active(&self.bus, self.dispatcher.app_id())
    }

    /// Broadcasts one playback step and moves the highlight to the rows
    /// scheduled at `time`. Returns how many rows are highlighted.
    pub fn do_process(&mut self, time: f64, mapi: &str, message: &str) -> usize {
        let message = normalize_quotes(message);
        if let Err(e) = self.bus.publish(mapi, message.into_bytes()) {
            tracing::warn!(mapi, error = %e, "scenario step not published");
        }
        let marked = self.scenario.highlight_at(time, self.time_match);
        self.host.highlight_changed(&self.scenario.highlighted());
        marked
    }

    pub fn end_process(&self) {
        self.host.end_scenario();
    }
}
