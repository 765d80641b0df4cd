use crate::error::{MapiError, MapiResult};
use crate::payload::Payload;
use crate::topics;
use std::collections::BTreeMap;

/// Handlers peers may reach through the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalHandler {
    NotifyActive,
    NotifyStatus,
    RecordStart,
    RecordStop,
}

/// Handlers reachable only from local triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalHandler {
    RequestActive,
}

/// Where an inbound message ends up after validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Our own broadcast echoed back by the broker.
    SelfOrigin,
    External(ExternalHandler, Payload),
}

/// Topic to handler lookup. Both tables are fixed at construction.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    app_id: String,
    external: BTreeMap<&'static str, ExternalHandler>,
    internal: BTreeMap<&'static str, InternalHandler>,
}

impl Dispatcher {
    pub fn new(app_id: impl Into<String>) -> Self {
        let external = BTreeMap::from([
            (topics::NOTIFY_ACTIVE, ExternalHandler::NotifyActive),
            (topics::NOTIFY_STATUS, ExternalHandler::NotifyStatus),
            (topics::RECORD_START, ExternalHandler::RecordStart),
            (topics::RECORD_STOP, ExternalHandler::RecordStop),
        ]);
        let internal = BTreeMap::from([(topics::REQUEST_ACTIVE, InternalHandler::RequestActive)]);
        Self {
            app_id: app_id.into(),
            external,
            internal,
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Topics to subscribe on every connect.
    pub fn external_topics(&self) -> Vec<String> {
        self.external.keys().map(|topic| topic.to_string()).collect()
    }

    /// Validates one inbound message and picks its handler.
    ///
    /// Cheapest rejection first: decode, object shape and `app`, then the
    /// self-origin check, then the topic lookup.
    pub fn route(&self, topic: &str, raw: &[u8]) -> MapiResult<Route> {
        let payload = Payload::decode(raw)?;
        if payload.app() == self.app_id {
            return Ok(Route::SelfOrigin);
        }
        let handler = self
            .external
            .get(topic)
            .copied()
            .ok_or_else(|| MapiError::UnknownTopic(topic.to_string()))?;
        Ok(Route::External(handler, payload))
    }

    /// Looks up a locally triggered handler. Never consulted for bus traffic.
    pub fn internal(&self, topic: &str) -> MapiResult<InternalHandler> {
        self.internal
            .get(topic)
            .copied()
            .ok_or_else(|| MapiError::UnknownTopic(topic.to_string()))
    }
}
