use avsim_neon_core::CoreResult;

/// Events the connection's background loop hands to the foreground loop.
#[derive(Debug, Clone, PartialEq)]
pub enum BusEvent {
    Connected { code: String },
    Disconnected { reason: String },
    Message { topic: String, payload: Vec<u8> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Fire-and-forget access to the broker. Every call is at-most-once and
/// must return without waiting on the network.
pub trait MessageBus: Send + Sync {
    fn is_connected(&self) -> bool;
    fn publish(&self, topic: &str, payload: Vec<u8>) -> CoreResult<()>;
    fn subscribe(&self, topic: &str) -> CoreResult<()>;
}
