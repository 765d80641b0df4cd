pub mod bus;
pub mod connection;
pub mod control;
pub mod dispatcher;
pub mod error;
pub mod host_api;
pub mod outbound;
pub mod payload;
pub mod topics;

#[cfg(test)]
mod testing;

pub use bus::{BusEvent, ConnectionState, MessageBus};
pub use connection::{Connection, MqttBus};
pub use control::{ControlPanel, Dispatch};
pub use dispatcher::{Dispatcher, ExternalHandler, InternalHandler, Route};
pub use error::{MapiError, MapiResult};
pub use host_api::{HostApi, LogHost};
pub use payload::Payload;
