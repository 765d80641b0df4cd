pub mod config;
pub mod error;
pub mod logging;
pub mod peers;
pub mod scenario;

pub use config::{AppConfig, BrokerConfig, CoreConfig, ScenarioConfig};
pub use error::{CoreError, CoreResult};
pub use peers::{PeerRow, PeerTable};
pub use scenario::{normalize_quotes, ScenarioRow, ScenarioTable, TimeMatch};
