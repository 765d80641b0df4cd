use crate::error::{CoreError, CoreResult};
use crate::scenario::{ScenarioRow, TimeMatch};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_APP_ID: &str = "avsim-neon";
pub const DEFAULT_CLIENT_ID: &str = "flame-avsim-neon";
pub const DEFAULT_BROKER_HOST: &str = "127.0.0.1";
pub const DEFAULT_BROKER_PORT: u16 = 1883;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CoreConfig {
    pub broker: BrokerConfig,
    pub app: AppConfig,
    pub scenario: ScenarioConfig,
}

impl CoreConfig {
    /// Reads a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let data = std::fs::read_to_string(path)?;
        let cfg: CoreConfig = serde_json::from_str(&data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.broker.host.trim().is_empty() {
            return Err(CoreError::Config("broker.host must not be empty".to_string()));
        }
        if self.broker.client_id.is_empty() {
            return Err(CoreError::Config("broker.client_id must not be empty".to_string()));
        }
        if self.broker.keepalive_secs < 5 {
            return Err(CoreError::Config("broker.keepalive_secs must be at least 5".to_string()));
        }
        if self.broker.request_capacity == 0 {
            return Err(CoreError::Config("broker.request_capacity must be > 0".to_string()));
        }
        if self.app.app_id.is_empty() {
            return Err(CoreError::Config("app.app_id must not be empty".to_string()));
        }
        if let TimeMatch::Tolerance { epsilon } = self.scenario.time_match {
            if !(epsilon.is_finite() && epsilon >= 0.0) {
                return Err(CoreError::Config(
                    "scenario.time_match.epsilon must be a finite, non-negative number".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    pub keepalive_secs: u64,
    pub client_id: String,
    pub clean_session: bool,
    /// Capacity of the outgoing request queue handed to the MQTT client.
    pub request_capacity: usize,
    /// Pause before the client retries after a transport error.
    pub retry_delay_ms: u64,
}

impl BrokerConfig {
    pub fn keepalive(&self) -> Duration {
        Duration::from_secs(self.keepalive_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BROKER_HOST.to_string(),
            port: DEFAULT_BROKER_PORT,
            keepalive_secs: 60,
            client_id: DEFAULT_CLIENT_ID.to_string(),
            clean_session: true,
            request_capacity: 64,
            retry_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app_id: String,
    /// Co-app rows shown in the liveness table, in display order.
    pub peers: Vec<String>,
    pub probe_interval_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            peers: Vec::new(),
            probe_interval_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    pub time_match: TimeMatch,
    /// Scheduled events shown in the scenario table, in display order.
    pub rows: Vec<ScenarioRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_broker_contract() {
        let cfg = CoreConfig::default();
        assert_eq!(cfg.broker.host, "127.0.0.1");
        assert_eq!(cfg.broker.port, 1883);
        assert_eq!(cfg.broker.keepalive(), Duration::from_secs(60));
        assert_eq!(cfg.broker.client_id, "flame-avsim-neon");
        assert!(cfg.broker.clean_session);
        assert_eq!(cfg.app.app_id, "avsim-neon");
        assert_eq!(cfg.scenario.time_match, TimeMatch::Exact);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: CoreConfig = serde_json::from_str(
            r#"{"broker": {"host": "10.0.0.7"}, "app": {"peers": ["robotA", "robotB"]}}"#,
        )
        .unwrap();
        assert_eq!(cfg.broker.host, "10.0.0.7");
        assert_eq!(cfg.broker.port, 1883);
        assert_eq!(cfg.app.app_id, "avsim-neon");
        assert_eq!(cfg.app.peers, vec!["robotA", "robotB"]);
    }

    #[test]
    fn tolerance_policy_from_json() {
        let cfg: CoreConfig = serde_json::from_str(
            r#"{"scenario": {"time_match": {"tolerance": {"epsilon": 0.001}}}}"#,
        )
        .unwrap();
        assert_eq!(cfg.scenario.time_match, TimeMatch::Tolerance { epsilon: 0.001 });
    }

    #[test]
    fn scenario_rows_from_json() {
        let cfg: CoreConfig = serde_json::from_str(
            r#"{"scenario": {"rows": [
                {"time": "1.0", "mapi": "flame/avsim/mapi_a", "message": "{'app': 'avsim-neon'}"},
                {"time": "2.5", "mapi": "flame/avsim/mapi_b", "message": "{}"}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(cfg.scenario.time_match, TimeMatch::Exact);
        assert_eq!(cfg.scenario.rows.len(), 2);
        assert_eq!(cfg.scenario.rows[1].parsed_time(), Some(2.5));
        assert!(!cfg.scenario.rows[0].highlighted);
    }

    #[test]
    fn rejects_negative_epsilon() {
        let mut cfg = CoreConfig::default();
        cfg.scenario.time_match = TimeMatch::Tolerance { epsilon: -1.0 };
        assert!(matches!(cfg.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn rejects_empty_host() {
        let mut cfg = CoreConfig::default();
        cfg.broker.host = "  ".to_string();
        assert!(cfg.validate().is_err());
    }
}
