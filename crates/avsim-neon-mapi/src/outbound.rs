use crate::bus::MessageBus;
use crate::topics;
use avsim_neon_core::CoreResult;
use serde_json::json;

/// Asks every peer to announce its liveness. Publishes only while
/// connected; returns whether a publish was issued. Nothing is queued
/// while disconnected.
pub fn request_active(bus: &dyn MessageBus, app_id: &str) -> CoreResult<bool> {
    if !bus.is_connected() {
        tracing::debug!("not connected, liveness probe skipped");
        return Ok(false);
    }
    let msg = json!({ "app": app_id });
    bus.publish(topics::REQUEST_ACTIVE, serde_json::to_vec(&msg)?)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingBus;
    use serde_json::Value;

    #[test]
    fn disconnected_probe_publishes_nothing() {
        let bus = RecordingBus::default();
        assert!(!request_active(&bus, "avsim-neon").unwrap());
        assert!(bus.published().is_empty());
    }

    #[test]
    fn connected_probe_publishes_once() {
        let bus = RecordingBus::connected();
        assert!(request_active(&bus, "avsim-neon").unwrap());
        let published = bus.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, topics::REQUEST_ACTIVE);
        let body: Value = serde_json::from_slice(&published[0].1).unwrap();
        assert_eq!(body, json!({ "app": "avsim-neon" }));
    }

    #[test]
    fn queue_errors_propagate() {
        let bus = RecordingBus::connected();
        bus.fail_requests(true);
        assert!(request_active(&bus, "avsim-neon").is_err());
    }
}
