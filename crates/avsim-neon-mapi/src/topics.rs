//! MAPI topic catalogue. Topics are case-sensitive and fixed at build time.

pub const REQUEST_ACTIVE: &str = "flame/avsim/mapi_request_active";
pub const NOTIFY_ACTIVE: &str = "flame/avsim/mapi_notify_active";
// Spelling matches the topic peers publish on.
pub const NOTIFY_STATUS: &str = "flame/avsim/mapi_nofity_status";
pub const RECORD_START: &str = "flame/avsim/neon/mapi_record_start";
pub const RECORD_STOP: &str = "flame/avsim/neon/mapi_record_stop";

/// Topics this application subscribes to and that peers may invoke.
pub const EXTERNAL: [&str; 4] = [NOTIFY_ACTIVE, NOTIFY_STATUS, RECORD_START, RECORD_STOP];

/// Topics only local triggers may invoke.
pub const INTERNAL: [&str; 1] = [REQUEST_ACTIVE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_are_disjoint() {
        for topic in INTERNAL {
            assert!(!EXTERNAL.contains(&topic), "{topic} is in both namespaces");
        }
    }
}
