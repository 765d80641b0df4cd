use avsim_neon_core::PeerRow;

/// The operator-facing side of the panel: status line, row repaint and the
/// scenario engine. Implemented by whatever front end drives the panel.
pub trait HostApi: Send {
    fn show_status(&self, text: &str);

    /// Stops the running scenario.
    fn end_scenario(&self);

    fn peer_changed(&self, _row: usize, _peer: &PeerRow) {}

    fn highlight_changed(&self, _rows: &[usize]) {}
}

/// Host that only writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHost;

impl HostApi for LogHost {
    fn show_status(&self, text: &str) {
        tracing::info!(status = text, "status");
    }

    fn end_scenario(&self) {
        tracing::info!("scenario stop requested");
    }

    fn peer_changed(&self, row: usize, peer: &PeerRow) {
        tracing::info!(row, app = %peer.app, active = peer.active, "co-app liveness");
    }

    fn highlight_changed(&self, rows: &[usize]) {
        tracing::debug!(?rows, "scenario highlight");
    }
}
