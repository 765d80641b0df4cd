use serde::Serialize;

/// One row of the co-app liveness table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeerRow {
    pub app: String,
    pub active: bool,
}

/// Row-backed peer liveness state. Rows are created up front; notifications
/// only ever flip the `active` flag of an existing row.
#[derive(Debug, Clone, Default)]
pub struct PeerTable {
    rows: Vec<PeerRow>,
}

impl PeerTable {
    /// Builds the table from peer ids in display order. Repeated ids are
    /// collapsed onto the first row.
    pub fn new<I, S>(peers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rows: Vec<PeerRow> = Vec::new();
        for app in peers {
            let app = app.into();
            if rows.iter().any(|row| row.app == app) {
                tracing::warn!(app = %app, "duplicate co-app row ignored");
                continue;
            }
            rows.push(PeerRow { app, active: false });
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[PeerRow] {
        &self.rows
    }

    pub fn get(&self, app: &str) -> Option<&PeerRow> {
        self.rows.iter().find(|row| row.app == app)
    }

    pub fn is_active(&self, app: &str) -> bool {
        self.get(app).map(|row| row.active).unwrap_or(false)
    }

    /// Marks the first row named `app`. Returns the row index, or `None`
    /// when no row matches (the notification is dropped).
    pub fn set_active(&mut self, app: &str, active: bool) -> Option<usize> {
        let index = self.rows.iter().position(|row| row.app == app)?;
        self.rows[index].active = active;
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_matching_row_changes() {
        let mut table = PeerTable::new(["robotA", "robotB"]);
        assert_eq!(table.set_active("robotA", true), Some(0));
        assert!(table.is_active("robotA"));
        assert!(!table.is_active("robotB"));
    }

    #[test]
    fn absent_peer_is_dropped() {
        let mut table = PeerTable::new(["robotA", "robotB"]);
        let before = table.rows().to_vec();
        assert_eq!(table.set_active("robotC", true), None);
        assert_eq!(table.rows(), before.as_slice());
    }

    #[test]
    fn duplicate_ids_keep_one_row() {
        let table = PeerTable::new(["robotA", "robotA", "robotB"]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[1].app, "robotB");
    }

    #[test]
    fn inactive_notification_clears_row() {
        let mut table = PeerTable::new(["robotA"]);
        table.set_active("robotA", true);
        table.set_active("robotA", false);
        assert!(!table.is_active("robotA"));
    }
}
