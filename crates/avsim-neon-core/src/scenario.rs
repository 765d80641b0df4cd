use serde::{Deserialize, Serialize};

/// How a playback time is compared against the stored row times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeMatch {
    /// Plain `==` on the parsed value. Scenario times are expected to be
    /// pre-quantized, so `0.1 + 0.2` does not match `0.3`.
    #[default]
    Exact,
    Tolerance { epsilon: f64 },
}

impl TimeMatch {
    pub fn matches(&self, stored: f64, time: f64) -> bool {
        match *self {
            TimeMatch::Exact => stored == time,
            TimeMatch::Tolerance { epsilon } => (stored - time).abs() <= epsilon,
        }
    }
}

/// A scheduled scenario event as the table holds it. `time` keeps the text
/// the operator entered; it is parsed on every lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRow {
    pub time: String,
    pub mapi: String,
    pub message: String,
    #[serde(skip)]
    pub highlighted: bool,
}

impl ScenarioRow {
    pub fn new(time: impl Into<String>, mapi: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            mapi: mapi.into(),
            message: message.into(),
            highlighted: false,
        }
    }

    pub fn parsed_time(&self) -> Option<f64> {
        self.time.trim().parse::<f64>().ok()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScenarioTable {
    rows: Vec<ScenarioRow>,
}

impl ScenarioTable {
    pub fn new(rows: Vec<ScenarioRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ScenarioRow] {
        &self.rows
    }

    pub fn highlighted(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.highlighted)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn clear_highlight(&mut self) {
        for row in &mut self.rows {
            row.highlighted = false;
        }
    }

    /// Clears the previous highlight, then marks every row whose time
    /// matches. Returns the number of rows marked.
    pub fn highlight_at(&mut self, time: f64, policy: TimeMatch) -> usize {
        self.clear_highlight();
        let mut marked = 0;
        for (index, row) in self.rows.iter_mut().enumerate() {
            match row.parsed_time() {
                Some(stored) if policy.matches(stored, time) => {
                    row.highlighted = true;
                    marked += 1;
                }
                Some(_) => {}
                None => {
                    tracing::debug!(row = index, time = %row.time, "scenario row time is not a number");
                }
            }
        }
        marked
    }
}

/// Swaps single quotes for double quotes so python-style dict text reads as
/// JSON. Nested or escaped quotes are not handled.
pub fn normalize_quotes(message: &str) -> String {
    message.replace('\'', "\"")
}
