use serde::Serialize;

/// Trend direction for a summary card, relative to the preceding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn from_delta(delta: f64) -> Self {
        if delta > 0.0 {
            Trend::Up
        } else if delta < 0.0 {
            Trend::Down
        } else {
            Trend::Flat
        }
    }
}

/// A single KPI card: label, current value, and delta vs the preceding
/// window of equal length.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCard {
    pub label: String,
    pub value: f64,
    pub delta: f64,
    pub trend: Trend,
}

impl SummaryCard {
    pub fn new(label: impl Into<String>, value: f64, previous: f64) -> Self {
        let delta = value - previous;
        Self {
            label: label.into(),
            value,
            delta,
            trend: Trend::from_delta(delta),
        }
    }
}
