use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Selectable reporting window for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimeRange {
    #[serde(rename = "7d")]
    Last7Days,
    #[default]
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
}

impl TimeRange {
    pub fn days(&self) -> i64 {
        match self {
            TimeRange::Last7Days => 7,
            TimeRange::Last30Days => 30,
            TimeRange::Last90Days => 90,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Last7Days => "Last 7 days",
            TimeRange::Last30Days => "Last 30 days",
            TimeRange::Last90Days => "Last 90 days",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Last7Days => "7d",
            TimeRange::Last30Days => "30d",
            TimeRange::Last90Days => "90d",
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(TimeRange::Last7Days),
            "30d" => Ok(TimeRange::Last30Days),
            "90d" => Ok(TimeRange::Last90Days),
            other => Err(format!("unknown time range '{other}'")),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        for s in ["7d", "30d", "90d"] {
            assert_eq!(s.parse::<TimeRange>().unwrap().to_string(), s);
        }
        assert!("14d".parse::<TimeRange>().is_err());
    }

    #[test]
    fn serde_uses_short_form() {
        let v = serde_json::to_value(TimeRange::Last7Days).unwrap();
        assert_eq!(v, serde_json::json!("7d"));
        let r: TimeRange = serde_json::from_value(serde_json::json!("90d")).unwrap();
        assert_eq!(r, TimeRange::Last90Days);
    }
}
