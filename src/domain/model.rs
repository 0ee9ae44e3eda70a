use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// Size of the early-bird cohort.
pub const EARLY_BIRD_CAPACITY: u64 = 500;

/// Point-in-time view of the early-bird counter.
///
/// Built fresh for every request and never mutated afterwards. `timestamp` is the
/// moment the snapshot was computed, not the moment the underlying count last changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterSnapshot {
    current: u64,
    total: u64,
    remaining: u64,
    progress_percentage: f64,
    is_early_bird_available: bool,
    #[serde(serialize_with = "serialize_iso_millis")]
    timestamp: DateTime<Utc>,
}

impl CounterSnapshot {
    /// 依目前的報名數推導所有欄位
    pub fn from_count(current: u64, timestamp: DateTime<Utc>) -> Self {
        let total = EARLY_BIRD_CAPACITY;

        Self {
            current,
            total,
            remaining: total.saturating_sub(current),
            progress_percentage: progress_percentage(current, total),
            is_early_bird_available: current < total,
            timestamp,
        }
    }

    pub fn capture(current: u64) -> Self {
        Self::from_count(current, Utc::now())
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn progress_percentage(&self) -> f64 {
        self.progress_percentage
    }

    pub fn is_early_bird_available(&self) -> bool {
        self.is_early_bird_available
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// True when both snapshots describe the same counter state, ignoring when they were taken.
    pub fn same_state(&self, other: &Self) -> bool {
        self.current == other.current
            && self.total == other.total
            && self.remaining == other.remaining
            && self.progress_percentage == other.progress_percentage
            && self.is_early_bird_available == other.is_early_bird_available
    }
}

/// `min(100, current / total * 100)` rounded to one decimal, half away from zero.
///
/// Worked in integer tenths so `.x5` boundaries never depend on float representation.
pub fn progress_percentage(current: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }

    let capped = current.min(total) as u128;
    let total = total as u128;

    // tenths = round(capped * 1000 / total)
    let tenths = (capped * 1000 * 2 + total) / (total * 2);

    tenths as f64 / 10.0
}

fn serialize_iso_millis<S: Serializer>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}
