//! Lead analytics folding.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

/// Default look-back of the summary, in days.
pub const DEFAULT_DAYS: u32 = 30;

/// Longest look-back a client may request, in days.
pub const MAX_DAYS: u32 = 365;

/// Look-back window of the leads summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryWindow {
    days: u32,
}

impl SummaryWindow {
    /// Builds a window from the `days` query value, clamped to `1..=365`.
    #[must_use]
    pub fn from_query(days: Option<u32>) -> Self {
        Self {
            days: days.unwrap_or(DEFAULT_DAYS).clamp(1, MAX_DAYS),
        }
    }

    #[must_use]
    pub const fn days(&self) -> u32 {
        self.days
    }

    /// Earliest creation time inside the window.
    #[must_use]
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(i64::from(self.days))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    /// `YYYY-MM-DD` in UTC.
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

/// Counts leads per UTC calendar day, newest day first.
pub fn count_by_day<I>(created: I) -> Vec<DayCount>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut days: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for ts in created {
        *days.entry(ts.date_naive()).or_default() += 1;
    }

    days.into_iter()
        .rev()
        .map(|(date, count)| DayCount {
            date: date.format("%Y-%m-%d").to_string(),
            count,
        })
        .collect()
}

/// Counts leads per source, most frequent first; ties by source name.
pub fn count_by_source<I, S>(sources: I) -> Vec<SourceCount>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut counts: HashMap<String, u64> = HashMap::new();
    for source in sources {
        *counts.entry(source.into()).or_default() += 1;
    }

    let mut out: Vec<SourceCount> = counts
        .into_iter()
        .map(|(source, count)| SourceCount { source, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.source.cmp(&b.source)));
    out
}
