//! Lead domain types.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use larder_shared::types::PageRequest;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;

use crate::leads::error::LeadError;

/// Source recorded when the submitter does not name one.
pub const DEFAULT_SOURCE: &str = "contact_form";

/// Pipeline status of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    /// Not yet handled.
    New,
    /// Staff reached out.
    Contacted,
    /// Converted.
    Won,
    /// Dropped.
    Lost,
}

impl LeadStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }

    /// Parses a status from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "new" => Some(Self::New),
            "contacted" => Some(Self::Contacted),
            "won" => Some(Self::Won),
            "lost" => Some(Self::Lost),
            _ => None,
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contact form submission.
///
/// Every field is optional; nothing is required beyond a well-formed body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewLead {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub source: Option<String>,
    pub utm: Option<Value>,
}

impl NewLead {
    /// Source to store, falling back to [`DEFAULT_SOURCE`].
    #[must_use]
    pub fn source_or_default(&self) -> String {
        self.source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SOURCE)
            .to_string()
    }

    /// UTM attribution to store, an empty object when absent.
    #[must_use]
    pub fn utm_or_default(&self) -> Value {
        match &self.utm {
            Some(v) if !v.is_null() => v.clone(),
            _ => Value::Object(Map::new()),
        }
    }
}

/// Raw query string of the lead list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadQuery {
    pub status: Option<String>,
    pub q: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Validated lead list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilter {
    /// Exact status match.
    pub status: Option<LeadStatus>,
    /// Substring searched in name, email and phone.
    pub search: Option<String>,
    /// Inclusive lower bound on creation time.
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on creation time.
    pub created_to: Option<DateTime<Utc>>,
    pub page: PageRequest,
}

impl TryFrom<LeadQuery> for LeadFilter {
    type Error = LeadError;

    fn try_from(query: LeadQuery) -> Result<Self, Self::Error> {
        let status = match query.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(LeadStatus::parse(s).ok_or_else(|| LeadError::InvalidStatus(s.to_string()))?),
        };

        let search = query
            .q
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        let created_from = optional_bound(query.start_date.as_deref(), DateBound::Start)?;
        let created_to = optional_bound(query.end_date.as_deref(), DateBound::End)?;

        Ok(Self {
            status,
            search,
            created_from,
            created_to,
            page: PageRequest::from_query(query.page, query.limit),
        })
    }
}

/// Which end of a date range a bound belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Start,
    End,
}

fn optional_bound(raw: Option<&str>, bound: DateBound) -> Result<Option<DateTime<Utc>>, LeadError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date_bound(s, bound).map(Some),
    }
}

/// Parses a range bound given as an RFC 3339 timestamp or a `YYYY-MM-DD` date.
///
/// A bare date covers the whole day: a start bound is midnight UTC, an end
/// bound is the last nanosecond of that day.
///
/// # Errors
///
/// Returns `LeadError::InvalidDate` if the input is neither form.
pub fn parse_date_bound(raw: &str, bound: DateBound) -> Result<DateTime<Utc>, LeadError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| LeadError::InvalidDate(raw.to_string()))?;
    let time = match bound {
        DateBound::Start => NaiveTime::MIN,
        DateBound::End => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(|| LeadError::InvalidDate(raw.to_string()))?,
    };
    Ok(date.and_time(time).and_utc())
}

/// Validated staff update of a lead.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadUpdate {
    pub status: Option<LeadStatus>,
    pub tags: Option<Vec<String>>,
}

impl LeadUpdate {
    /// Validates a raw update body.
    ///
    /// # Errors
    ///
    /// * `EmptyUpdate` if neither status nor tags is present
    /// * `InvalidStatus` if the status is not a known value
    /// * `InvalidTags` if tags is not an array of strings
    pub fn parse(status: Option<&str>, tags: Option<&Value>) -> Result<Self, LeadError> {
        let tags = tags.filter(|t| !t.is_null());
        if status.is_none() && tags.is_none() {
            return Err(LeadError::EmptyUpdate);
        }

        let status = status
            .map(|s| LeadStatus::parse(s).ok_or_else(|| LeadError::InvalidStatus(s.to_string())))
            .transpose()?;

        let tags = tags
            .map(|t| {
                t.as_array()
                    .ok_or(LeadError::InvalidTags)?
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).ok_or(LeadError::InvalidTags))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(Self { status, tags })
    }

    /// Audit metadata describing the fields this update sets.
    #[must_use]
    pub fn audit_meta(&self) -> Value {
        let mut meta = Map::new();
        if let Some(status) = self.status {
            meta.insert("status".into(), json!(status.as_str()));
        }
        if let Some(tags) = &self.tags {
            meta.insert("tags".into(), json!(tags));
        }
        Value::Object(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use rstest::rstest;

    #[rstest]
    #[case("new", Some(LeadStatus::New))]
    #[case("Contacted", Some(LeadStatus::Contacted))]
    #[case(" won ", Some(LeadStatus::Won))]
    #[case("LOST", Some(LeadStatus::Lost))]
    #[case("archived", None)]
    #[case("", None)]
    fn test_status_parse(#[case] input: &str, #[case] expected: Option<LeadStatus>) {
        assert_eq!(LeadStatus::parse(input), expected);
    }

    #[test]
    fn test_new_lead_defaults() {
        let lead = NewLead::default();
        assert_eq!(lead.source_or_default(), "contact_form");
        assert_eq!(lead.utm_or_default(), json!({}));

        let lead = NewLead {
            source: Some("instagram".into()),
            utm: Some(json!({"utm_source": "ig"})),
            ..NewLead::default()
        };
        assert_eq!(lead.source_or_default(), "instagram");
        assert_eq!(lead.utm_or_default()["utm_source"], "ig");
    }

    #[test]
    fn test_filter_from_empty_query() {
        let filter = LeadFilter::try_from(LeadQuery::default()).unwrap();
        assert_eq!(filter.status, None);
        assert_eq!(filter.search, None);
        assert_eq!(filter.page.page, 1);
        assert_eq!(filter.page.limit, 25);
    }

    #[test]
    fn test_filter_rejects_unknown_status() {
        let query = LeadQuery {
            status: Some("pending".into()),
            ..LeadQuery::default()
        };
        assert!(matches!(
            LeadFilter::try_from(query),
            Err(LeadError::InvalidStatus(s)) if s == "pending"
        ));
    }

    #[test]
    fn test_filter_blank_search_is_ignored() {
        let query = LeadQuery {
            q: Some("   ".into()),
            ..LeadQuery::default()
        };
        assert_eq!(LeadFilter::try_from(query).unwrap().search, None);
    }

    #[test]
    fn test_date_bounds_cover_whole_day() {
        let start = parse_date_bound("2024-03-10", DateBound::Start).unwrap();
        let end = parse_date_bound("2024-03-10", DateBound::End).unwrap();

        assert_eq!((start.hour(), start.minute(), start.second()), (0, 0, 0));
        assert_eq!(end.day(), 10);
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
        assert!(end > start);
    }

    #[test]
    fn test_date_bound_accepts_rfc3339() {
        let ts = parse_date_bound("2024-03-10T12:30:00+02:00", DateBound::End).unwrap();
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_date_bound_rejects_garbage() {
        assert!(matches!(
            parse_date_bound("10/03/2024", DateBound::Start),
            Err(LeadError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_update_requires_a_field() {
        assert!(matches!(
            LeadUpdate::parse(None, None),
            Err(LeadError::EmptyUpdate)
        ));
        assert!(matches!(
            LeadUpdate::parse(None, Some(&Value::Null)),
            Err(LeadError::EmptyUpdate)
        ));
    }

    #[test]
    fn test_update_validates_fields() {
        assert!(matches!(
            LeadUpdate::parse(Some("closed"), None),
            Err(LeadError::InvalidStatus(_))
        ));
        assert!(matches!(
            LeadUpdate::parse(None, Some(&json!("vip"))),
            Err(LeadError::InvalidTags)
        ));
        assert!(matches!(
            LeadUpdate::parse(None, Some(&json!(["vip", 3]))),
            Err(LeadError::InvalidTags)
        ));
    }

    #[test]
    fn test_update_audit_meta_lists_only_set_fields() {
        let update = LeadUpdate::parse(Some("won"), None).unwrap();
        assert_eq!(update.audit_meta(), json!({"status": "won"}));

        let update = LeadUpdate::parse(Some("lost"), Some(&json!(["vip"]))).unwrap();
        assert_eq!(update.audit_meta(), json!({"status": "lost", "tags": ["vip"]}));
    }
}
