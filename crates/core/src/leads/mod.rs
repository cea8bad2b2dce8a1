//! Lead management domain logic.
//!
//! Leads arrive from the public contact form and are worked by staff: status
//! changes, tags, and append-only notes. This module holds the pieces that do
//! not need a database.
//!
//! # Modules
//!
//! - `types` - Lead status, list filters, update requests
//! - `error` - Lead-specific error types
//! - `csv` - CSV export rendering
//! - `summary` - Analytics folding

pub mod csv;
pub mod error;
pub mod summary;
pub mod types;

#[cfg(test)]
mod csv_props;

pub use error::LeadError;
pub use summary::{
    DayCount, SourceCount, StatusCount, SummaryWindow, count_by_day, count_by_source,
};
pub use types::{
    DEFAULT_SOURCE, DateBound, LeadFilter, LeadQuery, LeadStatus, LeadUpdate, NewLead,
    parse_date_bound,
};
