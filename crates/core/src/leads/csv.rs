//! CSV rendering for the lead export.
//!
//! Fields are quoted per RFC 4180. Cells that a spreadsheet would evaluate as
//! a formula get a leading `'`.

use std::borrow::Cow;
use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};

/// Column titles of the export, in order.
pub const COLUMNS: [&str; 7] = ["ID", "Name", "Email", "Phone", "Source", "Status", "Created At"];

/// Leading characters that make a spreadsheet treat a cell as a formula.
const FORMULA_TRIGGERS: [char; 4] = ['=', '+', '-', '@'];

/// One exported lead.
#[derive(Debug, Clone, Copy)]
pub struct CsvLead<'a> {
    pub id: i64,
    pub full_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub source: Option<&'a str>,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Escapes a single cell.
#[must_use]
pub fn escape_field(raw: &str) -> Cow<'_, str> {
    let guarded: Cow<'_, str> = if raw.starts_with(FORMULA_TRIGGERS) {
        Cow::Owned(format!("'{raw}"))
    } else {
        Cow::Borrowed(raw)
    };

    if guarded.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", guarded.replace('"', "\"\"")))
    } else {
        guarded
    }
}

/// Returns the header line, newline-terminated.
#[must_use]
pub fn header_line() -> String {
    let mut line = COLUMNS.join(",");
    line.push_str("\r\n");
    line
}

/// Appends one row, newline-terminated.
pub fn write_row(out: &mut String, lead: &CsvLead<'_>) {
    let created_at = lead.created_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    let _ = write!(
        out,
        "{},{},{},{},{},{},{}\r\n",
        lead.id,
        escape_field(lead.full_name.unwrap_or_default()),
        escape_field(lead.email.unwrap_or_default()),
        escape_field(lead.phone.unwrap_or_default()),
        escape_field(lead.source.unwrap_or_default()),
        escape_field(lead.status),
        created_at,
    );
}
