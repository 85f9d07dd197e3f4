//! CSV rendering of enriched reports

use std::fmt::Write as _;

use timebook_domain::EnrichedReport;

/// Column header of every export
pub const CSV_HEADER: &str = "Date,User,Client,Activity,Start,End,Duration,Notes";

/// Render reports as CSV, one row per report, CRLF line endings.
pub fn reports_to_csv<'a>(reports: impl IntoIterator<Item = &'a EnrichedReport>) -> String {
    let mut out = String::with_capacity(256);
    out.push_str(CSV_HEADER);
    out.push_str("\r\n");

    for entry in reports {
        let report = &entry.report;
        let row = [
            report.date.format("%Y-%m-%d").to_string(),
            entry.username.clone(),
            entry.client_name.clone(),
            entry.activity_name.clone(),
            report.start_time.clone(),
            report.end_time.clone(),
            report.duration.to_string(),
            report.notes.clone(),
        ];
        for (i, field) in row.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            push_field(&mut out, field);
        }
        out.push_str("\r\n");
    }

    out
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\r', '\n']) {
        let _ = write!(out, "\"{}\"", field.replace('"', "\"\""));
    } else {
        out.push_str(field);
    }
}
