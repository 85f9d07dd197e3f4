//! Reporting: aggregation, rate resolution and CSV export

pub mod aggregator;
pub mod csv;
pub mod rates;

pub use aggregator::ReportAggregator;
pub use csv::{reports_to_csv, CSV_HEADER};
