//! Report query strings
//!
//! Filters arrive in bracket notation, e.g.
//! `filter[users]=u1&filter[users][]=u2&filter[clients]=c1,c2`. Repeated
//! keys, `[]` suffixes, indexed keys (`filter[users][0]`) and
//! comma-separated values all add to the same axis.

use timebook_domain::{
    month_range, parse_range_bound, DateRange, ReportFilter, ReportGroup, Result, TimebookError,
};
use url::form_urlencoded;

/// Parsed parameters of the reports endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub group: Option<ReportGroup>,
    pub filter: ReportFilter,
}

impl ReportParams {
    /// Parse a raw query string. Unknown keys are ignored.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let mut params = Self::default();

        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let value = value.trim();
            match key.as_ref() {
                "startDate" => params.start_date = Some(value.to_string()),
                "endDate" => params.end_date = Some(value.to_string()),
                "month" => params.month = Some(value.to_string()),
                "year" => params.year = Some(value.to_string()),
                "group" if value.is_empty() => params.group = None,
                "group" => {
                    params.group = Some(value.parse().map_err(|_| {
                        TimebookError::field("group", "must be one of client, user")
                    })?);
                }
                other => {
                    if let Some(axis) = filter_axis(&mut params.filter, other) {
                        axis.extend(
                            value.split(',').map(str::trim).filter(|v| !v.is_empty()).map(String::from),
                        );
                    }
                }
            }
        }

        Ok(params)
    }

    /// `[startDate, endDate)`; both bounds are required.
    pub fn date_range(&self) -> Result<DateRange> {
        let start = parse_range_bound("startDate", self.start_date.as_deref().unwrap_or_default())?;
        let end = parse_range_bound("endDate", self.end_date.as_deref().unwrap_or_default())?;
        Ok(DateRange::new(start, end))
    }

    /// The month named by `month` and `year`.
    pub fn month_range(&self) -> Result<DateRange> {
        let month = required_number::<u32>("month", self.month.as_deref())?;
        let year = required_number::<i32>("year", self.year.as_deref())?;
        month_range(month, year)
    }
}

/// `filter[users]`, `filter[users][]` or `filter[users][3]` → the users axis.
fn filter_axis<'a>(filter: &'a mut ReportFilter, key: &str) -> Option<&'a mut Vec<String>> {
    let rest = key.strip_prefix("filter[")?;
    let (name, tail) = rest.split_once(']')?;
    let tail_ok = tail.is_empty()
        || tail
            .strip_prefix('[')
            .and_then(|t| t.strip_suffix(']'))
            .is_some_and(|index| index.chars().all(|c| c.is_ascii_digit()));
    if !tail_ok {
        return None;
    }

    match name {
        "users" => Some(&mut filter.users),
        "clients" => Some(&mut filter.clients),
        "activities" => Some(&mut filter.activities),
        _ => None,
    }
}

fn required_number<T: std::str::FromStr>(field: &str, raw: Option<&str>) -> Result<T> {
    match raw {
        None | Some("") => Err(TimebookError::validation(format!("Missing {field}"))),
        Some(raw) => raw.parse().map_err(|_| TimebookError::field(field, "must be a number")),
    }
}
