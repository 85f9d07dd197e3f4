//! Column encoding helpers shared by the SQLite repositories

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rusqlite::types::Type;
use rusqlite::ToSql;
use timebook_common::storage::{SqliteConnection, StorageResult};

/// Ids bound per `IN (...)` query.
const IN_CHUNK: usize = 500;

pub(crate) fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

pub(crate) fn int_to_bool(value: i64) -> bool {
    value != 0
}

pub(crate) fn to_millis(instant: &DateTime<Utc>) -> i64 {
    instant.timestamp_millis()
}

pub(crate) fn from_millis(idx: usize, millis: i64) -> rusqlite::Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, millis))
}

pub(crate) fn date_to_sql(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn date_from_sql(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// `?, ?, ?` for `n` parameters.
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Run `sql` once per chunk of `ids`, substituting `{ids}` with placeholders.
pub(crate) fn query_by_ids<T, F>(
    conn: &SqliteConnection,
    sql: &str,
    ids: &[String],
    mut map: F,
) -> StorageResult<Vec<T>>
where
    F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
{
    let mut out = Vec::with_capacity(ids.len());
    for chunk in ids.chunks(IN_CHUNK) {
        let sql = sql.replace("{ids}", &placeholders(chunk.len()));
        let params: Vec<&dyn ToSql> = chunk.iter().map(|id| id as &dyn ToSql).collect();
        let mut stmt = conn.prepare(&sql)?;
        out.extend(stmt.query_map(&params, &mut map)?);
    }
    Ok(out)
}

/// Group child rows by their parent id, keeping row order.
pub(crate) fn group_children<T>(rows: Vec<(String, T)>) -> HashMap<String, Vec<T>> {
    let mut grouped: HashMap<String, Vec<T>> = HashMap::new();
    for (parent, child) in rows {
        grouped.entry(parent).or_default().push(child);
    }
    grouped
}
