//! Translates structured and free-text filter parameters into one
//! parameterized query against the merged store. User-supplied values
//! are always bound, never spliced into the SQL text, and substring
//! filters are escaped so LIKE metacharacters match literally.

use rusqlite::Connection;
use rusqlite::types::Value;

use crate::error::Result;

/// Output fields a caller may project, in the order they were asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Index,
    VisitTime,
    Title,
    Url,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Index, Field::VisitTime, Field::Title, Field::Url];

    pub fn parse(name: &str) -> Option<Field> {
        match name.trim() {
            "#" | "index" => Some(Field::Index),
            "visit_time" => Some(Field::VisitTime),
            "title" => Some(Field::Title),
            "url" => Some(Field::Url),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    None,
    Ascending,
    Descending,
}

/// One invocation's worth of query parameters, built once at the CLI
/// boundary.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub url_substring: Option<String>,
    pub title_substring: Option<String>,
    pub free_text: Option<String>,
    /// Inclusive bounds, in browser-epoch microseconds.
    pub min_time: Option<i64>,
    pub max_time: Option<i64>,
    pub sort: SortDirection,
    pub fields: Vec<Field>,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            url_substring: None,
            title_substring: None,
            free_text: None,
            min_time: None,
            max_time: None,
            sort: SortDirection::None,
            fields: Field::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub url: String,
    pub title: String,
    pub visit_time: i64,
}

/// Run the query described by `spec` and collect the matching rows in
/// query order.
pub fn run(conn: &Connection, spec: &QuerySpec) -> Result<Vec<HistoryRow>> {
    let (sql, params) = build_sql(spec);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(params), |row| {
        Ok(HistoryRow {
            url: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
            title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            visit_time: row.get::<_, Option<i64>>(2)?.unwrap_or_default(),
        })
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn build_sql(spec: &QuerySpec) -> (String, Vec<Value>) {
    let mut sql = String::from(
        "SELECT urls.url, urls.title, visits.visit_time \
         FROM visits JOIN urls ON visits.url = urls.id WHERE 1=1",
    );
    let mut params: Vec<Value> = Vec::new();

    if let Some(title) = &spec.title_substring {
        sql.push_str(" AND urls.title LIKE ? ESCAPE '\\'");
        params.push(Value::Text(contains_pattern(title)));
    }
    if let Some(url) = &spec.url_substring {
        sql.push_str(" AND urls.url LIKE ? ESCAPE '\\'");
        params.push(Value::Text(contains_pattern(url)));
    }
    if let Some(text) = &spec.free_text {
        sql.push_str(" AND (urls.url LIKE ? ESCAPE '\\' OR urls.title LIKE ? ESCAPE '\\')");
        let pattern = contains_pattern(text);
        params.push(Value::Text(pattern.clone()));
        params.push(Value::Text(pattern));
    }
    if let Some(min) = spec.min_time {
        sql.push_str(" AND visits.visit_time >= ?");
        params.push(Value::Integer(min));
    }
    if let Some(max) = spec.max_time {
        sql.push_str(" AND visits.visit_time <= ?");
        params.push(Value::Integer(max));
    }

    match spec.sort {
        SortDirection::None => {}
        SortDirection::Ascending => sql.push_str(" ORDER BY visits.visit_time"),
        SortDirection::Descending => sql.push_str(" ORDER BY visits.visit_time DESC"),
    }

    (sql, params)
}

/// Wrap a literal substring in `%…%`, escaping LIKE metacharacters so
/// the value matches as text and never as a pattern.
fn contains_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
