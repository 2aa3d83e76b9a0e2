//! Turns matched rows into output: 1-based ordinals, selected fields in
//! request order, highlight spans for the matched term, and — in launch
//! mode — a single open-URL side effect addressed by ordinal.

use std::ops::Range;

use crate::error::Result;
use crate::launch::UrlOpener;
use crate::query::{Field, HistoryRow, QuerySpec};
use crate::timestamp;

/// One rendered field value. `highlight` is a byte range into `text`
/// covering the first case-insensitive occurrence of the matched term;
/// the text itself keeps its original case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub field: Field,
    pub text: String,
    pub highlight: Option<Range<usize>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub ordinal: usize,
    pub url: String,
    pub fields: Vec<FieldValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    Opened { ordinal: usize, url: String },
    /// The requested ordinal is beyond the result count. A normal
    /// outcome, not a failure.
    NotFound { requested: usize, matched: usize },
}

/// Project matched rows into display rows, in query order.
pub fn project(rows: &[HistoryRow], spec: &QuerySpec) -> Vec<ResultRow> {
    let title_term = spec.title_substring.as_deref().or(spec.free_text.as_deref());
    let url_term = spec.url_substring.as_deref().or(spec.free_text.as_deref());

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let ordinal = i + 1;
            let fields = spec
                .fields
                .iter()
                .map(|field| match field {
                    Field::Index => FieldValue {
                        field: Field::Index,
                        text: ordinal.to_string(),
                        highlight: None,
                    },
                    Field::VisitTime => FieldValue {
                        field: Field::VisitTime,
                        text: timestamp::format(row.visit_time),
                        highlight: None,
                    },
                    Field::Title => FieldValue {
                        field: Field::Title,
                        text: row.title.clone(),
                        highlight: title_term.and_then(|t| find_span(&row.title, t)),
                    },
                    Field::Url => FieldValue {
                        field: Field::Url,
                        text: row.url.clone(),
                        highlight: url_term.and_then(|t| find_span(&row.url, t)),
                    },
                })
                .collect();
            ResultRow {
                ordinal,
                url: row.url.clone(),
                fields,
            }
        })
        .collect()
}

/// Resolve launch mode: open the url of the row at `ordinal`, exactly
/// once, or report that no row reached it.
pub fn launch(
    rows: &[HistoryRow],
    ordinal: usize,
    opener: &dyn UrlOpener,
) -> Result<LaunchOutcome> {
    let row = ordinal.checked_sub(1).and_then(|i| rows.get(i));
    match row {
        Some(row) => {
            opener.open(&row.url)?;
            Ok(LaunchOutcome::Opened {
                ordinal,
                url: row.url.clone(),
            })
        }
        None => Ok(LaunchOutcome::NotFound {
            requested: ordinal,
            matched: rows.len(),
        }),
    }
}

/// First case-insensitive (ASCII) occurrence of `term` in `text`, as a
/// byte range valid for the original string. At most one span per field.
fn find_span(text: &str, term: &str) -> Option<Range<usize>> {
    if term.is_empty() || term.len() > text.len() {
        return None;
    }
    let hay = text.as_bytes();
    let needle = term.as_bytes();
    'outer: for start in 0..=(hay.len() - needle.len()) {
        for (i, b) in needle.iter().enumerate() {
            if !hay[start + i].eq_ignore_ascii_case(b) {
                continue 'outer;
            }
        }
        let end = start + needle.len();
        if text.is_char_boundary(start) && text.is_char_boundary(end) {
            return Some(start..end);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct RecordingOpener {
        opened: RefCell<Vec<String>>,
    }

    impl RecordingOpener {
        fn new() -> Self {
            Self {
                opened: RefCell::new(Vec::new()),
            }
        }
    }

    impl UrlOpener for RecordingOpener {
        fn open(&self, url: &str) -> std::io::Result<()> {
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    fn sample_rows() -> Vec<HistoryRow> {
        vec![
            HistoryRow {
                url: "https://a.com".to_string(),
                title: "Alpha".to_string(),
                visit_time: 13_303_449_600_000_000,
            },
            HistoryRow {
                url: "https://b.com".to_string(),
                title: "Beta".to_string(),
                visit_time: 13_303_449_601_000_000,
            },
            HistoryRow {
                url: "https://c.com".to_string(),
                title: "Gamma".to_string(),
                visit_time: 13_303_449_602_000_000,
            },
        ]
    }

    #[test]
    fn ordinals_start_at_one_in_iteration_order() {
        let spec = QuerySpec::default();
        let rows = project(&sample_rows(), &spec);
        let ordinals: Vec<usize> = rows.iter().map(|r| r.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
    }

    #[test]
    fn fields_follow_requested_order() {
        let spec = QuerySpec {
            fields: vec![Field::Url, Field::Index],
            ..Default::default()
        };
        let rows = project(&sample_rows(), &spec);
        let fields: Vec<Field> = rows[0].fields.iter().map(|f| f.field).collect();
        assert_eq!(fields, vec![Field::Url, Field::Index]);
        assert_eq!(rows[0].fields[1].text, "1");
    }

    #[test]
    fn highlight_is_case_insensitive_and_preserves_case() {
        let rows = vec![HistoryRow {
            url: "https://example.com".to_string(),
            title: "Example Domain".to_string(),
            visit_time: 0,
        }];
        let spec = QuerySpec {
            title_substring: Some("example".to_string()),
            ..Default::default()
        };
        let projected = project(&rows, &spec);
        let title = projected[0]
            .fields
            .iter()
            .find(|f| f.field == Field::Title)
            .expect("title field");
        let span = title.highlight.clone().expect("highlight");
        assert_eq!(span, 0..7);
        assert_eq!(&title.text[span], "Example");
    }

    #[test]
    fn free_text_highlights_both_fields_as_fallback() {
        let rows = vec![HistoryRow {
            url: "https://example.com".to_string(),
            title: "Example Domain".to_string(),
            visit_time: 0,
        }];
        let spec = QuerySpec {
            free_text: Some("EXAMPLE".to_string()),
            ..Default::default()
        };
        let projected = project(&rows, &spec);
        for field in [Field::Title, Field::Url] {
            let value = projected[0]
                .fields
                .iter()
                .find(|f| f.field == field)
                .expect("field");
            assert!(value.highlight.is_some(), "no span for {field:?}");
        }
    }

    #[test]
    fn no_match_renders_unmodified() {
        let rows = sample_rows();
        let spec = QuerySpec {
            title_substring: Some("zebra".to_string()),
            ..Default::default()
        };
        let projected = project(&rows, &spec);
        assert!(
            projected[0]
                .fields
                .iter()
                .all(|f| f.highlight.is_none())
        );
    }

    #[test]
    fn launch_opens_the_addressed_row_exactly_once() {
        let rows = sample_rows();
        let opener = RecordingOpener::new();
        let outcome = launch(&rows, 2, &opener).expect("launch");
        assert_eq!(
            outcome,
            LaunchOutcome::Opened {
                ordinal: 2,
                url: "https://b.com".to_string()
            }
        );
        assert_eq!(*opener.opened.borrow(), vec!["https://b.com".to_string()]);
    }

    #[test]
    fn launch_beyond_results_opens_nothing() {
        let rows = sample_rows();
        let opener = RecordingOpener::new();
        let outcome = launch(&rows, 7, &opener).expect("launch");
        assert_eq!(
            outcome,
            LaunchOutcome::NotFound {
                requested: 7,
                matched: 3
            }
        );
        assert!(opener.opened.borrow().is_empty());

        let outcome = launch(&[], 1, &opener).expect("launch empty");
        assert!(matches!(outcome, LaunchOutcome::NotFound { matched: 0, .. }));
        assert!(opener.opened.borrow().is_empty());
    }

    #[test]
    fn launch_ordinal_zero_is_not_found() {
        let rows = sample_rows();
        let opener = RecordingOpener::new();
        let outcome = launch(&rows, 0, &opener).expect("launch");
        assert!(matches!(outcome, LaunchOutcome::NotFound { .. }));
    }
}
