//! Terminal rendering for result rows: per-field colors matching the
//! classic layout (cyan ordinal, magenta time, blue url) and a
//! black-on-yellow span for the highlighted match.

use yansi::Paint;

use crate::project::{FieldValue, ResultRow};
use crate::query::Field;

pub fn render_line(row: &ResultRow, use_color: bool) -> String {
    let mut out = String::new();
    for (i, value) in row.fields.iter().enumerate() {
        if i > 0 {
            if use_color {
                out.push_str(&Paint::new(",").dim().to_string());
            } else {
                out.push(',');
            }
        }
        out.push_str(&render_field(value, use_color));
    }
    out
}

fn render_field(value: &FieldValue, use_color: bool) -> String {
    if !use_color {
        return value.text.clone();
    }
    match &value.highlight {
        Some(span) => {
            let before = paint(value.field, &value.text[..span.start]);
            let matched = Paint::black(&value.text[span.start..span.end])
                .on_yellow()
                .to_string();
            let after = paint(value.field, &value.text[span.end..]);
            format!("{before}{matched}{after}")
        }
        None => paint(value.field, &value.text),
    }
}

fn paint(field: Field, text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    match field {
        Field::Index => Paint::cyan(text).to_string(),
        Field::VisitTime => Paint::magenta(text).to_string(),
        Field::Url => Paint::blue(text).to_string(),
        Field::Title => text.to_string(),
    }
}
