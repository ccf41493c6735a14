//! From JSON text to a [`JsonValue`], reporting problems along the way.

use std::ops::Range;

use ariadne::{Color, Fmt, Label, Report, ReportKind};
use canopy::JsonValue;
use chumsky::prelude::*;
use indexmap::IndexMap;
use tracing::*;

use crate::parser::{self, Json};
use crate::spanned::Spanned;

pub type DiagnosticReport<'a> = Report<'a, (&'a String, Range<usize>)>;
pub type Diagnostics<'a> = Vec<DiagnosticReport<'a>>;

/// Parse `src`. Syntax errors and duplicate members are pushed to `diag`; `None` means the text
/// could not be parsed at all and `diag` says why.
pub fn parse_document<'d>(
    path: &'d String,
    src: &str,
    diag: &mut Diagnostics<'d>,
) -> Option<JsonValue> {
    let (json, errors) = parser::parser().parse(src).into_output_errors();

    let has_errors = !errors.is_empty();
    for e in errors {
        diag.push(
            Report::build(ReportKind::Error, path, e.span().start)
                .with_message(e.to_string())
                .with_label(
                    Label::new((path, e.span().into_range()))
                        .with_message(e.reason().to_string())
                        .with_color(Color::Red),
                )
                .finish(),
        );
    }

    if has_errors {
        return None;
    }

    let json = json?;
    trace!(?json);
    Some(to_value(&json, path, diag))
}

/// Lower the spanned tree. Repeated member names keep the position of their first occurrence
/// and the value of their last one, matching what browsers do with `JSON.parse`.
fn to_value<'d>(json: &Spanned<Json>, path: &'d String, diag: &mut Diagnostics<'d>) -> JsonValue {
    match &json.val {
        Json::Null(_) => JsonValue::Null,
        Json::Bool(b) => JsonValue::Bool(b.val),
        Json::Num(n) => JsonValue::Number(n.val),
        Json::Str(s) => JsonValue::String(s.val.clone()),
        Json::Array(elements) => JsonValue::Array(
            elements
                .val
                .iter()
                .map(|element| to_value(element, path, diag))
                .collect(),
        ),
        Json::Object(members) => {
            let mut first_seen: IndexMap<&str, SimpleSpan> = IndexMap::new();
            let mut object = IndexMap::with_capacity(members.val.len());

            for (name, value) in &members.val {
                if let Some(first) = first_seen.get(name.val.as_str()) {
                    debug!(member = %name.val, "duplicate member");
                    diag.push(duplicate_member(path, &name.val, *first, name.span));
                } else {
                    first_seen.insert(name.val.as_str(), name.span);
                }
                object.insert(name.val.clone(), to_value(value, path, diag));
            }

            JsonValue::Object(object)
        }
    }
}

fn duplicate_member<'d>(
    path: &'d String,
    name: &str,
    first: SimpleSpan,
    later: SimpleSpan,
) -> DiagnosticReport<'d> {
    Report::build(ReportKind::Warning, path, later.start)
        .with_message(format!(
            "member \"{}\" defined multiple times",
            name.fg(Color::Blue)
        ))
        .with_label(
            Label::new((path, first.into_range()))
                .with_message(format!("member \"{}\" first defined here", name.fg(Color::Blue)))
                .with_color(Color::Yellow),
        )
        .with_label(
            Label::new((path, later.into_range()))
                .with_message(format!(
                    "member \"{}\" later redefined here",
                    name.fg(Color::Blue)
                ))
                .with_color(Color::Yellow),
        )
        .with_help("only the last value is shown")
        .finish()
}
