// src/web/views.rs
// HTML rendering for the calculator page

use html_escape::encode_text;
use std::fmt::Write;
use strum::IntoEnumIterator;

use crate::arithmetic::{Operation, format_number};
use crate::models::ResultView;

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto}\
form{margin:.5rem 0}input{width:8rem}table{border-collapse:collapse;width:100%}\
td,th{border:1px solid #ccc;padding:.25rem .5rem;text-align:right}\
.error{color:#b00020;font-weight:bold}";

fn label(operation: Operation) -> &'static str {
    match operation {
        Operation::Add => "Add",
        Operation::Subtract => "Subtract",
        Operation::Multiply => "Multiply",
        Operation::Divide => "Divide",
        Operation::Square => "Square",
    }
}

fn render_form(out: &mut String, operation: Operation) {
    let _ = write!(
        out,
        "<form method=\"post\" action=\"/{}\"><input name=\"number1\" required>",
        operation.as_str()
    );
    if operation.is_binary() {
        let _ = write!(
            out,
            " {} <input name=\"number2\" required>",
            encode_text(operation.symbol())
        );
    }
    let _ = write!(out, " <button type=\"submit\">{}</button></form>", label(operation));
}

fn render_row(out: &mut String, row: &ResultView) {
    // Unknown names show both operands
    let binary = row
        .operation
        .parse::<Operation>()
        .map_or(true, |operation| operation.is_binary());
    let second = if binary {
        format_number(row.number2)
    } else {
        String::new()
    };
    let _ = write!(
        out,
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        encode_text(row.operation.as_str()),
        format_number(row.number1),
        second,
        format_number(row.result),
        encode_text(&row.created_at),
    );
}

/// Full page: one form per operation, an optional error, and the history
pub fn render_index(results: &[ResultView], error: Option<&str>) -> String {
    let mut out = String::with_capacity(2048);
    let _ = write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Calculator</title>\
         <style>{}</style></head><body><h1>Calculator</h1>",
        STYLE
    );

    if let Some(message) = error {
        let _ = write!(out, "<p class=\"error\">{}</p>", encode_text(message));
    }

    for operation in Operation::iter() {
        render_form(&mut out, operation);
    }

    out.push_str("<h2>History</h2>");
    if results.is_empty() {
        out.push_str("<p>No results yet.</p>");
    } else {
        out.push_str(
            "<table><thead><tr><th>Operation</th><th>Number 1</th><th>Number 2</th>\
             <th>Result</th><th>Created</th></tr></thead><tbody>",
        );
        for row in results {
            render_row(&mut out, row);
        }
        out.push_str("</tbody></table>");
    }

    out.push_str("</body></html>");
    out
}
