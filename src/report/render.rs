//! Cell formatting and column-aligned text tables

use rusqlite::types::Value;
use tabled::builder::Builder;
use tabled::settings::Style;
use super::ResultSet;

/// Cell text for the terminal; NULL is spelled out
pub fn display_cell(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        other => export_cell(other),
    }
}

/// Cell text for exported files; NULL is an empty field
pub fn export_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => format_real(*f),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

/// Shortest round-trip form, keeping one fractional digit on whole numbers
pub fn format_real(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Render the result as an aligned table. Each column is as wide as its
/// longest cell or header.
pub fn render_table(result: &ResultSet) -> String {
    let mut builder = Builder::default();
    builder.push_record(result.columns.clone());
    for row in &result.rows {
        builder.push_record(row.iter().map(display_cell).collect::<Vec<_>>());
    }

    let mut table = builder.build();
    table.with(Style::psql());
    table.to_string()
}
