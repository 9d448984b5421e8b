//! Conversion of raw source cells into typed store values

use chrono::NaiveDate;
use rusqlite::types::Value;
use crate::{Error, Result};
use crate::schema::{Column, ColumnType, TableSchema};
use crate::source::Record;
use crate::storage::RowValues;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Convert a record into values in the table's declared column order.
pub fn coerce_record(table: &TableSchema, record: &Record) -> Result<RowValues> {
    let mut values = Vec::with_capacity(table.columns.len());
    for column in table.columns {
        let raw = record.get(column.name).unwrap_or_default();
        let value = coerce_value(column, raw).map_err(|reason| Error::Coercion {
            entity: table.entity,
            line: record.line,
            field: column.name.to_string(),
            value: raw.to_string(),
            reason,
        })?;
        values.push(value);
    }
    Ok(RowValues {
        line: record.line,
        values,
    })
}

/// Text is stored verbatim, empty included. For the other types an empty
/// cell becomes NULL on nullable columns and is rejected otherwise.
pub fn coerce_value(column: &Column, raw: &str) -> std::result::Result<Value, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() && column.ty != ColumnType::Text {
        return if column.nullable {
            Ok(Value::Null)
        } else {
            Err("value is required".to_string())
        };
    }

    match column.ty {
        ColumnType::Integer => trimmed
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|e| format!("not an integer ({})", e)),
        ColumnType::Real => match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Value::Real(v)),
            Ok(_) => Err("not a finite number".to_string()),
            Err(e) => Err(format!("not a number ({})", e)),
        },
        ColumnType::Text => Ok(Value::Text(raw.to_string())),
        ColumnType::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map(|date| Value::Text(date.format(DATE_FORMAT).to_string()))
            .map_err(|e| format!("not a YYYY-MM-DD date ({})", e)),
    }
}
