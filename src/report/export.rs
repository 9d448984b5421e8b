//! Comma-delimited export of result sets

use std::path::{Path, PathBuf};
use crate::{Error, Result};
use super::ResultSet;
use super::render::export_cell;

/// Write header plus every row to `dir/file_name`, creating `dir` if needed.
pub fn export_csv(result: &ResultSet, dir: &Path, file_name: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    write_csv(result, dir, &path).map_err(|source| Error::Export {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn write_csv(result: &ResultSet, dir: &Path, path: &Path) -> std::result::Result<(), csv::Error> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&result.columns)?;
    for row in &result.rows {
        writer.write_record(row.iter().map(export_cell))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::types::Value;

    #[test]
    fn test_export_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let result = ResultSet {
            columns: vec!["customer_name".into(), "location".into(), "total_spent".into()],
            rows: vec![vec![
                Value::Text("Ada Lovelace".into()),
                Value::Text("London, UK".into()),
                Value::Real(20.0),
            ]],
        };

        let path = export_csv(&result, &dir.path().join("out"), "top.csv").unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            contents,
            "customer_name,location,total_spent\nAda Lovelace,\"London, UK\",20.0\n"
        );
    }

    #[test]
    fn test_export_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let result = ResultSet {
            columns: vec!["a".into()],
            rows: vec![vec![Value::Integer(1)]],
        };

        let err = export_csv(&result, &blocker, "a.csv").unwrap_err();
        assert!(matches!(err, Error::Export { .. }));
        assert!(err.is_unit_failure());
    }
}
