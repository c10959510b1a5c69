use crate::error::{Result, TabFuseError};
use crate::table::{Record, Table};
use csv::ReaderBuilder;
use serde_json::Value;
use std::path::Path;

/// Parse a comma-delimited file with a header row. Each row becomes one
/// record keyed by the header names, cell values typed naturally.
pub fn extract_from_csv(path: &Path) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| malformed(path, &e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| malformed(path, &e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut table = Table::new();
    for row in reader.records() {
        let row = row.map_err(|e| malformed(path, &e))?;
        let mut record = Record::new();
        for (name, cell) in headers.iter().zip(row.iter()) {
            record.insert(name.clone(), parse_scalar(cell));
        }
        table.push(record);
    }

    Ok(table)
}

/// Natural typing: integers, then reals, empty cells as null, everything
/// else as a string.
fn parse_scalar(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(integer) = cell.parse::<i64>() {
        return Value::Number(integer.into());
    }
    if let Ok(real) = cell.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(real) {
            return Value::Number(number);
        }
    }
    Value::String(cell.to_string())
}

fn malformed(path: &Path, error: &csv::Error) -> TabFuseError {
    TabFuseError::MalformedCsv {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_rows_become_typed_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("people.csv");
        fs::write(&path, "name,height,weight\nAlice,70,160.5\n").unwrap();

        let table = extract_from_csv(&path).unwrap();
        assert_eq!(table.len(), 1);

        let record = &table.records()[0];
        assert_eq!(record.get("name"), Some(&json!("Alice")));
        assert_eq!(record.get("height"), Some(&json!(70)));
        assert_eq!(record.get("weight"), Some(&json!(160.5)));
    }

    #[test]
    fn test_empty_cells_are_null() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gaps.csv");
        fs::write(&path, "name,height\n,70\n").unwrap();

        let table = extract_from_csv(&path).unwrap();
        assert_eq!(table.records()[0].get("name"), Some(&Value::Null));
    }

    #[test]
    fn test_ragged_rows_are_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ragged.csv");
        fs::write(&path, "name,height,weight\nAlice,70\n").unwrap();

        let result = extract_from_csv(&path);
        assert!(matches!(result, Err(TabFuseError::MalformedCsv { .. })));
    }

    #[test]
    fn test_missing_file_is_malformed() {
        let result = extract_from_csv(Path::new("no_such_file.csv"));
        assert!(matches!(result, Err(TabFuseError::MalformedCsv { .. })));
    }
}
