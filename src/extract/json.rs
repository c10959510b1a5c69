use crate::error::{Result, TabFuseError};
use crate::table::{Record, Table};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Parse a line-delimited JSON file: one complete JSON object per line, not
/// a single array spanning the file. Blank lines are tolerated; any
/// unparseable or non-object line fails the whole file.
pub fn extract_from_json(path: &Path) -> Result<Table> {
    let content = fs::read_to_string(path).map_err(|e| malformed(path, e.to_string()))?;

    let mut table = Table::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(line)
            .map_err(|e| malformed(path, format!("line {}: {}", index + 1, e)))?;

        match value {
            Value::Object(map) => {
                let record: Record = map.into_iter().collect();
                table.push(record);
            }
            other => {
                return Err(malformed(
                    path,
                    format!("line {}: expected an object, got {}", index + 1, kind(&other)),
                ));
            }
        }
    }

    Ok(table)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn malformed(path: &Path, message: String) -> TabFuseError {
    TabFuseError::MalformedJson {
        path: path.to_path_buf(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_one_record_per_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("people.json");
        fs::write(
            &path,
            "{\"name\":\"Alice\",\"height\":70,\"weight\":160}\n\
             {\"name\":\"Bob\",\"height\":65,\"weight\":140}\n",
        )
        .unwrap();

        let table = extract_from_json(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1].get("name"), Some(&json!("Bob")));
        assert_eq!(table.records()[0].get("height"), Some(&json!(70)));
    }

    #[test]
    fn test_blank_lines_are_tolerated() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sparse.json");
        fs::write(&path, "{\"name\":\"Alice\"}\n\n{\"name\":\"Bob\"}\n").unwrap();

        let table = extract_from_json(&path).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_json_array_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("array.json");
        fs::write(&path, "[1,2,3]\n").unwrap();

        let result = extract_from_json(&path);
        match result {
            Err(TabFuseError::MalformedJson { message, .. }) => {
                assert!(message.contains("expected an object"));
            }
            other => panic!("expected MalformedJson, got {:?}", other),
        }
    }

    #[test]
    fn test_broken_line_names_its_number() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{\"name\":\"Alice\"}\n{not json}\n").unwrap();

        match extract_from_json(&path) {
            Err(TabFuseError::MalformedJson { message, .. }) => {
                assert!(message.starts_with("line 2"));
            }
            other => panic!("expected MalformedJson, got {:?}", other),
        }
    }

    #[test]
    fn test_field_order_is_preserved() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ordered.json");
        fs::write(&path, "{\"name\":\"Alice\",\"height\":70,\"weight\":160}\n").unwrap();

        let table = extract_from_json(&path).unwrap();
        let names: Vec<&str> = table.records()[0].field_names().collect();
        assert_eq!(names, vec!["name", "height", "weight"]);
    }
}
