use crate::error::Result;
use crate::journal::RunJournal;
use crate::table::Table;
use serde_json::Value;
use std::path::Path;

/// The load phase: serialize the table as comma-delimited text with a header
/// row, overwriting any file already at `path`. Column order is the
/// first-seen union across records; a field absent from a record serializes
/// as an empty cell.
pub fn load(table: &Table, path: &Path, journal: &dyn RunJournal) -> Result<()> {
    journal.record(&format!("Loading data into {}", path.display()))?;

    let columns = table.column_order();
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&columns)?;

    for record in table.iter() {
        let row: Vec<String> = columns
            .iter()
            .map(|column| cell_text(record.get(column)))
            .collect();
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::MemoryJournal;
    use crate::table::Record;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_header_row_and_number_rendering() {
        let mut alice = Record::new();
        alice.insert("name", json!("Alice"));
        alice.insert("height", json!(1.78));
        alice.insert("weight", json!(72.57));

        let mut bob = Record::new();
        bob.insert("name", json!("Bob"));
        bob.insert("height", json!(1.65));
        bob.insert("weight", json!(63.5));

        let table: Table = vec![alice, bob].into_iter().collect();

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transformed_data.csv");
        let journal = MemoryJournal::new();
        load(&table, &path, &journal).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "name,height,weight");
        assert_eq!(lines[1], "Alice,1.78,72.57");
        assert_eq!(lines[2], "Bob,1.65,63.5");
        assert!(journal.contains("Loading data into"));
    }

    #[test]
    fn test_absent_fields_are_empty_cells() {
        let mut first = Record::new();
        first.insert("name", json!("Alice"));
        first.insert("height", json!(1.78));

        let mut second = Record::new();
        second.insert("name", json!("Bob"));
        second.insert("weight", json!(63.5));

        let table: Table = vec![first, second].into_iter().collect();

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.csv");
        load(&table, &path, &MemoryJournal::new()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "name,height,weight");
        assert_eq!(lines[1], "Alice,1.78,");
        assert_eq!(lines[2], "Bob,,63.5");
    }

    #[test]
    fn test_existing_output_is_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.csv");
        fs::write(&path, "stale,content\nfrom,before\n").unwrap();

        let mut record = Record::new();
        record.insert("name", json!("Alice"));
        let table: Table = vec![record].into_iter().collect();

        load(&table, &path, &MemoryJournal::new()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale"));
        assert_eq!(content.lines().count(), 2);
    }
}
