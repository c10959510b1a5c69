use crate::error::{Result, TabFuseError};
use crate::table::{Record, Table};
use roxmltree::{Document, Node};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Parse an XML document whose root holds zero or more `<person>` elements,
/// each with `<name>`, `<height>` and `<weight>` text children. Failures are
/// whole-file: one malformed `<person>` discards every record in the file.
pub fn extract_from_xml(path: &Path) -> Result<Table> {
    let content = fs::read_to_string(path).map_err(|e| malformed(path, e.to_string()))?;
    let document = Document::parse(&content).map_err(|e| malformed(path, e.to_string()))?;

    let mut table = Table::new();
    for person in document
        .root_element()
        .children()
        .filter(|node| node.has_tag_name("person"))
    {
        table.push(person_record(path, &person)?);
    }

    Ok(table)
}

fn person_record(path: &Path, person: &Node) -> Result<Record> {
    let name = child_text(person, "name")
        .ok_or_else(|| malformed(path, "missing <name> element in <person>".to_string()))?;
    let height = numeric_child(path, person, "height")?;
    let weight = numeric_child(path, person, "weight")?;

    let mut record = Record::new();
    record.insert("name", Value::String(name));
    record.insert("height", number(path, "height", height)?);
    record.insert("weight", number(path, "weight", weight)?);
    Ok(record)
}

fn child_text(person: &Node, tag: &str) -> Option<String> {
    person
        .children()
        .find(|node| node.has_tag_name(tag))
        .and_then(|node| node.text())
        .map(|text| text.trim().to_string())
}

fn numeric_child(path: &Path, person: &Node, tag: &str) -> Result<f64> {
    let text = child_text(person, tag)
        .ok_or_else(|| malformed(path, format!("missing <{}> element in <person>", tag)))?;
    text.parse::<f64>()
        .map_err(|_| malformed(path, format!("non-numeric <{}> value: {}", tag, text)))
}

fn number(path: &Path, tag: &str, value: f64) -> Result<Value> {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| malformed(path, format!("non-finite <{}> value", tag)))
}

fn malformed(path: &Path, message: String) -> TabFuseError {
    TabFuseError::MalformedXml {
        path: path.to_path_buf(),
        message,
    }
}
