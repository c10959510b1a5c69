use crate::error::{Result, TabFuseError};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// One row of tabular data: an ordered mapping from field name to scalar
/// value. An absent field is an absent key, not a null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, name: S, value: Value) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Lowercase every field name, preserving field order. If two names
    /// collide after lowercasing, the later field wins.
    pub fn lowercase_field_names(&mut self) {
        let fields = std::mem::take(&mut self.fields);
        for (name, value) in fields {
            self.fields.insert(name.to_lowercase(), value);
        }
    }

    /// Coerce a named field to a number. Numeric strings are accepted;
    /// anything else is a typed error naming the field.
    pub fn numeric(&self, name: &str) -> Result<f64> {
        let value = self.get(name).ok_or_else(|| TabFuseError::MissingField {
            field: name.to_string(),
        })?;

        match value {
            Value::Number(n) => n.as_f64().ok_or_else(|| TabFuseError::NonNumericField {
                field: name.to_string(),
                value: n.to_string(),
            }),
            Value::String(s) => {
                s.trim()
                    .parse::<f64>()
                    .map_err(|_| TabFuseError::NonNumericField {
                        field: name.to_string(),
                        value: s.clone(),
                    })
            }
            other => Err(TabFuseError::NonNumericField {
                field: name.to_string(),
                value: other.to_string(),
            }),
        }
    }

    pub fn set_numeric(&mut self, name: &str, value: f64) -> Result<()> {
        let number =
            serde_json::Number::from_f64(value).ok_or_else(|| TabFuseError::NonFiniteNumber {
                field: name.to_string(),
            })?;
        self.fields.insert(name.to_string(), Value::Number(number));
        Ok(())
    }

    /// Canonical rendering with sorted field names. Two records are exact
    /// duplicates iff their canonical keys match, independent of field order.
    pub fn canonical_key(&self) -> String {
        let sorted: BTreeMap<&String, &Value> = self.fields.iter().collect();
        let parts: Vec<String> = sorted
            .into_iter()
            .map(|(name, value)| {
                format!(
                    "{}:{}",
                    serde_json::to_string(name).unwrap_or_default(),
                    canonical_value(value)
                )
            })
            .collect();
        format!("{{{}}}", parts.join(","))
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

fn canonical_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => serde_json::to_string(s).unwrap_or_default(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// An ordered sequence of records, the unit of data passed between pipeline
/// phases. Records are not required to share a schema.
#[derive(Debug, Clone, Default)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Flatten another table's records onto the end of this one.
    pub fn extend(&mut self, other: Table) {
        self.records.extend(other.records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Union of field names across all records, in first-seen order: the
    /// first record's fields lead, later records' extra fields are appended.
    pub fn column_order(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for record in &self.records {
            for name in record.field_names() {
                if seen.insert(name.to_string()) {
                    columns.push(name.to_string());
                }
            }
        }
        columns
    }

    /// Remove records that are exact duplicates across all fields, keeping
    /// the first occurrence. Returns the number of records removed.
    pub fn dedup_exact(&mut self) -> usize {
        let before = self.records.len();
        let mut seen = HashSet::with_capacity(before);
        self.records.retain(|record| seen.insert(record.canonical_key()));
        before - self.records.len()
    }
}

impl IntoIterator for Table {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl FromIterator<Record> for Table {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
