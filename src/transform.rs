use crate::error::Result;
use crate::journal::RunJournal;
use crate::table::{Record, Table};

pub const INCHES_TO_METERS: f64 = 0.0254;
pub const POUNDS_TO_KILOGRAMS: f64 = 0.453592;

const HEIGHT_FIELD: &str = "height";
const WEIGHT_FIELD: &str = "weight";

/// The transformation phase, total over the table: lowercase every field
/// name, convert `height` from inches to meters and `weight` from pounds to
/// kilograms, round both to 2 decimal places. A record missing either field,
/// or carrying a non-numeric value, fails the whole table.
pub fn transform(table: Table, journal: &dyn RunJournal) -> Result<Table> {
    journal.record(
        "Transforming data: converting height (inches to meters), weight (pounds to kilograms)",
    )?;

    let mut transformed = Table::with_capacity(table.len());
    for mut record in table {
        record.lowercase_field_names();
        convert_field(&mut record, HEIGHT_FIELD, INCHES_TO_METERS)?;
        convert_field(&mut record, WEIGHT_FIELD, POUNDS_TO_KILOGRAMS)?;
        transformed.push(record);
    }

    journal.record("Transformation completed")?;
    Ok(transformed)
}

fn convert_field(record: &mut Record, field: &str, factor: f64) -> Result<()> {
    let value = record.numeric(field)?;
    record.set_numeric(field, round2(value * factor))
}

/// Round to 2 decimal places, half away from zero (`f64::round` semantics).
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
