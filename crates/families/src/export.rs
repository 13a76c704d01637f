use std::io::Write;

use crate::model::{FamilySet, Sku};

/// `[anchor] + members` for every family, smallest row first.
///
/// Rows of equal length keep anchor rank order.
pub fn family_rows(families: &FamilySet) -> Vec<Vec<Sku>> {
    let mut rows: Vec<Vec<Sku>> = families.iter().map(|f| f.row()).collect();
    rows.sort_by_key(|row| row.len());
    rows
}

/// Write rows as one compact JSON array of arrays.
pub fn write_json_rows<W: Write>(writer: W, rows: &[Vec<Sku>]) -> serde_json::Result<()> {
    serde_json::to_writer(writer, rows)
}

/// Write rows one per line, no header. Rows may differ in length.
pub fn write_delimited_rows<W: Write>(
    writer: W,
    rows: &[Vec<Sku>],
    delimiter: u8,
) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_writer(writer);
    for row in rows {
        wtr.write_record(row.iter().map(|sku| sku.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}
