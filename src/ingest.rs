use std::io::Read;
use std::path::Path;

use anyhow::Context;

use crate::models::{CsvData, RawRow};

/// Loads a task-tracking CSV export into memory: first line is the header,
/// blank lines are skipped, ragged rows keep whatever columns they have.
/// Tokenization failures are the only errors this tool reports; everything
/// past this point degrades to defaults instead of failing.
pub fn load_csv(path: &Path) -> anyhow::Result<CsvData> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    read_csv(file).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn read_csv<R: Read>(reader: R) -> anyhow::Result<CsvData> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("missing header row")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, field)| (header.clone(), field.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(CsvData { headers, rows })
}
