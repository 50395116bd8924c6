use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Line {line}: '{token}' is not a number.")]
    InvalidNumber { line: u64, token: String },
}

fn table_reader() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All);
    builder
}

/// Reads every number from a comma-separated table, row by row.
///
/// Rows may have any number of fields. Blank lines and lines starting with `#` are skipped.
pub fn read_float_table(path: &Path) -> Result<Vec<f64>, ParseError> {
    collect_floats(table_reader().from_path(path)?)
}

pub fn parse_float_table(content: &str) -> Result<Vec<f64>, ParseError> {
    collect_floats(table_reader().from_reader(content.as_bytes()))
}

fn collect_floats<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<f64>, ParseError> {
    let mut values = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        for token in record.iter().filter(|t| !t.is_empty()) {
            let value = token
                .parse::<f64>()
                .map_err(|_| ParseError::InvalidNumber {
                    line,
                    token: token.to_string(),
                })?;
            values.push(value);
        }
    }
    Ok(values)
}

/// Writes flat `natom * 3` forces as a comma-separated table, one atom per row.
pub fn write_forces(path: &Path, forces: &[f64]) -> Result<(), ParseError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    for atom in forces.chunks(3) {
        writer.write_record(atom.iter().map(|f| format!("{:.8}", f)))?;
    }
    writer.flush()?;
    Ok(())
}
