//! Delimited input files.
//!
//! Input sheets are exported from spreadsheets: semicolon separated, UTF-8,
//! a header row, and blank cells wherever a value is missing.
//! Row structs use `#[serde(default)]` so blank or absent columns read as
//! empty strings.

use crate::{Result, error::SmusError};
use serde::de::DeserializeOwned;
use std::{io::Read, path::Path};

/// Delimiter used by the input sheets.
pub const DEFAULT_INPUT_DELIMITER: char = ';';

/// Converts a delimiter character to the single byte the CSV reader wants.
///
/// # Errors
/// Returns error for non-ASCII delimiters
pub fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            SmusError::configuration(format!("Delimiter must be a single ASCII character, got '{}'", delimiter))
        })
}

/// Reads every row of a delimited file.
///
/// # Errors
/// Returns error if the file cannot be opened or a row does not match `T`
pub fn read_rows<T: DeserializeOwned>(path: &Path, delimiter: char) -> Result<Vec<T>> {
    let reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte(delimiter)?)
        .flexible(true)
        .from_path(path)
        .map_err(|e| SmusError::csv(format!("Failed to open {}", path.display()), e))?;

    let rows = deserialize_all(reader, &path.display().to_string())?;
    tracing::info!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Reads every row from an in-memory or streamed source.
///
/// # Errors
/// Returns error if a row does not match `T`
pub fn read_rows_from<R: Read, T: DeserializeOwned>(source: R, delimiter: char) -> Result<Vec<T>> {
    let reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte(delimiter)?)
        .flexible(true)
        .from_reader(source);

    deserialize_all(reader, "input")
}

fn deserialize_all<R: Read, T: DeserializeOwned>(
    mut reader: csv::Reader<R>,
    context: &str,
) -> Result<Vec<T>> {
    reader
        .deserialize()
        .enumerate()
        .map(|(index, row)| {
            row.map_err(|e| {
                SmusError::csv(format!("Invalid row {} in {}", index.saturating_add(1), context), e)
            })
        })
        .collect()
}
