//! CSV ingestion: header validation and raw row collection.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use tracing::{debug, info, warn};

use crate::error::{ReportError, Result};
use crate::models::{CsvRecord, REQUIRED_COLUMNS};

/// Rows read from one input, in file order.
#[derive(Debug, Clone)]
pub struct RawDataset {
    pub origin: PathBuf,
    pub rows: Vec<CsvRecord>,
    /// Rows the CSV layer could not decode (wrong field count, bad UTF-8).
    pub malformed_rows: usize,
}

/// Open `path` and read it as a sales dataset.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<RawDataset> {
    let path = path.as_ref();
    info!("Reading CSV from {:?}", path);
    let file = File::open(path).map_err(|source| ReportError::File {
        path: path.to_path_buf(),
        source,
    })?;
    read_dataset(file, path)
}

/// Read a sales dataset from any reader. `origin` names the source in errors.
pub fn read_dataset<R: Read>(reader: R, origin: impl AsRef<Path>) -> Result<RawDataset> {
    let origin = origin.as_ref().to_path_buf();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ReportError::Schema {
            path: origin,
            missing,
        });
    }

    let mut rows = Vec::new();
    let mut malformed_rows = 0;
    for (i, result) in reader.deserialize::<CsvRecord>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                if malformed_rows < 5 {
                    debug!("Skipping malformed row {}: {}", i + 1, e);
                }
                malformed_rows += 1;
            }
        }
    }

    if malformed_rows > 0 {
        warn!("{} malformed rows could not be decoded", malformed_rows);
    }
    info!("Parsed {} records from {:?}", rows.len(), origin);

    Ok(RawDataset {
        origin,
        rows,
        malformed_rows,
    })
}
