use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

use crate::models::TreatmentRow;
use crate::normalize::RawRow;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open dataset {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read row {line} of {}: {source}", path.display())]
    Row {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Open { path, .. } | LoadError::Row { path, .. } => path,
        }
    }
}

/// Read every row of a headed CSV file. Rows are kept as raw strings;
/// numeric coercion happens in [`crate::normalize`].
pub fn load_rows(path: &Path) -> Result<Vec<RawRow>, LoadError> {
    let rows: Vec<RawRow> = collect_rows(open(path)?, path)?;
    info!(path = %path.display(), rows = rows.len(), "loaded dataset");
    Ok(rows)
}

pub fn read_rows<R: Read>(input: R) -> Result<Vec<RawRow>, LoadError> {
    collect_rows(csv::Reader::from_reader(input), Path::new("<stream>"))
}

/// Read the weekly treatment survey. Blank estimates stay `None`.
pub fn load_treatment_rows(path: &Path) -> Result<Vec<TreatmentRow>, LoadError> {
    let rows: Vec<TreatmentRow> = collect_rows(open(path)?, path)?;
    info!(path = %path.display(), rows = rows.len(), "loaded treatment dataset");
    Ok(rows)
}

pub fn read_treatment_rows<R: Read>(input: R) -> Result<Vec<TreatmentRow>, LoadError> {
    collect_rows(csv::Reader::from_reader(input), Path::new("<stream>"))
}

fn open(path: &Path) -> Result<csv::Reader<File>, LoadError> {
    csv::Reader::from_path(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn collect_rows<R, T>(mut reader: csv::Reader<R>, path: &Path) -> Result<Vec<T>, LoadError>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut rows = Vec::new();

    for (position, result) in reader.deserialize::<T>().enumerate() {
        let row = result.map_err(|source| LoadError::Row {
            path: path.to_path_buf(),
            line: source
                .position()
                .map(|pos| pos.line())
                .unwrap_or(position as u64 + 2),
            source,
        })?;
        rows.push(row);
    }

    Ok(rows)
}
