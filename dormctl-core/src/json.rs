//! JSON file helpers shared by the load and report stages.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;
use tracing::debug;

use crate::error::{DormError, Result};

/// Read a JSON array of records from `path`.
pub fn load_array<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DormError::io(path, e))?;
    let records: Vec<T> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| DormError::json(path.display().to_string(), e))?;
    debug!("read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Write `value` to `path` as JSON indented with four spaces, replacing any
/// existing file.
pub fn save_pretty<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| DormError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    let mut serializer = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .map_err(|e| DormError::json(path.display().to_string(), e))?;

    writer.flush().map_err(|e| DormError::io(path, e))?;
    debug!("wrote {}", path.display());
    Ok(())
}
