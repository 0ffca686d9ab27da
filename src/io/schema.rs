//! Read/write prior schema JSON files.
//!
//! The on-disk format is the document accepted by
//! `PriorSchemaStore::from_document`: model class → parameter → entry.
//! Infinite limits are written as the strings `"inf"` / `"-inf"`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::PriorError;
use crate::schema::PriorSchemaStore;

fn io_error(path: &Path, message: String) -> PriorError {
    PriorError::Io {
        path: path.to_path_buf(),
        message,
    }
}

/// Load and validate a schema file.
pub fn read_schema_json(path: &Path) -> Result<PriorSchemaStore, PriorError> {
    let file = File::open(path).map_err(|e| io_error(path, format!("failed to open: {e}")))?;
    PriorSchemaStore::from_reader(BufReader::new(file))
}

/// Write the store's canonical document form.
pub fn write_schema_json(path: &Path, store: &PriorSchemaStore) -> Result<(), PriorError> {
    let document = store.to_document()?;
    let file = File::create(path).map_err(|e| io_error(path, format!("failed to create: {e}")))?;
    serde_json::to_writer_pretty(file, &document)
        .map_err(|e| io_error(path, format!("failed to write: {e}")))?;
    Ok(())
}
