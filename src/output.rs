//! Output writing
//!
//! Documents are rendered in memory first and written in one call, so a run
//! that fails never leaves a partial file behind.

use crate::error::Result;
use serde::Serialize;
use std::path::Path;

/// Pretty JSON with four-space indentation. Non-ASCII text is written as-is.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Write a finished document, creating parent directories as needed
pub fn write_output<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<()> {
    let path = path.as_ref();

    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(path, data)?;
    Ok(())
}
