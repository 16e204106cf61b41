//! Input resolution

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Resolved text input
pub struct ResolvedText {
    pub text: String,
    pub source_name: String,
}

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::InputNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

/// Read a UTF-8 text file whole
pub fn resolve_text<P: AsRef<Path>>(path: P) -> Result<ResolvedText> {
    let path = path.as_ref();
    ensure_exists(path)?;

    let text = std::fs::read_to_string(path)?;

    Ok(ResolvedText {
        text,
        source_name: path.display().to_string(),
    })
}

/// Read and deserialize a JSON file whole
pub fn resolve_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    ensure_exists(path)?;

    let data = std::fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}
