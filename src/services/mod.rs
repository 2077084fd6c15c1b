pub mod ntp;
pub mod traceroute;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::NetlensError;

/// Read a whole log into memory. The only failure a run cannot recover from.
pub fn read_log(path: &Path) -> Result<String, NetlensError> {
    let text = fs::read_to_string(path).map_err(|source| NetlensError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "log loaded");
    Ok(text)
}

/// Write a rendered artifact (DOT graph, JSON document) to disk.
pub fn write_output(path: &Path, contents: &str) -> Result<(), NetlensError> {
    fs::write(path, contents).map_err(|source| NetlensError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = contents.len(), "output written");
    Ok(())
}
