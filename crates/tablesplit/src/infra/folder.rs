//! Output folder creation

use std::fs;
use std::io;
use std::path::Path;

/// Create a folder (and its parents) if it does not exist yet
///
/// Returns `true` when the folder was newly created. An existing folder is
/// left untouched, including its contents.
pub fn create_folder(path: impl AsRef<Path>) -> io::Result<bool> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path)?;
    Ok(true)
}
