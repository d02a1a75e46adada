// maFile discovery and roster loading

use std::fs;
use std::path::{Path, PathBuf};

use mafile_recon::is_mafile_name;

/// Names of the maFiles directly inside `folder`, sorted.
pub fn list_mafiles(folder: &Path) -> Result<Vec<String>, String> {
    if !folder.is_dir() {
        return Err(format!("folder does not exist: {}", folder.display()));
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(folder).map_err(|e| e.to_string())? {
        let entry = entry.map_err(|e| e.to_string())?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_mafile_name(&name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Expand directories into their maFiles; plain files pass through unchanged.
/// Input order is kept, directory contents are sorted.
pub fn expand_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>, String> {
    let mut out = Vec::new();
    for path in paths {
        if path.is_dir() {
            let names = list_mafiles(path)?;
            log::debug!("{}: {} maFile(s)", path.display(), names.len());
            out.extend(names.into_iter().map(|n| path.join(n)));
        } else {
            out.push(path.clone());
        }
    }
    Ok(out)
}

/// Raw roster bytes; decoding is left to the roster parser.
pub fn read_roster(path: &Path) -> Result<Vec<u8>, String> {
    fs::read(path).map_err(|e| format!("cannot read {}: {e}", path.display()))
}
