//! Plugin discovery - Finds loadable modules on disk

use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use crate::application::errors::PluginResult;
use crate::infrastructure::config::LoadFailurePolicy;

/// List every module under `dir` whose extension matches, recursively
///
/// Symlinks are followed, so versioned installs like `libfoo.so ->
/// libfoo.so.1` are found. A missing directory yields an empty list.
/// Entries are sorted by file name within each directory so the load order
/// is stable across runs. Walk errors abort the scan unless `policy` is
/// `Skip`, in which case the offending entry is left out.
pub fn find_modules(dir: &Path, extension: &str, policy: LoadFailurePolicy) -> PluginResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        tracing::debug!("Plugin directory does not exist: {}", dir.display());
        return Ok(Vec::new());
    }

    let mut modules = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if policy == LoadFailurePolicy::Skip => {
                tracing::warn!("Skipping unreadable plugin path: {}", e);
                continue;
            }
            Err(e) => return Err(std::io::Error::from(e).into()),
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches {
            modules.push(entry.into_path());
        }
    }

    tracing::debug!("Found {} module(s) in {}", modules.len(), dir.display());
    Ok(modules)
}
