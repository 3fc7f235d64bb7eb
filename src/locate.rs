use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// List every `*.zip` file directly inside `dir`, case-insensitively, sorted
/// by path so downstream row order is reproducible. The directory is created
/// if absent; an empty listing is a normal outcome, not an error.
pub fn find_archives(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .with_context(|| format!("creating archive directory {}", dir.display()))?;

    let mut found = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_zip = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
        if is_zip {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}
