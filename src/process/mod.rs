use std::fs::{self, File};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use zip::ZipArchive;

use crate::table::{RowTable, SelectError};

/// Why one archive contributed no data. Archives fail independently; the
/// caller logs the reason and moves on to the next one.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("unreadable archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("no CSV files found in archive")]
    NoCsvFiles,
    #[error("malformed CSV '{file}': {source}")]
    Csv { file: String, source: csv::Error },
    #[error("column selection failed: {0}")]
    Columns(#[from] SelectError),
}

/// Extract one ZIP export into a scratch directory under `work_root`, merge
/// every CSV found at its top level (file-name order, header rows skipped),
/// and keep only the `columns` positional indices.
///
/// The scratch directory is removed on every exit path. A failure yields a
/// `ProcessError` instead of a table; it never aborts the surrounding run.
#[tracing::instrument(level = "info", skip(zip_path, work_root, columns), fields(zip = %zip_path.as_ref().display()))]
pub fn process_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    zip_path: P,
    work_root: Q,
    columns: &[usize],
) -> Result<RowTable, ProcessError> {
    let zip_path = zip_path.as_ref();

    // Dropped on every return below, taking the extracted files with it.
    let scratch = tempfile::Builder::new()
        .prefix("extracted-")
        .tempdir_in(work_root.as_ref())?;

    let file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(file)?;
    archive.extract(scratch.path())?;
    info!("📂 extracted '{}'", zip_path.display());

    let csv_files = list_csv_files(scratch.path())?;
    if csv_files.is_empty() {
        return Err(ProcessError::NoCsvFiles);
    }
    info!("📑 reading and merging {} CSV files", csv_files.len());

    let mut merged = RowTable::new();
    for path in &csv_files {
        merged.append(load_csv(path)?);
    }

    info!("🔎 applying column filter");
    let selected = merged.select(columns)?;
    Ok(selected)
}

/// Top-level `*.csv` files inside `dir`, case-insensitive, sorted by name.
/// Anything the archive extracted into subdirectories is out of scope.
fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>, ProcessError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load one CSV as data rows. The first record is a header and is dropped;
/// the `csv` reader enforces UTF-8 and a uniform field count, so a ragged or
/// binary file fails the whole archive.
fn load_csv(path: &Path) -> Result<RowTable, ProcessError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| ProcessError::Csv {
            file: file_name.clone(),
            source,
        })?;

    let mut table = RowTable::new();
    for record in reader.records() {
        let record = record.map_err(|source| ProcessError::Csv {
            file: file_name.clone(),
            source,
        })?;
        table.push_row(record.iter().map(str::to_string).collect());
    }
    Ok(table)
}
