use std::path::PathBuf;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::locate;
use crate::process::{self, ProcessError};
use crate::publish;
use crate::table::RowTable;

/// One full run: locate archives, process each sequentially, publish the
/// combined table once at the end. "Nothing found" and "nothing valid" are
/// logged terminal successes, not errors.
pub async fn run(cfg: &Config) -> Result<()> {
    let archives = locate::find_archives(&cfg.archive_dir)?;
    if archives.is_empty() {
        warn!("⚠ no .zip files found in {}", cfg.archive_dir.display());
        return Ok(());
    }
    info!("🔍 found {} ZIP files", archives.len());

    let tables = collect_tables(cfg, &archives);
    if tables.is_empty() {
        warn!("⚠ no valid data processed");
        return Ok(());
    }

    let combined = RowTable::concat(tables);
    publish::publish(cfg, &combined).await;
    Ok(())
}

/// Process each archive in order, keeping only the ones that produced rows.
/// A failed archive is logged with its reason and contributes nothing.
fn collect_tables(cfg: &Config, archives: &[PathBuf]) -> Vec<RowTable> {
    let mut tables = Vec::new();
    for archive in archives {
        match process::process_archive(archive, &cfg.archive_dir, &cfg.columns) {
            Ok(table) if !table.is_empty() => tables.push(table),
            Ok(_) => warn!("⚠ {} contained no data rows", archive.display()),
            Err(ProcessError::NoCsvFiles) => {
                warn!("⚠ no CSV found in {}", archive.display());
            }
            Err(err) => error!("❌ error processing {}: {err}", archive.display()),
        }
    }
    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::Path;
    use tempfile::tempdir;
    use zip::write::FileOptions;
    use zip::CompressionMethod;

    fn test_config(archive_dir: &Path) -> Config {
        Config {
            archive_dir: archive_dir.to_path_buf(),
            credentials_path: archive_dir.join("absent-credentials.json"),
            ..Config::default()
        }
    }

    fn csv_body(tag: &str, rows: usize, cols: usize) -> String {
        let mut body = String::new();
        let header: Vec<String> = (0..cols).map(|c| format!("col{c}")).collect();
        body.push_str(&header.join(","));
        body.push('\n');
        for r in 0..rows {
            let row: Vec<String> = (0..cols).map(|c| format!("{tag}-r{r}-c{c}")).collect();
            body.push_str(&row.join(","));
            body.push('\n');
        }
        body
    }

    fn write_zip(dir: &Path, name: &str, entries: &[(&str, &str)]) -> Result<()> {
        let file = File::create(dir.join(name))?;
        let mut zip = zip::ZipWriter::new(file);
        for (entry_name, body) in entries {
            let options: FileOptions<'_, ()> =
                FileOptions::default().compression_method(CompressionMethod::Stored);
            zip.start_file(*entry_name, options)?;
            zip.write_all(body.as_bytes())?;
        }
        zip.finish()?;
        Ok(())
    }

    #[tokio::test]
    async fn empty_inbound_directory_is_a_successful_run() -> Result<()> {
        let dir = tempdir()?;
        run(&test_config(dir.path())).await?;
        Ok(())
    }

    #[test]
    fn collects_valid_archives_and_skips_broken_ones() -> Result<()> {
        let dir = tempdir()?;
        let cfg = test_config(dir.path());
        let a = csv_body("a", 2, 49);
        let b = csv_body("b", 3, 49);
        write_zip(dir.path(), "a.zip", &[("export.csv", &a)])?;
        write_zip(dir.path(), "b.zip", &[("export.csv", &b)])?;
        fs::write(dir.path().join("c.zip"), b"garbage")?;

        let archives = locate::find_archives(&cfg.archive_dir)?;
        assert_eq!(archives.len(), 3);

        let tables = collect_tables(&cfg, &archives);
        assert_eq!(tables.len(), 2);

        let combined = RowTable::concat(tables);
        assert_eq!(combined.len(), 5);
        assert!(combined.rows().iter().all(|row| row.len() == 5));
        // archive-then-row order: a.zip rows first, then b.zip
        assert_eq!(combined.rows()[0][0], "a-r0-c0");
        assert_eq!(combined.rows()[2][0], "b-r0-c0");
        Ok(())
    }

    #[tokio::test]
    async fn missing_credentials_does_not_fail_the_run() -> Result<()> {
        let dir = tempdir()?;
        let body = csv_body("a", 1, 49);
        write_zip(dir.path(), "a.zip", &[("export.csv", &body)])?;

        // publishing fails (no credentials file) but the run still completes
        run(&test_config(dir.path())).await?;
        Ok(())
    }
}
