use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::table::RowTable;

pub mod sheets;

pub use sheets::SheetsApi;

/// The spreadsheet operations this pipeline consumes. The real store talks to
/// the Sheets REST API; tests substitute a recording mock.
#[async_trait]
pub trait SheetStore {
    /// Make sure a worksheet with this title exists, creating it if needed.
    async fn ensure_worksheet(&self, title: &str) -> Result<()>;
    /// Remove every existing value from the worksheet.
    async fn clear(&self, title: &str) -> Result<()>;
    /// Write rows starting at the sheet origin, header-less.
    async fn write_rows(&self, title: &str, rows: &[Vec<String>]) -> Result<()>;
}

/// Replace the worksheet's contents with `table`: ensure it exists, clear it,
/// write everything. An empty table is a warned no-op that touches nothing.
///
/// Clear-then-write is not transactional; a failure in between leaves the
/// worksheet empty until the next successful run.
pub async fn publish_table(
    store: &dyn SheetStore,
    worksheet: &str,
    table: &RowTable,
) -> Result<()> {
    if table.is_empty() {
        warn!("⚠ no data to send to worksheet '{worksheet}'");
        return Ok(());
    }

    info!("⬆ sending {} rows to worksheet '{worksheet}'", table.len());
    let rows = table.text_rows();
    store.ensure_worksheet(worksheet).await?;
    store.clear(worksheet).await?;
    store.write_rows(worksheet, &rows).await?;
    info!("✅ data sent to worksheet '{worksheet}'");
    Ok(())
}

/// Publish boundary for the pipeline: authenticate with the configured
/// credentials, then replace the worksheet. Every failure past this point is
/// logged with its full chain and swallowed; a failed publish is a reported
/// outcome, not a fatal one.
pub async fn publish(cfg: &Config, table: &RowTable) {
    if table.is_empty() {
        warn!("⚠ no data to send to worksheet '{}'", cfg.worksheet);
        return;
    }

    let outcome = async {
        let store = SheetsApi::connect(cfg).await?;
        publish_table(&store, &cfg.worksheet, table).await
    }
    .await;

    if let Err(err) = outcome {
        error!("❌ failed to update worksheet '{}': {err:?}", cfg.worksheet);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Ensure(String),
        Clear(String),
        Write(String, Vec<Vec<String>>),
    }

    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<Call>>,
    }

    #[async_trait]
    impl SheetStore for RecordingStore {
        async fn ensure_worksheet(&self, title: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Ensure(title.to_string()));
            Ok(())
        }

        async fn clear(&self, title: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Clear(title.to_string()));
            Ok(())
        }

        async fn write_rows(&self, title: &str, rows: &[Vec<String>]) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Write(title.to_string(), rows.to_vec()));
            Ok(())
        }
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[tokio::test]
    async fn empty_table_performs_no_store_calls() -> Result<()> {
        let store = RecordingStore::default();
        publish_table(&store, "Base", &RowTable::new()).await?;
        assert!(store.calls.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn publishes_ensure_then_clear_then_write() -> Result<()> {
        let store = RecordingStore::default();
        let table = RowTable::from(vec![row(&["a", "b"]), row(&["c"])]);

        publish_table(&store, "Base", &table).await?;

        let calls = store.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                Call::Ensure("Base".to_string()),
                Call::Clear("Base".to_string()),
                // short row padded to the table width for the destination
                Call::Write("Base".to_string(), vec![row(&["a", "b"]), row(&["c", ""])]),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn republishing_unchanged_table_writes_identical_rows() -> Result<()> {
        let store = RecordingStore::default();
        let table = RowTable::from(vec![row(&["a", "b"]), row(&["c", "d"])]);

        publish_table(&store, "Base", &table).await?;
        publish_table(&store, "Base", &table).await?;

        let calls = store.calls.lock().unwrap();
        let writes: Vec<_> = calls
            .iter()
            .filter(|c| matches!(c, Call::Write(..)))
            .collect();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0], writes[1]);
        Ok(())
    }
}
