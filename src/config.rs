use std::path::PathBuf;

/// Everything the pipeline treats as fixed for one run: where archives land,
/// which spreadsheet receives them, and which source columns survive.
///
/// Production values live in `Default`; tests build their own.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory scanned for `*.zip` exports; extraction scratch
    /// subdirectories are created under it too.
    pub archive_dir: PathBuf,
    /// Service-account key file. Checked for existence before any network
    /// call is made.
    pub credentials_path: PathBuf,
    /// Document key of the destination spreadsheet.
    pub spreadsheet_id: String,
    /// Name of the single worksheet that gets cleared and rewritten.
    pub worksheet: String,
    /// Positional column indices kept from the merged export, in output order.
    pub columns: Vec<usize>,
    /// Grid size used when the worksheet has to be created.
    pub new_sheet_rows: u32,
    pub new_sheet_cols: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            archive_dir: PathBuf::from("/tmp/shopee_automation"),
            credentials_path: PathBuf::from("hxh.json"),
            spreadsheet_id: "1Ie3u58e-PT1ZEQJE20a6GJB-icJEXBRVDVxTzxCqq4c".to_string(),
            worksheet: "Base".to_string(),
            columns: vec![0, 14, 39, 40, 48],
            new_sheet_rows: 1000,
            new_sheet_cols: 20,
        }
    }
}
