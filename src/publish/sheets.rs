use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use google_cloud_auth::credentials::CredentialsFile;
use google_cloud_auth::project::Config as AuthConfig;
use google_cloud_auth::token::DefaultTokenSourceProvider;
use google_cloud_token::TokenSourceProvider;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use url::Url;

use super::SheetStore;
use crate::config::Config;

/// Authorization scopes requested for the service account.
const SCOPES: &[&str] = &[
    "https://spreadsheets.google.com/feeds",
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

const SHEETS_ENDPOINT: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Sheets v4 REST client bound to one spreadsheet document.
pub struct SheetsApi {
    http: reqwest::Client,
    /// Full `Authorization` header value from the token source.
    token: String,
    spreadsheet_url: String,
    new_sheet_rows: u32,
    new_sheet_cols: u32,
}

impl SheetsApi {
    /// Authenticate with the configured service-account key file. Fails
    /// before any network round trip if the file is missing, so a
    /// misconfigured run never touches the destination.
    pub async fn connect(cfg: &Config) -> Result<Self> {
        if !cfg.credentials_path.exists() {
            bail!(
                "credentials file '{}' not found",
                cfg.credentials_path.display()
            );
        }

        let credentials =
            CredentialsFile::new_from_file(cfg.credentials_path.display().to_string())
                .await
                .context("reading credentials file")?;
        let auth = AuthConfig {
            scopes: Some(SCOPES),
            ..AuthConfig::default()
        };
        let provider = DefaultTokenSourceProvider::new_with_credentials(auth, Box::new(credentials))
            .await
            .context("building token source from credentials")?;
        let token = provider
            .token_source()
            .token()
            .await
            .map_err(|e| anyhow!("fetching access token: {e}"))?;

        Ok(SheetsApi {
            http: reqwest::Client::new(),
            token,
            spreadsheet_url: format!("{SHEETS_ENDPOINT}/{}", cfg.spreadsheet_id),
            new_sheet_rows: cfg.new_sheet_rows,
            new_sheet_cols: cfg.new_sheet_cols,
        })
    }

    async fn sheet_titles(&self) -> Result<Vec<String>> {
        #[derive(Deserialize)]
        struct SpreadsheetMeta {
            #[serde(default)]
            sheets: Vec<SheetEntry>,
        }
        #[derive(Deserialize)]
        struct SheetEntry {
            properties: SheetProperties,
        }
        #[derive(Deserialize)]
        struct SheetProperties {
            title: String,
        }

        let url = Url::parse_with_params(&self.spreadsheet_url, [("fields", "sheets.properties")])
            .context("building spreadsheet metadata URL")?;
        let resp = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.token.as_str())
            .send()
            .await
            .context("requesting spreadsheet metadata")?;
        let meta: SpreadsheetMeta = expect_success(resp, "spreadsheet lookup")
            .await?
            .json()
            .await
            .context("decoding spreadsheet metadata")?;
        Ok(meta
            .sheets
            .into_iter()
            .map(|s| s.properties.title)
            .collect())
    }
}

#[async_trait]
impl SheetStore for SheetsApi {
    async fn ensure_worksheet(&self, title: &str) -> Result<()> {
        if self.sheet_titles().await?.iter().any(|t| t == title) {
            return Ok(());
        }

        info!("worksheet '{title}' not found, creating it");
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": {
                            "rowCount": self.new_sheet_rows,
                            "columnCount": self.new_sheet_cols,
                        },
                    },
                },
            }],
        });
        let url = format!("{}:batchUpdate", self.spreadsheet_url);
        let resp = self
            .http
            .post(&url)
            .header(AUTHORIZATION, self.token.as_str())
            .json(&body)
            .send()
            .await
            .context("requesting worksheet creation")?;
        expect_success(resp, "worksheet creation").await?;
        Ok(())
    }

    async fn clear(&self, title: &str) -> Result<()> {
        let url = format!("{}/values/'{title}':clear", self.spreadsheet_url);
        let resp = self
            .http
            .post(&url)
            .header(AUTHORIZATION, self.token.as_str())
            .json(&json!({}))
            .send()
            .await
            .context("requesting worksheet clear")?;
        expect_success(resp, "worksheet clear").await?;
        Ok(())
    }

    async fn write_rows(&self, title: &str, rows: &[Vec<String>]) -> Result<()> {
        let range = format!("'{title}'!A1");
        let url = Url::parse_with_params(
            &format!("{}/values/{range}", self.spreadsheet_url),
            [("valueInputOption", "RAW")],
        )
        .context("building values write URL")?;
        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": rows,
        });
        let resp = self
            .http
            .put(url)
            .header(AUTHORIZATION, self.token.as_str())
            .json(&body)
            .send()
            .await
            .context("writing worksheet values")?;
        expect_success(resp, "worksheet write").await?;
        Ok(())
    }
}

/// Surface the API's own error payload; the status line alone is useless
/// when a write is rejected.
async fn expect_success(resp: reqwest::Response, action: &str) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(anyhow!("{action} failed: HTTP {status}: {body}"))
}
