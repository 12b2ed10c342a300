//! Where sheet CSV text comes from.
//!
//! `HttpSheetSource` GETs a published Google Sheets export; `StaticSheetSource`
//! serves fixed text (or a fixed failure) for tests and local files.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};
use tracing::debug;

use crate::error::{FetchError, Result};

/// Something that can produce the raw CSV body of the sheet
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch(&self) -> Result<String>;
}

/// Address of a sheet export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetUrl {
    /// Full "publish to web" CSV link (`.../pub?output=csv`)
    Published(String),
    /// Spreadsheet id, exported through the gviz CSV endpoint
    Gviz {
        sheet_id: String,
        sheet_name: Option<String>,
    },
}

impl SheetUrl {
    /// Resolve to a URL, appending `t=<millis>` when a cache buster is given.
    pub fn resolve(&self, cache_buster: Option<i64>) -> Result<Url> {
        let mut url = match self {
            SheetUrl::Published(raw) => {
                Url::parse(raw.trim()).map_err(|e| FetchError::Config(format!("{raw}: {e}")))?
            }
            SheetUrl::Gviz {
                sheet_id,
                sheet_name,
            } => {
                let id = sheet_id.trim();
                if id.is_empty() {
                    return Err(FetchError::Config("empty sheet id".to_string()));
                }
                let base = format!("https://docs.google.com/spreadsheets/d/{id}/gviz/tq");
                let mut url =
                    Url::parse(&base).map_err(|e| FetchError::Config(format!("{base}: {e}")))?;
                url.query_pairs_mut().append_pair("tqx", "out:csv");
                if let Some(name) = sheet_name.as_deref().filter(|n| !n.trim().is_empty()) {
                    url.query_pairs_mut().append_pair("sheet", name);
                }
                url
            }
        };

        if let Some(t) = cache_buster {
            url.query_pairs_mut().append_pair("t", &t.to_string());
        }
        Ok(url)
    }
}

/// Fetches the sheet over HTTP with a plain GET
pub struct HttpSheetSource {
    client: Client,
    url: SheetUrl,
    cache_bust: bool,
}

impl HttpSheetSource {
    pub fn new(url: SheetUrl, timeout: Duration, cache_bust: bool) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url,
            cache_bust,
        })
    }

    pub fn url(&self) -> &SheetUrl {
        &self.url
    }
}

#[async_trait]
impl SheetSource for HttpSheetSource {
    async fn fetch(&self) -> Result<String> {
        let buster = self.cache_bust.then(|| Utc::now().timestamp_millis());
        let url = self.url.resolve(buster)?;
        debug!(%url, "fetching sheet");

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        Ok(resp.text().await?)
    }
}

/// Serves a fixed body, or fails every time
#[derive(Debug, Clone)]
pub struct StaticSheetSource {
    body: std::result::Result<String, String>,
}

impl StaticSheetSource {
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            body: Ok(body.into()),
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            body: Err(reason.into()),
        }
    }
}

#[async_trait]
impl SheetSource for StaticSheetSource {
    async fn fetch(&self) -> Result<String> {
        self.body.clone().map_err(FetchError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_url_gets_cache_buster() {
        let url = SheetUrl::Published(
            "https://docs.google.com/spreadsheets/d/e/abc/pub?output=csv".to_string(),
        );
        let resolved = url.resolve(Some(1735689600000)).unwrap();
        assert_eq!(
            resolved.as_str(),
            "https://docs.google.com/spreadsheets/d/e/abc/pub?output=csv&t=1735689600000"
        );
        let plain = url.resolve(None).unwrap();
        assert_eq!(plain.query(), Some("output=csv"));
    }

    #[test]
    fn test_gviz_url_with_sheet_name() {
        let url = SheetUrl::Gviz {
            sheet_id: "1AbC".to_string(),
            sheet_name: Some("Pengeluaran Q4".to_string()),
        };
        let resolved = url.resolve(None).unwrap();
        assert_eq!(resolved.path(), "/spreadsheets/d/1AbC/gviz/tq");
        let pairs: Vec<(String, String)> = resolved
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("tqx".to_string(), "out:csv".to_string()),
                ("sheet".to_string(), "Pengeluaran Q4".to_string()),
            ]
        );
    }

    #[test]
    fn test_gviz_without_id_is_config_error() {
        let url = SheetUrl::Gviz {
            sheet_id: "  ".to_string(),
            sheet_name: None,
        };
        assert!(matches!(url.resolve(None), Err(FetchError::Config(_))));
    }

    #[test]
    fn test_bad_published_url_is_config_error() {
        let url = SheetUrl::Published("not a url".to_string());
        assert!(matches!(url.resolve(None), Err(FetchError::Config(_))));
    }
}
