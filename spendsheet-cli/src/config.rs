use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use spendsheet_sync::SheetUrl;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::state::{ensure_spendsheet_home, spendsheet_home};

/// Overrides `sheet.sheet_id` when set
pub const SHEET_ID_ENV: &str = "GOOGLE_SHEET_ID";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sheet: SheetSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetSection {
    /// Full "publish to web" CSV link. Wins over `sheet_id` when set.
    pub csv_url: String,
    /// Spreadsheet id for the gviz CSV export
    pub sheet_id: String,
    /// Optional tab name for the gviz export
    pub sheet_name: String,
    pub timeout_secs: u64,
    /// Append `t=<millis>` so caches never serve an old export
    pub cache_bust: bool,
}

impl Default for SheetSection {
    fn default() -> Self {
        Self {
            csv_url: String::new(),
            sheet_id: String::new(),
            sheet_name: String::new(),
            timeout_secs: 20,
            cache_bust: true,
        }
    }
}

impl SheetSection {
    /// Pick the sheet address. `env_sheet_id` replaces the configured id.
    pub fn sheet_url(&self, env_sheet_id: Option<String>) -> Result<SheetUrl> {
        if !self.csv_url.trim().is_empty() {
            return Ok(SheetUrl::Published(self.csv_url.trim().to_string()));
        }

        let sheet_id = env_sheet_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| self.sheet_id.clone());
        if sheet_id.trim().is_empty() {
            bail!(
                "no sheet configured: set sheet.csv_url or sheet.sheet_id in {}, or export {SHEET_ID_ENV}",
                config_path_display()
            );
        }

        let sheet_name = Some(self.sheet_name.trim().to_string()).filter(|n| !n.is_empty());
        Ok(SheetUrl::Gviz {
            sheet_id: sheet_id.trim().to_string(),
            sheet_name,
        })
    }

    /// The URL a fetch would hit, `GOOGLE_SHEET_ID` applied. No cache buster.
    pub fn describe_sheet(&self, env_sheet_id: Option<String>) -> String {
        match self.sheet_url(env_sheet_id) {
            Ok(sheet) => match sheet.resolve(None) {
                Ok(url) => url.to_string(),
                Err(e) => format!("invalid ({e})"),
            },
            Err(_) => "none".to_string(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_spendsheet_home()?.join("config.toml"))
}

fn config_path_display() -> String {
    spendsheet_home()
        .map(|p| p.join("config.toml").display().to_string())
        .unwrap_or_else(|_| "~/.spendsheet/config.toml".to_string())
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
