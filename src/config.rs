//! Application configuration: JSON file plus environment overrides.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::MemeResult;
use crate::remote::payload::DEFAULT_API_BASE;
use crate::render::fonts::FontBook;
use crate::text::params::{FontFamily, TextLayerParams};

/// Overrides [`AppConfig::api_base`].
pub const ENV_API_BASE: &str = "MEMEFRAME_API_BASE";
/// Overrides [`FontConfig::dir`].
pub const ENV_FONT_DIR: &str = "MEMEFRAME_FONT_DIR";

/// Where font faces come from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontConfig {
    /// Directory scanned for conventional family file names.
    pub dir: Option<PathBuf>,
    /// Face used for families without one of their own.
    pub fallback: Option<PathBuf>,
    /// Explicit per-family files; these win over `dir`.
    pub families: BTreeMap<FontFamily, PathBuf>,
}

impl FontConfig {
    /// Load every configured face into a [`FontBook`].
    pub fn font_book(&self) -> MemeResult<FontBook> {
        let mut book = FontBook::new();
        if let Some(dir) = &self.dir {
            book.scan_dir(dir)?;
        }
        for (family, path) in &self.families {
            book.register_file(*family, path)?;
        }
        if let Some(path) = &self.fallback {
            book.set_fallback_file(path)?;
        }
        Ok(book)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        let fix = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        if let Some(dir) = self.dir.as_mut() {
            fix(dir);
        }
        if let Some(fallback) = self.fallback.as_mut() {
            fix(fallback);
        }
        self.families.values_mut().for_each(fix);
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Root URL of the meme service.
    pub api_base: String,
    /// Font sources.
    pub fonts: FontConfig,
    /// Text parameters a fresh editor starts with.
    pub defaults: TextLayerParams,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            fonts: FontConfig::default(),
            defaults: TextLayerParams::default(),
        }
    }
}

impl AppConfig {
    /// Parse a JSON document. Relative font paths stay as written.
    pub fn from_json(json: &str) -> MemeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON config file. Relative font paths resolve against the file's directory.
    pub fn from_file(path: &Path) -> MemeResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let mut cfg = Self::from_json(&json)?;
        if let Some(base) = path.parent() {
            cfg.fonts.resolve_relative_to(base);
        }
        Ok(cfg)
    }

    /// `path`'s config, or the defaults, with process environment overrides applied.
    pub fn load(path: Option<&Path>) -> MemeResult<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        cfg.apply_env_with(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Apply overrides looked up through `var`. Blank values are ignored.
    pub fn apply_env_with(&mut self, var: impl Fn(&str) -> Option<String>) {
        let non_blank = |key: &str| var(key).filter(|v| !v.trim().is_empty());
        if let Some(base) = non_blank(ENV_API_BASE) {
            tracing::debug!(api_base = %base, "api base overridden from environment");
            self.api_base = base.trim().to_owned();
        }
        if let Some(dir) = non_blank(ENV_FONT_DIR) {
            tracing::debug!(dir = %dir, "font dir overridden from environment");
            self.fonts.dir = Some(PathBuf::from(dir.trim()));
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
