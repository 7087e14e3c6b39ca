use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{MemeError, MemeResult};
use crate::text::params::FontFamily;

/// Font bytes for each editor family, plus an optional face used for unregistered families.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    faces: BTreeMap<FontFamily, Arc<Vec<u8>>>,
    fallback: Option<Arc<Vec<u8>>>,
}

/// Font bytes picked for a family.
#[derive(Clone, Debug)]
pub struct ResolvedFace {
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
    /// `true` when the family had no face of its own.
    pub is_fallback: bool,
}

impl FontBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register font bytes for a family, replacing any earlier face.
    pub fn register(&mut self, family: FontFamily, bytes: Vec<u8>) -> &mut Self {
        self.faces.insert(family, Arc::new(bytes));
        self
    }

    /// Set the face used for families without their own.
    pub fn set_fallback(&mut self, bytes: Vec<u8>) -> &mut Self {
        self.fallback = Some(Arc::new(bytes));
        self
    }

    /// Book whose only face is `bytes`, used for every family.
    pub fn with_fallback(bytes: Vec<u8>) -> Self {
        let mut book = Self::new();
        book.set_fallback(bytes);
        book
    }

    /// Read a font file and register it for `family`.
    pub fn register_file(&mut self, family: FontFamily, path: &Path) -> MemeResult<&mut Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Ok(self.register(family, bytes))
    }

    /// Read a font file and use it as the fallback face.
    pub fn set_fallback_file(&mut self, path: &Path) -> MemeResult<&mut Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Ok(self.set_fallback(bytes))
    }

    /// Scan `dir` (non-recursively) for the conventional file names of each family, e.g.
    /// `impact.ttf`, `Comic Sans MS.ttf` or `cour.ttf`. Returns how many families were found.
    pub fn scan_dir(&mut self, dir: &Path) -> MemeResult<usize> {
        let entries =
            std::fs::read_dir(dir).with_context(|| format!("read font dir '{}'", dir.display()))?;

        let mut by_stem = BTreeMap::<String, std::path::PathBuf>::new();
        for entry in entries {
            let path = entry.context("read font dir entry")?.path();
            let is_font = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf"));
            if !is_font {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                let key: String = stem
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .flat_map(char::to_lowercase)
                    .collect();
                by_stem.insert(key, path);
            }
        }

        let mut found = 0usize;
        for family in FontFamily::ALL {
            let hit = family
                .file_stems()
                .iter()
                .find_map(|stem| by_stem.get(*stem));
            if let Some(path) = hit {
                self.register_file(family, path)?;
                found += 1;
            }
        }
        tracing::debug!(dir = %dir.display(), found, "scanned font directory");
        Ok(found)
    }

    /// Return `true` when `family` has a face of its own.
    pub fn has_family(&self, family: FontFamily) -> bool {
        self.faces.contains_key(&family)
    }

    /// Return `true` when a fallback face is configured.
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Pick the face for `family`, falling back when needed.
    pub fn resolve(&self, family: FontFamily) -> MemeResult<ResolvedFace> {
        if let Some(bytes) = self.faces.get(&family) {
            return Ok(ResolvedFace {
                bytes: Arc::clone(bytes),
                is_fallback: false,
            });
        }
        match &self.fallback {
            Some(bytes) => Ok(ResolvedFace {
                bytes: Arc::clone(bytes),
                is_fallback: true,
            }),
            None => Err(MemeError::validation(format!(
                "no font registered for family \"{family}\" and no fallback face configured"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fonts.rs"]
mod tests;
