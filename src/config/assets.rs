//! Asset lookup
//!
//! Icons are small text glyph files (`back.txt` holds the glyph drawn on
//! the back button). Missing assets never fail the UI: they resolve to a
//! blank icon.

use crate::{CmpMenuError, Result, ASSETS_DIR};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Asset name of the back-button glyph
pub const BACK_ICON: &str = "back.txt";

/// Longest glyph accepted from an asset file, in characters
const MAX_GLYPH_CHARS: usize = 4;

/// Where an asset came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    File(PathBuf),
    Blank,
}

/// A resolved icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub name: String,
    pub glyph: String,
    pub source: AssetSource,
}

impl Asset {
    /// The documented fallback for a missing asset
    pub fn blank(name: &str) -> Self {
        Self {
            name: name.to_string(),
            glyph: String::new(),
            source: AssetSource::Blank,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.source == AssetSource::Blank
    }
}

/// Resolves named assets against an ordered list of directories and
/// caches the result for the lifetime of the resolver.
#[derive(Debug, Default)]
pub struct AssetResolver {
    search_dirs: Vec<PathBuf>,
    cache: HashMap<String, Asset>,
}

impl AssetResolver {
    /// Search `configured` first (if any), then `assets/` beside the
    /// running executable.
    pub fn new(configured: Option<PathBuf>) -> Self {
        let mut search_dirs = Vec::new();
        if let Some(dir) = configured {
            search_dirs.push(dir);
        }
        search_dirs.push(super::running_directory().join(ASSETS_DIR));
        Self::with_dirs(search_dirs)
    }

    pub fn with_dirs(search_dirs: Vec<PathBuf>) -> Self {
        Self {
            search_dirs,
            cache: HashMap::new(),
        }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Resolve an asset, falling back to a blank icon
    pub fn resolve(&mut self, name: &str) -> &Asset {
        if !self.cache.contains_key(name) {
            let asset = match self.try_load(name) {
                Ok(asset) => asset,
                Err(err) => {
                    tracing::warn!(
                        "{}. {}",
                        err,
                        crate::error::create_fallback_strategy(&err).unwrap_or_default()
                    );
                    Asset::blank(name)
                }
            };
            self.cache.insert(name.to_string(), asset);
        }
        &self.cache[name]
    }

    /// Load an asset without the fallback
    pub fn try_load(&self, name: &str) -> Result<Asset> {
        let path = self
            .search_dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| CmpMenuError::AssetError(format!("asset not found: {}", name)))?;

        let content = fs::read_to_string(&path).map_err(|e| {
            CmpMenuError::AssetError(format!("failed to read {}: {}", path.display(), e))
        })?;

        let glyph: String = content.trim().chars().take(MAX_GLYPH_CHARS).collect();
        tracing::debug!("resolved asset {} from {}", name, path.display());

        Ok(Asset {
            name: name.to_string(),
            glyph,
            source: AssetSource::File(path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_asset_falls_back_to_blank() {
        let dir = tempdir().unwrap();
        let mut resolver = AssetResolver::with_dirs(vec![dir.path().to_path_buf()]);

        let asset = resolver.resolve(BACK_ICON);
        assert!(asset.is_blank());
        assert!(asset.glyph.is_empty());
        assert!(matches!(
            resolver.try_load(BACK_ICON),
            Err(CmpMenuError::AssetError(_))
        ));
    }

    #[test]
    fn test_first_directory_wins() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        fs::write(first.path().join(BACK_ICON), "←\n").unwrap();
        fs::write(second.path().join(BACK_ICON), "<").unwrap();

        let mut resolver = AssetResolver::with_dirs(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        let asset = resolver.resolve(BACK_ICON);
        assert_eq!(asset.glyph, "←");
        assert_eq!(asset.source, AssetSource::File(first.path().join(BACK_ICON)));
    }

    #[test]
    fn test_resolved_asset_is_cached() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(BACK_ICON);
        fs::write(&path, "<-").unwrap();

        let mut resolver = AssetResolver::with_dirs(vec![dir.path().to_path_buf()]);
        assert_eq!(resolver.resolve(BACK_ICON).glyph, "<-");

        fs::remove_file(&path).unwrap();
        assert_eq!(resolver.resolve(BACK_ICON).glyph, "<-");
    }

    #[test]
    fn test_long_glyph_is_truncated() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("wide.txt"), "<<<<<<<<").unwrap();

        let mut resolver = AssetResolver::with_dirs(vec![dir.path().to_path_buf()]);
        assert_eq!(resolver.resolve("wide.txt").glyph, "<<<<");
    }
}
