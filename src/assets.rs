//! Locating map tile images on disk.

use crate::catalog::MapEntry;
use crate::error::AssetLoadError;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the tiles directory.
pub const TILES_DIR_ENV: &str = "FOXHOLE_OVERLAY_TILES";

const TILES_DIR_NAME: &str = "foxhole-tiles";

/// Resolves catalog file names against a tiles directory.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    tiles_dir: PathBuf,
}

impl AssetResolver {
    pub fn new(tiles_dir: impl Into<PathBuf>) -> Self {
        Self {
            tiles_dir: tiles_dir.into(),
        }
    }

    /// Picks the tiles directory: the env override, then `foxhole-tiles`
    /// next to the executable, then `foxhole-tiles` in the working directory.
    pub fn discover() -> Self {
        if let Some(dir) = std::env::var_os(TILES_DIR_ENV) {
            return Self::new(dir);
        }

        let beside_exe = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(TILES_DIR_NAME)))
            .filter(|dir| dir.is_dir());

        let dir = beside_exe.unwrap_or_else(|| PathBuf::from(TILES_DIR_NAME));
        tracing::debug!(dir = ?dir, "Using tiles directory");
        Self::new(dir)
    }

    pub fn tiles_dir(&self) -> &Path {
        &self.tiles_dir
    }

    /// Path the entry's image would be loaded from, whether or not it exists.
    pub fn path_for(&self, entry: &MapEntry) -> PathBuf {
        self.tiles_dir.join(entry.file_name)
    }

    /// Resolves the entry's image, failing when the file is missing.
    pub fn resolve(&self, entry: &MapEntry) -> Result<PathBuf, AssetLoadError> {
        let path = self.path_for(entry);
        match path.metadata() {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(AssetLoadError::new(path, "not a file")),
            Err(e) => Err(AssetLoadError::new(path, e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MapCatalog;
    use std::fs;

    #[test]
    fn test_path_for_joins_file_name() {
        let resolver = AssetResolver::new("tiles");
        let entry = MapCatalog::builtin().get("origin").unwrap();
        assert_eq!(resolver.path_for(entry), PathBuf::from("tiles").join("MapOriginHex.png"));
    }

    #[test]
    fn test_missing_file_reports_attempted_path() {
        let resolver = AssetResolver::new("definitely-not-a-tiles-dir");
        let entry = MapCatalog::builtin().get("westgate").unwrap();

        let err = resolver.resolve(entry).unwrap_err();
        assert_eq!(err.path, resolver.path_for(entry));
    }

    #[test]
    fn test_existing_file_resolves() {
        let dir =
            std::env::temp_dir().join(format!("foxhole-overlay-tiles-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("MapTerminusHex.png"), b"png").unwrap();

        let resolver = AssetResolver::new(&dir);
        let entry = MapCatalog::builtin().get("terminus").unwrap();
        assert_eq!(resolver.resolve(entry).unwrap(), dir.join("MapTerminusHex.png"));

        let _ = fs::remove_dir_all(&dir);
    }
}
