//! Downloaded installers in the per-user data directory.
//!
//! Installers are named `<product>.setup.<version>.<ext>`, so the file for a
//! given version is always at the same path. Its presence means the download
//! for that version already completed. Downloads go to a `.part` sibling and
//! are renamed into place once the last byte is flushed.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::UpdaterConfig;
use crate::error::Result;
use crate::version::Version;

/// Suffix of in-flight downloads.
const PARTIAL_SUFFIX: &str = "part";

/// Locates, probes and removes installer files.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    product: String,
    extension: String,
}

impl ArtifactStore {
    /// Creates a store rooted at `dir`.
    pub fn new(
        dir: impl Into<PathBuf>,
        product: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            product: product.into(),
            extension: extension.into(),
        }
    }

    /// Creates a store for the configured data directory and product.
    #[must_use]
    pub fn from_config(config: &UpdaterConfig) -> Self {
        Self::new(
            config.data_dir.clone(),
            config.product.clone(),
            config.installer_extension.clone(),
        )
    }

    /// Directory holding the installers.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name of the installer for `version`.
    #[must_use]
    pub fn file_name(&self, version: &Version) -> String {
        format!("{}.setup.{}.{}", self.product, version, self.extension)
    }

    /// Full path of the installer for `version`.
    #[must_use]
    pub fn path_for(&self, version: &Version) -> PathBuf {
        self.dir.join(self.file_name(version))
    }

    /// Path the download for `version` is streamed to before completion.
    #[must_use]
    pub fn partial_path_for(&self, version: &Version) -> PathBuf {
        self.dir
            .join(format!("{}.{PARTIAL_SUFFIX}", self.file_name(version)))
    }

    /// Returns whether a completed installer for `version` is on disk.
    pub async fn exists(&self, version: &Version) -> bool {
        is_file(&self.path_for(version)).await
    }

    /// Deletes the installer for `version` if it is present.
    ///
    /// Used to clear the installer of the build that is now running. A missing
    /// file is the normal case; other failures are logged and ignored.
    /// Returns `true` when a file was removed.
    pub async fn remove_stale(&self, version: &Version) -> bool {
        let path = self.path_for(version);
        if !is_file(&path).await {
            tracing::debug!("No previous installer at {}", path.display());
            return false;
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!("Removed old update file {}", path.display());
                true
            }
            Err(e) => {
                tracing::debug!("Could not remove old update file {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Creates the data directory if needed.
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Moves the completed partial download for `version` into place.
    pub async fn commit_partial(&self, version: &Version) -> Result<PathBuf> {
        let target = self.path_for(version);
        tokio::fs::rename(self.partial_path_for(version), &target).await?;
        Ok(target)
    }

    /// Removes a leftover partial download for `version`, if any.
    pub async fn discard_partial(&self, version: &Version) {
        let partial = self.partial_path_for(version);
        match tokio::fs::remove_file(&partial).await {
            Ok(()) => tracing::debug!("Removed partial download {}", partial.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "Could not remove partial download {}: {}",
                partial.display(),
                e
            ),
        }
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> ArtifactStore {
        ArtifactStore::new(dir, "studio", "exe")
    }

    #[test]
    fn test_file_name() {
        let store = ArtifactStore::new("/data", "studio", "exe");
        let version = Version::new(1, 2, 3);
        assert_eq!(store.file_name(&version), "studio.setup.1.2.3.exe");
        assert_eq!(
            store.path_for(&version),
            PathBuf::from("/data/studio.setup.1.2.3.exe")
        );
        assert_eq!(
            store.partial_path_for(&version),
            PathBuf::from("/data/studio.setup.1.2.3.exe.part")
        );
    }

    #[test]
    fn test_file_name_keeps_prerelease() {
        let store = ArtifactStore::new("/data", "studio", "exe");
        let version = Version::parse("2.0.0-beta.1").unwrap();
        assert_eq!(store.file_name(&version), "studio.setup.2.0.0-beta.1.exe");
    }

    #[tokio::test]
    async fn test_exists() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let version = Version::new(1, 1, 0);

        assert!(!store.exists(&version).await);
        std::fs::write(store.path_for(&version), b"MZ").unwrap();
        assert!(store.exists(&version).await);
    }

    #[tokio::test]
    async fn test_exists_ignores_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let version = Version::new(1, 1, 0);

        std::fs::create_dir(store.path_for(&version)).unwrap();
        assert!(!store.exists(&version).await);
    }

    #[tokio::test]
    async fn test_remove_stale() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let version = Version::new(1, 0, 0);

        assert!(!store.remove_stale(&version).await);

        std::fs::write(store.path_for(&version), b"MZ").unwrap();
        assert!(store.remove_stale(&version).await);
        assert!(!store.path_for(&version).exists());
    }

    #[tokio::test]
    async fn test_commit_and_discard_partial() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir.path().join("nested"));
        let version = Version::new(1, 1, 0);

        store.ensure_dir().await.unwrap();
        std::fs::write(store.partial_path_for(&version), b"payload").unwrap();

        let path = store.commit_partial(&version).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
        assert!(!store.partial_path_for(&version).exists());

        std::fs::write(store.partial_path_for(&version), b"trunc").unwrap();
        store.discard_partial(&version).await;
        assert!(!store.partial_path_for(&version).exists());

        // Discarding again is a no-op.
        store.discard_partial(&version).await;
    }
}
