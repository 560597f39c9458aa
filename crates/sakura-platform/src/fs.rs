//! Filesystem abstraction backed by [`tokio::fs`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// The handful of filesystem operations the assistant needs.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Read a file's entire contents as UTF-8.
    async fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    /// Whether a path exists (file or directory).
    async fn exists(&self, path: &Path) -> bool;

    /// The user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;

    /// The process working directory.
    fn current_dir(&self) -> Option<PathBuf>;
}

/// Native filesystem.
pub struct NativeFileSystem;

#[async_trait]
impl FileSystem for NativeFileSystem {
    async fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn current_dir(&self) -> Option<PathBuf> {
        std::env::current_dir().ok()
    }
}
