//! Workbooks from a local directory
//!
//! Files are matched by their catalog name anywhere below the root, so a
//! synced OneDrive folder can be pointed at directly.

use super::{SourceFile, WorkbookSource};
use crate::error::{QcError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

const MAX_DEPTH: usize = 4;

pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `file_name` below the root; the shallowest match wins.
    pub fn locate(&self, file_name: &str) -> Result<PathBuf> {
        if !self.root.is_dir() {
            return Err(QcError::NotFound(format!(
                "directorio no encontrado: {}",
                self.root.display()
            )));
        }

        WalkDir::new(&self.root)
            .max_depth(MAX_DEPTH)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.file_name().to_str() == Some(file_name))
            .min_by_key(|entry| entry.depth())
            .map(|entry| entry.into_path())
            .ok_or_else(|| {
                QcError::NotFound(format!(
                    "`{}` no está en {}",
                    file_name,
                    self.root.display()
                ))
            })
    }
}

impl WorkbookSource for LocalSource {
    async fn fetch(&self, file: &SourceFile) -> Result<Arc<Vec<u8>>> {
        let path = self.locate(file.file_name)?;
        let bytes = tokio::fs::read(&path).await?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "libro leído");
        Ok(Arc::new(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::PROGRAMACION_FILE;
    use tempfile::tempdir;

    #[test]
    fn test_locate_prefers_shallowest() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("2025").join("copia");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("PROGRAMACION.xlsx"), b"nested").unwrap();
        std::fs::write(dir.path().join("PROGRAMACION.xlsx"), b"top").unwrap();

        let source = LocalSource::new(dir.path());
        let found = source.locate("PROGRAMACION.xlsx").unwrap();
        assert_eq!(found, dir.path().join("PROGRAMACION.xlsx"));
    }

    #[test]
    fn test_locate_missing_file() {
        let dir = tempdir().unwrap();
        let err = LocalSource::new(dir.path()).locate("nada.xlsx").unwrap_err();
        assert!(matches!(err, QcError::NotFound(_)));
    }

    #[test]
    fn test_missing_root() {
        let err = LocalSource::new("/nonexistent/fcl-quality/12345")
            .locate("PROGRAMACION.xlsx")
            .unwrap_err();
        assert!(matches!(err, QcError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_fetch_reads_bytes() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("PROGRAMACION.xlsx"), b"bytes").unwrap();
        let bytes = LocalSource::new(dir.path())
            .fetch(&PROGRAMACION_FILE)
            .await
            .unwrap();
        assert_eq!(bytes.as_slice(), b"bytes");
    }
}
