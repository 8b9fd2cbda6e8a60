use crate::core::Storage;
use crate::utils::error::{AdminError, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Writes export files under a base directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    /// Keeps every file inside the base directory.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || escapes {
            return Err(AdminError::InvalidConfigValueError {
                field: "export.file".to_string(),
                value: path.to_string(),
                reason: "File name must be relative to the export directory".to_string(),
            });
        }
        Ok(Path::new(&self.base_path).join(relative))
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path)?;
        Ok(fs::read(full_path)?)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&full_path, data)?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }
}
