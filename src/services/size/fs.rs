use super::SizeProbe;
use crate::core::errors::{Error, Result};
use crate::models::TreePath;
use async_trait::async_trait;
use std::path::PathBuf;

/// Reads sizes from a local copy of the served files.
#[derive(Debug, Clone)]
pub struct FsSizeProbe {
    root: PathBuf,
}

impl FsSizeProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn target(&self, full_path: &str) -> Result<PathBuf> {
        let relative = TreePath::parse(full_path);
        if relative.iter().any(|segment| segment == "..") {
            return Err(Error::size_unavailable(full_path, "path escapes the files root"));
        }
        let mut target = self.root.clone();
        target.extend(relative.iter());
        Ok(target)
    }
}

#[async_trait]
impl SizeProbe for FsSizeProbe {
    async fn probe(&self, full_path: &str) -> Result<u64> {
        let target = self.target(full_path)?;
        let metadata = tokio::fs::metadata(&target)
            .await
            .map_err(|e| Error::size_unavailable(full_path, e.to_string()))?;
        if !metadata.is_file() {
            return Err(Error::size_unavailable(full_path, "not a regular file"));
        }
        Ok(metadata.len())
    }
}
