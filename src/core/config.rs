use crate::core::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Where the listing lives and how file sizes are looked up.
///
/// With `base_url` set, the listing is fetched over HTTP and sizes are probed with
/// `HEAD` requests against the same host. Without it, everything is read from
/// `root_dir` on the local filesystem.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub base_url: Option<String>,
    pub root_dir: PathBuf,
    /// Location of the listing, relative to `base_url` or `root_dir`.
    pub structure_document: String,
    /// Directory the listed files are served from.
    pub files_prefix: String,
    /// Probe every leaf's size before the session is handed out.
    pub enrich_sizes_on_load: bool,
    pub log_filter: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            root_dir: PathBuf::from("."),
            structure_document: "files/file-structure.json".to_string(),
            files_prefix: "files".to_string(),
            enrich_sizes_on_load: true,
            log_filter: "info".to_string(),
        }
    }
}

impl IndexConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: IndexConfig =
            serde_json::from_str(raw).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.structure_document.trim().is_empty() {
            return Err(Error::Config("structure_document must not be empty".into()));
        }
        if let Some(base) = &self.base_url {
            let parsed = reqwest::Url::parse(base)
                .map_err(|e| Error::Config(format!("base_url '{base}': {e}")))?;
            if parsed.cannot_be_a_base() {
                return Err(Error::Config(format!("base_url '{base}' cannot be a base")));
            }
        }
        Ok(())
    }

    /// Filesystem directory holding the served files.
    pub fn files_dir(&self) -> PathBuf {
        self.root_dir.join(self.files_prefix.trim_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = IndexConfig::from_json_str(r#"{ "enrich_sizes_on_load": false }"#).unwrap();
        assert!(!config.enrich_sizes_on_load);
        assert_eq!(config.files_prefix, "files");
        assert_eq!(config.structure_document, "files/file-structure.json");
        assert!(config.base_url.is_none());
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let err = IndexConfig::from_json_str(r#"{ "base_url": "not a url" }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_blank_structure_document() {
        let err = IndexConfig::from_json_str(r#"{ "structure_document": "  " }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn files_dir_joins_prefix() {
        let config = IndexConfig {
            root_dir: PathBuf::from("/srv/site"),
            files_prefix: "/files/".into(),
            ..IndexConfig::default()
        };
        assert_eq!(config.files_dir(), PathBuf::from("/srv/site/files"));
    }
}
