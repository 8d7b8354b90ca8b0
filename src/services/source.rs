use crate::core::config::IndexConfig;
use crate::core::errors::{Error, Result};
use reqwest::{Client, Url};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where the listing document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Url(Url),
    Path(PathBuf),
}

impl DocumentSource {
    pub fn from_config(config: &IndexConfig) -> Result<Self> {
        let Some(base) = &config.base_url else {
            return Ok(DocumentSource::Path(
                config.root_dir.join(&config.structure_document),
            ));
        };

        let mut base =
            Url::parse(base).map_err(|e| Error::Config(format!("base_url '{base}': {e}")))?;
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }
        let url = base
            .join(config.structure_document.trim_start_matches('/'))
            .map_err(|e| Error::Config(format!("structure_document: {e}")))?;
        Ok(DocumentSource::Url(url))
    }

    pub async fn read(&self, client: &Client) -> Result<String> {
        match self {
            DocumentSource::Url(url) => fetch_document(client, url.clone()).await,
            DocumentSource::Path(path) => read_document(path).await,
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::Url(url) => write!(f, "{url}"),
            DocumentSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One `GET`; any non-success status is an error.
pub async fn fetch_document(client: &Client, url: Url) -> Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

pub async fn read_document(path: impl AsRef<Path>) -> Result<String> {
    Ok(tokio::fs::read_to_string(path).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_source_joins_root_dir() {
        let config = IndexConfig {
            root_dir: PathBuf::from("/srv/site"),
            ..IndexConfig::default()
        };
        assert_eq!(
            DocumentSource::from_config(&config).unwrap(),
            DocumentSource::Path(PathBuf::from("/srv/site/files/file-structure.json"))
        );
    }

    #[test]
    fn remote_source_keeps_base_path() {
        let config = IndexConfig {
            base_url: Some("https://example.com/browser".into()),
            ..IndexConfig::default()
        };
        let source = DocumentSource::from_config(&config).unwrap();
        assert_eq!(
            source.to_string(),
            "https://example.com/browser/files/file-structure.json"
        );
    }
}
