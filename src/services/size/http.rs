use super::SizeProbe;
use crate::core::errors::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, CONTENT_LENGTH};
use reqwest::{Client, Url};

/// Issues a `HEAD` for the served file and reads its `Content-Length`.
#[derive(Debug, Clone)]
pub struct HttpSizeProbe {
    client: Client,
    base: Url,
    files_prefix: String,
}

impl HttpSizeProbe {
    pub fn new(base_url: &str, files_prefix: impl Into<String>) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("base_url '{base_url}': {e}")))?;
        Ok(Self::with_client(Client::new(), base, files_prefix))
    }

    pub fn with_client(client: Client, base: Url, files_prefix: impl Into<String>) -> Self {
        Self {
            client,
            base,
            files_prefix: files_prefix.into(),
        }
    }

    /// `{base}/{files_prefix}/{full_path}` with every segment percent-encoded.
    pub fn file_url(&self, full_path: &str) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::Config(format!("base_url '{}' cannot be a base", self.base)))?;
            segments.pop_if_empty();
            segments.extend(self.files_prefix.split('/').filter(|s| !s.is_empty()));
            segments.extend(full_path.split('/').filter(|s| !s.is_empty()));
        }
        Ok(url)
    }
}

#[async_trait]
impl SizeProbe for HttpSizeProbe {
    async fn probe(&self, full_path: &str) -> Result<u64> {
        let url = self.file_url(full_path)?;
        let response = self
            .client
            .head(url)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::size_unavailable(full_path, format!("HTTP {status}")));
        }

        response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .ok_or_else(|| Error::size_unavailable(full_path, "missing content-length"))
    }
}
