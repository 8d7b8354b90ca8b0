use crate::core::config::IndexConfig;
use crate::core::errors::{Error, Result};
use crate::models::{FileNode, TreePath};
use crate::services::navigation::{Activation, Navigator};
use crate::services::size::{FsSizeProbe, HttpSizeProbe, SizeLookup, SizeProbe};
use crate::services::source::DocumentSource;
use crate::services::tree::{FileTreeIndex, FlatEntry};
use reqwest::{Client, Url};

/// Everything one browsing session owns: the loaded index, the size probe feeding
/// it and the current navigation position.
pub struct Session {
    config: IndexConfig,
    index: FileTreeIndex,
    navigator: Navigator,
    probe: Box<dyn SizeProbe>,
}

impl Session {
    /// Reads the configured listing and builds the session. When
    /// `enrich_sizes_on_load` is set every size is probed before this returns.
    pub async fn open(config: IndexConfig) -> Result<Self> {
        Self::open_with_client(config, Client::new()).await
    }

    /// Like [`Session::open`], fetching and probing through `client`.
    pub async fn open_with_client(config: IndexConfig, client: Client) -> Result<Self> {
        config.validate()?;
        let source = DocumentSource::from_config(&config)?;

        let probe: Box<dyn SizeProbe> = match &config.base_url {
            Some(base) => {
                let base = Url::parse(base)
                    .map_err(|e| Error::Config(format!("base_url '{base}': {e}")))?;
                Box::new(HttpSizeProbe::with_client(
                    client.clone(),
                    base,
                    config.files_prefix.clone(),
                ))
            }
            None => Box::new(FsSizeProbe::new(config.files_dir())),
        };

        let document = source.read(&client).await.map_err(|err| {
            tracing::error!("failed to load file structure from {}: {}", source, err);
            err
        })?;
        Self::from_document(config, &document, probe).await
    }

    pub async fn from_document(
        config: IndexConfig,
        document: &str,
        probe: Box<dyn SizeProbe>,
    ) -> Result<Self> {
        let mut index = FileTreeIndex::load(document).map_err(|err| {
            tracing::error!("failed to load file structure: {}", err);
            err
        })?;
        if config.enrich_sizes_on_load {
            index.enrich_sizes(probe.as_ref()).await;
        }
        let navigator = Navigator::new(config.files_prefix.clone());
        Ok(Self {
            config,
            index,
            navigator,
            probe,
        })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn index(&self) -> &FileTreeIndex {
        &self.index
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    pub fn listing(&mut self) -> &[FileNode] {
        self.navigator.listing(&self.index)
    }

    pub fn enter(&mut self, name: &str) -> Result<()> {
        self.navigator.enter(&self.index, name)
    }

    pub fn activate(&mut self, name: &str) -> Result<Activation<'_>> {
        self.navigator.activate(&self.index, name)
    }

    pub fn search(&self, query: &str) -> Vec<FlatEntry<'_>> {
        self.index.search(query)
    }

    /// Jumps to the folder of a search hit.
    pub fn reveal(&mut self, entry_path: &TreePath) {
        self.navigator.reveal(entry_path);
    }

    pub async fn size_of(&mut self, path: &TreePath) -> Result<SizeLookup> {
        self.index.resolve_size(path, self.probe.as_ref()).await
    }
}
