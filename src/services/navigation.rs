use crate::core::errors::Result;
use crate::models::{FileKind, FileNode, TreePath};
use crate::services::preview::Preview;
use crate::services::tree::FileTreeIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: String,
    /// Path length this crumb jumps back to; `0` is Home.
    pub depth: usize,
}

/// Result of clicking an entry in the current listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation<'a> {
    /// The entry was a directory and is now the current path.
    Entered,
    OpenExternal(&'a str),
    Preview(Preview),
    Nothing,
}

/// Current position of a browsing session inside the listing.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    current: TreePath,
    files_prefix: String,
}

impl Navigator {
    pub fn new(files_prefix: impl Into<String>) -> Self {
        Self {
            current: TreePath::root(),
            files_prefix: files_prefix.into(),
        }
    }

    pub fn current(&self) -> &TreePath {
        &self.current
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut crumbs = Vec::with_capacity(self.current.len() + 1);
        crumbs.push(Breadcrumb {
            label: "Home".to_string(),
            depth: 0,
        });
        crumbs.extend(self.current.iter().enumerate().map(|(i, name)| Breadcrumb {
            label: name.clone(),
            depth: i + 1,
        }));
        crumbs
    }

    /// Contents of the current directory. A path that no longer resolves sends the
    /// session back to the root.
    pub fn listing<'a>(&mut self, index: &'a FileTreeIndex) -> &'a [FileNode] {
        match index.resolve(self.current.segments()) {
            Ok(nodes) => nodes,
            Err(err) => {
                tracing::warn!("{}; falling back to root", err);
                self.current = TreePath::root();
                index.root()
            }
        }
    }

    /// Moves into the child directory `name`. The path is unchanged on error.
    pub fn enter(&mut self, index: &FileTreeIndex, name: &str) -> Result<()> {
        let next = self.current.child(name);
        index.resolve(next.segments())?;
        self.current = next;
        Ok(())
    }

    /// Returns false when already at the root.
    pub fn up(&mut self) -> bool {
        self.current.pop().is_some()
    }

    pub fn home(&mut self) {
        self.current = TreePath::root();
    }

    pub fn jump_to(&mut self, depth: usize) {
        self.current.truncate(depth);
    }

    /// Moves to the folder holding a search hit.
    pub fn reveal(&mut self, entry_path: &TreePath) {
        self.current = entry_path.parent().unwrap_or_default();
    }

    pub fn activate<'a>(&mut self, index: &'a FileTreeIndex, name: &str) -> Result<Activation<'a>> {
        let path = self.current.child(name);
        let node = index.node(path.segments())?;
        let activation = match node.kind() {
            FileKind::Directory => {
                self.current = path;
                Activation::Entered
            }
            FileKind::Link => node.url().map_or(Activation::Nothing, Activation::OpenExternal),
            FileKind::Image | FileKind::Video | FileKind::Game | FileKind::File => {
                Preview::for_entry(node, &path, &self.files_prefix)
                    .map_or(Activation::Nothing, Activation::Preview)
            }
            FileKind::Html | FileKind::Css | FileKind::Js => Activation::Nothing,
        };
        Ok(activation)
    }
}
