//! In-memory index over a static directory listing.
//!
//! A [`FileTreeIndex`] only exists once a listing has been loaded in full. Its
//! topology never changes afterwards; the single mutable part is each leaf's size
//! slot, filled through [`FileTreeIndex::resolve_size`].

mod document;

use crate::core::errors::{Error, Result};
use crate::models::{FileNode, TreePath};
use crate::services::size::{SizeLookup, SizeProbe};
use serde_json::Value;

/// A non-directory entry together with its path from the root.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry<'a> {
    pub node: &'a FileNode,
    pub path: TreePath,
}

impl FlatEntry<'_> {
    pub fn full_path(&self) -> String {
        self.path.to_string()
    }

    /// Directory holding the entry.
    pub fn folder(&self) -> TreePath {
        self.path.parent().unwrap_or_default()
    }
}

#[derive(Debug)]
struct LeafSlot {
    /// Child positions from the root down to the leaf.
    slots: Vec<usize>,
    path: TreePath,
    /// Lowercased `"{path} {kind}"`.
    haystack: String,
}

#[derive(Debug)]
pub struct FileTreeIndex {
    roots: Vec<FileNode>,
    leaves: Vec<LeafSlot>,
}

impl FileTreeIndex {
    /// Parses a JSON listing. Any shape error is [`Error::MalformedTree`].
    pub fn load(document: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(document)
            .map_err(|e| Error::MalformedTree(format!("invalid JSON: {e}")))?;
        Self::from_value(value)
    }

    pub fn from_value(document: Value) -> Result<Self> {
        Ok(Self::from_nodes(document::parse_document(document)?))
    }

    pub fn from_nodes(roots: Vec<FileNode>) -> Self {
        let mut leaves = Vec::new();
        collect_leaves(&roots, &mut Vec::new(), &mut TreePath::root(), &mut leaves);
        tracing::info!(
            "loaded file tree: {} top-level entries, {} files",
            roots.len(),
            leaves.len()
        );
        Self { roots, leaves }
    }

    /// Top-level entries in listing order.
    pub fn root(&self) -> &[FileNode] {
        &self.roots
    }

    /// Number of non-directory entries.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Contents of the directory named by `path`; the empty path is the root.
    ///
    /// Every component must name a directory at its level. The first sibling with a
    /// matching name is taken, and any miss fails the whole path.
    pub fn resolve<S: AsRef<str>>(&self, path: &[S]) -> Result<&[FileNode]> {
        let mut level = self.roots.as_slice();
        for name in path {
            match level.iter().find(|node| node.name == name.as_ref()) {
                Some(node) if node.is_directory() => level = &node.children,
                _ => return Err(not_found(path)),
            }
        }
        Ok(level)
    }

    /// The entry named by `path`, whatever its kind.
    pub fn node<S: AsRef<str>>(&self, path: &[S]) -> Result<&FileNode> {
        let (first, rest) = path.split_first().ok_or_else(|| not_found(path))?;
        let mut node = self
            .roots
            .iter()
            .find(|node| node.name == first.as_ref())
            .ok_or_else(|| not_found(path))?;
        for name in rest {
            node = node.child(name.as_ref()).ok_or_else(|| not_found(path))?;
        }
        Ok(node)
    }

    fn node_mut(&mut self, path: &[String]) -> Option<&mut FileNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.iter_mut().find(|node| node.name == *first)?;
        for name in rest {
            node = node.child_mut(name)?;
        }
        Some(node)
    }

    /// Every non-directory entry, depth-first in listing order. Walks the whole tree
    /// on each call.
    pub fn flatten(&self) -> Vec<FlatEntry<'_>> {
        let mut out = Vec::new();
        flatten_level(&self.roots, &mut TreePath::root(), &mut out);
        out
    }

    /// Case-insensitive substring match on `"{path} {kind}"`, in flatten order.
    /// A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<FlatEntry<'_>> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        let hits: Vec<_> = self
            .leaves
            .iter()
            .filter(|leaf| leaf.haystack.contains(&needle))
            .filter_map(|leaf| {
                let node = node_by_slots(&self.roots, &leaf.slots)?;
                Some(FlatEntry {
                    node,
                    path: leaf.path.clone(),
                })
            })
            .collect();
        tracing::debug!("search '{}' matched {} of {} files", query, hits.len(), self.len());
        hits
    }

    /// Size already known for `path`, without probing.
    pub fn cached_size(&self, path: &TreePath) -> Result<SizeLookup> {
        let node = self.node(path.segments())?;
        Ok(match node.size() {
            _ if !node.kind().is_sized() => SizeLookup::NotApplicable,
            Some(bytes) => SizeLookup::Known(bytes),
            None => SizeLookup::Unavailable,
        })
    }

    /// Returns the cached size of `path`, probing once when it is not known yet.
    ///
    /// Probe failures are logged and reported as [`SizeLookup::Unavailable`]; the slot
    /// stays empty. Only an unknown path is an error.
    pub async fn resolve_size<P>(&mut self, path: &TreePath, probe: &P) -> Result<SizeLookup>
    where
        P: SizeProbe + ?Sized,
    {
        match self.cached_size(path)? {
            SizeLookup::Unavailable => {}
            settled => return Ok(settled),
        }

        let full_path = path.to_string();
        match probe.probe(&full_path).await {
            Ok(bytes) => {
                if let Some(node) = self.node_mut(path.segments()) {
                    node.record_size(bytes);
                }
                tracing::debug!("size of /{} is {} bytes", full_path, bytes);
                Ok(SizeLookup::Known(bytes))
            }
            Err(err) => {
                tracing::warn!("could not get size for /{}: {}", full_path, err);
                Ok(SizeLookup::Unavailable)
            }
        }
    }

    /// Probes every leaf that can carry a size and has none yet, one after another.
    /// Returns how many sizes were filled in.
    pub async fn enrich_sizes<P>(&mut self, probe: &P) -> usize
    where
        P: SizeProbe + ?Sized,
    {
        let pending: Vec<TreePath> = self
            .leaves
            .iter()
            .filter(|leaf| {
                node_by_slots(&self.roots, &leaf.slots)
                    .is_some_and(|node| node.kind().is_sized() && node.size().is_none())
            })
            .map(|leaf| leaf.path.clone())
            .collect();

        let mut resolved = 0;
        for path in &pending {
            if let Ok(SizeLookup::Known(_)) = self.resolve_size(path, probe).await {
                resolved += 1;
            }
        }
        tracing::info!("resolved {} of {} pending file sizes", resolved, pending.len());
        resolved
    }
}

fn not_found<S: AsRef<str>>(path: &[S]) -> Error {
    let joined: Vec<&str> = path.iter().map(|segment| segment.as_ref()).collect();
    Error::NotFound(joined.join("/"))
}

fn collect_leaves(
    level: &[FileNode],
    slots: &mut Vec<usize>,
    path: &mut TreePath,
    out: &mut Vec<LeafSlot>,
) {
    for (slot, node) in level.iter().enumerate() {
        slots.push(slot);
        path.push(node.name.as_str());
        if node.is_directory() {
            collect_leaves(&node.children, slots, path, out);
        } else {
            out.push(LeafSlot {
                slots: slots.clone(),
                path: path.clone(),
                haystack: format!("{} {}", path, node.kind).to_lowercase(),
            });
        }
        path.pop();
        slots.pop();
    }
}

fn flatten_level<'a>(level: &'a [FileNode], path: &mut TreePath, out: &mut Vec<FlatEntry<'a>>) {
    for node in level {
        path.push(node.name.as_str());
        if node.is_directory() {
            flatten_level(&node.children, path, out);
        } else {
            out.push(FlatEntry {
                node,
                path: path.clone(),
            });
        }
        path.pop();
    }
}

fn node_by_slots<'a>(roots: &'a [FileNode], slots: &[usize]) -> Option<&'a FileNode> {
    let (first, rest) = slots.split_first()?;
    rest.iter()
        .try_fold(roots.get(*first)?, |node, &slot| node.children.get(slot))
}
