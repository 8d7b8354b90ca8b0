use crate::services::format::format_date;
use serde::{Serialize, Serializer};
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Closed set of entry kinds a listing can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Directory,
    Image,
    Video,
    Game,
    Html,
    Css,
    Js,
    Link,
    File,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Directory => "directory",
            FileKind::Image => "image",
            FileKind::Video => "video",
            FileKind::Game => "game",
            FileKind::Html => "html",
            FileKind::Css => "css",
            FileKind::Js => "js",
            FileKind::Link => "link",
            FileKind::File => "file",
        }
    }

    /// Parses an explicit `type` tag from the listing.
    pub fn from_tag(tag: &str) -> Option<FileKind> {
        match tag {
            "directory" => Some(FileKind::Directory),
            "image" => Some(FileKind::Image),
            "video" => Some(FileKind::Video),
            "game" => Some(FileKind::Game),
            "html" => Some(FileKind::Html),
            "css" => Some(FileKind::Css),
            "js" => Some(FileKind::Js),
            "link" => Some(FileKind::Link),
            "file" => Some(FileKind::File),
            _ => None,
        }
    }

    /// Infers the kind of an untagged leaf from its extension.
    pub fn from_name(name: &str) -> FileKind {
        let ext = name.rsplit('.').next().unwrap_or(name).to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "webp" => FileKind::Image,
            "mp4" | "webm" | "ogg" => FileKind::Video,
            "html" => FileKind::Html,
            "css" => FileKind::Css,
            "js" => FileKind::Js,
            _ => FileKind::File,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, FileKind::Directory)
    }

    /// Whether a byte size can ever be attached to entries of this kind.
    pub fn is_sized(&self) -> bool {
        !matches!(self, FileKind::Directory | FileKind::Link)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the listing. Topology is fixed once loaded; only `size` is filled in
/// afterwards, at most once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    pub(crate) name: String,
    #[serde(rename = "type")]
    pub(crate) kind: FileKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) children: Vec<FileNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) url: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_timestamp"
    )]
    pub(crate) last_modified: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) size: Option<u64>,
}

impl FileNode {
    /// A leaf whose kind is inferred from `name`.
    pub fn file(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = FileKind::from_name(&name);
        Self::leaf(name, kind)
    }

    pub fn directory(name: impl Into<String>, children: Vec<FileNode>) -> Self {
        Self {
            name: name.into(),
            kind: FileKind::Directory,
            children,
            url: None,
            last_modified: None,
            size: None,
        }
    }

    pub fn link(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::leaf(name, FileKind::Link)
        }
    }

    /// A leaf with an explicit kind. `Directory` yields an empty directory.
    pub fn leaf(name: impl Into<String>, kind: FileKind) -> Self {
        Self {
            name: name.into(),
            kind,
            children: Vec::new(),
            url: None,
            last_modified: None,
            size: None,
        }
    }

    pub fn with_last_modified(mut self, at: OffsetDateTime) -> Self {
        self.last_modified = Some(at);
        self
    }

    pub fn with_size(mut self, bytes: u64) -> Self {
        if self.kind.is_sized() {
            self.size = Some(bytes);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    /// Children in listing order; empty for anything but a directory.
    pub fn children(&self) -> &[FileNode] {
        &self.children
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn last_modified(&self) -> Option<OffsetDateTime> {
        self.last_modified
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// `MM/DD/YYYY` when the listing carries a modification time.
    pub fn date_label(&self) -> Option<String> {
        self.last_modified.map(format_date)
    }

    pub(crate) fn child(&self, name: &str) -> Option<&FileNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub(crate) fn child_mut(&mut self, name: &str) -> Option<&mut FileNode> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// Fills the size slot. Returns false when the slot was already set or the kind
    /// never carries a size.
    pub(crate) fn record_size(&mut self, bytes: u64) -> bool {
        if !self.kind.is_sized() || self.size.is_some() {
            return false;
        }
        self.size = Some(bytes);
        true
    }
}

fn serialize_timestamp<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(at) => {
            let text = at.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
            serializer.serialize_str(&text)
        }
        None => serializer.serialize_none(),
    }
}
