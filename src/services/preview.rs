use crate::models::{FileKind, FileNode, TreePath};
use serde::Serialize;

/// What the preview panel shows for a leaf, with the location it is served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Preview {
    Image { src: String },
    Video { src: String },
    /// Games are folders served with an `index.html` entry point.
    Game { frame_src: String },
    Download { src: String },
}

impl Preview {
    /// `None` for kinds that open no panel.
    pub fn for_entry(node: &FileNode, path: &TreePath, files_prefix: &str) -> Option<Preview> {
        let src = served_path(files_prefix, path);
        match node.kind() {
            FileKind::Image => Some(Preview::Image { src }),
            FileKind::Video => Some(Preview::Video { src }),
            FileKind::Game => Some(Preview::Game {
                frame_src: format!("{src}/index.html"),
            }),
            FileKind::File => Some(Preview::Download { src }),
            FileKind::Directory
            | FileKind::Html
            | FileKind::Css
            | FileKind::Js
            | FileKind::Link => None,
        }
    }

    pub fn src(&self) -> &str {
        match self {
            Preview::Image { src } | Preview::Video { src } | Preview::Download { src } => src,
            Preview::Game { frame_src } => frame_src,
        }
    }
}

/// Site-absolute location of a listed entry, e.g. `/files/pics/cat.png`.
pub fn served_path(files_prefix: &str, path: &TreePath) -> String {
    let prefix = files_prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("/{path}")
    } else {
        format!("/{prefix}/{path}")
    }
}
