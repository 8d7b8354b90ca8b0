pub mod file_node;
pub mod tree_path;

pub use file_node::{FileKind, FileNode};
pub use tree_path::TreePath;
