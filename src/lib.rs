//! Index and navigation over a static, precomputed file listing.

pub mod core;
pub mod models;
pub mod services;

pub use crate::core::config::IndexConfig;
pub use crate::core::errors::{Error, Result};
pub use crate::models::{FileKind, FileNode, TreePath};
pub use crate::services::navigation::{Activation, Breadcrumb, Navigator};
pub use crate::services::preview::Preview;
pub use crate::services::session::Session;
pub use crate::services::size::{FsSizeProbe, HttpSizeProbe, SizeLookup, SizeProbe};
pub use crate::services::tree::{FileTreeIndex, FlatEntry};
