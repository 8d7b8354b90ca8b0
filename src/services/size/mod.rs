//! Byte-size lookups for listed files.
//!
//! The listing itself carries no sizes; they are fetched on demand by a
//! [`SizeProbe`] and cached on the node by the tree index.

mod fs;
mod http;

pub use fs::FsSizeProbe;
pub use http::HttpSizeProbe;

use crate::core::errors::Result;
use crate::services::format::format_size;
use async_trait::async_trait;

/// Measures a single file addressed by its `/`-joined path in the listing.
#[async_trait]
pub trait SizeProbe: Send + Sync {
    async fn probe(&self, full_path: &str) -> Result<u64>;
}

/// Outcome of asking the index for an entry's size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeLookup {
    Known(u64),
    /// The probe failed; a later lookup may try again.
    Unavailable,
    /// Directories and links never carry a size.
    NotApplicable,
}

impl SizeLookup {
    pub fn bytes(&self) -> Option<u64> {
        match self {
            SizeLookup::Known(bytes) => Some(*bytes),
            SizeLookup::Unavailable | SizeLookup::NotApplicable => None,
        }
    }

    /// Text for a size column; `None` where no size is ever shown.
    pub fn label(&self) -> Option<String> {
        match self {
            SizeLookup::Known(bytes) => Some(format_size(*bytes)),
            SizeLookup::Unavailable => Some("Size unavailable".to_string()),
            SizeLookup::NotApplicable => None,
        }
    }
}
