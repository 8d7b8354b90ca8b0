pub mod format;
pub mod navigation;
pub mod preview;
pub mod session;
pub mod size;
pub mod source;
pub mod tree;
