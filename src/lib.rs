//! Termfolio - virtual file system for a terminal-style portfolio
//!
//! Builds an immutable directory tree from content documents and resolves
//! shell-style paths (`.`, `..`, `~`) against it.

pub mod core;
pub mod terminal;

pub use crate::core::config::{AppConfig, VfsConfig};
pub use crate::core::file_system::{BuildError, DirectoryIndex, VirtualFileSystem};
pub use crate::core::path::{resolve, Resolution};
pub use terminal::TerminalSession;
