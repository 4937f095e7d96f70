//! Core functionality: configuration, documents, the virtual tree and path resolution

pub mod config;
pub mod document;
pub mod file_system;
pub mod path;
