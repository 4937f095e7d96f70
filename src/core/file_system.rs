//! Virtual file tree built from content documents

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use super::config::VfsConfig;
use super::document::{Document, DocumentSet};
use super::path::{join, split_parent};

/// Errors that abort building the tree
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// Source path has no file name once the content root is stripped
    #[error("Empty path: {document}")]
    EmptyPath { document: String },

    /// Source path contains `.` or `..`
    #[error("Invalid segment {segment:?} in {document}")]
    InvalidSegment { document: String, segment: String },

    /// Two entries would share a name in the same directory
    #[error("Duplicate entry {path} (from {document})")]
    DuplicateEntry { document: String, path: String },
}

/// A file in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    /// Display name
    pub name: String,
    /// Key of the file's text in [`VirtualFileSystem::contents`]
    pub virtual_path: String,
}

/// A directory and the entries it owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    pub name: String,
    /// Absolute virtual path
    pub path: String,
    children: BTreeMap<String, Node>,
}

/// Represents a file or directory in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Directory(Directory),
    File(FileNode),
}

/// Borrowed view of whatever lives at a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Directory(&'a Directory),
    File(&'a FileNode),
}

impl Node {
    /// Display name of the entry
    pub fn name(&self) -> &str {
        match self {
            Node::Directory(dir) => &dir.name,
            Node::File(file) => &file.name,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    pub fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            Node::Directory(dir) => NodeRef::Directory(dir),
            Node::File(file) => NodeRef::File(file),
        }
    }
}

impl Directory {
    /// Create a new empty directory
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            children: BTreeMap::new(),
        }
    }

    /// Gets an entry by display name
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    /// Entries sorted by display name
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.values()
    }

    /// Counts the number of entries
    pub fn count(&self) -> usize {
        self.children.len()
    }

    /// Sub-directories sorted by name
    pub fn subdirectories(&self) -> impl Iterator<Item = &Directory> {
        self.children.values().filter_map(|node| match node {
            Node::Directory(dir) => Some(dir),
            Node::File(_) => None,
        })
    }
}

/// Where a document lands in the tree, derived from its source path
struct Placement<'a> {
    dirs: Vec<&'a str>,
    stem: &'a str,
}

impl<'a> Placement<'a> {
    fn parse(config: &VfsConfig, document: &'a str) -> Result<Self, BuildError> {
        let clean = document
            .strip_prefix(config.content_root.as_str())
            .unwrap_or(document)
            .trim_start_matches('/');

        let mut segments: Vec<&str> = clean.split('/').filter(|s| !s.is_empty()).collect();
        if let Some(segment) = segments.iter().find(|s| **s == "." || **s == "..") {
            return Err(BuildError::InvalidSegment {
                document: document.to_string(),
                segment: segment.to_string(),
            });
        }

        let file = segments.pop().ok_or_else(|| BuildError::EmptyPath {
            document: document.to_string(),
        })?;
        let stem = config.strip_extension(file);
        if stem.is_empty() {
            return Err(BuildError::EmptyPath {
                document: document.to_string(),
            });
        }

        Ok(Self {
            dirs: segments,
            stem,
        })
    }

    /// Top-level directory, only when the file is inside one
    fn category(&self) -> Option<&'a str> {
        self.dirs.first().copied()
    }

    fn virtual_path(&self, config: &VfsConfig) -> String {
        let mut parts = Vec::with_capacity(self.dirs.len() + 2);
        parts.push(config.home_symbol.as_str());
        parts.extend(self.dirs.iter().copied());
        parts.push(self.stem);
        parts.join("/")
    }
}

/// The built tree together with the text of every file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFileSystem {
    root: Directory,
    contents: BTreeMap<String, String>,
}

impl VirtualFileSystem {
    /// Build the tree from source path → raw text.
    ///
    /// Documents are inserted in source-path order. The first malformed or
    /// colliding document aborts the build.
    pub fn build(config: &VfsConfig, documents: &DocumentSet) -> Result<Self, BuildError> {
        let mut root = Directory::new(config.home_symbol.as_str(), config.home_symbol.as_str());
        let mut contents = BTreeMap::new();
        let mut directories = 1;

        for (source, raw) in documents {
            let placement = Placement::parse(config, source)?;
            let doc = Document::new(placement.virtual_path(config), raw);
            directories += Self::insert(config, &mut root, source, &placement, &doc.virtual_path)?;
            tracing::debug!("Added {} from {}", doc.virtual_path, source);
            contents.insert(doc.virtual_path, doc.content);
        }

        let vfs = Self { root, contents };
        tracing::info!(
            "Built virtual file system: {} files, {} directories",
            vfs.contents.len(),
            directories
        );
        Ok(vfs)
    }

    /// Insert one file, returning how many directories were created for it
    fn insert(
        config: &VfsConfig,
        root: &mut Directory,
        source: &str,
        placement: &Placement<'_>,
        virtual_path: &str,
    ) -> Result<usize, BuildError> {
        let mut created = 0;
        let mut dir = root;
        for name in &placement.dirs {
            let path = join(&dir.path, name);
            let node = dir
                .children
                .entry(name.to_string())
                .or_insert_with(|| {
                    created += 1;
                    Node::Directory(Directory::new(*name, path.as_str()))
                });
            dir = match node {
                Node::Directory(child) => child,
                Node::File(_) => {
                    return Err(BuildError::DuplicateEntry {
                        document: source.to_string(),
                        path,
                    })
                }
            };
        }

        let name = config.display_name(placement.stem, placement.category());
        let path = join(&dir.path, &name);
        match dir.children.entry(name) {
            Entry::Occupied(_) => Err(BuildError::DuplicateEntry {
                document: source.to_string(),
                path,
            }),
            Entry::Vacant(slot) => {
                let name = slot.key().clone();
                slot.insert(Node::File(FileNode {
                    name,
                    virtual_path: virtual_path.to_string(),
                }));
                Ok(created)
            }
        }
    }

    /// The home directory
    pub fn root(&self) -> &Directory {
        &self.root
    }

    /// Virtual path → trimmed text of every file
    pub fn contents(&self) -> &BTreeMap<String, String> {
        &self.contents
    }

    /// Text of the file with the given virtual path
    pub fn content(&self, virtual_path: &str) -> Option<&str> {
        self.contents.get(virtual_path).map(String::as_str)
    }

    /// Index every directory by its absolute path
    pub fn directory_index(&self) -> DirectoryIndex<'_> {
        DirectoryIndex::new(&self.root)
    }
}

/// Lookup table from absolute directory path to directory.
///
/// Borrows the tree it was built from and owns nothing.
#[derive(Debug, Clone)]
pub struct DirectoryIndex<'a> {
    directories: HashMap<&'a str, &'a Directory>,
}

impl<'a> DirectoryIndex<'a> {
    pub fn new(root: &'a Directory) -> Self {
        let mut directories = HashMap::new();
        let mut pending = vec![root];
        while let Some(dir) = pending.pop() {
            directories.insert(dir.path.as_str(), dir);
            pending.extend(dir.subdirectories());
        }
        Self { directories }
    }

    /// Directory at an absolute path
    pub fn get(&self, path: &str) -> Option<&'a Directory> {
        self.directories.get(path).copied()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.directories.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.directories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }

    /// All indexed paths, sorted
    pub fn paths(&self) -> Vec<&'a str> {
        let mut paths: Vec<&'a str> = self.directories.keys().copied().collect();
        paths.sort_unstable();
        paths
    }

    /// Whatever lives at an absolute path, file or directory
    pub fn lookup(&self, path: &str) -> Option<NodeRef<'a>> {
        if let Some(dir) = self.get(path) {
            return Some(NodeRef::Directory(dir));
        }
        let (parent, name) = split_parent(path)?;
        self.get(parent)?.get(name).map(Node::as_node_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn documents(entries: &[(&str, &str)]) -> DocumentSet {
        entries
            .iter()
            .map(|(path, text)| (path.to_string(), text.to_string()))
            .collect()
    }

    fn sample() -> DocumentSet {
        documents(&[
            ("/src/content/about.md", "  Hi, I am a developer.\n"),
            ("/src/content/contact.md", "mail me"),
            ("/src/content/blog/welcome.md", "First post"),
            ("/src/content/blog/2024/review.md", "Year in review"),
            ("/src/content/skills/rust.md", "Ownership"),
            ("/src/content/projects/site.md", "   \n\t "),
        ])
    }

    fn names(dir: &Directory) -> Vec<&str> {
        dir.children().map(Node::name).collect()
    }

    #[test]
    fn test_build_tree_shape() {
        let vfs = VirtualFileSystem::build(&VfsConfig::default(), &sample()).unwrap();
        let root = vfs.root();

        assert_eq!(root.path, "~");
        assert_eq!(
            names(root),
            vec!["about-me.xr", "blog", "contact.md", "projects", "skills"]
        );

        let index = vfs.directory_index();
        let blog = index.get("~/blog").unwrap();
        assert_eq!(names(blog), vec!["2024", "welcome.blog"]);
        assert_eq!(names(index.get("~/blog/2024").unwrap()), vec!["review.blog"]);
        assert_eq!(names(index.get("~/skills").unwrap()), vec!["rust"]);
        assert_eq!(names(index.get("~/projects").unwrap()), vec!["site.md"]);
    }

    #[test]
    fn test_contents_are_trimmed() {
        let vfs = VirtualFileSystem::build(&VfsConfig::default(), &sample()).unwrap();
        assert_eq!(vfs.content("~/about"), Some("Hi, I am a developer."));
        assert_eq!(vfs.content("~/blog/2024/review"), Some("Year in review"));
        assert_eq!(vfs.content("~/projects/site"), Some(""));
        assert_eq!(vfs.contents().len(), 6);
    }

    #[test]
    fn test_directory_paths_extend_parent() {
        let vfs = VirtualFileSystem::build(&VfsConfig::default(), &sample()).unwrap();
        let index = vfs.directory_index();
        assert_eq!(
            index.paths(),
            vec!["~", "~/blog", "~/blog/2024", "~/projects", "~/skills"]
        );
        for path in index.paths() {
            let dir = index.get(path).unwrap();
            for child in dir.subdirectories() {
                assert_eq!(child.path, join(&dir.path, &child.name));
            }
        }
    }

    #[test]
    fn test_every_content_key_is_reachable() {
        let vfs = VirtualFileSystem::build(&VfsConfig::default(), &sample()).unwrap();
        let index = vfs.directory_index();
        for key in vfs.contents().keys() {
            let (parent, _) = split_parent(key).unwrap();
            let dir = index.get(parent).unwrap();
            let found = dir.children().any(|node| match node {
                Node::File(file) => &file.virtual_path == key,
                Node::Directory(_) => false,
            });
            assert!(found, "{} not reachable", key);
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let config = VfsConfig::default();
        let first = VirtualFileSystem::build(&config, &sample()).unwrap();
        let second = VirtualFileSystem::build(&config, &sample()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_lookup() {
        let vfs = VirtualFileSystem::build(&VfsConfig::default(), &sample()).unwrap();
        let index = vfs.directory_index();

        assert!(matches!(index.lookup("~"), Some(NodeRef::Directory(_))));
        assert!(matches!(index.lookup("~/blog"), Some(NodeRef::Directory(_))));
        match index.lookup("~/blog/welcome.blog") {
            Some(NodeRef::File(file)) => assert_eq!(file.virtual_path, "~/blog/welcome"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(index.lookup("~/blog/welcome").is_none());
        assert!(index.lookup("~/missing/file").is_none());
    }

    #[test]
    fn test_source_without_content_root() {
        let docs = documents(&[("notes/todo.md", "x"), ("/loose.md", "y")]);
        let vfs = VirtualFileSystem::build(&VfsConfig::default(), &docs).unwrap();
        assert_eq!(vfs.content("~/notes/todo"), Some("x"));
        assert_eq!(vfs.content("~/loose"), Some("y"));
    }

    #[test]
    fn test_non_matching_extension_gets_default_suffix() {
        let docs = documents(&[("/src/content/notes.txt", "")]);
        let vfs = VirtualFileSystem::build(&VfsConfig::default(), &docs).unwrap();
        assert_eq!(names(vfs.root()), vec!["notes.txt.md"]);
        assert_eq!(vfs.content("~/notes.txt"), Some(""));
    }

    #[test]
    fn test_empty_path_rejected() {
        let config = VfsConfig::default();
        for source in ["/src/content/", "", "/src/content/blog/.md"] {
            let err = VirtualFileSystem::build(&config, &documents(&[(source, "x")])).unwrap_err();
            assert!(matches!(err, BuildError::EmptyPath { .. }), "{}", source);
        }
    }

    #[test]
    fn test_dot_segments_rejected() {
        let docs = documents(&[("/src/content/blog/../escape.md", "x")]);
        let err = VirtualFileSystem::build(&VfsConfig::default(), &docs).unwrap_err();
        assert_eq!(
            err,
            BuildError::InvalidSegment {
                document: "/src/content/blog/../escape.md".to_string(),
                segment: "..".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_display_name_rejected() {
        // Both map to "about-me.xr" under home
        let docs = documents(&[("/src/content/about.md", "a"), ("about.md", "b")]);
        let err = VirtualFileSystem::build(&VfsConfig::default(), &docs).unwrap_err();
        assert!(matches!(
            err,
            BuildError::DuplicateEntry { ref path, .. } if path == "~/about-me.xr"
        ));
    }

    #[test]
    fn test_file_and_directory_collision_rejected() {
        // skills files have no suffix, so "rust" is both a file and a directory
        let docs = documents(&[
            ("/src/content/skills/rust.md", "a"),
            ("/src/content/skills/rust/async.md", "b"),
        ]);
        let err = VirtualFileSystem::build(&VfsConfig::default(), &docs).unwrap_err();
        assert!(matches!(
            err,
            BuildError::DuplicateEntry { ref path, .. } if path == "~/skills/rust"
        ));
    }

    #[test]
    fn test_file_named_like_existing_directory_rejected() {
        // "/src/..." sorts first, so the directory exists before the file arrives
        let docs = documents(&[
            ("/src/content/skills/rust/async.md", "a"),
            ("skills/rust.md", "b"),
        ]);
        let err = VirtualFileSystem::build(&VfsConfig::default(), &docs).unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateEntry {
                document: "skills/rust.md".to_string(),
                path: "~/skills/rust".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_input_has_root() {
        let vfs = VirtualFileSystem::build(&VfsConfig::default(), &DocumentSet::new()).unwrap();
        assert_eq!(vfs.root().count(), 0);
        assert!(vfs.directory_index().contains("~"));
    }
}
