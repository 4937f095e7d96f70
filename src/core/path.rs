//! Shell-style path resolution over virtual paths
//!
//! Resolution is purely syntactic. It never consults the tree, so it works
//! for partial paths typed during autocompletion as well as for `cd`.
//! Callers check existence against the [`DirectoryIndex`](super::file_system::DirectoryIndex).

use super::config::VfsConfig;

/// Where a parsed path starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Leading `/`; the top of the virtual tree is home
    Root,
    /// Leading home symbol or alias, or nothing at all
    Home,
    /// Relative to the current directory
    Relative,
}

/// A single path component after `.` and empty components are dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Parent,
    Name(String),
}

/// A target path split into its anchor and components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    pub anchor: Anchor,
    pub segments: Vec<Segment>,
}

/// Result of [`resolve`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Normalized absolute path, always starting with the home symbol
    pub path: String,
    /// Always `None`; existence checks belong to the caller
    pub error: Option<String>,
}

impl ParsedPath {
    /// Parse a path string
    ///
    /// # Examples
    ///
    /// ```
    /// use termfolio::core::config::VfsConfig;
    /// use termfolio::core::path::{Anchor, ParsedPath, Segment};
    ///
    /// let parsed = ParsedPath::parse(&VfsConfig::default(), "~/blog/../skills");
    /// assert_eq!(parsed.anchor, Anchor::Home);
    /// assert_eq!(
    ///     parsed.segments,
    ///     vec![
    ///         Segment::Name("blog".to_string()),
    ///         Segment::Parent,
    ///         Segment::Name("skills".to_string()),
    ///     ]
    /// );
    /// ```
    pub fn parse(config: &VfsConfig, path: &str) -> Self {
        let (anchor, rest) = if let Some(rest) = strip_home(config, path) {
            (Anchor::Home, rest)
        } else if path.starts_with('/') {
            let path = path.trim_start_matches('/');
            (Anchor::Root, strip_home(config, path).unwrap_or(path))
        } else {
            (Anchor::Relative, path)
        };

        // "Go home" however it was spelled, including the empty target
        let anchor = if rest.is_empty() && anchor == Anchor::Relative {
            Anchor::Home
        } else {
            anchor
        };

        let segments = rest
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .map(|s| match s {
                ".." => Segment::Parent,
                name => Segment::Name(name.to_string()),
            })
            .collect();

        Self { anchor, segments }
    }

    /// Whether the path ignores the current directory
    pub fn is_absolute(&self) -> bool {
        self.anchor != Anchor::Relative
    }
}

/// Strip a leading home symbol or alias plus one optional separator
fn strip_home<'a>(config: &VfsConfig, path: &'a str) -> Option<&'a str> {
    [config.home_symbol.as_str(), config.home_alias.as_str()]
        .into_iter()
        .filter(|alias| !alias.is_empty())
        .find_map(|alias| {
            let rest = path.strip_prefix(alias)?;
            Some(rest.strip_prefix('/').unwrap_or(rest))
        })
}

/// Apply segments to a stack whose first entry is home
fn apply(stack: &mut Vec<String>, segments: Vec<Segment>) {
    for segment in segments {
        match segment {
            // Clamp at home
            Segment::Parent => {
                if stack.len() > 1 {
                    stack.pop();
                }
            }
            Segment::Name(name) => stack.push(name),
        }
    }
}

/// Resolve `target` against the directory `current`.
///
/// Supports `.`, `..`, `~`, the home alias and leading `/`. A target starting
/// with `~` or the alias is anchored at home even without a separator, so
/// `homework` resolves to `~/work`. Ascending above
/// home is clamped. Components are not checked for existence.
pub fn resolve(config: &VfsConfig, current: &str, target: &str) -> Resolution {
    let parsed = ParsedPath::parse(config, target);

    let mut stack = vec![config.home_symbol.clone()];
    if !parsed.is_absolute() {
        // Any current path is taken relative to home
        apply(&mut stack, ParsedPath::parse(config, current).segments);
    }
    apply(&mut stack, parsed.segments);

    Resolution {
        path: stack.join("/"),
        error: None,
    }
}

/// Split a resolved path into its parent directory and final component.
///
/// Returns `None` for the home directory itself.
pub fn split_parent(path: &str) -> Option<(&str, &str)> {
    path.rsplit_once('/')
}

/// Join a directory path and a child name
pub fn join(dir: &str, name: &str) -> String {
    format!("{}/{}", dir, name)
}
