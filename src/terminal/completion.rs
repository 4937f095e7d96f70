//! Tab completion of command names and partial paths

use crate::core::config::VfsConfig;
use crate::core::file_system::{DirectoryIndex, Node};
use crate::core::path::resolve;

use super::commands::COMMAND_NAMES;

/// Outcome of completing an input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Input line after completion. Unchanged when nothing could be added.
    pub line: String,
    /// Every entry matching the typed prefix
    pub candidates: Vec<String>,
}

/// Complete the last word of `line`.
///
/// The first word completes against command names. Any later word is a path:
/// its directory part is resolved against `cwd` and the rest is matched
/// against that directory's entries. Directories complete with a trailing
/// `/` so completion can continue into them.
pub fn complete(config: &VfsConfig, index: &DirectoryIndex<'_>, cwd: &str, line: &str) -> Completion {
    let word_start = line
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let word = &line[word_start..];
    let is_command = line[..word_start].trim().is_empty();

    let (dir_part, prefix, candidates) = if is_command {
        let candidates: Vec<String> = COMMAND_NAMES
            .iter()
            .filter(|name| name.starts_with(word))
            .map(|name| name.to_string())
            .collect();
        ("", word, candidates)
    } else {
        let (dir_part, prefix) = match word.rfind('/') {
            Some(i) => word.split_at(i + 1),
            None => ("", word),
        };
        // An empty target would resolve to home, not the current directory
        let dir_path = if dir_part.is_empty() {
            cwd.to_string()
        } else {
            resolve(config, cwd, dir_part).path
        };
        let candidates: Vec<String> = match index.get(&dir_path) {
            Some(dir) => dir
                .children()
                .filter(|node| node.name().starts_with(prefix))
                .map(|node| match node {
                    Node::Directory(d) => format!("{}/", d.name),
                    Node::File(f) => f.name.clone(),
                })
                .collect(),
            None => Vec::new(),
        };
        (dir_part, prefix, candidates)
    };

    let completed = match candidates.as_slice() {
        [] => None,
        [only] => Some(only.clone()),
        many => {
            let common = common_prefix(many);
            (common.len() > prefix.len()).then(|| common.to_string())
        }
    };

    let line = match completed {
        Some(text) => {
            let suffix = if is_command && candidates.len() == 1 { " " } else { "" };
            format!("{}{}{}{}", &line[..word_start], dir_part, text, suffix)
        }
        None => line.to_string(),
    };

    Completion { line, candidates }
}

/// Longest prefix shared by every candidate
fn common_prefix(candidates: &[String]) -> &str {
    let Some(first) = candidates.first() else {
        return "";
    };
    let mut end = first.len();
    for other in &candidates[1..] {
        end = first
            .char_indices()
            .zip(other.chars())
            .take_while(|((_, a), b)| a == b)
            .map(|((i, a), _)| i + a.len_utf8())
            .last()
            .unwrap_or(0)
            .min(end);
    }
    &first[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::DocumentSet;
    use crate::core::file_system::VirtualFileSystem;

    fn vfs() -> VirtualFileSystem {
        let docs: DocumentSet = [
            ("/src/content/about.md", "me"),
            ("/src/content/blog/welcome.md", "hi"),
            ("/src/content/blog/winter.md", "cold"),
            ("/src/content/skills/rust.md", "fast"),
            ("/src/content/skills/ruby.md", "gems"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        VirtualFileSystem::build(&VfsConfig::default(), &docs).unwrap()
    }

    fn run(cwd: &str, line: &str) -> Completion {
        let vfs = vfs();
        let index = vfs.directory_index();
        complete(&VfsConfig::default(), &index, cwd, line)
    }

    #[test]
    fn test_complete_command_name() {
        assert_eq!(run("~", "pw").line, "pwd ");
        let c = run("~", "c");
        assert_eq!(c.candidates, vec!["cat", "cd", "clear"]);
        assert_eq!(c.line, "c");
    }

    #[test]
    fn test_complete_directory() {
        assert_eq!(run("~", "cd bl").line, "cd blog/");
        assert_eq!(run("~/blog", "cd ../sk").line, "cd ../skills/");
    }

    #[test]
    fn test_complete_file_in_subdirectory() {
        assert_eq!(run("~", "cat blog/we").line, "cat blog/welcome.blog");
        assert_eq!(run("~/skills", "cat ~/blog/wi").line, "cat ~/blog/winter.blog");
    }

    #[test]
    fn test_complete_common_prefix() {
        let c = run("~/skills", "cat r");
        assert_eq!(c.candidates, vec!["ruby", "rust"]);
        assert_eq!(c.line, "cat ru");

        let c = run("~", "cat blog/w");
        assert_eq!(c.candidates, vec!["welcome.blog", "winter.blog"]);
        assert_eq!(c.line, "cat blog/w");
    }

    #[test]
    fn test_complete_lists_whole_directory() {
        let c = run("~", "ls ");
        assert_eq!(c.candidates, vec!["about-me.xr", "blog/", "skills/"]);
        assert_eq!(c.line, "ls ");
    }

    #[test]
    fn test_complete_unknown_directory() {
        let c = run("~", "cd nowhere/x");
        assert!(c.candidates.is_empty());
        assert_eq!(c.line, "cd nowhere/x");
    }

    #[test]
    fn test_complete_after_multibyte_whitespace() {
        assert_eq!(run("~/blog", "cat\u{a0}we").line, "cat\u{a0}welcome.blog");
        assert_eq!(run("~", "cd\u{3000}sk").line, "cd\u{3000}skills/");
    }

    #[test]
    fn test_common_prefix() {
        let words = vec!["welcome".to_string(), "well".to_string(), "west".to_string()];
        assert_eq!(common_prefix(&words), "we");
        assert_eq!(common_prefix(&[]), "");
    }
}
