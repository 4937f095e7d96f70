//! Shell-like session for browsing the virtual file system

pub mod commands;
pub mod completion;

pub use commands::Command;
pub use completion::Completion;

use crate::core::config::{TerminalConfig, VfsConfig};
use crate::core::file_system::{Directory, DirectoryIndex, Node, NodeRef, VirtualFileSystem};
use crate::core::path::resolve;

/// Terminal session state
///
/// Borrows the file system it browses; the file system is never modified.
#[derive(Debug)]
pub struct TerminalSession<'a> {
    vfs: &'a VirtualFileSystem,
    index: DirectoryIndex<'a>,
    vfs_config: VfsConfig,
    terminal_config: TerminalConfig,
    /// Current working directory
    cwd: String,
    /// Output lines
    pub output: Vec<String>,
    /// Command history
    pub history: Vec<String>,
    /// Current input
    pub input: String,
    /// History index for navigation
    history_index: Option<usize>,
}

impl<'a> TerminalSession<'a> {
    /// Create a new session starting at home
    pub fn new(
        vfs: &'a VirtualFileSystem,
        vfs_config: VfsConfig,
        terminal_config: TerminalConfig,
    ) -> Self {
        Self {
            vfs,
            index: vfs.directory_index(),
            cwd: vfs_config.home_symbol.clone(),
            vfs_config,
            terminal_config,
            output: Vec::new(),
            history: Vec::new(),
            input: String::new(),
            history_index: None,
        }
    }

    /// Get the current working directory
    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    /// Prompt shown before each command
    pub fn prompt(&self) -> String {
        format!(
            "{}@{}:{}$ ",
            self.terminal_config.user, self.terminal_config.host, self.cwd
        )
    }

    /// Execute the current input command
    pub fn execute_input(&mut self) -> Vec<String> {
        let command = std::mem::take(&mut self.input);
        self.history_index = None;
        self.execute(&command)
    }

    /// Execute a command line and return the lines it printed
    pub fn execute(&mut self, line: &str) -> Vec<String> {
        let line = line.trim();
        if line.is_empty() {
            return Vec::new();
        }

        // Add to history
        self.history.push(line.to_string());
        let limit = self.terminal_config.history_limit.max(1);
        if self.history.len() > limit {
            let excess = self.history.len() - limit;
            self.history.drain(..excess);
        }
        self.output.push(format!("$ {}", line));

        let command = Command::parse(line);
        tracing::debug!("Executing {:?} in {}", command, self.cwd);

        let printed = match command {
            Command::Cd(target) => self.handle_cd(target.as_deref()),
            Command::Pwd => vec![self.cwd.clone()],
            Command::Ls(target) => self.handle_ls(target.as_deref()),
            Command::Cat(targets) => self.handle_cat(&targets),
            Command::Tree(target) => self.handle_tree(target.as_deref()),
            Command::History => self
                .history
                .iter()
                .enumerate()
                .map(|(i, entry)| format!("{:>4}  {}", i + 1, entry))
                .collect(),
            Command::Clear => {
                self.clear_output();
                return Vec::new();
            }
            Command::Help => commands::help_lines(),
            Command::Unknown(name) => vec![format!("command not found: {}", name)],
            Command::Empty => Vec::new(),
        };

        self.output.extend(printed.iter().cloned());
        printed
    }

    /// Complete the current input in place
    pub fn complete_input(&mut self) -> Completion {
        let completion = self.complete(&self.input);
        self.input = completion.line.clone();
        completion
    }

    /// Complete a partial command line against the current directory
    pub fn complete(&self, line: &str) -> Completion {
        completion::complete(&self.vfs_config, &self.index, &self.cwd, line)
    }

    fn resolve(&self, target: &str) -> String {
        resolve(&self.vfs_config, &self.cwd, target).path
    }

    /// Handle cd command
    fn handle_cd(&mut self, target: Option<&str>) -> Vec<String> {
        let target = target.unwrap_or("");
        let path = self.resolve(target);

        match self.index.lookup(&path) {
            Some(NodeRef::Directory(dir)) => {
                self.cwd = dir.path.clone();
                Vec::new()
            }
            Some(NodeRef::File(_)) => vec![format!("cd: not a directory: {}", target)],
            None => vec![format!("cd: no such directory: {}", target)],
        }
    }

    fn handle_ls(&self, target: Option<&str>) -> Vec<String> {
        let target = target.unwrap_or(".");
        match self.index.lookup(&self.resolve(target)) {
            Some(NodeRef::Directory(dir)) => {
                if dir.count() == 0 {
                    return Vec::new();
                }
                let names: Vec<String> = dir.children().map(entry_label).collect();
                vec![names.join("  ")]
            }
            Some(NodeRef::File(file)) => vec![file.name.clone()],
            None => vec![format!(
                "ls: cannot access '{}': No such file or directory",
                target
            )],
        }
    }

    fn handle_cat(&self, targets: &[String]) -> Vec<String> {
        if targets.is_empty() {
            return vec!["cat: missing operand".to_string()];
        }

        let mut lines = Vec::new();
        for target in targets {
            match self.index.lookup(&self.resolve(target)) {
                Some(NodeRef::File(file)) => match self.vfs.content(&file.virtual_path) {
                    Some(text) => lines.extend(text.lines().map(str::to_string)),
                    None => {
                        tracing::warn!("No content for {}", file.virtual_path);
                    }
                },
                Some(NodeRef::Directory(_)) => lines.push(format!("cat: {}: Is a directory", target)),
                None => lines.push(format!("cat: {}: No such file or directory", target)),
            }
        }
        lines
    }

    fn handle_tree(&self, target: Option<&str>) -> Vec<String> {
        let target = target.unwrap_or(".");
        match self.index.get(&self.resolve(target)) {
            Some(dir) => {
                let mut lines = vec![dir.path.clone()];
                tree_lines(dir, 1, &mut lines);
                lines
            }
            None => vec![format!("tree: {}: No such directory", target)],
        }
    }

    /// Clear output
    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    /// Navigate history up
    pub fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }

        let new_index = match self.history_index {
            Some(i) if i > 0 => i - 1,
            Some(i) => i,
            None => self.history.len() - 1,
        };

        self.history_index = Some(new_index);
        self.input = self.history[new_index].clone();
    }

    /// Navigate history down
    pub fn history_down(&mut self) {
        let Some(i) = self.history_index else {
            return;
        };

        if i + 1 < self.history.len() {
            self.history_index = Some(i + 1);
            self.input = self.history[i + 1].clone();
        } else {
            self.history_index = None;
            self.input.clear();
        }
    }
}

/// Display name with a trailing `/` for directories
fn entry_label(node: &Node) -> String {
    if node.is_dir() {
        format!("{}/", node.name())
    } else {
        node.name().to_string()
    }
}

fn tree_lines(dir: &Directory, depth: usize, lines: &mut Vec<String>) {
    for child in dir.children() {
        lines.push(format!("{}{}", "  ".repeat(depth), entry_label(child)));
        if let Node::Directory(sub) = child {
            tree_lines(sub, depth + 1, lines);
        }
    }
}
