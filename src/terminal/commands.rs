//! Built-in command parsing

/// Names of every built-in command, sorted
pub const COMMAND_NAMES: &[&str] = &["cat", "cd", "clear", "help", "history", "ls", "pwd", "tree"];

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Change directory; no argument goes home
    Cd(Option<String>),
    Pwd,
    /// List a directory, or print a file's name
    Ls(Option<String>),
    /// Print one or more files
    Cat(Vec<String>),
    /// Recursive listing
    Tree(Option<String>),
    History,
    Clear,
    Help,
    Unknown(String),
    /// Blank line
    Empty,
}

impl Command {
    /// Parse a command line. Arguments are split on whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use termfolio::terminal::commands::Command;
    ///
    /// assert_eq!(Command::parse("cd ../blog"), Command::Cd(Some("../blog".to_string())));
    /// assert_eq!(Command::parse("  "), Command::Empty);
    /// ```
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Command::Empty;
        };
        let first = words.next().map(str::to_string);
        let rest = words.map(str::to_string);

        match name {
            "cd" => Command::Cd(first),
            "pwd" => Command::Pwd,
            "ls" => Command::Ls(first),
            "cat" => Command::Cat(first.into_iter().chain(rest).collect()),
            "tree" => Command::Tree(first),
            "history" => Command::History,
            "clear" | "cls" => Command::Clear,
            "help" => Command::Help,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Lines printed by `help`
pub fn help_lines() -> Vec<String> {
    [
        ("cd [dir]", "change directory (home when omitted)"),
        ("pwd", "print the current directory"),
        ("ls [path]", "list directory contents"),
        ("cat <file>...", "print file contents"),
        ("tree [dir]", "show the directory tree"),
        ("history", "show command history"),
        ("clear", "clear the screen"),
        ("help", "show this help"),
    ]
    .iter()
    .map(|(usage, description)| format!("  {:<14} {}", usage, description))
    .collect()
}
