//! Alias expansion and git command extraction from raw shell history
//!
//! Aliases are passed around as an explicit [`AliasMap`]; nothing here reads
//! the user's shell or git configuration. The binary loads `alias -p` and
//! `git config --get-regexp alias` output from files and hands the parsed
//! maps in.

use crate::history::Event;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors for alias definition parsing
#[derive(Error, Debug)]
pub enum AliasError {
    #[error("Invalid alias pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, AliasError>;

/// Mapping from alias name to its expansion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    aliases: BTreeMap<String, String>,
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from (alias, expansion) pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            aliases: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse bash `alias -p` output (`alias gst='git status'`)
    ///
    /// Lines that are not alias definitions are skipped.
    pub fn parse_bash(text: &str) -> Result<Self> {
        let pattern = cached(&BASH_ALIAS, r"^alias ([^=\s]+)='(.*)'$")?;
        let mut map = Self::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match pattern.captures(line) {
                // bash prints embedded single quotes as '\''
                Some(caps) => map.insert(&caps[1], caps[2].replace(r"'\''", "'")),
                None => tracing::debug!("Skipping non-alias line: {:?}", line),
            }
        }
        Ok(map)
    }

    /// Parse `git config --get-regexp alias` output (`alias.co checkout`)
    pub fn parse_git(text: &str) -> Result<Self> {
        let pattern = cached(&GIT_ALIAS, r"^alias\.(\S+)\s+(.+)$")?;
        let mut map = Self::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match pattern.captures(line) {
                Some(caps) => map.insert(&caps[1], caps[2].trim()),
                None => tracing::debug!("Skipping non-alias line: {:?}", line),
            }
        }
        Ok(map)
    }

    pub fn insert(&mut self, alias: impl Into<String>, expansion: impl Into<String>) {
        self.aliases.insert(alias.into(), expansion.into());
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Expand the leading word of `command` if it is an alias
    ///
    /// Only a whole leading word matches; the rest of the command is kept.
    /// Expansion is not recursive.
    ///
    /// # Example
    /// ```
    /// use cmdflow::shell_alias::AliasMap;
    ///
    /// let aliases = AliasMap::from_pairs([("gst", "git status")]);
    /// assert_eq!(aliases.expand("gst -s"), "git status -s");
    /// assert_eq!(aliases.expand("gstx"), "gstx");
    /// ```
    pub fn expand(&self, command: &str) -> String {
        let command = command.trim();
        let (head, rest) = match command.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim_start()),
            None => (command, ""),
        };

        match self.aliases.get(head) {
            Some(expansion) if rest.is_empty() => expansion.trim().to_string(),
            Some(expansion) => format!("{} {}", expansion.trim(), rest),
            None => command.to_string(),
        }
    }
}

static BASH_ALIAS: OnceLock<Regex> = OnceLock::new();
static GIT_ALIAS: OnceLock<Regex> = OnceLock::new();
static HISTORY_LINE: OnceLock<Regex> = OnceLock::new();

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> Result<&'static Regex> {
    if let Some(re) = cell.get() {
        return Ok(re);
    }
    let re = Regex::new(pattern)?;
    Ok(cell.get_or_init(|| re))
}

/// Aliases applied while extracting git commands from shell history
#[derive(Debug, Clone, Default)]
pub struct ShellAliases {
    /// Shell-level aliases (`gco` -> `git checkout`)
    pub shell: AliasMap,
    /// Git-level aliases (`co` -> `checkout`)
    pub git: AliasMap,
}

impl ShellAliases {
    /// Expand a full command line: shell alias first, then git alias
    pub fn expand_command(&self, command: &str) -> String {
        let command = self.shell.expand(command);
        match command.strip_prefix("git ") {
            Some(rest) => format!("git {}", self.git.expand(rest)),
            None => command,
        }
    }
}

/// Extract git subcommand events from shell `history` output
///
/// Each line looks like `  123  git commit -m "msg"`. The history number
/// becomes the event position and the git subcommand becomes the token.
/// Non-git commands are dropped, which leaves position gaps so that the
/// transition engine does not link commands across them. Commands whose
/// subcommand word contains a pipe are skipped.
///
/// # Example
/// ```
/// use cmdflow::shell_alias::{extract_git_events, ShellAliases};
///
/// let history = "  1  git status\n  2  ls\n  3  git add .\n";
/// let events = extract_git_events(history, &ShellAliases::default()).unwrap();
/// assert_eq!(events.len(), 2);
/// assert_eq!(events[1].token, "add");
/// ```
pub fn extract_git_events(history: &str, aliases: &ShellAliases) -> Result<Vec<Event>> {
    let pattern = cached(&HISTORY_LINE, r"^\s*(-?\d+)\*?\s+(.*)$")?;
    let mut events = Vec::new();

    for line in history.lines() {
        let Some(caps) = pattern.captures(line) else {
            continue;
        };
        let Ok(position) = caps[1].parse::<i64>() else {
            tracing::debug!("Dropping history line with bad number: {:?}", line);
            continue;
        };

        let command = aliases.expand_command(&caps[2]);
        let mut words = command.split_whitespace();
        if words.next() != Some("git") {
            continue;
        }
        match words.next() {
            Some(sub) if !sub.contains('|') => events.push(Event::new(position, sub)),
            _ => continue,
        }
    }

    tracing::debug!("Extracted {} git commands from shell history", events.len());
    Ok(events)
}
