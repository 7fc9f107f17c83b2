//! Known-command vocabulary and unknown-token cleanup
//!
//! A history pasted by a user carries typos, stray flags and commands that
//! are not part of the tool being visualized. The vocabulary marks which
//! tokens are known commands; the cleanup rule removes the obvious noise
//! among the unknown ones and reports what is left for review.
//!
//! Dropped events keep their neighbours' positions untouched, so the gap
//! they leave also breaks the transition across them.

use crate::history::Event;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Git subcommands recognized when no vocabulary file is given
const GIT_COMMANDS: &[&str] = &[
    "add", "am", "annotate", "apply", "archive", "bisect", "blame", "branch",
    "bundle", "checkout", "cherry", "cherry-pick", "citool", "clean", "clone",
    "commit", "config", "count-objects", "describe", "diff", "difftool",
    "fetch", "format-patch", "fsck", "gc", "grep", "gui", "help", "init",
    "instaweb", "log", "ls-files", "ls-remote", "ls-tree", "merge",
    "merge-base", "mergetool", "mv", "notes", "pull", "push", "range-diff",
    "rebase", "reflog", "remote", "repack", "replace", "request-pull", "reset",
    "restore", "rev-list", "rev-parse", "revert", "rm", "send-email",
    "shortlog", "show", "show-branch", "sparse-checkout", "stash", "status",
    "submodule", "switch", "tag", "worktree",
];

/// Set of tokens considered known commands
#[derive(Debug, Clone)]
pub struct Vocabulary {
    known: HashSet<String>,
}

impl Vocabulary {
    /// Built-in git subcommand vocabulary
    pub fn git() -> Self {
        Self {
            known: GIT_COMMANDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Parse a command list, one name per line
    ///
    /// Blank lines and `#` comments are ignored.
    pub fn from_list(text: &str) -> Self {
        let known = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect();
        Self { known }
    }

    pub fn is_known(&self, token: &str) -> bool {
        self.known.contains(token)
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Apply the unknown-token cleanup rule
    ///
    /// Unknown events are dropped when their token is a bare `git`, starts
    /// with `-` (a flag that ended up in the command slot), or occurs only
    /// once among unknown events (most likely a typo). Unknown tokens that
    /// survive are listed in the report for review.
    pub fn clean(&self, events: Vec<Event>) -> CleanupReport {
        let mut unknown_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for event in events.iter().filter(|e| !self.is_known(&e.token)) {
            *unknown_counts.entry(event.token.as_str()).or_insert(0) += 1;
        }

        let noise: HashSet<String> = unknown_counts
            .iter()
            .filter(|(token, count)| is_noise_token(token) || **count == 1)
            .map(|(token, _)| token.to_string())
            .collect();
        let unknown: BTreeSet<String> = unknown_counts
            .keys()
            .filter(|token| !noise.contains(**token))
            .map(|token| token.to_string())
            .collect();

        let before = events.len();
        let events: Vec<Event> = events
            .into_iter()
            .filter(|e| !noise.contains(&e.token))
            .collect();
        let dropped = before - events.len();

        tracing::debug!(
            "Vocabulary cleanup dropped {} events, {} unknown tokens remain",
            dropped,
            unknown.len()
        );

        CleanupReport {
            events,
            dropped,
            unknown,
        }
    }
}

fn is_noise_token(token: &str) -> bool {
    token == "git" || token.starts_with('-')
}

/// Result of the vocabulary cleanup
#[derive(Debug, Clone)]
pub struct CleanupReport {
    /// Events remaining after noise removal, in original order
    pub events: Vec<Event>,
    /// Number of events removed as noise
    pub dropped: usize,
    /// Unknown tokens that were kept, sorted
    pub unknown: BTreeSet<String>,
}

impl CleanupReport {
    /// True when unknown tokens remain and need a keep/drop decision
    pub fn needs_review(&self) -> bool {
        !self.unknown.is_empty()
    }

    /// Drop every remaining unknown event
    pub fn drop_unknown(self) -> Vec<Event> {
        let unknown = self.unknown;
        self.events
            .into_iter()
            .filter(|e| !unknown.contains(&e.token))
            .collect()
    }

    /// Keep remaining unknown events as they are
    pub fn keep_unknown(self) -> Vec<Event> {
        self.events
    }
}
