//! History event log parsing
//!
//! Turns `<position> <token>` lines into an ordered event sequence.
//! Malformed lines are dropped, never fatal: a history pasted from a
//! terminal routinely contains blank lines, wrapped output and stray text.

use crate::shell_alias::AliasMap;

/// A single recorded command invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event {
    /// Caller-supplied index (history number); gaps mean filtered commands
    pub position: i64,
    /// Opaque command identifier (e.g. "commit", "push")
    pub token: String,
}

impl Event {
    pub fn new(position: i64, token: impl Into<String>) -> Self {
        Self {
            position,
            token: token.into(),
        }
    }

    /// True when `next` directly follows this event (position gap of exactly 1)
    ///
    /// # Example
    /// ```
    /// use cmdflow::history::Event;
    ///
    /// let a = Event::new(1, "add");
    /// assert!(a.is_adjacent_to(&Event::new(2, "commit")));
    /// assert!(!a.is_adjacent_to(&Event::new(3, "commit")));
    /// ```
    pub fn is_adjacent_to(&self, next: &Event) -> bool {
        next.position.checked_sub(self.position) == Some(1)
    }
}

/// Parse one `<position> <token...>` line
///
/// The token is the trimmed remainder of the line after the first
/// whitespace run. Returns `None` for blank lines, lines without a token,
/// and lines whose position is not an integer.
pub fn parse_line(line: &str) -> Option<Event> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (position, token) = line.split_once(char::is_whitespace)?;
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    match position.parse::<i64>() {
        Ok(position) => Some(Event::new(position, token)),
        Err(e) => {
            tracing::debug!("Dropping history line with bad position {:?}: {}", position, e);
            None
        }
    }
}

/// Parse a whole history text into events, preserving line order
///
/// # Example
/// ```
/// use cmdflow::history::parse_history;
///
/// let events = parse_history("1 status\n\n2 add\nnot-a-number commit\n3 commit\n");
/// let tokens: Vec<_> = events.iter().map(|e| e.token.as_str()).collect();
/// assert_eq!(tokens, ["status", "add", "commit"]);
/// ```
pub fn parse_history(text: &str) -> Vec<Event> {
    let events: Vec<Event> = text.lines().filter_map(parse_line).collect();
    warn_on_decreasing_positions(&events);
    tracing::debug!("Parsed {} events from history", events.len());
    events
}

/// Parse history, expanding each token through an alias mapping
pub fn parse_history_with_aliases(text: &str, aliases: &AliasMap) -> Vec<Event> {
    let mut events = parse_history(text);
    for event in &mut events {
        event.token = aliases.expand(&event.token);
    }
    events
}

/// Format events back into `<position> <token>` lines
pub fn render_history(events: &[Event]) -> String {
    let mut output = String::new();
    for event in events {
        output.push_str(&event.position.to_string());
        output.push(' ');
        output.push_str(&event.token);
        output.push('\n');
    }
    output
}

fn warn_on_decreasing_positions(events: &[Event]) {
    let decreasing = events
        .windows(2)
        .filter(|pair| pair[1].position < pair[0].position)
        .count();
    if decreasing > 0 {
        tracing::warn!(
            "History positions decrease {} time(s); those pairs will not count as transitions",
            decreasing
        );
    }
}
