use crate::history::Event;
use std::collections::BTreeMap;

/// A counted transition from one command to the next
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub count: u64,
}

impl Transition {
    pub fn new(from: impl Into<String>, to: impl Into<String>, count: u64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            count,
        }
    }
}

/// Total occurrence count per token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeTotals {
    counts: BTreeMap<String, u64>,
}

impl NodeTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from precomputed (token, count) pairs; repeated tokens add up
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut totals = Self::new();
        for (token, count) in counts {
            *totals.counts.entry(token.into()).or_insert(0) += count;
        }
        totals
    }

    /// Record one occurrence of `token`
    pub fn record(&mut self, token: &str) {
        match self.counts.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(token.to_string(), 1);
            }
        }
    }

    /// Occurrence count of `token` (0 when never seen)
    pub fn get(&self, token: &str) -> u64 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Sum of all counts, i.e. the number of recorded events
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Fraction of all events that are `token`, in [0, 1]
    pub fn share(&self, token: &str) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.get(token) as f64 / total as f64
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate (token, count) in lexicographic token order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(token, count)| (token.as_str(), *count))
    }

    /// Tokens by count, largest first; equal counts in token order
    pub fn sorted_desc(&self) -> Vec<(&str, u64)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        sorted
    }
}

/// Count of unit-distance transitions per ordered (from, to) pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairCounts {
    counts: BTreeMap<(String, String), u64>,
}

impl PairCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from precomputed transitions; repeated pairs add up
    pub fn from_transitions<I>(transitions: I) -> Self
    where
        I: IntoIterator<Item = Transition>,
    {
        let mut pairs = Self::new();
        for t in transitions {
            *pairs.counts.entry((t.from, t.to)).or_insert(0) += t.count;
        }
        pairs
    }

    /// Record one `from` -> `to` transition
    pub fn record(&mut self, from: &str, to: &str) {
        *self
            .counts
            .entry((from.to_string(), to.to_string()))
            .or_insert(0) += 1;
    }

    pub fn get(&self, from: &str, to: &str) -> u64 {
        self.counts
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Total transition volume
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate (from, to, count) in lexicographic pair order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, u64)> + '_ {
        self.counts
            .iter()
            .map(|((from, to), count)| (from.as_str(), to.as_str(), *count))
    }

    /// Canonical order: count descending, then (from, to) ascending
    pub fn sorted_desc(&self) -> Vec<Transition> {
        let mut sorted: Vec<Transition> = self
            .iter()
            .map(|(from, to, count)| Transition::new(from, to, count))
            .collect();
        sorted.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.from.cmp(&b.from))
                .then_with(|| a.to.cmp(&b.to))
        });
        sorted
    }
}

/// Node totals and pair counts derived from one history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionStats {
    pub node_totals: NodeTotals,
    pub pair_counts: PairCounts,
}

impl TransitionStats {
    /// Fold an ordered event sequence into statistics
    ///
    /// Every event counts once towards its token's total. A consecutive
    /// pair counts as a transition only when the positions differ by
    /// exactly 1.
    ///
    /// # Example
    /// ```
    /// use cmdflow::history::Event;
    /// use cmdflow::transition::TransitionStats;
    ///
    /// let events = vec![
    ///     Event::new(1, "a"),
    ///     Event::new(2, "b"),
    ///     Event::new(4, "c"),
    ///     Event::new(5, "d"),
    /// ];
    /// let stats = TransitionStats::from_events(&events);
    ///
    /// assert_eq!(stats.pair_counts.len(), 2);
    /// assert_eq!(stats.pair_counts.get("a", "b"), 1);
    /// assert_eq!(stats.pair_counts.get("b", "c"), 0);
    /// assert_eq!(stats.node_totals.total(), 4);
    /// ```
    pub fn from_events(events: &[Event]) -> Self {
        let mut stats = Self::default();

        for (i, event) in events.iter().enumerate() {
            stats.node_totals.record(&event.token);
            if let Some(next) = events.get(i + 1) {
                if event.is_adjacent_to(next) {
                    stats.pair_counts.record(&event.token, &next.token);
                }
            }
        }

        tracing::debug!(
            "Counted {} events, {} distinct tokens, {} transitions over {} distinct pairs",
            stats.node_totals.total(),
            stats.node_totals.len(),
            stats.pair_counts.total(),
            stats.pair_counts.len()
        );

        stats
    }

    pub fn is_empty(&self) -> bool {
        self.node_totals.is_empty()
    }
}
