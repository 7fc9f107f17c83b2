//! End-to-end pipeline: history text to visual graph
//!
//! parse -> (vocabulary cleanup) -> transition statistics -> significance
//! policy -> visual encoding. Each call owns its input and output; nothing
//! is shared between calls.

use crate::config::{Config, ConfigError};
use crate::encoder::{encode_transitions, EncodeOutcome, EncoderStyle};
use crate::history::{parse_history, parse_history_with_aliases, Event};
use crate::shell_alias::{extract_git_events, AliasError, ShellAliases};
use crate::transition::{SignificancePolicy, Transition, TransitionStats};
use crate::vocabulary::Vocabulary;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors for pipeline runs
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Alias(#[from] AliasError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Shape of the input text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// `<position> <token>` lines
    #[default]
    Events,
    /// Raw shell `history` output; git subcommands are extracted
    ShellHistory,
}

/// What to do with unknown tokens left after the vocabulary cleanup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownTokens {
    #[default]
    Keep,
    Drop,
}

/// Options for one pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub config: Config,
    pub input: InputFormat,
    /// Shell aliases are used for raw history; git aliases expand event tokens
    pub aliases: ShellAliases,
    /// Optional vocabulary cleanup
    pub vocabulary: Option<Vocabulary>,
    pub unknown: UnknownTokens,
}

/// Everything a pipeline run produced
#[derive(Debug, Clone)]
pub struct GraphReport {
    /// Events that entered the statistics
    pub events: Vec<Event>,
    pub stats: TransitionStats,
    /// Transitions that survived the policy, canonical order
    pub drawn: Vec<Transition>,
    pub outcome: EncodeOutcome,
    /// Events removed by the vocabulary cleanup
    pub dropped: usize,
    /// Unknown tokens remaining after the cleanup rule
    pub unknown: BTreeSet<String>,
}

/// Build a visual graph from `<position> <token>` text
///
/// The core engine without the optional front-end stages.
///
/// # Example
/// ```
/// use cmdflow::encoder::EncoderStyle;
/// use cmdflow::pipeline::build_graph;
/// use cmdflow::transition::SignificancePolicy;
///
/// let outcome = build_graph("1 pull\n", &SignificancePolicy::dense(), &EncoderStyle::default());
/// assert!(outcome.is_empty());
/// ```
pub fn build_graph(
    history: &str,
    policy: &SignificancePolicy,
    style: &EncoderStyle,
) -> EncodeOutcome {
    let stats = TransitionStats::from_events(&parse_history(history));
    let drawn = policy.apply(&stats.pair_counts);
    encode_transitions(&stats.node_totals, &drawn, style)
}

/// Run the full pipeline with validated configuration
pub fn run(history: &str, options: &PipelineOptions) -> Result<GraphReport> {
    options.config.validate()?;

    let events = match options.input {
        InputFormat::Events if options.aliases.git.is_empty() => parse_history(history),
        InputFormat::Events => parse_history_with_aliases(history, &options.aliases.git),
        InputFormat::ShellHistory => extract_git_events(history, &options.aliases)?,
    };

    let (events, dropped, unknown) = match &options.vocabulary {
        Some(vocabulary) => {
            let report = vocabulary.clean(events);
            let dropped = report.dropped;
            let unknown = report.unknown.clone();
            let events = match options.unknown {
                UnknownTokens::Keep => report.keep_unknown(),
                UnknownTokens::Drop => report.drop_unknown(),
            };
            (events, dropped, unknown)
        }
        None => (events, 0, BTreeSet::new()),
    };

    if !unknown.is_empty() {
        tracing::warn!(
            "{} unknown command(s) {}: {}",
            unknown.len(),
            match options.unknown {
                UnknownTokens::Keep => "kept",
                UnknownTokens::Drop => "dropped",
            },
            unknown.iter().cloned().collect::<Vec<_>>().join(", ")
        );
    }

    let stats = TransitionStats::from_events(&events);
    let drawn = options.config.policy.apply(&stats.pair_counts);
    let outcome = encode_transitions(&stats.node_totals, &drawn, &options.config.style);

    tracing::info!(
        "Graph built: {} events, {} of {} transitions drawn{}",
        events.len(),
        drawn.len(),
        stats.pair_counts.len(),
        if outcome.is_empty() { " (empty)" } else { "" }
    );

    Ok(GraphReport {
        events,
        stats,
        drawn,
        outcome,
        dropped,
        unknown,
    })
}
