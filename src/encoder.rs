//! Visual encoding of transition statistics
//!
//! Maps node totals and significant transitions onto the attributes a
//! Graphviz-style renderer understands: box size from command frequency,
//! pen width from transition frequency, colors from a fixed palette.
//! Layout is left entirely to the renderer.
//!
//! Output is deterministic: nodes are sorted by token before colors are
//! assigned and edges follow the canonical transition order, so the same
//! history always yields the same graph description.

use crate::transition::{NodeTotals, PairCounts, SignificancePolicy, Transition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Attribute keys understood by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttrKey {
    Label,
    Width,
    Height,
    Color,
    FillColor,
    PenWidth,
    FontSize,
    ArrowSize,
}

impl AttrKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttrKey::Label => "label",
            AttrKey::Width => "width",
            AttrKey::Height => "height",
            AttrKey::Color => "color",
            AttrKey::FillColor => "fillcolor",
            AttrKey::PenWidth => "penwidth",
            AttrKey::FontSize => "fontsize",
            AttrKey::ArrowSize => "arrowsize",
        }
    }
}

/// Ordered attribute map for one node or edge
pub type Attributes = Vec<(AttrKey, String)>;

/// Border and fill color pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub color: String,
    pub fill: String,
}

impl PaletteEntry {
    pub fn new(color: &str, fill: &str) -> Self {
        Self {
            color: color.to_string(),
            fill: fill.to_string(),
        }
    }
}

/// Cyclic color palette
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Default for Palette {
    fn default() -> Self {
        // Saturated border with a light fill of the same hue
        Self {
            entries: vec![
                PaletteEntry::new("#3b82f6", "#eff6ff"),
                PaletteEntry::new("#f59e0b", "#fffbeb"),
                PaletteEntry::new("#ec4899", "#fdf2f8"),
                PaletteEntry::new("#8b5cf6", "#f5f3ff"),
                PaletteEntry::new("#10b981", "#f0fdf4"),
                PaletteEntry::new("#f97316", "#fff7ed"),
                PaletteEntry::new("#64748b", "#f8fafc"),
                PaletteEntry::new("#ef4444", "#fef2f2"),
            ],
        }
    }
}

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    /// Entry for the `index`-th node, wrapping around
    ///
    /// Returns `None` only for an empty palette.
    pub fn get(&self, index: usize) -> Option<&PaletteEntry> {
        if self.entries.is_empty() {
            return None;
        }
        self.entries.get(index % self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Numeric constants of the visual encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderStyle {
    /// Multiplier applied to a node's share of summed square-root totals
    pub size_scale: f64,
    /// Lower clamp for node size (inches)
    pub min_size: f64,
    /// Upper clamp for node size (inches)
    pub max_size: f64,
    /// Width floor so that labels of rare commands still fit
    pub min_width: f64,
    /// Multiplier applied to an edge's share of surviving volume
    pub edge_scale: f64,
    /// Pen width cap
    pub max_penwidth: f64,
    /// Above this pen width the arrowhead shrinks
    pub arrow_threshold: f64,
    pub arrowsize: f64,
    pub thick_arrowsize: f64,
    pub node_fontsize: f64,
    pub node_penwidth: f64,
    /// Emit `fillcolor` on nodes
    pub fill_nodes: bool,
    pub palette: Palette,
}

impl Default for EncoderStyle {
    fn default() -> Self {
        Self {
            size_scale: 6.0,
            min_size: 0.1,
            max_size: 4.0,
            min_width: 0.7,
            edge_scale: 60.0,
            max_penwidth: 10.0,
            arrow_threshold: 5.0,
            arrowsize: 1.0,
            thick_arrowsize: 0.1,
            node_fontsize: 12.0,
            node_penwidth: 1.5,
            fill_nodes: true,
            palette: Palette::default(),
        }
    }
}

impl EncoderStyle {
    /// Validate style constants
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("size_scale", self.size_scale),
            ("min_size", self.min_size),
            ("max_size", self.max_size),
            ("edge_scale", self.edge_scale),
            ("max_penwidth", self.max_penwidth),
            ("arrowsize", self.arrowsize),
            ("thick_arrowsize", self.thick_arrowsize),
            ("node_fontsize", self.node_fontsize),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be a positive number, got {}", name, value));
            }
        }

        let non_negative = [
            ("min_width", self.min_width),
            ("arrow_threshold", self.arrow_threshold),
            ("node_penwidth", self.node_penwidth),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be non-negative, got {}", name, value));
            }
        }

        if self.min_size > self.max_size {
            return Err(format!(
                "min_size ({}) must not exceed max_size ({})",
                self.min_size, self.max_size
            ));
        }

        if self.palette.is_empty() {
            return Err("palette must contain at least one color".to_string());
        }

        Ok(())
    }
}

/// A styled command node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualNode {
    /// Token, also the node identifier
    pub id: String,
    pub label: String,
    pub width: f64,
    pub height: f64,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fillcolor: Option<String>,
    pub fontsize: f64,
    pub penwidth: f64,
    /// Occurrence count behind the size and label
    pub count: u64,
}

impl VisualNode {
    pub fn attributes(&self) -> Attributes {
        let mut attrs = vec![
            (AttrKey::Label, self.label.clone()),
            (AttrKey::Width, format_number(self.width)),
            (AttrKey::Height, format_number(self.height)),
            (AttrKey::Color, self.color.clone()),
        ];
        if let Some(fill) = &self.fillcolor {
            attrs.push((AttrKey::FillColor, fill.clone()));
        }
        attrs.push((AttrKey::FontSize, format_number(self.fontsize)));
        attrs.push((AttrKey::PenWidth, format_number(self.penwidth)));
        attrs
    }
}

/// A styled directed transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualEdge {
    pub from: String,
    pub to: String,
    pub penwidth: f64,
    pub color: String,
    pub arrowsize: f64,
    /// Transition count behind the pen width
    pub count: u64,
}

impl VisualEdge {
    pub fn attributes(&self) -> Attributes {
        vec![
            (AttrKey::PenWidth, format_number(self.penwidth)),
            (AttrKey::Color, self.color.clone()),
            (AttrKey::ArrowSize, format_number(self.arrowsize)),
        ]
    }
}

/// Declarative graph description handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualGraph {
    nodes: Vec<VisualNode>,
    edges: Vec<VisualEdge>,
}

impl VisualGraph {
    /// Nodes in token order
    pub fn nodes(&self) -> &[VisualNode] {
        &self.nodes
    }

    /// Edges in canonical transition order
    pub fn edges(&self) -> &[VisualEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, from: &str, to: &str) -> Option<&VisualEdge> {
        self.edges.iter().find(|e| e.from == from && e.to == to)
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Sum of the transition counts drawn as edges
    pub fn edge_volume(&self) -> u64 {
        self.edges.iter().map(|e| e.count).sum()
    }
}

/// Result of encoding: a graph, or nothing worth drawing
#[derive(Debug, Clone, PartialEq)]
pub enum EncodeOutcome {
    Graph(VisualGraph),
    /// No transition survived the significance policy
    Empty,
}

impl EncodeOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, EncodeOutcome::Empty)
    }

    pub fn graph(&self) -> Option<&VisualGraph> {
        match self {
            EncodeOutcome::Graph(graph) => Some(graph),
            EncodeOutcome::Empty => None,
        }
    }

    pub fn into_graph(self) -> Option<VisualGraph> {
        match self {
            EncodeOutcome::Graph(graph) => Some(graph),
            EncodeOutcome::Empty => None,
        }
    }
}

/// Filter pair counts with `policy` and encode the survivors
///
/// # Example
/// ```
/// use cmdflow::encoder::{encode, EncoderStyle};
/// use cmdflow::history::parse_history;
/// use cmdflow::transition::{SignificancePolicy, TransitionStats};
///
/// let events = parse_history("1 add\n2 commit\n3 push\n");
/// let stats = TransitionStats::from_events(&events);
/// let outcome = encode(
///     &stats.node_totals,
///     &stats.pair_counts,
///     &SignificancePolicy::dense(),
///     &EncoderStyle::default(),
/// );
///
/// let graph = outcome.graph().unwrap();
/// assert_eq!(graph.nodes().len(), 3);
/// assert_eq!(graph.edges().len(), 2);
/// ```
pub fn encode(
    node_totals: &NodeTotals,
    pair_counts: &PairCounts,
    policy: &SignificancePolicy,
    style: &EncoderStyle,
) -> EncodeOutcome {
    let significant = policy.apply(pair_counts);
    encode_transitions(node_totals, &significant, style)
}

/// Encode an already filtered transition list
///
/// Transitions are drawn in the order given.
pub fn encode_transitions(
    node_totals: &NodeTotals,
    transitions: &[Transition],
    style: &EncoderStyle,
) -> EncodeOutcome {
    if transitions.is_empty() {
        tracing::debug!("No significant transitions, nothing to draw");
        return EncodeOutcome::Empty;
    }

    // Sorted so palette assignment does not depend on arrival order
    let tokens: BTreeSet<&str> = transitions
        .iter()
        .flat_map(|t| [t.from.as_str(), t.to.as_str()])
        .collect();

    let sqrt_sum: f64 = node_totals.iter().map(|(_, c)| (c as f64).sqrt()).sum();
    let event_total = node_totals.total();

    let nodes: Vec<VisualNode> = tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            let count = node_totals.get(token);
            let size = node_size(count, sqrt_sum, style);
            let colors = style.palette.get(index);
            VisualNode {
                id: token.to_string(),
                label: format!("{}\n{}%", token, percentage(count, event_total)),
                width: size.max(style.min_width),
                height: size,
                color: colors.map(|c| c.color.clone()).unwrap_or_default(),
                fillcolor: colors.filter(|_| style.fill_nodes).map(|c| c.fill.clone()),
                fontsize: style.node_fontsize,
                penwidth: style.node_penwidth,
                count,
            }
        })
        .collect();

    let volume: u64 = transitions.iter().map(|t| t.count).sum();
    let edges: Vec<VisualEdge> = transitions
        .iter()
        .map(|t| {
            let penwidth = edge_penwidth(t.count, volume, style);
            let color = nodes
                .iter()
                .find(|n| n.id == t.from)
                .map(|n| n.color.clone())
                .unwrap_or_default();
            VisualEdge {
                from: t.from.clone(),
                to: t.to.clone(),
                penwidth,
                color,
                arrowsize: if penwidth > style.arrow_threshold {
                    style.thick_arrowsize
                } else {
                    style.arrowsize
                },
                count: t.count,
            }
        })
        .collect();

    tracing::debug!("Encoded {} nodes and {} edges", nodes.len(), edges.len());

    EncodeOutcome::Graph(VisualGraph { nodes, edges })
}

/// Node size: share of summed square-root totals, scaled and clamped
///
/// The square root keeps a dominant command from shrinking every other
/// box to the minimum.
fn node_size(count: u64, sqrt_sum: f64, style: &EncoderStyle) -> f64 {
    let raw = if sqrt_sum > 0.0 {
        (count as f64).sqrt() / sqrt_sum * style.size_scale
    } else {
        0.0
    };
    raw.max(style.min_size).min(style.max_size)
}

fn edge_penwidth(count: u64, volume: u64, style: &EncoderStyle) -> f64 {
    if volume == 0 {
        return 0.0;
    }
    (count as f64 / volume as f64 * style.edge_scale).min(style.max_penwidth)
}

/// Integer percentage of `count` in `total`, rounded to nearest
fn percentage(count: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u64
}

/// Shortest decimal rendering with at most four fractional digits
pub fn format_number(value: f64) -> String {
    let text = format!("{:.4}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() || text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
