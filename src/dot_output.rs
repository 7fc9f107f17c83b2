//! Graphviz DOT output for visual graphs
//!
//! The encoder decides every per-node and per-edge attribute; this writer
//! only wraps them in the page decoration (background, caption, framed
//! cluster) and quotes them. Rendering to SVG/PNG is done by piping the
//! result through `dot`.

use crate::encoder::{Attributes, VisualGraph};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Page-level decoration around the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphDecoration {
    /// Caption shown bottom-right (empty for none)
    pub caption: String,
    pub rankdir: String,
    pub bgcolor: String,
    pub fontname: String,
    pub fontsize: f64,
    pub fontcolor: String,
    pub dpi: u32,
    /// Draw nodes inside a framed, rounded cluster
    pub framed: bool,
    pub frame_color: String,
    pub frame_fill: String,
    pub node_fontname: String,
}

impl Default for GraphDecoration {
    fn default() -> Self {
        Self {
            caption: "cmdflow".to_string(),
            rankdir: "TB".to_string(),
            bgcolor: "#fef5e7".to_string(),
            fontname: "Arial,Helvetica,system-ui,sans-serif".to_string(),
            fontsize: 12.0,
            fontcolor: "#656d76".to_string(),
            dpi: 200,
            framed: true,
            frame_color: "#f6ad55".to_string(),
            frame_fill: "white".to_string(),
            node_fontname: "Inconsolata, monospace".to_string(),
        }
    }
}

/// DOT output formatter
#[derive(Debug, Clone, Default)]
pub struct DotOutput {
    decoration: GraphDecoration,
}

impl DotOutput {
    pub fn new(decoration: GraphDecoration) -> Self {
        Self { decoration }
    }

    /// Quote a DOT string, escaping backslashes, quotes and newlines
    fn quote(text: &str) -> String {
        let mut quoted = String::with_capacity(text.len() + 2);
        quoted.push('"');
        for c in text.chars() {
            match c {
                '\\' => quoted.push_str("\\\\"),
                '"' => quoted.push_str("\\\""),
                '\n' => quoted.push_str("\\n"),
                '\r' => {}
                _ => quoted.push(c),
            }
        }
        quoted.push('"');
        quoted
    }

    fn format_attrs<'a, I>(attrs: I) -> String
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        let parts: Vec<String> = attrs
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, Self::quote(&value)))
            .collect();
        format!("[{}]", parts.join(", "))
    }

    fn element_attrs(attrs: Attributes) -> String {
        Self::format_attrs(attrs.into_iter().map(|(k, v)| (k.as_str(), v)))
    }

    fn page_attrs(&self) -> String {
        let d = &self.decoration;
        let mut attrs = vec![
            ("rankdir", d.rankdir.clone()),
            ("bgcolor", d.bgcolor.clone()),
            ("pad", "0.2".to_string()),
            ("fontname", d.fontname.clone()),
            ("fontsize", crate::encoder::format_number(d.fontsize)),
            ("fontcolor", d.fontcolor.clone()),
            ("dpi", d.dpi.to_string()),
        ];
        if !d.caption.is_empty() {
            attrs.push(("label", d.caption.clone()));
            attrs.push(("labelloc", "b".to_string()));
            attrs.push(("labeljust", "r".to_string()));
        }
        Self::format_attrs(attrs)
    }

    fn frame_attrs(&self) -> String {
        let d = &self.decoration;
        Self::format_attrs([
            ("style", "filled,rounded".to_string()),
            ("fillcolor", d.frame_fill.clone()),
            ("pencolor", d.frame_color.clone()),
            ("penwidth", "1.5".to_string()),
            ("margin", "15".to_string()),
            ("label", String::new()),
        ])
    }

    fn node_defaults(&self) -> String {
        Self::format_attrs([
            ("shape", "box".to_string()),
            ("style", "filled,rounded".to_string()),
            ("fontname", self.decoration.node_fontname.clone()),
            ("margin", "0.15".to_string()),
        ])
    }

    /// Generate the DOT document for `graph`
    pub fn render(&self, graph: &VisualGraph) -> String {
        let mut out = String::new();
        let indent = if self.decoration.framed { "    " } else { "  " };

        out.push_str("digraph cmdflow {\n");
        out.push_str(&format!("  graph {};\n", self.page_attrs()));

        if self.decoration.framed {
            out.push_str("  subgraph cluster_main {\n");
            out.push_str(&format!("{}graph {};\n", indent, self.frame_attrs()));
        }

        out.push_str(&format!("{}node {};\n", indent, self.node_defaults()));

        for node in graph.nodes() {
            out.push_str(&format!(
                "{}{} {};\n",
                indent,
                Self::quote(&node.id),
                Self::element_attrs(node.attributes())
            ));
        }

        for edge in graph.edges() {
            out.push_str(&format!(
                "{}{} -> {} {};\n",
                indent,
                Self::quote(&edge.from),
                Self::quote(&edge.to),
                Self::element_attrs(edge.attributes())
            ));
        }

        if self.decoration.framed {
            out.push_str("  }\n");
        }
        out.push_str("}\n");
        out
    }

    /// Write the DOT document to `writer`
    pub fn write_to<W: Write>(&self, graph: &VisualGraph, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.render(graph).as_bytes())
    }
}
