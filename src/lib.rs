//! cmdflow - command workflow transition graphs
//!
//! This library turns an ordered command history into a directed graph
//! description: which commands follow which, how often, and how much of the
//! history each command accounts for. The graph is emitted as Graphviz DOT
//! (or JSON); layout and rasterization are left to the renderer.

pub mod cli;
pub mod config;
pub mod dot_output;
pub mod encoder;
pub mod history;
pub mod json_output;
pub mod pipeline;
pub mod shell_alias;
pub mod summary;
pub mod transition;
pub mod vocabulary;
