// Transition statistics over an ordered command history
//
// Counts how often each command occurs and how often one command directly
// follows another. "Directly" means a position gap of exactly 1: a larger
// gap marks commands that were filtered out in between, and linking across
// them would invent transitions the user never made.
//
// The significance policy then decides which transitions are frequent
// enough to be drawn.

mod policy;
mod stats;

pub use policy::{PolicyMode, SignificancePolicy};
pub use stats::{NodeTotals, PairCounts, Transition, TransitionStats};
