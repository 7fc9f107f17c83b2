//! Plain-text summary of command shares and transitions
//!
//! Tabular layout in the spirit of `strace -c`: one block for commands by
//! frequency, one for the transitions that survived the policy.

use crate::transition::{SignificancePolicy, Transition, TransitionStats};

/// Format the command and transition tables
pub fn format_summary(
    stats: &TransitionStats,
    drawn: &[Transition],
    policy: &SignificancePolicy,
) -> String {
    let mut out = String::new();

    if stats.is_empty() {
        out.push_str("No commands in history.\n");
        return out;
    }

    let event_total = stats.node_totals.total();
    out.push_str("% share     calls command\n");
    out.push_str("------- --------- ----------------\n");
    for (token, count) in stats.node_totals.sorted_desc() {
        out.push_str(&format!(
            "{:7.2} {:>9} {}\n",
            stats.node_totals.share(token) * 100.0,
            count,
            token
        ));
    }
    out.push_str("------- --------- ----------------\n");
    out.push_str(&format!("100.00 {:>10} total\n", event_total));
    out.push('\n');

    let volume = stats.pair_counts.total();
    out.push_str(&format!(
        "{} of {} transitions drawn ({} policy, min count {:.2})\n",
        drawn.len(),
        stats.pair_counts.len(),
        policy.mode.as_str(),
        policy.min_count(volume)
    ));

    if drawn.is_empty() {
        out.push_str("Graph is empty!\n");
        return out;
    }

    out.push_str("% share     count transition\n");
    out.push_str("------- --------- ----------------\n");
    for t in drawn {
        let share = if volume > 0 {
            t.count as f64 / volume as f64 * 100.0
        } else {
            0.0
        };
        out.push_str(&format!(
            "{:7.2} {:>9} {} -> {}\n",
            share, t.count, t.from, t.to
        ));
    }

    out
}
