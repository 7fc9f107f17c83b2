#![no_main]

use cmdflow::encoder::EncoderStyle;
use cmdflow::pipeline::build_graph;
use cmdflow::shell_alias::{extract_git_events, ShellAliases};
use cmdflow::transition::SignificancePolicy;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Neither front end may panic on arbitrary text
        let _ = build_graph(input, &SignificancePolicy::dense(), &EncoderStyle::default());
        let _ = extract_git_events(input, &ShellAliases::default());
    }
});
