//! CLI argument parsing for cmdflow

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the transition graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Graphviz DOT, pipe through `dot -Tsvg` (default)
    Dot,
    /// JSON graph description with summary counts
    Json,
    /// Human-readable command and transition tables
    Text,
}

#[derive(Parser, Debug)]
#[command(name = "cmdflow")]
#[command(version)]
#[command(about = "Draw which commands follow which in your shell or git history", long_about = None)]
pub struct Cli {
    /// History file with `<position> <command>` lines (stdin when absent or `-`)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Keep only transitions making up at least 1% of all transitions
    #[arg(long)]
    pub sparse: bool,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "dot")]
    pub format: OutputFormat,

    /// Write output to PATH instead of stdout
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// TOML configuration for policy, style and page decoration
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long = "print-config")]
    pub print_config: bool,

    /// Input is raw shell `history` output; extract git subcommands
    #[arg(long)]
    pub git: bool,

    /// Shell aliases (`alias -p` output) to expand before extraction
    #[arg(long = "bash-aliases", value_name = "PATH")]
    pub bash_aliases: Option<PathBuf>,

    /// Git aliases (`git config --get-regexp alias` output)
    #[arg(long = "git-aliases", value_name = "PATH")]
    pub git_aliases: Option<PathBuf>,

    /// Known-command list, one per line (built-in git list with --git)
    #[arg(long = "vocabulary", value_name = "PATH")]
    pub vocabulary: Option<PathBuf>,

    /// Drop unknown commands that survive the cleanup rule instead of keeping them
    #[arg(long = "drop-unknown")]
    pub drop_unknown: bool,

    /// Also write the cleaned `<position> <command>` history to PATH
    #[arg(long = "save-history", value_name = "PATH")]
    pub save_history: Option<PathBuf>,

    /// Keep only the N strongest transitions
    #[arg(long = "max-transitions", value_name = "N")]
    pub max_transitions: Option<usize>,

    /// Caption printed on the graph
    #[arg(long = "caption", value_name = "TEXT")]
    pub caption: Option<String>,

    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["cmdflow"]);
        assert!(cli.input.is_none());
        assert!(!cli.sparse);
        assert_eq!(cli.format, OutputFormat::Dot);
        assert!(!cli.git);
        assert!(!cli.debug);
        assert!(cli.max_transitions.is_none());
    }

    #[test]
    fn test_cli_input_file() {
        let cli = Cli::parse_from(["cmdflow", "history.txt"]);
        assert_eq!(cli.input, Some(PathBuf::from("history.txt")));
    }

    #[test]
    fn test_cli_sparse_flag() {
        let cli = Cli::parse_from(["cmdflow", "--sparse"]);
        assert!(cli.sparse);
    }

    #[test]
    fn test_cli_format_json() {
        let cli = Cli::parse_from(["cmdflow", "--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_invalid_format() {
        assert!(Cli::try_parse_from(["cmdflow", "--format", "png"]).is_err());
    }

    #[test]
    fn test_cli_git_mode_with_aliases() {
        let cli = Cli::parse_from([
            "cmdflow",
            "--git",
            "--bash-aliases",
            "aliases.txt",
            "--git-aliases",
            "git-aliases.txt",
            "--drop-unknown",
        ]);
        assert!(cli.git);
        assert_eq!(cli.bash_aliases, Some(PathBuf::from("aliases.txt")));
        assert_eq!(cli.git_aliases, Some(PathBuf::from("git-aliases.txt")));
        assert!(cli.drop_unknown);
        assert!(cli.save_history.is_none());
    }

    #[test]
    fn test_cli_max_transitions() {
        let cli = Cli::parse_from(["cmdflow", "--max-transitions", "20"]);
        assert_eq!(cli.max_transitions, Some(20));
    }

    #[test]
    fn test_cli_output_short_flag() {
        let cli = Cli::parse_from(["cmdflow", "-o", "graph.dot", "-"]);
        assert_eq!(cli.output, Some(PathBuf::from("graph.dot")));
        assert_eq!(cli.input, Some(PathBuf::from("-")));
    }
}
