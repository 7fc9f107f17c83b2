use anyhow::{bail, Context, Result};
use clap::Parser;
use cmdflow::cli::{Cli, OutputFormat};
use cmdflow::config::Config;
use cmdflow::dot_output::DotOutput;
use cmdflow::history::render_history;
use cmdflow::json_output::JsonOutput;
use cmdflow::pipeline::{self, InputFormat, PipelineOptions, UnknownTokens};
use cmdflow::shell_alias::{AliasMap, ShellAliases};
use cmdflow::summary::format_summary;
use cmdflow::transition::PolicyMode;
use cmdflow::vocabulary::Vocabulary;
use std::io::{Read, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Read history from FILE, or stdin when absent or `-`
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => read_text(path),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read history from stdin")?;
            Ok(text)
        }
    }
}

/// Config file (or defaults) with command-line overrides applied
fn load_config(args: &Cli) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    if args.sparse {
        config.policy.mode = PolicyMode::Sparse;
    }
    if let Some(limit) = args.max_transitions {
        config.policy.max_transitions = Some(limit);
    }
    if let Some(caption) = &args.caption {
        config.graph.caption = caption.clone();
    }

    config.validate()?;
    Ok(config)
}

fn load_aliases(args: &Cli) -> Result<ShellAliases> {
    let shell = match &args.bash_aliases {
        Some(path) => AliasMap::parse_bash(&read_text(path)?)?,
        None => AliasMap::new(),
    };
    let git = match &args.git_aliases {
        Some(path) => AliasMap::parse_git(&read_text(path)?)?,
        None => AliasMap::new(),
    };
    Ok(ShellAliases { shell, git })
}

fn load_vocabulary(args: &Cli) -> Result<Option<Vocabulary>> {
    match &args.vocabulary {
        Some(path) => Ok(Some(Vocabulary::from_list(&read_text(path)?))),
        None if args.git => Ok(Some(Vocabulary::git())),
        None => Ok(None),
    }
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = load_config(&args)?;
    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let options = PipelineOptions {
        config,
        input: if args.git {
            InputFormat::ShellHistory
        } else {
            InputFormat::Events
        },
        aliases: load_aliases(&args)?,
        vocabulary: load_vocabulary(&args)?,
        unknown: if args.drop_unknown {
            UnknownTokens::Drop
        } else {
            UnknownTokens::Keep
        },
    };

    let history = read_input(args.input.as_deref())?;
    let report = pipeline::run(&history, &options)?;

    if !report.unknown.is_empty() && !args.drop_unknown {
        eprintln!(
            "Kept unknown commands: {} (use --drop-unknown to remove them)",
            report.unknown.iter().cloned().collect::<Vec<_>>().join(", ")
        );
    }

    if let Some(path) = &args.save_history {
        write_output(Some(path), &render_history(&report.events))?;
    }

    let text = match args.format {
        OutputFormat::Text => format_summary(&report.stats, &report.drawn, &options.config.policy),
        OutputFormat::Json => {
            JsonOutput::new(&report.stats, &options.config.policy, &report.outcome).to_json()?
        }
        OutputFormat::Dot => match report.outcome.graph() {
            Some(graph) => DotOutput::new(options.config.graph.clone()).render(graph),
            None => bail!(
                "Graph is empty! No transitions left after filtering ({} events read)",
                report.events.len()
            ),
        },
    };

    write_output(args.output.as_deref(), &text)
}
