//! yamln CLI: canonicalize, convert and validate YAML documents.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use yamln::{Node, ParseConfig, DEFAULT_MAX_DEPTH};

#[derive(Debug, Parser)]
#[command(name = "yamln")]
#[command(about = "YAML subset parser and canonical formatter", long_about = None)]
#[command(version)]
struct Cli {
    /// Log to stderr (repeat for more detail: -v info, -vv debug, -vvv trace).
    /// `RUST_LOG` takes precedence when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Maximum nesting depth accepted by the parser
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a document and print it in canonical form
    Fmt(FmtArgs),
    /// Parse a document and print it as JSON
    Json(JsonArgs),
    /// Parse each input and report errors
    Check(CheckArgs),
}

#[derive(Debug, clap::Args)]
struct FmtArgs {
    /// Input file (stdin if omitted or `-`)
    file: Option<PathBuf>,

    /// Output file path (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
struct JsonArgs {
    /// Input file (stdin if omitted or `-`)
    file: Option<PathBuf>,

    /// Pretty print JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, clap::Args)]
struct CheckArgs {
    /// Input files (stdin if none given)
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ParseConfig::new().with_max_depth(cli.max_depth);

    match cli.command {
        Command::Fmt(args) => {
            let doc = load(args.file.as_deref(), &config)?;
            let mut text = yamln::serialize(&doc).context("Failed to serialize document")?;
            text.push('\n');

            match args.output {
                Some(path) => {
                    std::fs::write(&path, &text)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    log::info!("wrote {} bytes to {}", text.len(), path.display());
                }
                None => print!("{}", text),
            }
            Ok(())
        }
        Command::Json(args) => {
            let doc = load(args.file.as_deref(), &config)?;
            let json = if args.pretty {
                serde_json::to_string_pretty(&doc)?
            } else {
                serde_json::to_string(&doc)?
            };
            println!("{}", json);
            Ok(())
        }
        Command::Check(args) => {
            let inputs: Vec<Option<PathBuf>> = if args.files.is_empty() {
                vec![None]
            } else {
                args.files.into_iter().map(Some).collect()
            };

            let mut failed = 0;
            for input in &inputs {
                let name = display_name(input.as_deref());
                match load(input.as_deref(), &config) {
                    Ok(doc) => log::info!("{}: ok ({})", name, doc.type_name()),
                    Err(err) => {
                        eprintln!("{}: {:#}", name, err);
                        failed += 1;
                    }
                }
            }

            if failed > 0 {
                bail!("{} of {} inputs failed to parse", failed, inputs.len());
            }
            Ok(())
        }
    }
}

/// Read and parse one input.
fn load(path: Option<&Path>, config: &ParseConfig) -> Result<Node> {
    let text = read_input(path)?;
    let doc = yamln::parse_with_config(&text, config)
        .with_context(|| format!("Failed to parse {}", display_name(path)))?;
    Ok(doc)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if !is_stdin(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn display_name(path: Option<&Path>) -> String {
    match path {
        Some(path) if !is_stdin(path) => path.display().to_string(),
        _ => "<stdin>".to_string(),
    }
}

/// Send `log` records from the library and this binary to stderr.
fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .init();
}

fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "yamln=info",
        2 => "yamln=debug",
        _ => "yamln=trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["yamln", "fmt", "in.yaml", "-vv", "--max-depth", "8"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.max_depth, 8);
        assert!(matches!(cli.command, Command::Fmt(FmtArgs { file: Some(_), output: None })));
    }

    #[test]
    fn test_verbosity_filters() {
        assert_eq!(default_filter(0), "warn");
        assert_eq!(default_filter(1), "yamln=info");
        assert_eq!(default_filter(3), "yamln=trace");
        assert_eq!(default_filter(9), "yamln=trace");
        for verbosity in 0..4 {
            assert!(EnvFilter::try_new(default_filter(verbosity)).is_ok());
        }
    }

    #[test]
    fn test_stdin_names() {
        assert!(is_stdin(Path::new("-")));
        assert!(!is_stdin(Path::new("a.yaml")));
        assert_eq!(display_name(None), "<stdin>");
        assert_eq!(display_name(Some(Path::new("a.yaml"))), "a.yaml");
    }
}
