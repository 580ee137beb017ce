use anyhow::Context;
use clap::Parser;
use panelkit::{init_logging, load_tokens, sequence, Config, InputFormat};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "panelkit",
    version,
    about = "Sequence a panel's machining tokens into backend-ready operations"
)]
struct Cli {
    /// JSON file with the tokens of one part face
    input: PathBuf,

    /// Input is a JSON array of tokens rather than token records
    #[arg(long)]
    tokens: bool,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,

    /// Configuration file (.toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load_or_default(cli.config.as_deref()).context("Failed to load config")?;
    init_logging(&config.logging)?;

    let format = if cli.tokens {
        InputFormat::Tokens
    } else {
        InputFormat::Records
    };
    let tokens = load_tokens(&cli.input, format)?;
    let operations = sequence(tokens, config.tolerances)
        .with_context(|| format!("Failed to sequence {}", cli.input.display()))?;

    let output = if cli.pretty || config.output.pretty {
        serde_json::to_string_pretty(&operations)?
    } else {
        serde_json::to_string(&operations)?
    };
    println!("{output}");

    Ok(())
}
