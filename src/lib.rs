//! # PanelKit
//!
//! Token sequencing for CNC panel machining:
//! - Maps upstream part-file records into machining tokens
//! - Resolves corner fillets into tangent arcs
//! - Decomposes rectangles into closed, optionally radiused, route loops
//! - Marks closed same-tool route chains for the G-code backend
//!
//! ## Architecture
//!
//! PanelKit is organized as a workspace with multiple crates:
//!
//! 1. **panelkit-core** - Geometry, token and operation model, errors, record mapping
//! 2. **panelkit-machining** - Fillet calculator, rectangle decomposition, token accumulator
//! 3. **panelkit-settings** - Configuration files
//! 4. **panelkit** - Logging setup and the command line driver

use anyhow::Context;
use std::path::Path;

pub use panelkit_core::{
    map_record_to_token, map_records, Error, FilletError, MachiningOperation, RecordError, Result,
    SequenceError, Token, TokenRecord, Tolerances,
};
pub use panelkit_machining::{accumulate, get_fillet_points, FilletCalculator, TokenAccumulator};
pub use panelkit_settings::{Config, LoggingSettings};

/// How an input file encodes its tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// JSON array of all-text [`TokenRecord`]s
    Records,
    /// JSON array of tagged [`Token`]s
    Tokens,
}

/// Initialize logging from the logging settings
///
/// Sets up structured logging with:
/// - Output on stderr, leaving stdout for the operation list
/// - RUST_LOG environment variable support, falling back to the configured level
/// - Optional JSON lines
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .with_context(|| format!("Invalid log level '{}'", settings.level))?;

    if settings.json {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .json();
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

/// Read the tokens of one part face from a JSON file.
pub fn load_tokens(path: &Path, format: InputFormat) -> anyhow::Result<Vec<Token>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_tokens(&content, format).with_context(|| format!("Invalid input {}", path.display()))
}

/// Parse the tokens of one part face from JSON text.
pub fn parse_tokens(content: &str, format: InputFormat) -> Result<Vec<Token>> {
    let tokens = match format {
        InputFormat::Records => {
            let records: Vec<TokenRecord> = serde_json::from_str(content)?;
            map_records(&records)?
        }
        InputFormat::Tokens => serde_json::from_str(content)?,
    };
    tracing::debug!("Parsed {} tokens", tokens.len());
    Ok(tokens)
}

/// Sequence a token stream with the configured tolerances.
pub fn sequence(tokens: Vec<Token>, tolerances: Tolerances) -> Result<Vec<MachiningOperation>> {
    let mut accumulator = TokenAccumulator::with_tolerances(tolerances);
    accumulator.extend(tokens)?;
    let operations = accumulator.finish()?;
    tracing::info!("Sequenced {} machining operations", operations.len());
    Ok(operations)
}
