use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use http::Method;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::authorizer::{AuthDecision, AuthorizerBinding};
use crate::config::StackConfig;
use crate::gateway::{MockGateway, MockRequest};
use crate::report::render_inspect;
use crate::stack::GatewayDefinition;

/// Command-line interface for mockgate
#[derive(Parser, Debug)]
#[command(name = "mockgate")]
#[command(about = "CORS-aware mock gateway configurator", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Output encoding for `synth`
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the gateway definition and print it
    Synth {
        /// Path to the stack configuration (YAML)
        #[arg(short, long, env = "MOCKGATE_CONFIG")]
        config: PathBuf,

        /// Output encoding
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print a readable summary of the route table
    Inspect {
        /// Path to the stack configuration (YAML)
        #[arg(short, long, env = "MOCKGATE_CONFIG")]
        config: PathBuf,
    },
    /// Run one request through the mock gateway
    ///
    /// Any configured authorizer is replaced by a stand-in that accepts
    /// every credential, or rejects every credential with --deny.
    Resolve {
        /// Path to the stack configuration (YAML)
        #[arg(short, long, env = "MOCKGATE_CONFIG")]
        config: PathBuf,

        /// HTTP method
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request path
        #[arg(short, long, default_value = "/")]
        path: String,

        /// Request header as `Name: value` (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Make the stand-in authorizer reject every credential
        #[arg(long, default_value_t = false)]
        deny: bool,
    },
}

fn build(config: &Path) -> Result<GatewayDefinition> {
    let config = StackConfig::load(config)?;
    GatewayDefinition::build(&config).context("Invalid stack configuration")
}

fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("Header '{}' is not in 'Name: value' form", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("Header '{}' has an empty name", raw));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Execute a parsed command, writing results to `out`
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or is invalid,
/// a request argument is malformed, or output cannot be written.
pub fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    match cli.command {
        Commands::Synth {
            config,
            format,
            out: target,
        } => {
            let definition = build(&config)?;
            let rendered = match format {
                OutputFormat::Json => definition.to_json()?,
                OutputFormat::Yaml => definition.to_yaml()?,
            };
            match target {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), "Wrote gateway definition");
                }
                None => writeln!(out, "{}", rendered)?,
            }
        }
        Commands::Inspect { config } => {
            let definition = build(&config)?;
            write!(out, "{}", render_inspect(&definition)?)?;
        }
        Commands::Resolve {
            config,
            method,
            path,
            headers,
            deny,
        } => {
            let definition = build(&config)?;
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .with_context(|| format!("Invalid HTTP method '{}'", method))?;

            let mut request = MockRequest::new(method, path);
            for raw in &headers {
                let (name, value) = parse_header(raw)?;
                request = request.header(name, value);
            }

            let decision = if deny {
                AuthDecision::Deny
            } else {
                AuthDecision::Allow
            };
            let mut gateway = MockGateway::new(definition.clone());
            for reference in &definition.authorizers {
                gateway = gateway.with_authorizer(AuthorizerBinding::new(
                    reference.clone(),
                    move |_: &str| decision,
                ));
            }

            let response = gateway.handle(&request)?;
            writeln!(out, "{}", response.status)?;
            for (name, value) in &response.headers {
                writeln!(out, "{}: {}", name, value)?;
            }
            writeln!(out)?;
            writeln!(out, "{}", response.body)?;
        }
    }
    Ok(())
}

/// Parse arguments and run against stdout
///
/// # Errors
///
/// See [`run`].
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    run(cli, &mut lock)
}
