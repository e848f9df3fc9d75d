//! # CLI Module
//!
//! Command-line access to the gateway configurator.
//!
//! ## Commands
//!
//! ### `synth`
//!
//! Build the gateway definition and print it as JSON or YAML:
//!
//! ```bash
//! mockgate synth --config config/config.yaml --format yaml
//! ```
//!
//! Options:
//! - `--config <FILE>` - Stack configuration (required, or `MOCKGATE_CONFIG`)
//! - `--format <json|yaml>` - Output encoding (default: json)
//! - `--out <FILE>` - Write to a file instead of stdout
//!
//! ### `inspect`
//!
//! Print one line per route and gateway response:
//!
//! ```bash
//! mockgate inspect --config config/config.yaml
//! ```
//!
//! ### `resolve`
//!
//! Send one request through the in-process mock gateway and print the
//! status, headers and body the caller would see:
//!
//! ```bash
//! mockgate resolve --config config/config.yaml \
//!     --method GET --path / \
//!     -H "Origin: https://sub.example.com" \
//!     -H "Authorization: token"
//! ```
//!
//! `--deny` makes the stand-in authorizer reject every credential.

mod commands;


pub use commands::{run, run_cli, Cli, Commands, OutputFormat};
