//! Command-line interface

pub mod execute;
pub mod logs;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{ClientConfig, ConfigError, ConfigFile, ConfigOverrides};
use crate::core::ResultEnvelope;

/// Process exit codes
pub mod exit_codes {
    /// The envelope carried `result`
    pub const SUCCESS: i32 = 0;
    /// The envelope carried `error`, or the invocation was rejected locally
    pub const FAILURE: i32 = 1;
}

const EXAMPLES: &str = r#"Examples:
  # Schema discovery
  kip --command 'DESCRIBE PRIMER'

  # Query with parameters
  kip --command 'FIND(?p.name) WHERE { ?p {type: :type} } LIMIT :limit' \
      --params '{"type": "Person", "limit": 10}'

  # Batch execution
  kip --commands '["DESCRIBE PRIMER", "FIND(?t) WHERE { ?t {type: \"Domain\"} }"]'

  # Dry run validation
  kip --command 'DELETE CONCEPT ?n DETACH WHERE { ?n {type:"Event"} }' --dry-run

  # Recent server log entries
  kip logs --limit 20

Environment:
  KIP_SERVER_URL   Server endpoint (default: http://127.0.0.1:8080/kip)
  KIP_API_KEY      Optional Bearer token for authentication
  KIP_AUTH_HEADER  Full Authorization header value (overrides KIP_API_KEY)
  KIP_TIMEOUT_MS   Request timeout in milliseconds (default: 30000)
  KIP_CONFIG       Path to a TOML config file"#;

/// Execute KIP commands against a Cognitive Nexus server
#[derive(Parser, Debug)]
#[command(name = "kip", version, about, after_help = EXAMPLES)]
pub struct Cli {
    #[command(subcommand)]
    pub subcommand: Option<Commands>,

    #[command(flatten)]
    pub execute: execute::ExecuteArgs,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Output compact JSON (no indentation)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub json_output: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List execution log entries from the server
    Logs(logs::LogsArgs),
}

/// Where and how to reach the server
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Server endpoint
    #[arg(long, global = true, env = "KIP_SERVER_URL", value_name = "URL")]
    pub server_url: Option<String>,

    /// Bearer token for authentication
    #[arg(long, global = true, env = "KIP_API_KEY", hide_env_values = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Full Authorization header value
    #[arg(long, global = true, env = "KIP_AUTH_HEADER", hide_env_values = true, value_name = "VALUE")]
    pub auth_header: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true, env = "KIP_TIMEOUT_MS", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// TOML config file with server_url, api_key, auth_header, timeout_ms
    #[arg(long, global = true, env = "KIP_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl ConnectionArgs {
    /// Build the client configuration: flags and env first, then the file
    pub fn resolve(&self) -> Result<ClientConfig, ConfigError> {
        let file = match &self.config {
            Some(path) => Some(ConfigFile::load(path)?),
            None => None,
        };

        let overrides = ConfigOverrides {
            server_url: self.server_url.clone(),
            api_key: self.api_key.clone(),
            auth_header: self.auth_header.clone(),
            timeout_ms: self.timeout_ms,
        };

        ClientConfig::resolve(overrides, file)
    }
}

/// Exit code for a finished execution
pub fn exit_code_for(envelope: &ResultEnvelope) -> i32 {
    if envelope.is_success() {
        exit_codes::SUCCESS
    } else {
        exit_codes::FAILURE
    }
}

/// Write the envelope to stdout as a single JSON document
pub fn print_envelope(envelope: &ResultEnvelope, compact: bool) -> anyhow::Result<()> {
    println!("{}", envelope.to_json(compact)?);
    Ok(())
}
