//! Default action: execute a command or a batch

use clap::Args;
use serde_json::Value;
use thiserror::Error;

use super::{exit_code_for, print_envelope};
use crate::client::KipClient;
use crate::config::ClientConfig;
use crate::core::{CommandEntry, Parameters};

/// Malformed JSON arguments, rejected before any request is made
#[derive(Debug, Error)]
pub enum ArgumentError {
    #[error("Error parsing {flag}: {source}")]
    InvalidJson {
        flag: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("--params must be a JSON object")]
    ParamsNotObject,

    #[error("--commands must be a JSON array")]
    CommandsNotArray,

    #[error("--commands entry {index} must be a string or {{\"command\", \"parameters\"}} object: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Args, Debug, Default)]
pub struct ExecuteArgs {
    /// Single KIP command (KQL/KML/META)
    #[arg(short = 'c', long, conflicts_with = "commands")]
    pub command: Option<String>,

    /// JSON array of commands for batch execution
    #[arg(long, value_name = "JSON")]
    pub commands: Option<String>,

    /// JSON object of parameters for placeholder substitution
    #[arg(short = 'p', long = "params", value_name = "JSON")]
    pub params: Option<String>,

    /// Validate command(s) without execution
    #[arg(short = 'd', long)]
    pub dry_run: bool,
}

/// Decode `--params`
pub fn parse_params(raw: &str) -> Result<Parameters, ArgumentError> {
    let value: Value = serde_json::from_str(raw).map_err(|source| ArgumentError::InvalidJson {
        flag: "--params",
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ArgumentError::ParamsNotObject),
    }
}

/// Decode `--commands`
pub fn parse_commands(raw: &str) -> Result<Vec<CommandEntry>, ArgumentError> {
    let value: Value = serde_json::from_str(raw).map_err(|source| ArgumentError::InvalidJson {
        flag: "--commands",
        source,
    })?;
    let Value::Array(items) = value else {
        return Err(ArgumentError::CommandsNotArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|source| ArgumentError::InvalidEntry { index, source })
        })
        .collect()
}

/// Execute and print; returns the process exit code
pub async fn run(args: ExecuteArgs, config: ClientConfig, compact: bool) -> anyhow::Result<i32> {
    let parameters = args.params.as_deref().map(parse_params).transpose()?;
    let commands = args.commands.as_deref().map(parse_commands).transpose()?;

    let client = KipClient::new(config);
    let envelope = client
        .execute(args.command, commands, parameters, args.dry_run)
        .await?;

    print_envelope(&envelope, compact)?;
    Ok(exit_code_for(&envelope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::exit_codes;
    use crate::client::test_server::{closed_port_url, serve_once, MockResponse};
    use crate::core::InvocationError;
    use serde_json::json;

    #[test]
    fn test_parse_params() {
        let params = parse_params(r#"{"type": "Person", "limit": 5}"#).unwrap();
        assert_eq!(params.get("limit"), Some(&json!(5)));

        assert!(matches!(parse_params("[1, 2]"), Err(ArgumentError::ParamsNotObject)));
        assert!(matches!(
            parse_params("{not json"),
            Err(ArgumentError::InvalidJson { flag: "--params", .. })
        ));
    }

    #[test]
    fn test_parse_commands() {
        let commands = parse_commands(
            r#"["DESCRIBE PRIMER", {"command": "FIND(?t) WHERE { ?t {type: :t} }", "parameters": {"t": "Domain"}}]"#,
        )
        .unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].command(), "DESCRIBE PRIMER");

        assert!(matches!(
            parse_commands(r#"{"command": "X"}"#),
            Err(ArgumentError::CommandsNotArray)
        ));
        assert!(matches!(
            parse_commands(r#"["A", 7]"#),
            Err(ArgumentError::InvalidEntry { index: 1, .. })
        ));
        assert!(matches!(
            parse_commands("not json"),
            Err(ArgumentError::InvalidJson { flag: "--commands", .. })
        ));
    }

    #[tokio::test]
    async fn test_run_success_exit_code() {
        let (url, captured) = serve_once(MockResponse::json(200, r#"{"result": "ok"}"#)).await;
        let args = ExecuteArgs {
            command: Some("DESCRIBE PRIMER".into()),
            params: Some(r#"{"x": 1}"#.into()),
            ..Default::default()
        };

        let code = run(args, ClientConfig::new(url), true).await.unwrap();
        assert_eq!(code, exit_codes::SUCCESS);
        assert_eq!(captured.await.unwrap().json()["params"]["parameters"], json!({"x": 1}));
    }

    #[tokio::test]
    async fn test_run_error_envelope_exit_code() {
        let args = ExecuteArgs {
            command: Some("DESCRIBE PRIMER".into()),
            ..Default::default()
        };
        let code = run(args, ClientConfig::new(closed_port_url().await), true)
            .await
            .unwrap();
        assert_eq!(code, exit_codes::FAILURE);
    }

    #[tokio::test]
    async fn test_run_rejects_bad_arguments_before_network() {
        // A network attempt would yield Ok(FAILURE), not Err
        let url = closed_port_url().await;

        let args = ExecuteArgs {
            command: Some("DESCRIBE PRIMER".into()),
            params: Some("[]".into()),
            ..Default::default()
        };
        let err = run(args, ClientConfig::new(url.clone()), true).await.unwrap_err();
        assert!(err.downcast_ref::<ArgumentError>().is_some());

        let err = run(ExecuteArgs::default(), ClientConfig::new(url), true)
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<InvocationError>(),
            Some(&InvocationError::MissingCommand)
        );
    }
}
