//! `logs` subcommand: page through the server's execution log

use clap::Args;

use super::{exit_code_for, print_envelope};
use crate::client::KipClient;
use crate::config::ClientConfig;

#[derive(Args, Debug, Default)]
pub struct LogsArgs {
    /// Pagination cursor returned by a previous call
    #[arg(long)]
    pub cursor: Option<String>,

    /// Maximum number of entries (server default: 10)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub limit: Option<u32>,
}

pub async fn run(args: LogsArgs, config: ClientConfig, compact: bool) -> anyhow::Result<i32> {
    let client = KipClient::new(config);
    let envelope = client.list_logs(args.cursor, args.limit).await?;

    print_envelope(&envelope, compact)?;
    Ok(exit_code_for(&envelope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::exit_codes;
    use crate::client::test_server::{serve_once, MockResponse};
    use serde_json::json;

    #[tokio::test]
    async fn test_run_forwards_cursor() {
        let (url, captured) = serve_once(MockResponse::json(200, r#"{"result": {"logs": []}}"#)).await;
        let args = LogsArgs {
            cursor: Some("next-1".into()),
            limit: None,
        };

        let code = run(args, ClientConfig::new(url), false).await.unwrap();
        assert_eq!(code, exit_codes::SUCCESS);
        assert_eq!(captured.await.unwrap().json()["params"], json!({"cursor": "next-1"}));
    }

    #[tokio::test]
    async fn test_run_unsupported_method_is_failure() {
        let body = r#"{"error": {"code": "METHOD_NOT_FOUND", "message": "list_logs"}}"#;
        let (url, _captured) = serve_once(MockResponse::json(404, body)).await;

        let code = run(LogsArgs::default(), ClientConfig::new(url), true).await.unwrap();
        assert_eq!(code, exit_codes::FAILURE);
    }
}
