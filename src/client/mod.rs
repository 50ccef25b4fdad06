//! KIP HTTP client
//!
//! Builds the `{"method", "params"}` envelope, posts it once, and folds every
//! outcome into a [`ResultEnvelope`]. Only caller mistakes surface as `Err`.

#[cfg(test)]
pub(crate) mod test_server;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::core::{
    CommandEntry, ExecuteParams, InvocationError, KipCommand, ListLogsParams, Parameters,
    ResultEnvelope, RpcMethod, RpcRequest, SecretRedactor,
};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Client for a single KIP endpoint
pub struct KipClient {
    config: ClientConfig,
}

impl KipClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Execute one command or one batch.
    ///
    /// Exactly one of `command`/`commands` must be given; otherwise the call is
    /// rejected before anything is sent. Request-level `parameters` are
    /// forwarded even when a batch entry carries its own; the server decides
    /// precedence.
    pub async fn execute(
        &self,
        command: Option<String>,
        commands: Option<Vec<CommandEntry>>,
        parameters: Option<Parameters>,
        dry_run: bool,
    ) -> Result<ResultEnvelope, InvocationError> {
        let command = KipCommand::from_parts(command, commands)?;
        let params = ExecuteParams::new(command)
            .with_parameters(parameters)
            .with_dry_run(dry_run);
        Ok(self.execute_params(&params).await)
    }

    /// Execute already-validated params
    pub async fn execute_params(&self, params: &ExecuteParams) -> ResultEnvelope {
        tracing::debug!(
            commands = params.command.count(),
            dry_run = params.dry_run,
            "Executing KIP"
        );
        self.call(RpcMethod::ExecuteKip, params).await
    }

    /// Page through the server's execution log
    pub async fn list_logs(
        &self,
        cursor: Option<String>,
        limit: Option<u32>,
    ) -> Result<ResultEnvelope, InvocationError> {
        let params = ListLogsParams::new(cursor, limit)?;
        Ok(self.call(RpcMethod::ListLogs, &params).await)
    }

    async fn call<P: Serialize>(&self, method: RpcMethod, params: &P) -> ResultEnvelope {
        let body = match serde_json::to_vec(&RpcRequest { method, params }) {
            Ok(body) => body,
            Err(e) => return ResultEnvelope::parse_error(format!("Failed to encode request: {}", e)),
        };

        // One client per call: no pooling across invocations
        let client = match reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(self.config.timeout)
            .build()
        {
            Ok(client) => client,
            Err(e) => return ResultEnvelope::connection_error(e.to_string()),
        };

        let mut request = client
            .post(&self.config.server_url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(ACCEPT, JSON_CONTENT_TYPE);

        if let Some(auth) = &self.config.authorization {
            request = request.header(AUTHORIZATION, auth.header_value());
        }

        tracing::debug!(
            method = method.as_str(),
            url = %SecretRedactor::redact_text(&self.config.server_url),
            authorization = ?self
                .config
                .authorization
                .as_ref()
                .map(|a| SecretRedactor::mask_authorization(&a.header_value())),
            bytes = body.len(),
            "Sending request"
        );

        let response = match request.body(body).send().await {
            Ok(response) => response,
            Err(e) => {
                let message = describe_transport_error(&e, self.config.timeout);
                tracing::warn!("KIP request failed: {}", message);
                return ResultEnvelope::connection_error(message);
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                let message = describe_transport_error(&e, self.config.timeout);
                tracing::warn!("Failed to read KIP response body: {}", message);
                return ResultEnvelope::connection_error(message);
            }
        };

        tracing::debug!(status = status.as_u16(), bytes = text.len(), "Received response");
        normalize_response(status, &text)
    }
}

/// Map an HTTP status and raw body onto the result envelope
pub fn normalize_response(status: StatusCode, body: &str) -> ResultEnvelope {
    if status.is_success() {
        return match serde_json::from_str::<Value>(body) {
            Ok(value) => ResultEnvelope::from_body(value),
            Err(e) => ResultEnvelope::parse_error(e.to_string()),
        };
    }

    if let Some(envelope) = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(ResultEnvelope::from_error_body)
    {
        return envelope;
    }

    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("Unknown status").to_string()
    } else {
        body.to_string()
    };
    ResultEnvelope::http_error(status.as_u16(), message)
}

/// Flatten a transport error and its causes into one line
fn describe_transport_error(e: &reqwest::Error, timeout: Duration) -> String {
    if e.is_timeout() {
        return format!("Request timed out after {:?}", timeout);
    }

    let mut message = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    SecretRedactor::redact_text(&message)
}
