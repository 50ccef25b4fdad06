//! Request envelope types
//!
//! Everything posted to the server is `{"method": ..., "params": {...}}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::InvocationError;

/// Placeholder name -> value, substituted server-side wherever `:name` appears
pub type Parameters = Map<String, Value>;

/// Upper bound the server accepts for `list_logs` page size
pub const MAX_LOG_LIMIT: u32 = 100;

/// RPC methods exposed by the KIP endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RpcMethod {
    ExecuteKip,
    ListLogs,
}

impl RpcMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcMethod::ExecuteKip => "execute_kip",
            RpcMethod::ListLogs => "list_logs",
        }
    }
}

/// Outbound wire envelope
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, P: Serialize> {
    pub method: RpcMethod,
    pub params: &'a P,
}

/// A batch entry carrying its own parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterizedCommand {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
}

/// One element of a batch: a bare command string or a command with parameters.
///
/// When an entry and the request both define the same placeholder, which one
/// wins is decided by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandEntry {
    Plain(String),
    Parameterized(ParameterizedCommand),
}

impl CommandEntry {
    pub fn command(&self) -> &str {
        match self {
            CommandEntry::Plain(command) => command,
            CommandEntry::Parameterized(entry) => &entry.command,
        }
    }
}

impl From<&str> for CommandEntry {
    fn from(command: &str) -> Self {
        CommandEntry::Plain(command.to_string())
    }
}

impl From<String> for CommandEntry {
    fn from(command: String) -> Self {
        CommandEntry::Plain(command)
    }
}

/// Single command or batch; serializes as the `command` or `commands` field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KipCommand {
    Command(String),
    Commands(Vec<CommandEntry>),
}

impl KipCommand {
    /// Pick the active form from the two optional inputs.
    ///
    /// Empty strings and empty batches count as not provided.
    pub fn from_parts(
        command: Option<String>,
        commands: Option<Vec<CommandEntry>>,
    ) -> Result<Self, InvocationError> {
        let command = command.filter(|c| !c.trim().is_empty());
        let commands = commands.filter(|c| !c.is_empty());

        match (command, commands) {
            (Some(_), Some(_)) => Err(InvocationError::BothCommandForms),
            (None, None) => Err(InvocationError::MissingCommand),
            (Some(command), None) => Ok(KipCommand::Command(command)),
            (None, Some(commands)) => {
                if let Some(index) = commands.iter().position(|e| e.command().trim().is_empty()) {
                    return Err(InvocationError::EmptyBatchEntry(index));
                }
                Ok(KipCommand::Commands(commands))
            }
        }
    }

    /// Number of commands the server will run
    pub fn count(&self) -> usize {
        match self {
            KipCommand::Command(_) => 1,
            KipCommand::Commands(commands) => commands.len(),
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// `params` of an `execute_kip` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecuteParams {
    #[serde(flatten)]
    pub command: KipCommand,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
    #[serde(skip_serializing_if = "is_false")]
    pub dry_run: bool,
}

impl ExecuteParams {
    pub fn new(command: KipCommand) -> Self {
        Self {
            command,
            parameters: None,
            dry_run: false,
        }
    }

    pub fn with_parameters(mut self, parameters: Option<Parameters>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// `params` of a `list_logs` call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListLogsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ListLogsParams {
    pub fn new(cursor: Option<String>, limit: Option<u32>) -> Result<Self, InvocationError> {
        if let Some(limit) = limit {
            if limit == 0 || limit > MAX_LOG_LIMIT {
                return Err(InvocationError::LimitOutOfRange(limit));
            }
        }
        Ok(Self {
            cursor: cursor.filter(|c| !c.is_empty()),
            limit,
        })
    }
}
