//! Local invocation errors

use thiserror::Error;

/// A call rejected before any request was built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error("either 'command' or 'commands' must be provided")]
    MissingCommand,

    #[error("'command' and 'commands' are mutually exclusive")]
    BothCommandForms,

    #[error("batch entry {0} has an empty command")]
    EmptyBatchEntry(usize),

    #[error("limit must be between 1 and 100, got {0}")]
    LimitOutOfRange(u32),
}
