//! Transpiler error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranspileError {
    #[error("Function `{function}` needs a state read, but its body never accesses a field through `this`")]
    EmptyStateAccess { function: String },
}
