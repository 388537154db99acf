use super::analyzer::BodyAnalysis;
use super::model::{Classification, Instruction};
use crate::error::TranspileError;
use log::warn;

/// What to do when a function needs to read its first state field but the
/// body never touches one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyAccessPolicy {
    /// Leave the read out and log a warning.
    #[default]
    Omit,
    /// Fail with [`TranspileError::EmptyStateAccess`].
    Reject,
}

/// Lowers a function's body analysis to its read/write instruction list.
///
/// View functions are a single read of the first state field accessed.
/// Mutating functions write every recorded mutation in order and, when the
/// body contains any `return`, finish with a read of the first state field.
pub fn synthesize(
    function: &str,
    classification: Classification,
    analysis: &BodyAnalysis,
    policy: EmptyAccessPolicy,
) -> Result<Vec<Instruction>, TranspileError> {
    let mut instructions = Vec::new();

    let needs_read = match classification {
        Classification::View => true,
        Classification::Mutating => {
            instructions.extend(analysis.mutations.iter().map(|mutation| Instruction::Write {
                field: mutation.field.clone(),
                expr: mutation.expr.clone(),
            }));
            analysis.has_return
        }
    };

    if needs_read {
        match analysis.state_accesses.first() {
            Some(field) => instructions.push(Instruction::Read {
                field: field.clone(),
            }),
            None => match policy {
                EmptyAccessPolicy::Omit => {
                    warn!(
                        "Function {} reads state but accesses no field, omitting the read",
                        function
                    );
                }
                EmptyAccessPolicy::Reject => {
                    return Err(TranspileError::EmptyStateAccess {
                        function: function.to_string(),
                    });
                }
            },
        }
    }

    Ok(instructions)
}
