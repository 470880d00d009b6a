//! Solver error kinds (§7).
//!
//! A body attempting to join incompatible lattice types is meant to be
//! caught by the Typer, never here; [`SolverError::LatticeJoinTypeMismatch`]
//! exists as the Solver's own invariant check should a malformed IR slip
//! through anyway.

use std::fmt;

use flix_base::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    NonTerminating { iteration_cap: usize, partial_state: String, span: Span },
    LatticeJoinTypeMismatch { table: String, lhs_type: String, rhs_type: String, span: Span },
    UserError { message: String, span: Span },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::NonTerminating { iteration_cap, partial_state, .. } => {
                write!(f, "solver exceeded iteration cap of {iteration_cap}; last delta: {partial_state}")
            }
            SolverError::LatticeJoinTypeMismatch { table, lhs_type, rhs_type, .. } => write!(
                f,
                "cannot join lattice values of incompatible type at `{table}`: {lhs_type} vs {rhs_type}"
            ),
            SolverError::UserError { message, .. } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for SolverError {}

impl SolverError {
    pub fn span(&self) -> Span {
        match self {
            SolverError::NonTerminating { span, .. } => *span,
            SolverError::LatticeJoinTypeMismatch { span, .. } => *span,
            SolverError::UserError { span, .. } => *span,
        }
    }
}

/// Internal evaluator failure, finer-grained than [`SolverError`].
///
/// [`EvalError::User`] comes straight from an IR `UserError` node (a
/// genuine user-facing `error` predicate) and is surfaced verbatim.
/// [`EvalError::Internal`] denotes an invariant the Typer should already
/// have ruled out (unbound name, arity mismatch, missing lattice
/// instance); it is still wrapped into a [`SolverError::UserError`] rather
/// than panicking, since the Solver never trusts its input that much.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EvalError {
    User { message: String, span: Span },
    Internal { message: String, span: Span },
}

impl From<EvalError> for SolverError {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::User { message, span } => SolverError::UserError { message, span },
            EvalError::Internal { message, span } => {
                SolverError::UserError { message: format!("internal evaluator error: {message}"), span }
            }
        }
    }
}
