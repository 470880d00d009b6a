//! Error types surfaced by the Verifier beyond an individual law's outcome.
//!
//! A single law's own pass/fail/unknown result is [`crate::solver::Outcome`];
//! this module covers the one failure mode that precedes ever calling Z3 —
//! an obligation whose property formula could not be built at all — plus the
//! reusable [`CounterExample`] type both layers share.

use std::fmt;

use crate::law::ObligationError;

/// Why a law obligation never reached the solver.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyError {
    Obligation { subject: String, kind: flix_ir::LawKind, source: ObligationError },
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::Obligation { subject, kind, source } => {
                write!(f, "could not build a property formula for the {kind:?} law on '{subject}': {source}")
            }
        }
    }
}

impl std::error::Error for VerifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VerifyError::Obligation { source, .. } => Some(source),
        }
    }
}

/// A counterexample showing concrete values that falsify a law.
///
/// When Z3 finds the negation of a law's property formula satisfiable, it
/// produces a model — an assignment to the law's universally quantified
/// variables that makes the law false. This is that assignment, read back
/// out of the model as display strings.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterExample {
    /// `(variable_name, value)` pairs, in the order the variables were declared.
    pub assignments: Vec<(String, String)>,
}

impl fmt::Display for CounterExample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (var, val)) in self.assignments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{var} = {val}")?;
        }
        Ok(())
    }
}
