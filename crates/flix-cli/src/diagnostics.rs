//! Stderr diagnostic rendering (§6 "Persisted state": diagnostics are
//! written to standard error in a human-readable form with optional ANSI
//! color), shared by every phase the pipeline drives.

use flix_base::Span;

use crate::style::Style;

fn loc(span: Span) -> String {
    format!("[{}..{}]", span.start, span.end)
}

fn line(color: bool, tag: &str, body: &str) -> String {
    if color {
        format!("{} {body}", Style::bold_red(tag))
    } else {
        format!("{tag} {body}")
    }
}

pub fn render_weeder_errors(errors: &[flix_weeder::WeederError], color: bool) {
    for e in errors {
        eprintln!("{}", line(color, "error:", &format!("{e} {}", loc(e.span()))));
    }
}

pub fn render_resolve_errors(errors: &[flix_resolve::ResolveError], color: bool) {
    for e in errors {
        eprintln!("{}", line(color, "error:", &format!("{e}")));
    }
}

pub fn render_typer_errors(errors: &[flix_resolve::TyperError], color: bool) {
    for e in errors {
        eprintln!("{}", line(color, "error:", &format!("{e}")));
    }
}

pub fn render_solver_error(error: &flix_solve::SolverError, color: bool) {
    eprintln!("{}", line(color, "error:", &format!("{error} {}", loc(error.span()))));
}

#[cfg(feature = "verification")]
pub fn render_law_reports(reports: &[flix_verify::LawReport], strict: bool, color: bool) -> bool {
    use flix_verify::{Outcome, VerifyError};

    let mut any_fatal = false;
    for report in reports {
        match &report.outcome {
            Ok(Outcome::Proved) => {
                let msg = format!("{:?} holds for `{}`", report.kind, report.subject);
                if color {
                    eprintln!("{}", Style::green(&msg));
                } else {
                    eprintln!("{msg}");
                }
            }
            Ok(Outcome::Violated(counter)) => {
                eprintln!(
                    "{}",
                    line(color, "law violated:", &format!("{:?} on `{}`: {counter}", report.kind, report.subject))
                );
                if strict {
                    any_fatal = true;
                }
            }
            Ok(Outcome::Inconclusive(reason)) => {
                let msg = format!("{:?} on `{}` inconclusive: {reason}", report.kind, report.subject);
                if color {
                    eprintln!("{}", Style::yellow(&msg));
                } else {
                    eprintln!("{msg}");
                }
                if strict {
                    any_fatal = true;
                }
            }
            Err(VerifyError::Obligation { .. }) => {
                // An obligation that could not even be built into a formula
                // (e.g. unsupported by this declaration's shape) is neither
                // a `LawViolation` nor an `Unknown` result — §7 only elevates
                // those two under `--strict-verify`, so this is reported but
                // never fatal.
                eprintln!("{}", line(color, "error:", &report.outcome.as_ref().unwrap_err().to_string()));
            }
        }
    }
    any_fatal
}

#[cfg(all(test, feature = "verification"))]
mod tests {
    use super::*;
    use flix_verify::{LawReport, ObligationError, VerifyError};

    #[test]
    fn obligation_error_is_reported_but_never_fatal_under_strict() {
        let reports = vec![LawReport {
            subject: flix_base::Name::unqualified("Foo"),
            kind: flix_ir::LawKind::AscendingChain,
            outcome: Err(VerifyError::Obligation {
                subject: "Foo".into(),
                kind: flix_ir::LawKind::AscendingChain,
                source: ObligationError::Unsupported("no height function".into()),
            }),
        }];
        assert!(!render_law_reports(&reports, true, false));
    }
}
