//! The phase-ordered pipeline driver (§2 "Data flow", §6 "CLI").
//!
//! `check` runs the front end through the Simplifier; `run` additionally
//! drives the Solver; `verify` additionally discharges law obligations.
//! Each phase is timed with `Instant::now()`/`elapsed()` and, when
//! `--xmonitor` is set, reported to stderr as a `[xmonitor] phase: duration`
//! line (§10.1).

use std::path::PathBuf;
use std::time::Instant;

use flix_ir::{Decl, Program, SymbolTable};

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::diagnostics;
use crate::loader;
use crate::style::Style;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FRONTEND_ERROR: i32 = 1;
pub const EXIT_VERIFY_FAILURE: i32 = 2;
pub const EXIT_NONTERMINATING: i32 = 3;
#[allow(dead_code)]
pub const EXIT_INTERRUPTED: i32 = 130;

/// The frozen IR handed to the Solver and/or Verifier.
///
/// `table` is rebuilt from the post-simplification declarations rather
/// than reused from `flix_resolve::ResolveResult` — the Resolver's own
/// table is a byproduct of building the declaration set and its bodies
/// still carry pre-resolution names, while `decls` is what the Typer and
/// Simplifier actually rewrote. Declaring the final `decls` into a fresh
/// table is the same pattern `flix-solve`'s and `flix-verify`'s own tests
/// use to build a `SymbolTable` for evaluation.
pub struct FrontEnd {
    pub decls: Vec<Decl>,
    pub program: Program,
    pub table: SymbolTable,
}

fn build_table(decls: &[Decl]) -> SymbolTable {
    let mut table = SymbolTable::new();
    for decl in decls {
        table.declare(decl.clone());
    }
    table
}

fn report_phase(xmonitor: bool, phase: &str, started: Instant) {
    if xmonitor {
        eprintln!("[xmonitor] {phase}: {:?}", started.elapsed());
    }
}

/// Runs the pipeline through the Simplifier. Returns `None` if any phase
/// reported an error; the error itself has already been rendered to stderr.
fn run_frontend(sources: &[PathBuf], color: bool, xmonitor: bool) -> Option<FrontEnd> {
    let t = Instant::now();
    let surface = match loader::load_sources(sources) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error: {e}");
            eprintln!("{}", if color { Style::bold_red(&msg) } else { msg });
            return None;
        }
    };
    report_phase(xmonitor, "load", t);

    let t = Instant::now();
    let weeded = flix_weeder::weed_program(&surface);
    report_phase(xmonitor, "weed", t);
    if !weeded.errors.is_empty() {
        diagnostics::render_weeder_errors(&weeded.errors, color);
        return None;
    }

    let t = Instant::now();
    let resolved = flix_resolve::resolve_and_type(weeded.decls, weeded.program);
    report_phase(xmonitor, "resolve+type", t);
    if !resolved.is_ok() {
        diagnostics::render_resolve_errors(&resolved.resolve_errors, color);
        diagnostics::render_typer_errors(&resolved.typer_errors, color);
        return None;
    }

    let t = Instant::now();
    let decls = flix_simplify::simplify_program(resolved.decls);
    report_phase(xmonitor, "simplify", t);

    let table = build_table(&decls);
    Some(FrontEnd { decls, program: resolved.program, table })
}

/// Whether `--verify`/`--library-path` preflighting can locate the SMT
/// backend (§6 "Environment"): `--library-path` always satisfies it;
/// otherwise one of the platform-specific env vars must be set.
fn smt_backend_available(library_path: Option<&PathBuf>) -> bool {
    if library_path.is_some() {
        return true;
    }
    ["JAVA_LIBRARY_PATH", "LD_LIBRARY_PATH", "DYLD_LIBRARY_PATH"]
        .iter()
        .any(|var| std::env::var_os(var).is_some())
}

fn wants_verify(cli: &Cli) -> bool {
    cli.verify || matches!(cli.command, Commands::Verify { .. })
}

fn wants_solve(cli: &Cli) -> bool {
    matches!(cli.command, Commands::Run { .. })
}

/// Drives the pipeline for one invocation and returns the process exit code.
pub fn execute(cli: &Cli, config: &Config) -> i32 {
    let color = config.color.enabled(atty_stderr());
    let xmonitor = cli.xmonitor;

    if wants_verify(cli) && !smt_backend_available(cli.library_path.as_ref()) {
        let msg = "error: --verify requires an SMT backend; set --library-path or one of \
                    JAVA_LIBRARY_PATH/LD_LIBRARY_PATH/DYLD_LIBRARY_PATH";
        eprintln!("{}", if color { Style::bold_red(msg) } else { msg.to_string() });
        return EXIT_FRONTEND_ERROR;
    }

    let Some(frontend) = run_frontend(cli.command.sources(), color, xmonitor) else {
        return EXIT_FRONTEND_ERROR;
    };

    if wants_solve(cli) {
        let t = Instant::now();
        let result = flix_solve::solve_program(&frontend.program, &frontend.table, config.iteration_cap);
        report_phase(xmonitor, "solve", t);
        match result {
            Ok(solved) => print_tables(&solved),
            Err(e @ flix_solve::SolverError::NonTerminating { .. }) => {
                diagnostics::render_solver_error(&e, color);
                return EXIT_NONTERMINATING;
            }
            Err(e) => {
                diagnostics::render_solver_error(&e, color);
                return EXIT_FRONTEND_ERROR;
            }
        }
    }

    if wants_verify(cli) {
        #[cfg(feature = "verification")]
        {
            let t = Instant::now();
            let reports = flix_verify::verify_program(&frontend.table, config.verify_timeout_ms);
            report_phase(xmonitor, "verify", t);
            let fatal = diagnostics::render_law_reports(&reports, config.strict_verify, color);
            if fatal {
                return EXIT_VERIFY_FAILURE;
            }
        }
        #[cfg(not(feature = "verification"))]
        {
            let msg = "error: --verify requires the 'verification' feature";
            eprintln!("{}", if color { Style::bold_red(msg) } else { msg.to_string() });
            return EXIT_FRONTEND_ERROR;
        }
    }

    EXIT_OK
}

fn atty_stderr() -> bool {
    use std::io::IsTerminal;
    std::io::stderr().is_terminal()
}

fn print_tables(solved: &flix_solve::SolveResult) {
    let mut names: Vec<_> = solved.tables.keys().collect();
    names.sort_by_key(|n| n.to_string());
    for name in names {
        let snapshot = &solved.tables[name];
        for row in &snapshot.rows {
            let cells: Vec<String> = row.iter().map(format_value).collect();
            println!("{name}({})", cells.join(", "));
        }
    }
}

fn format_value(v: &flix_solve::Value) -> String {
    use flix_solve::Value;
    match v {
        Value::Unit => "()".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Char(c) => format!("'{c}'"),
        Value::Int(_, n) => n.to_string(),
        Value::BigInt(n) => n.to_string(),
        Value::Float(_, f) => f.to_string(),
        Value::Str(s) => format!("\"{s}\""),
        Value::Tuple(items) => format!("({})", items.iter().map(format_value).collect::<Vec<_>>().join(", ")),
        Value::Tag { tag, payload } => match **payload {
            Value::Unit => tag.clone(),
            _ => format!("{tag}({})", format_value(payload)),
        },
        Value::Collection(_, items) => format!("[{}]", items.iter().map(format_value).collect::<Vec<_>>().join(", ")),
        Value::Map(pairs) => format!(
            "{{{}}}",
            pairs.iter().map(|(k, v)| format!("{} -> {}", format_value(k), format_value(v))).collect::<Vec<_>>().join(", ")
        ),
        Value::Closure { .. } => "<closure>".to_string(),
    }
}
