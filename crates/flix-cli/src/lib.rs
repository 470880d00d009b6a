#![cfg_attr(docsrs, feature(doc_cfg))]

//! # flix-cli
//!
//! The thin external-interface binary (§6) driving the Flix front-end
//! pipeline: load sources, weed, resolve, type, simplify, then — per
//! subcommand — solve and/or verify. `run_cli` is the library entry point;
//! `main.rs` is a thin wrapper translating its return value into a process
//! exit code.

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod loader;
pub mod pipeline;
pub mod style;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use pipeline::{EXIT_FRONTEND_ERROR, EXIT_INTERRUPTED, EXIT_NONTERMINATING, EXIT_OK, EXIT_VERIFY_FAILURE};

use clap::Parser;
use std::env;

/// Initializes `env_logger` from `FLIX_LOG` (§10.1), folding in
/// `-v`/`--verbose` occurrences as additional filter strictness.
pub fn init_logging(verbose: u8) {
    use env_logger::Env;

    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env = Env::default().filter_or("FLIX_LOG", default_level);
    let _ = env_logger::Builder::from_env(env).target(env_logger::Target::Stderr).try_init();
}

/// Parses `argv`, resolves configuration, and drives the pipeline, returning
/// the process exit code (§6 "CLI", exit codes 0/1/2/3).
pub fn run_cli() -> i32 {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let project_dir = env::current_dir().unwrap_or_else(|_| ".".into());
    let config = match Config::load(&project_dir) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_FRONTEND_ERROR;
        }
    };
    let config = config.with_overrides(cli.iteration_cap, cli.strict_verify, Some(cli.color));

    pipeline::execute(&cli, &config)
}
