#![cfg_attr(docsrs, feature(doc_cfg))]

//! # flix-base
//!
//! Pure structural atoms shared across the Flix front end.
//!
//! This crate provides the foundational types used throughout the pipeline:
//!
//! - [`Span`] — Source location tracking
//! - [`SpannedError`]/[`Result`] — Errors with source positions
//! - [`Name`]/[`Ident`] — Fully qualified names, position-insensitive equality
//!
//! # Design Principles
//!
//! This crate has no knowledge of Datalog, lattices, or I/O. It provides
//! only generic, reusable infrastructure that higher-level crates build upon.
//!
//! # Example
//!
//! ```
//! use flix_base::Span;
//!
//! let span = Span::new(0, 5);
//! assert_eq!(span.start, 0);
//! ```

pub mod span;
pub mod error;
pub mod name;

pub use span::Span;
pub use error::{SpannedError, Result};
pub use name::{Ident, Name};
