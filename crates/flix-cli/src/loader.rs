//! Source-path loading (§6 "Parser interface (consumed)").
//!
//! The parser proper is an external collaborator out of scope for this
//! repository; what it hands off is a [`flix_ir::surface::SurfaceProgram`].
//! This module stands in for that handoff by deserializing each source
//! path as a JSON-encoded surface tree, then concatenating every path's
//! declarations into one combined program in path order.

use std::fs;
use std::path::Path;

use flix_ir::surface::SurfaceProgram;

/// Errors loading a source path into a surface tree.
#[derive(Debug)]
pub enum LoadError {
    Io { path: String, source: std::io::Error },
    Parse { path: String, source: serde_json::Error },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io { path, source } => write!(f, "could not read '{path}': {source}"),
            LoadError::Parse { path, source } => write!(f, "could not parse '{path}' as a surface program: {source}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Parse { source, .. } => Some(source),
        }
    }
}

/// Loads and merges every source path's declarations into one
/// [`SurfaceProgram`], in path order.
pub fn load_sources(paths: &[impl AsRef<Path>]) -> Result<SurfaceProgram, LoadError> {
    let mut merged = SurfaceProgram::default();
    for path in paths {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|source| LoadError::Io { path: path.display().to_string(), source })?;
        let mut program: SurfaceProgram = serde_json::from_str(&text)
            .map_err(|source| LoadError::Parse { path: path.display().to_string(), source })?;
        merged.decls.append(&mut program.decls);
    }
    Ok(merged)
}
