//! Shared test tooling of the workspace.
//!
//! The test data lives in the `data` directory of the workspace.

mod approx_eq;
pub mod tokenizer;

use std::{
    env::var_os,
    io::{Error, ErrorKind, Result},
    path::{Path, PathBuf},
};

pub use crate::approx_eq::{assert_leaves, Leaves};

/// The directory of the test data relative to the workspace directory.
const DATA_DIR: &str = "data";

/// Resolves the path to the requested data relative to the data directory.
fn resolve_data(path: &[impl AsRef<Path>]) -> Result<PathBuf> {
    let manifest = var_os("CARGO_MANIFEST_DIR")
        .ok_or_else(|| Error::new(ErrorKind::NotFound, "missing CARGO_MANIFEST_DIR"))?;
    let data = PathBuf::from(manifest)
        .parent()
        .ok_or_else(|| Error::new(ErrorKind::NotFound, "missing cargo workspace dir"))?
        .join(DATA_DIR);

    path.iter()
        .fold(data, |path, component| path.join(component))
        .canonicalize()
}
