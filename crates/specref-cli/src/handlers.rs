//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod completions;
mod refs;
mod resolve;

pub use completions::handle_completions;
pub use refs::handle_refs;
pub use resolve::handle_resolve;

use crate::error::{Error, Result};
use std::path::Path;

/// Read an input file, reporting a missing file distinctly
fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Error::Io(e)
        }
    })
}
