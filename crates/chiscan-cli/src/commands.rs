use crate::error::{CliError, Result};
use std::path::Path;

pub mod aggregate;
pub mod chi;
pub mod convert;
pub mod definitions;

fn ensure_directory(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(CliError::Argument(format!(
            "'{}' is not a directory",
            path.display()
        )));
    }
    Ok(())
}
