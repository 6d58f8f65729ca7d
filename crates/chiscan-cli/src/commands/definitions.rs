use crate::cli::{DefinitionsArgs, DefinitionsCommands};
use crate::error::{CliError, Result};
use chiscan::core::topology::registry::ChiDefinitionTable;
use chiscan::engine::error::EngineError;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(args: DefinitionsArgs) -> Result<()> {
    match args.command {
        DefinitionsCommands::Show { definitions } => {
            let table = load_table(definitions.as_deref())?;
            print!("{}", render_table(&table));
        }
        DefinitionsCommands::Export { path } => {
            handle_export(path)?;
        }
    }
    Ok(())
}

/// The table at `path`, or the built-in one.
pub fn load_table(path: Option<&Path>) -> Result<ChiDefinitionTable> {
    match path {
        Some(path) => {
            info!("Loading chi definitions from {:?}", path);
            Ok(ChiDefinitionTable::load(path).map_err(EngineError::from)?)
        }
        None => Ok(ChiDefinitionTable::standard()),
    }
}

fn render_table(table: &ChiDefinitionTable) -> String {
    let mut out = String::new();
    for name in table.residue_names() {
        out.push_str(&format!("{:<4}", name));
        for (i, definition) in table.get(name).unwrap_or_default().iter().enumerate() {
            out.push_str(&format!(" Chi{}={}", i + 1, definition));
        }
        out.push('\n');
    }
    out
}

fn handle_export(path: PathBuf) -> Result<()> {
    let content = ChiDefinitionTable::standard()
        .to_toml_string()
        .map_err(|e| CliError::Other(e.into()))?;
    std::fs::write(&path, content)?;
    println!("✓ Chi definitions written to: {}", path.display());
    Ok(())
}
