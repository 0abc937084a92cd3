// Publication CSV writers.
//
// Column names and order come from the serde attributes on the publication
// row structs; this module only puts rows on disk under the per-year naming
// convention resolved by the config.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::pipeline::PublicationTables;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to create {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

/// Write one publication table.
fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| OutputError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
    }
    let mut writer = csv::Writer::from_path(path).map_err(|e| OutputError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    for row in rows {
        writer.serialize(row).map_err(|e| OutputError::Csv {
            path: path.display().to_string(),
            source: e,
        })?;
    }
    writer.flush().map_err(|e| OutputError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

/// Write all four publication tables next to the raw extracts.
pub fn write_all(config: &Config, tables: &PublicationTables) -> Result<(), OutputError> {
    let batting = config.final_batting_path();
    write_rows(&batting, &tables.batting)?;
    info!("wrote {} batting rows to {}", tables.batting.len(), batting.display());

    let pitching = config.final_pitching_path();
    write_rows(&pitching, &tables.pitching)?;
    info!(
        "wrote {} pitching rows to {}",
        tables.pitching.len(),
        pitching.display()
    );

    let team_batting = config.team_batting_path();
    write_rows(&team_batting, &tables.team_batting)?;
    info!(
        "wrote {} team batting rows to {}",
        tables.team_batting.len(),
        team_batting.display()
    );

    let team_pitching = config.team_pitching_path();
    write_rows(&team_pitching, &tables.team_pitching)?;
    info!(
        "wrote {} team pitching rows to {}",
        tables.team_pitching.len(),
        team_pitching.display()
    );

    Ok(())
}
