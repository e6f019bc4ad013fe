//! Initial catalog contents loaded at startup.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::models::{Director, Movie};
use crate::store::Record;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate {entity} id {id}")]
    DuplicateId { entity: &'static str, id: i64 },
}

/// Seed file contents: `{"movies": [...], "directors": [...]}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub movies: Vec<Movie>,
    pub directors: Vec<Director>,
}

impl Seed {
    pub fn parse(content: &str) -> Result<Self, SeedError> {
        let seed: Seed = serde_json::from_str(content)?;
        unique_ids("movie", &seed.movies)?;
        unique_ids("director", &seed.directors)?;
        Ok(seed)
    }
}

pub fn load_seed(path: &Path) -> Result<Seed, SeedError> {
    let content = fs::read_to_string(path)?;
    Seed::parse(&content)
}

fn unique_ids<R: Record>(entity: &'static str, rows: &[R]) -> Result<(), SeedError> {
    let mut seen = HashSet::with_capacity(rows.len());
    for row in rows {
        if !seen.insert(row.id()) {
            return Err(SeedError::DuplicateId { entity, id: row.id() });
        }
    }
    Ok(())
}
