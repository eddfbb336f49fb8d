//! Persistence backends holding saved level documents.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use board_maker_core::{LevelId, LevelSummary};
use board_maker_document::LevelDocument;
use log::{debug, info};
use thiserror::Error;

/// Storage for saved levels keyed by identifier.
pub trait LevelRepository: Send {
    /// Stores a new level. Identifiers are unique; reusing one is an error.
    fn insert(&mut self, document: LevelDocument) -> Result<(), RepositoryError>;

    /// Lists saved levels, most recently inserted first.
    fn summaries(&self) -> Result<Vec<LevelSummary>, RepositoryError>;

    /// Fetches a saved level by identifier.
    fn get(&self, level_id: &LevelId) -> Result<Option<LevelDocument>, RepositoryError>;
}

/// Failures raised by a repository backend.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A level with the same identifier already exists.
    #[error("level '{0}' already exists")]
    Duplicate(LevelId),
    /// The backing file could not be read or written.
    #[error("level storage I/O failed: {0}")]
    Io(#[from] io::Error),
    /// The backing file did not contain a valid level list.
    #[error("level storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Repository that keeps levels in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    levels: Vec<LevelDocument>,
}

impl MemoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LevelRepository for MemoryRepository {
    fn insert(&mut self, document: LevelDocument) -> Result<(), RepositoryError> {
        push_unique(&mut self.levels, document)
    }

    fn summaries(&self) -> Result<Vec<LevelSummary>, RepositoryError> {
        Ok(newest_first(&self.levels))
    }

    fn get(&self, level_id: &LevelId) -> Result<Option<LevelDocument>, RepositoryError> {
        Ok(find(&self.levels, level_id))
    }
}

/// Repository that persists every level into a single JSON file.
///
/// The file holds the levels in insertion order and is rewritten through a
/// temporary sibling followed by a rename, so readers never observe a partial
/// write.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    levels: Vec<LevelDocument>,
}

impl JsonFileRepository {
    /// File name used inside the data directory.
    pub const FILE_NAME: &'static str = "levels.json";

    /// Opens the repository stored in `directory`, creating the directory when missing.
    pub fn open(directory: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let directory = directory.as_ref();
        fs::create_dir_all(directory)?;
        let path = directory.join(Self::FILE_NAME);
        let levels: Vec<LevelDocument> = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(error) => return Err(error.into()),
        };
        info!("opened {} with {} levels", path.display(), levels.len());
        Ok(Self { path, levels })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), RepositoryError> {
        let bytes = serde_json::to_vec_pretty(&self.levels)?;
        let temporary = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&temporary)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&temporary, &self.path)?;
        debug!("wrote {} levels to {}", self.levels.len(), self.path.display());
        Ok(())
    }
}

impl LevelRepository for JsonFileRepository {
    fn insert(&mut self, document: LevelDocument) -> Result<(), RepositoryError> {
        push_unique(&mut self.levels, document)?;
        if let Err(error) = self.persist() {
            let _ = self.levels.pop();
            return Err(error);
        }
        Ok(())
    }

    fn summaries(&self) -> Result<Vec<LevelSummary>, RepositoryError> {
        Ok(newest_first(&self.levels))
    }

    fn get(&self, level_id: &LevelId) -> Result<Option<LevelDocument>, RepositoryError> {
        Ok(find(&self.levels, level_id))
    }
}

fn push_unique(
    levels: &mut Vec<LevelDocument>,
    document: LevelDocument,
) -> Result<(), RepositoryError> {
    if levels.iter().any(|level| level.level_id == document.level_id) {
        return Err(RepositoryError::Duplicate(document.level_id));
    }
    levels.push(document);
    Ok(())
}

fn newest_first(levels: &[LevelDocument]) -> Vec<LevelSummary> {
    levels.iter().rev().map(LevelDocument::summary).collect()
}

fn find(levels: &[LevelDocument], level_id: &LevelId) -> Option<LevelDocument> {
    levels
        .iter()
        .find(|level| &level.level_id == level_id)
        .cloned()
}
