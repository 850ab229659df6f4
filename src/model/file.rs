use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::util;

/// Identifier of a [File], a random uuid unless given explicitly
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileId(String);

impl Default for FileId {
    fn default() -> Self {
        FileId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(id: &str) -> Self {
        FileId(id.to_owned())
    }
}

impl From<String> for FileId {
    fn from(id: String) -> Self {
        FileId(id)
    }
}

impl From<Uuid> for FileId {
    fn from(id: Uuid) -> Self {
        FileId(id.to_string())
    }
}

/// A single file flowing through a pipeline
///
/// Identity is the pair of id and posix-rendered path.
/// `metadata` rides along but never takes part in equality or hashing.
///
#[derive(Debug, Clone)]
pub struct File {
    pub id: FileId,
    pub path: PathBuf,
    pub metadata: HashMap<String, String>,
}

impl File {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        File {
            id: FileId::default(),
            path: path.as_ref().to_path_buf(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_id<I: Into<FileId>>(mut self, id: I) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    fn key(&self) -> (&str, String) {
        (self.id.0.as_str(), util::posix_string(&self.path))
    }
}

impl PartialEq for File {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for File {}

impl Hash for File {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state)
    }
}
