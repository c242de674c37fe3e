use std::path::Path;

use serde::{Deserialize, Serialize};
use sera_classfile::ClassMetadata;
use thiserror::Error;

use crate::ClassIndex;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to read class index snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode class index snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized form of a whole-program index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    #[serde(default)]
    pub classes: Vec<ClassMetadata>,
}

impl ClassIndex {
    /// Load an index from a JSON snapshot on disk.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| IndexError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let index = Self::from_json_str(&text)?;
        tracing::debug!(
            target: "sera.index",
            path = %path.display(),
            classes = index.len(),
            "loaded class index snapshot"
        );
        Ok(index)
    }

    pub fn from_json_str(text: &str) -> Result<Self, IndexError> {
        let snapshot: IndexSnapshot = serde_json::from_str(text)?;
        Ok(Self::new(snapshot.classes))
    }

    pub fn to_snapshot(&self) -> IndexSnapshot {
        IndexSnapshot {
            classes: self.classes().cloned().collect(),
        }
    }
}
