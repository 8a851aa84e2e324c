//! On-disk model persistence
//!
//! One model per repository, stored at `<repo root>/gitrisk.model` as a
//! bincode-encoded envelope carrying a format version.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::error::{ModelError, Result};

/// File name of the persisted model, relative to the repository root
pub const MODEL_FILE_NAME: &str = "gitrisk.model";

/// Bumped whenever the serialized layout of a model changes
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope<M> {
    version: u32,
    model: M,
}

/// File-backed store for a single trained classifier
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    /// Store at an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the conventional location inside a repository
    pub fn for_repository(repo_root: impl AsRef<Path>) -> Self {
        Self::new(repo_root.as_ref().join(MODEL_FILE_NAME))
    }

    /// Path of the model file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a model has been saved here
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Serialize `model`, replacing any previous file
    pub fn save<M: Serialize>(&self, model: &M) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("model.tmp");
        {
            let writer = BufWriter::new(fs::File::create(&tmp)?);
            let envelope = Envelope {
                version: FORMAT_VERSION,
                model,
            };
            bincode::serialize_into(writer, &envelope)?;
        }
        fs::rename(&tmp, &self.path)?;

        log::info!("Saved model to {}", self.path.display());
        Ok(())
    }

    /// Load a previously saved model
    ///
    /// Returns `ModelError::NotFound` if nothing has been saved yet.
    pub fn load<M: DeserializeOwned>(&self) -> Result<M> {
        let file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ModelError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let envelope: Envelope<M> = bincode::deserialize_from(BufReader::new(file))?;
        if envelope.version != FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion {
                found: envelope.version,
                expected: FORMAT_VERSION,
            });
        }

        log::debug!("Loaded model from {}", self.path.display());
        Ok(envelope.model)
    }
}
