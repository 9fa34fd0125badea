//! # Chunked Upload Assembly
//!
//! Appends numbered chunks of an uploaded price list to a partial file and
//! promotes it to `<file_id>.xlsx` once the last chunk lands. Progress is kept
//! on disk next to the partial file, so an interrupted upload resumes with
//! the next expected chunk.
use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;

const PART_EXTENSION: &str = "part";
const COUNTER_EXTENSION: &str = "part.count";
const COMPLETE_EXTENSION: &str = "xlsx";

/// Errors raised while assembling an upload
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Invalid upload file id '{0}'")]
    InvalidFileId(String),

    #[error("Invalid chunk {index} of {total}")]
    InvalidChunk { index: u32, total: u32 },

    #[error("Chunk {index} of '{file_id}' is out of order, expected chunk {expected}")]
    OutOfOrder {
        file_id: String,
        index: u32,
        expected: u32,
    },

    #[error("{0}")]
    IoError(#[from] std::io::Error),
}

/// Outcome of accepting one chunk
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChunkStatus {
    /// More chunks are expected
    Pending { received: u32, total: u32 },
    /// Every chunk arrived; the assembled file is ready to import
    Complete(PathBuf),
}

/// Assembles chunked uploads inside one directory.
///
/// State lives on disk only. Callers serialize access per `file_id`.
#[derive(Clone, Debug)]
pub struct ChunkAssembler {
    directory: PathBuf,
}

impl ChunkAssembler {
    /// Creates the upload directory if needed
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, UploadError> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Appends chunk `index` (0-based) of `total` for `file_id`
    pub fn accept(&self, file_id: &str, index: u32, total: u32, bytes: &[u8]) -> Result<ChunkStatus, UploadError> {
        validate_file_id(file_id)?;
        if total == 0 || index >= total {
            return Err(UploadError::InvalidChunk { index, total });
        }

        let partial = self.path(file_id, PART_EXTENSION);
        let mut file = if index == 0 {
            File::create(&partial)?
        } else {
            let expected = self.received_chunks(file_id)?;
            if index != expected {
                return Err(UploadError::OutOfOrder {
                    file_id: file_id.to_owned(),
                    index,
                    expected,
                });
            }
            OpenOptions::new().append(true).open(&partial)?
        };
        file.write_all(bytes)?;
        file.sync_data()?;
        drop(file);

        let received = index + 1;
        debug!(file_id, chunk = index, total, bytes = bytes.len(), "accepted chunk");
        if received < total {
            fs::write(self.path(file_id, COUNTER_EXTENSION), received.to_string())?;
            return Ok(ChunkStatus::Pending { received, total });
        }

        let complete = self.path(file_id, COMPLETE_EXTENSION);
        fs::rename(&partial, &complete)?;
        remove_if_exists(&self.path(file_id, COUNTER_EXTENSION))?;
        info!(file_id, total, path = %complete.display(), "assembled upload");
        Ok(ChunkStatus::Complete(complete))
    }

    /// Number of chunks received so far for an unfinished upload
    pub fn received_chunks(&self, file_id: &str) -> Result<u32, UploadError> {
        validate_file_id(file_id)?;
        let counter = self.path(file_id, COUNTER_EXTENSION);
        match fs::read_to_string(&counter) {
            Ok(text) => match text.trim().parse::<u32>() {
                Ok(received) => Ok(received),
                Err(error) => {
                    warn!(file_id, %error, "ignoring unreadable chunk counter");
                    Ok(0)
                }
            },
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(0),
            Err(error) => Err(error.into()),
        }
    }

    /// Drops the partial file and counter of an unfinished upload
    pub fn discard(&self, file_id: &str) -> Result<(), UploadError> {
        validate_file_id(file_id)?;
        remove_if_exists(&self.path(file_id, PART_EXTENSION))?;
        remove_if_exists(&self.path(file_id, COUNTER_EXTENSION))
    }

    fn path(&self, file_id: &str, extension: &str) -> PathBuf {
        self.directory.join(format!("{}.{}", file_id, extension))
    }
}

/// Accepts ASCII letters, digits, `-`, `_` and `.`, without a leading dot
fn validate_file_id(file_id: &str) -> Result<(), UploadError> {
    let valid = !file_id.is_empty()
        && !file_id.starts_with('.')
        && file_id
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || matches!(character, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(UploadError::InvalidFileId(file_id.to_owned()))
    }
}

fn remove_if_exists(path: &Path) -> Result<(), UploadError> {
    match fs::remove_file(path) {
        Err(error) if error.kind() != ErrorKind::NotFound => Err(error.into()),
        _ => Ok(()),
    }
}
