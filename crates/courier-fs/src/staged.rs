use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{Error, Result, from_io};

/// A temporary file next to its destination that is renamed into place on
/// [`commit`](StagedFile::commit).
///
/// The staging file is removed when the value is dropped without being
/// committed, so an interrupted save leaves the destination untouched.
#[derive(Debug)]
pub struct StagedFile {
    staging: PathBuf,
    destination: PathBuf,
    file: Option<File>,
    committed: bool,
}

impl StagedFile {
    pub fn create(destination: impl Into<PathBuf>) -> Result<Self> {
        let destination = destination.into();
        let parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let staging = parent.join(format!(".tmp.{}.courier", uuid::Uuid::now_v7().simple()));
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&staging)
            .map_err(|e| from_io(&staging, e))?;

        Ok(Self {
            staging,
            destination,
            file: Some(file),
            committed: false,
        })
    }

    pub fn path(&self) -> &Path { &self.staging }

    pub fn destination(&self) -> &Path { &self.destination }

    pub fn write_all(&mut self, chunk: &[u8]) -> Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| Error::Io {
                path: self.staging.clone(),
                source: std::io::Error::other("staging file already closed"),
            })?;
        file.write_all(chunk).map_err(|e| from_io(&self.staging, e))
    }

    /// Flush, close and rename the staging file onto the destination.
    ///
    /// Without `force` an existing destination is rejected again here, right
    /// before the rename.
    pub fn commit(mut self, force: bool) -> Result<PathBuf> {
        if let Some(mut file) = self.file.take() {
            file.flush().map_err(|e| from_io(&self.staging, e))?;
        }

        if !force && self.destination.exists() {
            return Err(Error::AlreadyExists(self.destination.clone()));
        }

        fs::rename(&self.staging, &self.destination).map_err(|e| from_io(&self.destination, e))?;
        self.committed = true;
        Ok(self.destination.clone())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        self.file.take();
        if fs::remove_file(&self.staging).is_ok() {
            tracing::debug!(path = %self.staging.display(), "removed uncommitted staging file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_commit_moves_into_place() -> Result<()> {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.bin");

        let mut staged = StagedFile::create(&dest)?;
        staged.write_all(b"hello ")?;
        staged.write_all(b"world")?;
        assert!(!dest.exists());

        assert_eq!(staged.commit(false)?, dest);
        assert_eq!(fs::read(&dest).unwrap(), b"hello world");
        Ok(())
    }

    #[test]
    fn test_drop_removes_staging_file() -> Result<()> {
        let dir = tempdir().unwrap();
        let staged = StagedFile::create(dir.path().join("out.bin"))?;
        let staging = staged.path().to_path_buf();
        assert!(staging.exists());

        drop(staged);
        assert!(!staging.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        Ok(())
    }

    #[test]
    fn test_commit_refuses_existing_without_force() -> Result<()> {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.bin");
        let mut staged = StagedFile::create(&dest)?;
        staged.write_all(b"new")?;

        fs::write(&dest, b"old").unwrap();
        assert!(matches!(staged.commit(false), Err(Error::AlreadyExists(_))));
        assert_eq!(fs::read(&dest).unwrap(), b"old");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        Ok(())
    }
}
