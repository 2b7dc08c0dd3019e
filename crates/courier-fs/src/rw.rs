use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::{Error, Result, StagedFile, expand_home, from_io, resolve_write_path};

/// Open an existing regular file for reading, expanding `~` first.
pub fn open_read(path: impl AsRef<Path>) -> Result<File> {
    let path = expand_home(path);
    let metadata = fs::metadata(&path).map_err(|e| from_io(&path, e))?;
    if metadata.is_dir() {
        return Err(Error::IsDirectory(path));
    }
    File::open(&path).map_err(|e| from_io(&path, e))
}

/// Read up to `size` bytes, returning fewer only at end of file.
pub fn read_block(file: &mut File, size: usize) -> io::Result<Vec<u8>> {
    let mut block = Vec::with_capacity(size);
    file.by_ref().take(size as u64).read_to_end(&mut block)?;
    Ok(block)
}

/// Write `data` to `path` (see [`resolve_write_path`]) through a staging file.
pub fn write_bytes(
    path: impl AsRef<Path>,
    default_filename: &str,
    data: &[u8],
    force: bool,
) -> Result<PathBuf> {
    let destination = resolve_write_path(path, default_filename, force)?;
    let mut staged = StagedFile::create(destination)?;
    staged.write_all(data)?;
    staged.commit(force)
}

/// Copy the file at `source` to `path` (see [`resolve_write_path`]).
pub fn copy_to(
    source: impl AsRef<Path>,
    path: impl AsRef<Path>,
    default_filename: &str,
    force: bool,
) -> Result<PathBuf> {
    let source = expand_home(source);
    let metadata = fs::metadata(&source).map_err(|e| from_io(&source, e))?;
    if metadata.is_dir() {
        return Err(Error::IsDirectory(source));
    }

    let destination = resolve_write_path(path, default_filename, force)?;
    let staged = StagedFile::create(destination)?;
    fs::copy(&source, staged.path()).map_err(|e| from_io(&source, e))?;
    staged.commit(force)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_read_block_short_at_eof() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::File::create(&path).unwrap().write_all(&[7u8; 25]).unwrap();

        let mut file = open_read(&path).unwrap();
        assert_eq!(read_block(&mut file, 10).unwrap().len(), 10);
        assert_eq!(read_block(&mut file, 10).unwrap().len(), 10);
        assert_eq!(read_block(&mut file, 10).unwrap().len(), 5);
        assert!(read_block(&mut file, 10).unwrap().is_empty());
    }

    #[test]
    fn test_open_read_rejects_directory() {
        let dir = tempdir().unwrap();
        assert!(matches!(open_read(dir.path()), Err(Error::IsDirectory(_))));
        assert!(matches!(
            open_read(dir.path().join("missing")),
            Err(Error::NotFound(_))
        ));
    }
}
