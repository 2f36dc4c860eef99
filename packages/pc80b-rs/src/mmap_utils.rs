use crate::error::{Pc80bError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::ops::Deref;
use std::path::Path;

/// Read-only view of a recording on disk
pub enum RawBuffer {
    Mapped(Mmap),
    /// Zero-length files cannot be mapped on every platform
    Empty,
}

impl Deref for RawBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            RawBuffer::Mapped(mmap) => &mmap[..],
            RawBuffer::Empty => &[],
        }
    }
}

/// Open a file and map it into memory (read-only)
pub fn mmap_file(path: &Path) -> Result<RawBuffer> {
    if !path.is_file() {
        return Err(Pc80bError::FileNotFound(path.display().to_string()));
    }
    let file = File::open(path).map_err(Pc80bError::IoError)?;
    if file.metadata()?.len() == 0 {
        return Ok(RawBuffer::Empty);
    }
    let mmap = unsafe { Mmap::map(&file).map_err(Pc80bError::IoError)? };
    Ok(RawBuffer::Mapped(mmap))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mmap_reads_contents() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), [1u8, 2, 3]).unwrap();
        let raw = mmap_file(tmp.path()).unwrap();
        assert_eq!(&raw[..], &[1, 2, 3]);
    }

    #[test]
    fn test_mmap_empty_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let raw = mmap_file(tmp.path()).unwrap();
        assert!(raw.is_empty());
    }

    #[test]
    fn test_mmap_missing_file() {
        let result = mmap_file(Path::new("/nonexistent/recording.dat"));
        assert!(matches!(result, Err(Pc80bError::FileNotFound(_))));
    }
}
