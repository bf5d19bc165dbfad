//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read raw file bytes with standardized error handling.
///
/// Wraps `fs::read` with consistent `Error::internal_io` formatting. Callers
/// decide what invalid text means for them.
pub fn read_bytes(path: &Path, operation: &str) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Write content to file with standardized error handling.
///
/// Wraps `fs::write` with consistent `Error::internal_io` formatting.
pub fn write_file(path: &Path, content: &str, operation: &str) -> Result<()> {
    fs::write(path, content)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn read_bytes_returns_content_unchanged() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(&[0xff, 0xfe, b'{', b'}']).unwrap();

        let bytes = read_bytes(temp.path(), "test read").unwrap();
        assert_eq!(bytes, vec![0xff, 0xfe, b'{', b'}']);
    }

    #[test]
    fn read_bytes_returns_error_for_missing_file() {
        let result = read_bytes(Path::new("/nonexistent/path.txt"), "test read");
        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
        assert_eq!(err.details["context"], "test read");
    }

    #[test]
    fn write_file_replaces_content() {
        let temp = NamedTempFile::new().unwrap();
        write_file(temp.path(), "new content", "test write").unwrap();

        let content = fs::read_to_string(temp.path()).unwrap();
        assert_eq!(content, "new content");
    }

    #[test]
    fn write_file_returns_error_for_invalid_path() {
        let result = write_file(Path::new("/nonexistent/dir/file.txt"), "x", "test write");
        assert_eq!(result.unwrap_err().code.as_str(), "internal.io_error");
    }
}
