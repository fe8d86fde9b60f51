//! File reading primitives
//!
//! Both readers decode lossily: invalid UTF-8 sequences become U+FFFD, so
//! binary or mis-encoded input never fails a read on its own. Only regular
//! files are opened; opening a FIFO or device node can block indefinitely.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

/// Bytes inspected when sniffing the first line of a file
pub const FIRST_LINE_LIMIT: usize = 256;

/// Contents of a file read for the artifact
#[derive(Debug, Clone)]
pub struct FileContent {
    /// Decoded text
    pub text: String,

    /// Size on disk in bytes
    pub size: u64,

    /// Whether invalid UTF-8 was replaced
    pub lossy: bool,
}

/// Open `path` for reading, refusing anything that is not a regular file
/// (symlinks are followed)
fn open_regular(path: &Path) -> io::Result<File> {
    if !fs::metadata(path)?.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("not a regular file: {}", path.display()),
        ));
    }
    File::open(path)
}

/// Read at most `limit` bytes and return everything before the first newline
pub fn read_first_line(path: &Path, limit: usize) -> io::Result<String> {
    let file = open_regular(path)?;
    let mut buffer = Vec::with_capacity(limit);
    file.take(limit as u64).read_to_end(&mut buffer)?;

    let line = match buffer.iter().position(|&b| b == b'\n') {
        Some(end) => &buffer[..end],
        None => &buffer[..],
    };

    Ok(String::from_utf8_lossy(line).into_owned())
}

/// Read a whole file, decoding lossily
pub fn read_lossy(path: &Path) -> io::Result<FileContent> {
    let mut file = open_regular(path)?;
    let size = file.metadata()?.len();

    let mut bytes = Vec::with_capacity(size as usize);
    file.read_to_end(&mut bytes)?;

    let (text, lossy) = match String::from_utf8(bytes) {
        Ok(text) => (text, false),
        Err(err) => (String::from_utf8_lossy(err.as_bytes()).into_owned(), true),
    };

    Ok(FileContent { text, size, lossy })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_first_line_stops_at_newline() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tool");
        fs::write(&path, "#!/bin/sh\necho hi\n").unwrap();

        assert_eq!(read_first_line(&path, FIRST_LINE_LIMIT).unwrap(), "#!/bin/sh");
    }

    #[test]
    fn test_read_first_line_is_bounded() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("long");
        fs::write(&path, "x".repeat(1000)).unwrap();

        assert_eq!(read_first_line(&path, 16).unwrap().len(), 16);
    }

    #[test]
    fn test_read_first_line_substitutes_invalid_bytes() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bin");
        fs::write(&path, [0xff, 0xfe, b'#', b'!', b'\n']).unwrap();

        let line = read_first_line(&path, FIRST_LINE_LIMIT).unwrap();
        assert!(line.contains('\u{FFFD}'));
        assert!(!line.starts_with("#!"));
    }

    #[test]
    fn test_read_first_line_missing_file() {
        let temp = tempdir().unwrap();
        assert!(read_first_line(&temp.path().join("nope"), FIRST_LINE_LIMIT).is_err());
    }

    #[test]
    fn test_directory_is_not_read() {
        let temp = tempdir().unwrap();
        let err = read_lossy(temp.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[cfg(unix)]
    #[test]
    fn test_fifo_is_refused_without_blocking() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("pipe");
        let status = std::process::Command::new("mkfifo")
            .arg(&path)
            .status()
            .unwrap();
        assert!(status.success());

        let err = read_first_line(&path, FIRST_LINE_LIMIT).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(read_lossy(&path).is_err());
    }

    #[test]
    fn test_read_lossy_utf8() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("a.c");
        fs::write(&path, "int main(void) { return 0; }\n").unwrap();

        let content = read_lossy(&path).unwrap();
        assert_eq!(content.text, "int main(void) { return 0; }\n");
        assert_eq!(content.size, 29);
        assert!(!content.lossy);
    }

    #[test]
    fn test_read_lossy_invalid_utf8() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("latin1.c");
        fs::write(&path, [b'a', 0xe9, b'b']).unwrap();

        let content = read_lossy(&path).unwrap();
        assert_eq!(content.text, "a\u{FFFD}b");
        assert_eq!(content.size, 3);
        assert!(content.lossy);
    }
}
