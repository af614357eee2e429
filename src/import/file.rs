//! Handle for the file chosen for import, plus the client-side upload checks

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::errors::ImportError;

/// Largest file accepted for upload (10 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Only files with this extension are accepted
pub const ALLOWED_EXTENSION: &str = "csv";

#[derive(Debug, Clone)]
enum FileSource {
    Disk(PathBuf),
    Memory(Arc<[u8]>),
}

/// A file selected for import. Contents are read lazily.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    size: u64,
    source: FileSource,
}

impl SelectedFile {
    /// Reference a file on disk; only its metadata is read here
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            size: metadata.len(),
            source: FileSource::Disk(path.to_path_buf()),
        })
    }

    /// Wrap contents already held in memory
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            source: FileSource::Memory(Arc::from(bytes)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            FileSource::Disk(path) => Some(path),
            FileSource::Memory(_) => None,
        }
    }

    pub fn has_csv_extension(&self) -> bool {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(ALLOWED_EXTENSION))
            .unwrap_or(false)
    }

    /// Type and size checks done before any network call
    pub fn validate(&self, max_size: u64) -> Result<(), ImportError> {
        if !self.has_csv_extension() {
            return Err(ImportError::UnsupportedFileType { name: self.name.clone() });
        }
        if self.size > max_size {
            return Err(ImportError::FileTooLarge { size: self.size, limit: max_size });
        }
        Ok(())
    }

    pub async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Disk(path) => tokio::fs::read(path).await,
            FileSource::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }

    /// Contents as text; bytes that are not valid UTF-8 become U+FFFD
    pub async fn read_text(&self) -> std::io::Result<String> {
        let bytes = self.read_bytes().await?;
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_check_is_case_insensitive() {
        assert!(SelectedFile::from_bytes("contacts.CSV", "a").has_csv_extension());
        assert!(SelectedFile::from_bytes("contacts.csv", "a").has_csv_extension());
        assert!(!SelectedFile::from_bytes("contacts.xlsx", "a").has_csv_extension());
        assert!(!SelectedFile::from_bytes("csv", "a").has_csv_extension());
    }

    #[test]
    fn test_validate_rejects_wrong_type() {
        let file = SelectedFile::from_bytes("contacts.txt", "Name\nA");
        assert_eq!(
            file.validate(MAX_UPLOAD_BYTES),
            Err(ImportError::UnsupportedFileType { name: "contacts.txt".to_string() })
        );
    }

    #[test]
    fn test_validate_size_limit() {
        let file = SelectedFile::from_bytes("big.csv", vec![b'a'; 11]);
        assert_eq!(file.validate(10), Err(ImportError::FileTooLarge { size: 11, limit: 10 }));
        assert!(file.validate(11).is_ok());
    }

    #[tokio::test]
    async fn test_read_text_tolerates_latin1() {
        let file = SelectedFile::from_bytes("people.csv", b"Name,Email\nJos\xe9,jose@x.com\n".to_vec());
        let text = file.read_text().await.unwrap();
        assert_eq!(text, "Name,Email\nJos\u{fffd},jose@x.com\n");

        let preview = crate::import::parse_preview(&text, 5).unwrap();
        assert_eq!(preview.headers, ["Name", "Email"]);
        assert_eq!(preview.rows, vec![vec!["Jos\u{fffd}".to_string(), "jose@x.com".to_string()]]);
    }

    #[tokio::test]
    async fn test_from_path_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        std::fs::write(&path, "Name\nAnn\n").unwrap();

        let file = SelectedFile::from_path(&path).await.unwrap();
        assert_eq!(file.name(), "people.csv");
        assert_eq!(file.size(), 9);
        assert_eq!(file.path(), Some(path.as_path()));
        assert_eq!(file.read_text().await.unwrap(), "Name\nAnn\n");
    }

    #[tokio::test]
    async fn test_from_path_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SelectedFile::from_path(dir.path()).await.is_err());
    }
}
