//! Uploaded files and the ordered set they arrive in.

use bytes::Bytes;

/// A single uploaded file.
///
/// The filename is only used for logs and error messages; the image format
/// is always sniffed from the content.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Browsers submit an empty part with no filename for an empty file input.
    pub fn is_blank(&self) -> bool {
        self.filename.is_empty() && self.bytes.is_empty()
    }
}

/// Uploaded files in upload order.
#[derive(Debug, Clone, Default)]
pub struct UploadSet {
    files: Vec<UploadedFile>,
}

impl UploadSet {
    pub const fn new() -> Self {
        Self { files: Vec::new() }
    }

    pub fn push(&mut self, file: UploadedFile) {
        self.files.push(file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UploadedFile> {
        self.files.iter()
    }

    /// Total size of all uploaded files in bytes.
    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.bytes.len()).sum()
    }
}

impl FromIterator<UploadedFile> for UploadSet {
    fn from_iter<I: IntoIterator<Item = UploadedFile>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a UploadSet {
    type Item = &'a UploadedFile;
    type IntoIter = std::slice::Iter<'a, UploadedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
