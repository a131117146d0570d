/// A file received in a request body, held in memory until it is stored.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// File name as sent by the client.
    pub original_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(original_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            original_name: original_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    /// Lowercased extension of the original file name, if any.
    pub fn extension(&self) -> Option<String> {
        let name = self.original_name.rsplit(['/', '\\']).next()?;
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// An empty file input submitted by a browser: no name and no content.
    pub fn is_blank(&self) -> bool {
        self.original_name.is_empty() && self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("original_name", &self.original_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        assert_eq!(UploadedFile::new("img.JPG", vec![1]).extension().as_deref(), Some("jpg"));
        assert_eq!(UploadedFile::new("dir/a.tar.gz", vec![1]).extension().as_deref(), Some("gz"));
        assert_eq!(UploadedFile::new("noext", vec![1]).extension(), None);
        assert_eq!(UploadedFile::new(".hidden", vec![1]).extension(), None);
        assert_eq!(UploadedFile::new("bad.j/pg", vec![1]).extension(), None);
    }

    #[test]
    fn test_blank() {
        assert!(UploadedFile::new("", Vec::new()).is_blank());
        assert!(!UploadedFile::new("a.jpg", Vec::new()).is_blank());
    }
}
