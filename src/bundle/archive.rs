// bundle/archive.rs
use std::io::{self, Cursor, Read};

use zip::ZipArchive;

use crate::error::ArchiveError;

/// Random access view over an in-memory client bundle archive.
///
/// Entries come back in central directory order, which says nothing about
/// their names. Nothing is decompressed until an entry is opened.
pub struct BundleArchive<'a> {
    inner: ZipArchive<Cursor<&'a [u8]>>,
    comment: String,
}

impl<'a> BundleArchive<'a> {
    /// Opens `bytes` as an archive of `declared_len` bytes.
    ///
    /// A shorter declared length limits the view to that prefix. A longer one
    /// means the body was cut short.
    pub fn open(bytes: &'a [u8], declared_len: u64) -> Result<Self, ArchiveError> {
        let view = match usize::try_from(declared_len) {
            Ok(len) if len <= bytes.len() => &bytes[..len],
            _ => {
                return Err(ArchiveError::LengthMismatch {
                    declared: declared_len,
                    actual: bytes.len(),
                })
            }
        };

        let inner = ZipArchive::new(Cursor::new(view))?;
        let comment = String::from_utf8_lossy(inner.comment()).into_owned();

        Ok(Self { inner, comment })
    }

    /// Archive level comment; MKE stores the bundle identifier here
    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    pub fn entry_name(&self, index: usize) -> Option<&str> {
        self.inner.name_for_index(index)
    }

    pub fn entry_names(&self) -> Vec<&str> {
        (0..self.len()).filter_map(|i| self.entry_name(i)).collect()
    }

    /// Opens one entry for reading. The stream borrows the archive, so at most
    /// one entry is open at a time and it is closed when dropped.
    pub fn open_entry(&mut self, index: usize) -> io::Result<Box<dyn Read + '_>> {
        let entry = self.inner.by_index(index).map_err(io::Error::from)?;
        Ok(Box::new(entry))
    }
}
