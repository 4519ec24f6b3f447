// bundle/testutil.rs
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Builds client bundle style archives in memory
pub struct ArchiveBuilder {
    comment: Option<String>,
    files: Vec<(String, Vec<u8>, CompressionMethod)>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            comment: None,
            files: Vec::new(),
        }
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// Adds an uncompressed entry, so its bytes can be located in the output
    pub fn file(mut self, name: &str, content: impl AsRef<[u8]>) -> Self {
        self.files.push((
            name.to_string(),
            content.as_ref().to_vec(),
            CompressionMethod::Stored,
        ));
        self
    }

    pub fn deflated(mut self, name: &str, content: impl AsRef<[u8]>) -> Self {
        self.files.push((
            name.to_string(),
            content.as_ref().to_vec(),
            CompressionMethod::Deflated,
        ));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content, method) in self.files {
            let options = SimpleFileOptions::default().compression_method(method);
            writer.start_file(name, options).unwrap();
            writer.write_all(&content).unwrap();
        }
        if let Some(comment) = self.comment {
            writer.set_comment(comment);
        }
        writer.finish().unwrap().into_inner()
    }
}

/// Flips one byte of the first occurrence of `needle`, leaving the entry's
/// recorded checksum stale
pub fn corrupt(bytes: &mut [u8], needle: &[u8]) {
    let at = bytes
        .windows(needle.len())
        .position(|w| w == needle)
        .expect("needle not found in archive");
    bytes[at] ^= 0x20;
}
