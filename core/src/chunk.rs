//! Sectioned binary files and atomic persistence.
//!
//! Every table in the system and user directories is a `MemoryChunk` on
//! disk: a fixed header identifying the library format, followed by
//! length-prefixed opaque sections. The chunk does not interpret section
//! contents; each table decides what lives in which section.
//!
//! Saves are atomic: the chunk is written to `<name>.tmp`, fsynced, and
//! renamed over the canonical path, so a crash never leaves a
//! half-written table behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::errors::{HanyuError, Result};
use crate::FORMAT_VERSION;

const CHUNK_MAGIC: &[u8; 8] = b"HANYUTBL";

/// FNV-1a over the format version string; stored in every chunk header so
/// stale binaries are rejected before any section is decoded.
fn format_tag() -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for &b in FORMAT_VERSION.as_bytes() {
        hash ^= u32::from(b);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

/// An owned, sectioned byte region loaded from or destined for disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryChunk {
    sections: Vec<Vec<u8>>,
}

impl MemoryChunk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_section(&mut self, bytes: Vec<u8>) {
        self.sections.push(bytes);
    }

    pub fn section(&self, idx: usize) -> Option<&[u8]> {
        self.sections.get(idx).map(Vec::as_slice)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Load a chunk, verifying magic and format tag.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        Self::parse(&data).ok_or_else(|| HanyuError::FormatMismatch(path.to_path_buf()))
    }

    fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < 16 || &data[0..8] != CHUNK_MAGIC {
            return None;
        }
        let tag = u32::from_ne_bytes(data[8..12].try_into().ok()?);
        if tag != format_tag() {
            return None;
        }
        let count = u32::from_ne_bytes(data[12..16].try_into().ok()?) as usize;
        let mut sections = Vec::with_capacity(count);
        let mut pos = 16usize;
        for _ in 0..count {
            let len = u64::from_ne_bytes(data.get(pos..pos + 8)?.try_into().ok()?) as usize;
            pos += 8;
            sections.push(data.get(pos..pos + len)?.to_vec());
            pos += len;
        }
        Some(Self { sections })
    }

    /// Serialize and atomically persist the chunk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut out =
            Vec::with_capacity(16 + self.sections.iter().map(|s| 8 + s.len()).sum::<usize>());
        out.extend_from_slice(CHUNK_MAGIC);
        out.extend_from_slice(&format_tag().to_ne_bytes());
        out.extend_from_slice(&(self.sections.len() as u32).to_ne_bytes());
        for section in &self.sections {
            out.extend_from_slice(&(section.len() as u64).to_ne_bytes());
            out.extend_from_slice(section);
        }
        atomic_write(path.as_ref(), &out)
    }
}

/// Write `bytes` to `<path>.tmp`, fsync, then rename over `path`.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), len = bytes.len(), "table saved");
    Ok(())
}

fn tmp_path(path: &Path) -> std::path::PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.bin");

        let mut chunk = MemoryChunk::new();
        chunk.push_section(b"alpha".to_vec());
        chunk.push_section(vec![]);
        chunk.push_section(b"gamma".to_vec());
        chunk.save(&path).unwrap();

        let loaded = MemoryChunk::load(&path).unwrap();
        assert_eq!(loaded.section_count(), 3);
        assert_eq!(loaded.section(0), Some(&b"alpha"[..]));
        assert_eq!(loaded.section(1), Some(&b""[..]));
        assert_eq!(loaded.section(2), Some(&b"gamma"[..]));
        // tmp file must not survive a successful save
        assert!(!dir.path().join("table.bin.tmp").exists());
    }

    #[test]
    fn garbage_is_format_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.bin");
        std::fs::write(&path, b"not a chunk at all").unwrap();
        match MemoryChunk::load(&path) {
            Err(HanyuError::FormatMismatch(p)) => assert_eq!(p, path),
            other => panic!("expected format mismatch, got {:?}", other),
        }
    }
}
