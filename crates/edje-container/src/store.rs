//! Single-file blob store: a flat list of length-prefixed entries followed
//! by a key directory and a fixed-size trailer pointing back at it.
//!
//! Layout:
//! ```text
//!   magic (4) | format version (4)
//!   entry payloads, back to back
//!   directory: count (4), then per entry key-len (4) key-bytes offset (8) len (8)
//!   trailer: directory offset (8) | magic (4)
//! ```

use crate::{ContainerError, Result};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const MAGIC: u32 = 0x45444a42; // "EDJB"
const FORMAT_VERSION: u32 = 1;

fn io_err(path: &Path, source: std::io::Error) -> ContainerError {
    ContainerError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Write side of the store. Entries accumulate into a temp file next to the
/// destination; nothing observable happens at the final path until
/// [`BlobWriter::finish`] succeeds.
pub struct BlobWriter {
    dest: PathBuf,
    tmp: PathBuf,
    file: Option<File>,
    // BTreeMap keeps directory order stable so byte-identical reruns produce
    // byte-identical artifacts.
    dir: BTreeMap<String, (u64, u64)>,
    cursor: u64,
}

impl BlobWriter {
    pub fn create(dest: impl AsRef<Path>) -> Result<Self> {
        let dest = dest.as_ref().to_path_buf();
        let mut tmp = dest.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        let mut file = File::create(&tmp).map_err(|e| io_err(&tmp, e))?;
        file.write_all(&MAGIC.to_le_bytes())
            .and_then(|_| file.write_all(&FORMAT_VERSION.to_le_bytes()))
            .map_err(|e| io_err(&tmp, e))?;
        Ok(Self {
            dest,
            tmp,
            file: Some(file),
            dir: BTreeMap::new(),
            cursor: 8,
        })
    }

    /// Store `bytes` under `key`. Keys must be unique within one artifact.
    pub fn insert(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        if self.dir.contains_key(key) {
            return Err(ContainerError::DuplicateKey(key.to_string()));
        }
        let file = self.file.as_mut().expect("writer already finished");
        file.write_all(bytes).map_err(|e| io_err(&self.tmp, e))?;
        self.dir
            .insert(key.to_string(), (self.cursor, bytes.len() as u64));
        self.cursor += bytes.len() as u64;
        Ok(())
    }

    /// Write the directory and trailer, sync, and move the temp file over
    /// the destination.
    pub fn finish(mut self) -> Result<()> {
        let mut file = self.file.take().expect("writer already finished");
        let dir_off = self.cursor;
        let mut out: Vec<u8> = Vec::new();
        out.extend_from_slice(&(self.dir.len() as u32).to_le_bytes());
        for (key, (off, len)) in &self.dir {
            out.extend_from_slice(&(key.len() as u32).to_le_bytes());
            out.extend_from_slice(key.as_bytes());
            out.extend_from_slice(&off.to_le_bytes());
            out.extend_from_slice(&len.to_le_bytes());
        }
        out.extend_from_slice(&dir_off.to_le_bytes());
        out.extend_from_slice(&MAGIC.to_le_bytes());
        file.write_all(&out)
            .and_then(|_| file.sync_all())
            .map_err(|e| io_err(&self.tmp, e))?;
        drop(file);
        fs::rename(&self.tmp, &self.dest).map_err(|e| io_err(&self.dest, e))?;
        debug!(dest = %self.dest.display(), entries = self.dir.len(), "artifact written");
        Ok(())
    }
}

impl Drop for BlobWriter {
    fn drop(&mut self) {
        // Abandoned writer: remove the temp file, leave the destination alone.
        if self.file.take().is_some() {
            let _ = fs::remove_file(&self.tmp);
        }
    }
}

/// Read side. The whole artifact is pulled into memory; themes are small
/// relative to the images they embed and the editing API wants random
/// access to every entry anyway.
pub struct BlobReader {
    data: Vec<u8>,
    dir: BTreeMap<String, (u64, u64)>,
}

impl BlobReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| io_err(path, e))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data).map_err(|e| io_err(path, e))?;
        drop(file);
        let name = path.display().to_string();
        if data.len() < 20 || data[0..4] != MAGIC.to_le_bytes() {
            return Err(ContainerError::BadMagic(name));
        }
        let version = u32::from_le_bytes(data[4..8].try_into().unwrap());
        if version != FORMAT_VERSION {
            return Err(ContainerError::BadVersion {
                path: name,
                found: version,
            });
        }
        let tail = data.len() - 12;
        if data[tail + 8..] != MAGIC.to_le_bytes() {
            return Err(ContainerError::BadMagic(name));
        }
        let dir_off = u64::from_le_bytes(data[tail..tail + 8].try_into().unwrap()) as usize;
        if dir_off + 4 > tail {
            return Err(ContainerError::Truncated("directory"));
        }
        let mut p = dir_off;
        let count = u32::from_le_bytes(data[p..p + 4].try_into().unwrap());
        p += 4;
        let mut dir = BTreeMap::new();
        for _ in 0..count {
            if p + 4 > tail {
                return Err(ContainerError::Truncated("directory"));
            }
            let klen = u32::from_le_bytes(data[p..p + 4].try_into().unwrap()) as usize;
            p += 4;
            if p + klen + 16 > tail {
                return Err(ContainerError::Truncated("directory"));
            }
            let key = std::str::from_utf8(&data[p..p + klen])
                .map_err(|_| ContainerError::BadUtf8)?
                .to_string();
            p += klen;
            let off = u64::from_le_bytes(data[p..p + 8].try_into().unwrap());
            p += 8;
            let len = u64::from_le_bytes(data[p..p + 8].try_into().unwrap());
            p += 8;
            if off + len > dir_off as u64 {
                return Err(ContainerError::Truncated("entry"));
            }
            dir.insert(key, (off, len));
        }
        Ok(Self { data, dir })
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.dir
            .get(key)
            .map(|&(off, len)| &self.data[off as usize..(off + len) as usize])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.dir.contains_key(key)
    }

    /// All keys in directory order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.dir.keys().map(|k| k.as_str())
    }

    /// Keys under a `prefix/` namespace.
    pub fn keys_under<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.keys().filter(move |k| {
            k.strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, SeekFrom};

    #[test]
    fn round_trips_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.edj");
        let mut w = BlobWriter::create(&path).unwrap();
        w.insert("edje_file", b"header").unwrap();
        w.insert("collections/0", b"group zero").unwrap();
        w.insert("collections/1", b"").unwrap();
        w.finish().unwrap();

        let r = BlobReader::open(&path).unwrap();
        assert_eq!(r.get("edje_file"), Some(&b"header"[..]));
        assert_eq!(r.get("collections/0"), Some(&b"group zero"[..]));
        assert_eq!(r.get("collections/1"), Some(&b""[..]));
        assert_eq!(r.get("collections/2"), None);
        assert_eq!(r.keys_under("collections").count(), 2);
    }

    #[test]
    fn duplicate_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = BlobWriter::create(dir.path().join("t.edj")).unwrap();
        w.insert("k", b"a").unwrap();
        assert!(matches!(
            w.insert("k", b"b"),
            Err(ContainerError::DuplicateKey(_))
        ));
    }

    #[test]
    fn abandoned_writer_preserves_existing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.edj");
        let mut w = BlobWriter::create(&path).unwrap();
        w.insert("edje_file", b"good").unwrap();
        w.finish().unwrap();

        // Start a second write and drop it mid-way.
        let mut w = BlobWriter::create(&path).unwrap();
        w.insert("edje_file", b"partial").unwrap();
        drop(w);

        let r = BlobReader::open(&path).unwrap();
        assert_eq!(r.get("edje_file"), Some(&b"good"[..]));
        assert!(!path.with_extension("edj.tmp").exists());
    }

    #[test]
    fn garbage_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-artifact");
        std::fs::write(&path, b"plain text, nothing else").unwrap();
        assert!(matches!(
            BlobReader::open(&path),
            Err(ContainerError::BadMagic(_))
        ));
    }

    #[test]
    fn truncated_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.edj");
        let mut w = BlobWriter::create(&path).unwrap();
        w.insert("edje_file", b"header").unwrap();
        w.finish().unwrap();

        // Corrupt the directory offset in the trailer.
        let mut f = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .unwrap();
        let len = f.metadata().unwrap().len();
        f.seek(SeekFrom::Start(len - 12)).unwrap();
        f.write_all(&(len * 2).to_le_bytes()).unwrap();
        drop(f);
        assert!(BlobReader::open(&path).is_err());
    }
}
