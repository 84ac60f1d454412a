//! Key-addressed blob container backing compiled theme artifacts.
//!
//! An artifact is a single file holding named entries (`edje_file`,
//! `collections/<id>`, `images/<id>`, ...). The writer stages everything in
//! a sibling temp file and renames it into place on `finish`, so a failed
//! compile never clobbers a previously good artifact. The reader maps keys
//! to byte ranges; entry payloads are decoded with the typed codec in
//! [`entry`].

mod entry;
mod store;

pub use entry::{EntryReader, EntryWriter};
pub use store::{BlobReader, BlobWriter};

use thiserror::Error;

/// Errors raised by the container layer.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("i/o error on container \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("\"{0}\" is not an artifact (bad magic)")]
    BadMagic(String),
    #[error("artifact \"{path}\" uses unsupported format version {found}")]
    BadVersion { path: String, found: u32 },
    #[error("duplicate entry key \"{0}\"")]
    DuplicateKey(String),
    #[error("truncated entry while reading {0}")]
    Truncated(&'static str),
    #[error("bad tag value {value} while reading {what}")]
    BadTag { what: &'static str, value: u32 },
    #[error("entry holds malformed utf-8 text")]
    BadUtf8,
}

pub type Result<T> = std::result::Result<T, ContainerError>;
