//! Artifact writer and reader.
//!
//! Key layout: `edje_file` (header + tables + collection directory),
//! `collections/<id>` per group, `scripts/<id>` / `lua_scripts/<id>` for
//! embedded script text, `images/<id>` and `fonts/<alias>` for imported
//! resources, `edje_sources` for the regenerated canonical source.

use crate::build::Build;
use crate::{import, sources};
use edc_parse::{Diag, Pos};
use edje_container::{BlobReader, BlobWriter, ContainerError, EntryReader, EntryWriter};
use edje_model::group::ScriptKind;
use edje_model::{codec, Interner, ThemeFile};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

pub const KEY_HEADER: &str = "edje_file";
pub const KEY_SOURCES: &str = "edje_sources";

fn output_pos(output: &Path) -> Pos {
    let file: Arc<str> = Arc::from(output.display().to_string().as_str());
    Pos::new(&file, 0)
}

fn io_diag(output: &Path, e: ContainerError) -> Diag {
    Diag::resource(output_pos(output), e.to_string())
}

/// Serialize the whole build into `output`. The container stages to a
/// temp file, so an existing artifact survives any failure here.
pub fn write_artifact(b: &Build, output: &Path) -> Result<(), Diag> {
    let mut store = BlobWriter::create(output).map_err(|e| io_diag(output, e))?;

    store
        .insert(KEY_HEADER, &codec::encode_header(&b.file))
        .map_err(|e| io_diag(output, e))?;

    for group in &b.file.groups {
        store
            .insert(
                &format!("collections/{}", group.id.0),
                &codec::encode_group(group),
            )
            .map_err(|e| io_diag(output, e))?;
        if !group.script.is_empty() {
            let key = match group.script.kind {
                Some(ScriptKind::Lua) => format!("lua_scripts/{}", group.id.0),
                _ => format!("scripts/{}", group.id.0),
            };
            store
                .insert(&key, &codec::encode_script(&group.script))
                .map_err(|e| io_diag(output, e))?;
        }
    }

    import::import_images(b, &mut store)?;
    import::import_fonts(b, &mut store)?;

    if b.opts.embed_sources {
        let text = sources::generate(&b.file);
        let mut w = EntryWriter::new();
        w.seq(1);
        w.str("generated.edc");
        w.bytes(text.as_bytes());
        store
            .insert(KEY_SOURCES, &w.into_bytes())
            .map_err(|e| io_diag(output, e))?;
    }

    store.finish().map_err(|e| io_diag(output, e))?;
    info!(output = %output.display(), "artifact complete");
    Ok(())
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error("artifact is missing entry \"{0}\"")]
    MissingEntry(String),
}

/// Load an artifact back into a model. Resource blobs stay in the
/// container; the editing layer copies them through on save.
pub fn read_artifact(path: &Path) -> Result<(ThemeFile, Interner), ReadError> {
    let reader = BlobReader::open(path)?;
    read_model(&reader)
}

/// Decode the model out of an open container.
pub fn read_model(reader: &BlobReader) -> Result<(ThemeFile, Interner), ReadError> {
    let mut pool = Interner::new();
    let header = reader
        .get(KEY_HEADER)
        .ok_or_else(|| ReadError::MissingEntry(KEY_HEADER.to_string()))?;
    let (mut file, directory) = codec::decode_header(header, &mut pool)?;

    for (_, id) in &directory {
        let key = format!("collections/{}", id.0);
        let bytes = reader
            .get(&key)
            .ok_or_else(|| ReadError::MissingEntry(key.clone()))?;
        let mut group = codec::decode_group(bytes, &mut pool)?;

        let embryo = format!("scripts/{}", id.0);
        let lua = format!("lua_scripts/{}", id.0);
        if let Some(bytes) = reader.get(&embryo) {
            group.script = codec::decode_script(bytes, ScriptKind::Embryo)?;
        } else if let Some(bytes) = reader.get(&lua) {
            group.script = codec::decode_script(bytes, ScriptKind::Lua)?;
        }
        file.groups.push(group);
    }
    Ok((file, pool))
}

/// Decode the regenerated source list, `(name, text)` pairs.
pub fn read_sources(reader: &BlobReader) -> Result<Vec<(String, String)>, ReadError> {
    let Some(bytes) = reader.get(KEY_SOURCES) else {
        return Ok(Vec::new());
    };
    let mut r = EntryReader::new(bytes, "edje_sources");
    let mut out = Vec::new();
    for _ in 0..r.seq()? {
        let name = r.str()?;
        let body = r.bytes()?;
        out.push((
            name,
            std::str::from_utf8(body)
                .map_err(|_| ContainerError::BadUtf8)?
                .to_string(),
        ));
    }
    Ok(out)
}
