//! Resource import: pull referenced image and font files off disk and
//! into the artifact.
//!
//! Images are decoded to pixels and re-encoded per the declared policy:
//! RAW stores bare RGBA under a small dimensions header, COMP re-encodes
//! losslessly as PNG, LOSSY as JPEG with the declared quality. USER
//! entries stay external and contribute no blob. Fonts travel verbatim.
//! Any I/O or codec failure aborts the compilation, pointing back at the
//! declaring statement.

use crate::build::Build;
use edc_parse::{Diag, Pos};
use edje_container::{BlobWriter, EntryWriter};
use edje_config::SearchPaths;
use edje_model::ImageSource;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::ImageEncoder;
use std::sync::Arc;
use tracing::debug;

/// Pixel payload tags inside `images/<id>` entries.
pub const PIXELS_RAW: u8 = 0;
pub const PIXELS_PNG: u8 = 1;
pub const PIXELS_JPEG: u8 = 2;

fn decl_pos(b: &Build, id: u32) -> Pos {
    b.image_decl.get(&id).cloned().unwrap_or_else(|| {
        let file: Arc<str> = Arc::from("<input>");
        Pos::new(&file, 0)
    })
}

pub fn import_images(b: &Build, store: &mut BlobWriter) -> Result<(), Diag> {
    for entry in &b.file.images {
        let pos = decl_pos(b, entry.id.0);
        let (tag, quality) = match entry.source {
            ImageSource::External => continue,
            ImageSource::InlinePerfect { compress: false } => (PIXELS_RAW, 0),
            ImageSource::InlinePerfect { compress: true } => (PIXELS_PNG, 0),
            ImageSource::InlineLossy { quality } => (PIXELS_JPEG, quality),
        };
        let path = SearchPaths::find(&b.opts.paths.image_dirs, &entry.path).ok_or_else(|| {
            Diag::resource(
                pos.clone(),
                format!("unable to open image file \"{}\"", entry.path),
            )
        })?;
        let decoded = image::open(&path).map_err(|e| {
            Diag::resource(
                pos.clone(),
                format!("unable to decode image file \"{}\": {e}", entry.path),
            )
        })?;
        let rgba = decoded.to_rgba8();
        let (w, h) = rgba.dimensions();

        let mut payload = EntryWriter::new();
        payload.u8(tag);
        payload.u32(w);
        payload.u32(h);
        let mut pixels: Vec<u8> = Vec::new();
        let encode_err = |e: image::ImageError| {
            Diag::resource(
                pos.clone(),
                format!("unable to encode image \"{}\": {e}", entry.path),
            )
        };
        match tag {
            PIXELS_RAW => pixels.extend_from_slice(rgba.as_raw()),
            PIXELS_PNG => {
                PngEncoder::new(&mut pixels)
                    .write_image(rgba.as_raw(), w, h, image::ExtendedColorType::Rgba8)
                    .map_err(encode_err)?;
            }
            _ => {
                // JPEG carries no alpha channel; flatten first.
                let rgb = decoded.to_rgb8();
                JpegEncoder::new_with_quality(&mut pixels, quality)
                    .write_image(rgb.as_raw(), w, h, image::ExtendedColorType::Rgb8)
                    .map_err(encode_err)?;
            }
        }
        payload.bytes(&pixels);
        let key = format!("images/{}", entry.id.0);
        store
            .insert(&key, &payload.into_bytes())
            .map_err(|e| Diag::resource(pos.clone(), e.to_string()))?;
        debug!(image = entry.path.as_str(), key = key.as_str(), "image imported");
    }
    Ok(())
}

pub fn import_fonts(b: &Build, store: &mut BlobWriter) -> Result<(), Diag> {
    for font in &b.file.fonts {
        let pos = b
            .font_decl
            .get(font.alias.as_str())
            .cloned()
            .unwrap_or_else(|| {
                let file: Arc<str> = Arc::from("<input>");
                Pos::new(&file, 0)
            });
        let path = SearchPaths::find(&b.opts.paths.font_dirs, &font.file).ok_or_else(|| {
            Diag::resource(
                pos.clone(),
                format!("unable to open font file \"{}\"", font.file),
            )
        })?;
        let bytes = std::fs::read(&path).map_err(|e| {
            Diag::resource(
                pos.clone(),
                format!("unable to read font file \"{}\": {e}", font.file),
            )
        })?;
        store
            .insert(&format!("fonts/{}", font.alias), &bytes)
            .map_err(|e| Diag::resource(pos.clone(), e.to_string()))?;
        debug!(font = font.alias.as_str(), "font imported");
    }
    Ok(())
}
