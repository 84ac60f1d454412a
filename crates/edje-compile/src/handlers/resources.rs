//! File-level resource tables: externals, images and sets, fonts, data
//! items, styles, color classes.

use crate::build::Build;
use edc_parse::{Args, Diag, Pos};
use edje_config::SearchPaths;
use edje_model::file::{FontEntry, ImageEntry, ImageSet, ImageSource, SetEntry, Style, StyleTag};
use edje_model::file::{ColorClass, STYLE_BASE_KEY};
use edje_model::group::DataItem;
use edje_model::types::{ImageId, SetId};
use tracing::warn;

pub fn st_externals_external(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let name = b.pool.intern(a.str(0)?);
    if b.file.externals.iter().any(|e| *e == name) {
        return Ok(());
    }
    b.file.externals.push(name);
    Ok(())
}

/// `image: "file.png" COMP;` — also reached through every `images` alias
/// and from inside `set` blocks. De-duplicates by path, assigning dense
/// ids in declaration order.
pub fn st_images_image(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect_min(2)?;
    let path = b.pool.intern(a.str(0)?);
    if b.file.image_by_path(&path).is_some() {
        return Ok(());
    }
    let source = match a.enum_(1, &[("RAW", 0u8), ("COMP", 1), ("LOSSY", 2), ("USER", 3)])? {
        0 => ImageSource::InlinePerfect { compress: false },
        1 => ImageSource::InlinePerfect { compress: true },
        2 => {
            let quality = a.int_range(2, 0, 100)? as u8;
            a.expect(3)?;
            ImageSource::InlineLossy { quality }
        }
        _ => ImageSource::External,
    };
    if !matches!(source, ImageSource::InlineLossy { .. }) {
        a.expect(2)?;
    }
    let id = ImageId::from(b.file.images.len());
    b.image_decl.insert(id.0, a.pos.clone());
    b.file.images.push(ImageEntry { path, id, source });
    Ok(())
}

pub fn ob_images_set(b: &mut Build, _pos: &Pos) -> Result<(), Diag> {
    let id = SetId::from(b.file.sets.len());
    b.file.sets.push(ImageSet {
        name: None,
        id,
        entries: Vec::new(),
    });
    b.cur.set = Some(id.index());
    Ok(())
}

pub fn st_images_set_name(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let name = b.pool.intern(a.str(0)?);
    b.set_mut(&a.pos)?.name = Some(name);
    Ok(())
}

pub fn ob_images_set_image(b: &mut Build, pos: &Pos) -> Result<(), Diag> {
    b.set_mut(pos)?.entries.push(SetEntry::new());
    Ok(())
}

/// The inline form also feeds the global image table, so a set member and
/// a plain `image:` of the same file share one id.
pub fn st_images_set_image_image(b: &mut Build, a: &Args) -> Result<(), Diag> {
    st_images_image(b, a)?;
    let path = b.pool.intern(a.str(0)?);
    let id = b
        .file
        .image_by_path(&path)
        .expect("global image entry just added");
    let set = b.set_mut(&a.pos)?;
    let entry = set.entries.last_mut().ok_or_else(|| {
        Diag::context(a.pos.clone(), "image attributes outside a set image block")
    })?;
    entry.path = Some(path);
    entry.image = Some(id);
    Ok(())
}

pub fn st_images_set_image_size(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(4)?;
    let min = (a.int(0)?, a.int(1)?);
    let max = (a.int(2)?, a.int(3)?);
    if min.0 > max.0 || min.1 > max.1 {
        return Err(Diag::range(
            a.pos.clone(),
            format!(
                "Image min and max size are not in the right order ([{}, {}] < [{}, {}])",
                min.0, min.1, max.0, max.1
            ),
        ));
    }
    let set = b.set_mut(&a.pos)?;
    let entry = set.entries.last_mut().ok_or_else(|| {
        Diag::context(a.pos.clone(), "size attributes outside a set image block")
    })?;
    entry.min = min;
    entry.max = max;
    Ok(())
}

/// `font: "file.ttf" "alias";` — silently de-duplicated by alias.
pub fn st_fonts_font(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(2)?;
    let file = b.pool.intern(a.str(0)?);
    let alias = b.pool.intern(a.str(1)?);
    if let Some(existing) = b.file.fonts.iter().find(|f| f.alias == alias) {
        if existing.file != file {
            warn!(
                alias = alias.as_str(),
                kept = existing.file.as_str(),
                ignored = file.as_str(),
                "font alias redeclared with a different file"
            );
        }
        return Ok(());
    }
    b.font_decl.insert(alias.to_string(), a.pos.clone());
    b.file.fonts.push(FontEntry { file, alias });
    Ok(())
}

pub fn st_data_item(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(2)?;
    let key = b.pool.intern(a.str(0)?);
    b.file.data.push(DataItem {
        key,
        value: a.str(1)?.to_string(),
    });
    Ok(())
}

/// `file: "key" "payload.txt";` slurps a UTF-8 text file into the item's
/// value at parse time. Binary content is a hard error.
pub fn st_data_file(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(2)?;
    let key = b.pool.intern(a.str(0)?);
    let filename = a.str(1)?;
    let path = SearchPaths::find(&b.opts.paths.data_dirs, filename).ok_or_else(|| {
        Diag::resource(
            a.pos.clone(),
            format!("when opening file \"{filename}\": not found"),
        )
    })?;
    let bytes = std::fs::read(&path).map_err(|e| {
        Diag::resource(
            a.pos.clone(),
            format!("when opening file \"{filename}\": {e}"),
        )
    })?;
    if bytes.contains(&0) {
        return Err(Diag::resource(
            a.pos.clone(),
            format!("file \"{filename}\" is a binary file"),
        ));
    }
    let value = String::from_utf8(bytes).map_err(|_| {
        Diag::resource(
            a.pos.clone(),
            format!("file \"{filename}\" is not plain utf-8 text"),
        )
    })?;
    b.file.data.push(DataItem { key, value });
    Ok(())
}

pub fn ob_styles_style(b: &mut Build, _pos: &Pos) -> Result<(), Diag> {
    b.file.styles.push(Style {
        name: None,
        tags: Vec::new(),
    });
    b.cur.style = Some(b.file.styles.len() - 1);
    Ok(())
}

pub fn st_styles_style_name(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let name = b.pool.intern(a.str(0)?);
    let idx = b.cur.style;
    let clash = b
        .file
        .styles
        .iter()
        .enumerate()
        .any(|(i, s)| Some(i) != idx && s.name.as_ref() == Some(&name));
    if clash {
        return Err(Diag::uniqueness(
            a.pos.clone(),
            format!("There is already a style named \"{name}\""),
        ));
    }
    b.style_mut(&a.pos)?.name = Some(name);
    Ok(())
}

pub fn st_styles_style_base(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let base = a.str(0)?.to_string();
    let key = b.pool.intern(STYLE_BASE_KEY);
    let style = b.style_mut(&a.pos)?;
    if !style.tags.is_empty() {
        return Err(Diag::semantic(
            a.pos.clone(),
            "There is already a basic format for the style",
        ));
    }
    style.tags.push(StyleTag { key, value: base });
    Ok(())
}

pub fn st_styles_style_tag(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(2)?;
    let key = b.pool.intern(a.str(0)?);
    let value = a.str(1)?.to_string();
    b.style_mut(&a.pos)?.tags.push(StyleTag { key, value });
    Ok(())
}

pub fn ob_color_class(b: &mut Build, _pos: &Pos) -> Result<(), Diag> {
    b.file.color_classes.push(ColorClass::new());
    b.cur.color_class = Some(b.file.color_classes.len() - 1);
    Ok(())
}

pub fn st_color_class_name(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let name = b.pool.intern(a.str(0)?);
    let idx = b.cur.color_class;
    let clash = b
        .file
        .color_classes
        .iter()
        .enumerate()
        .any(|(i, c)| Some(i) != idx && c.name.as_ref() == Some(&name));
    if clash {
        return Err(Diag::uniqueness(
            a.pos.clone(),
            format!("There is already a color class named \"{name}\""),
        ));
    }
    b.color_class_mut(&a.pos)?.name = Some(name);
    Ok(())
}

fn color_class_color(b: &mut Build, a: &Args, which: u8) -> Result<(), Diag> {
    a.expect(4)?;
    let color = edje_model::types::Color::rgba(
        a.int_range(0, 0, 255)? as u8,
        a.int_range(1, 0, 255)? as u8,
        a.int_range(2, 0, 255)? as u8,
        a.int_range(3, 0, 255)? as u8,
    );
    let cc = b.color_class_mut(&a.pos)?;
    match which {
        0 => cc.color = color,
        1 => cc.color2 = color,
        _ => cc.color3 = color,
    }
    Ok(())
}

pub fn st_color_class_color(b: &mut Build, a: &Args) -> Result<(), Diag> {
    color_class_color(b, a, 0)
}

pub fn st_color_class_color2(b: &mut Build, a: &Args) -> Result<(), Diag> {
    color_class_color(b, a, 1)
}

pub fn st_color_class_color3(b: &mut Build, a: &Args) -> Result<(), Diag> {
    color_class_color(b, a, 2)
}
