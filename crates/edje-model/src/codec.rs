//! Binary encoding of the model into container entries.
//!
//! Encode and decode are strictly positional mirrors of each other; the
//! round-trip suite in the serializer crate keeps them honest. Decoding
//! re-interns every name through the caller's pool.

use crate::desc::{
    BoxState, Description, ExternalParam, FillState, ImageState, MapState, ParamValue,
    PerspectiveState, Rel, StateId, TableState, TextState,
};
use crate::file::{
    ColorClass, FontEntry, GroupAlias, ImageEntry, ImageSet, ImageSource, SetEntry, Spectrum,
    Style, StyleTag, ThemeFile,
};
use crate::group::{DataItem, Group, ScriptBlock, ScriptKind};
use crate::intern::{Interner, Name};
use crate::part::{Dragable, PackItem, Part};
use crate::program::{Action, Filter, Program, TargetRef};
use crate::types::{
    Api, AspectMode, AspectPrefer, Color, EntryMode, EventFlags, FillType, GroupId, ImageId,
    ImageRef, MiddlePolicy, PartId, PartType, PointerMode, ProgramId, ScaleHint, SelectMode,
    SetId, TableHomogeneous, TextEffect, TweenMode,
};
use edje_container::{ContainerError, EntryReader, EntryWriter, Result};

// ---------------------------------------------------------------------------
// small helpers
// ---------------------------------------------------------------------------

fn put_name(w: &mut EntryWriter, n: Option<&Name>) {
    w.opt_str(n.map(|n| n.as_str()));
}

fn get_name(r: &mut EntryReader<'_>, pool: &mut Interner) -> Result<Option<Name>> {
    Ok(r.opt_str()?.map(|s| pool.intern(&s)))
}

fn get_req_name(r: &mut EntryReader<'_>, pool: &mut Interner) -> Result<Name> {
    Ok(pool.intern(&r.str()?))
}

fn put_color(w: &mut EntryWriter, c: Color) {
    w.u8(c.r);
    w.u8(c.g);
    w.u8(c.b);
    w.u8(c.a);
}

fn get_color(r: &mut EntryReader<'_>) -> Result<Color> {
    Ok(Color::rgba(r.u8()?, r.u8()?, r.u8()?, r.u8()?))
}

fn put_part_ref(w: &mut EntryWriter, p: Option<PartId>) {
    w.id(p.map(|p| p.0));
}

fn get_part_ref(r: &mut EntryReader<'_>) -> Result<Option<PartId>> {
    Ok(r.id()?.map(PartId))
}

fn put_image_ref(w: &mut EntryWriter, i: Option<ImageRef>) {
    match i {
        None => w.u8(0),
        Some(ImageRef::Image(id)) => {
            w.u8(1);
            w.u32(id.0);
        }
        Some(ImageRef::Set(id)) => {
            w.u8(2);
            w.u32(id.0);
        }
    }
}

fn get_image_ref(r: &mut EntryReader<'_>) -> Result<Option<ImageRef>> {
    Ok(match r.u8()? {
        0 => None,
        1 => Some(ImageRef::Image(ImageId(r.u32()?))),
        2 => Some(ImageRef::Set(SetId(r.u32()?))),
        value => {
            return Err(ContainerError::BadTag {
                what: "image ref",
                value: value as u32,
            });
        }
    })
}

fn put_pair_i32(w: &mut EntryWriter, p: (i32, i32)) {
    w.i32(p.0);
    w.i32(p.1);
}

fn get_pair_i32(r: &mut EntryReader<'_>) -> Result<(i32, i32)> {
    Ok((r.i32()?, r.i32()?))
}

fn put_pair_f64(w: &mut EntryWriter, p: (f64, f64)) {
    w.f64(p.0);
    w.f64(p.1);
}

fn get_pair_f64(r: &mut EntryReader<'_>) -> Result<(f64, f64)> {
    Ok((r.f64()?, r.f64()?))
}

fn put_pair_bool(w: &mut EntryWriter, p: (bool, bool)) {
    w.bool(p.0);
    w.bool(p.1);
}

fn get_pair_bool(r: &mut EntryReader<'_>) -> Result<(bool, bool)> {
    Ok((r.bool()?, r.bool()?))
}

fn put_api(w: &mut EntryWriter, api: Option<&Api>) {
    match api {
        None => w.bool(false),
        Some(a) => {
            w.bool(true);
            w.str(&a.name);
            w.opt_str(a.description.as_deref());
        }
    }
}

fn get_api(r: &mut EntryReader<'_>) -> Result<Option<Api>> {
    Ok(if r.bool()? {
        Some(Api {
            name: r.str()?,
            description: r.opt_str()?,
        })
    } else {
        None
    })
}

// ---------------------------------------------------------------------------
// file header
// ---------------------------------------------------------------------------

/// Collection directory as stored in the header: `(name, id)` per group,
/// then the alias table.
pub fn encode_header(f: &ThemeFile) -> Vec<u8> {
    let mut w = EntryWriter::new();
    w.str(&f.compiler);
    w.u32(f.version);
    w.opt_str(f.fontset_append.as_deref());

    w.seq(f.images.len());
    for img in &f.images {
        w.str(&img.path);
        w.u32(img.id.0);
        match img.source {
            ImageSource::InlinePerfect { compress } => {
                w.u8(0);
                w.bool(compress);
            }
            ImageSource::InlineLossy { quality } => {
                w.u8(1);
                w.u8(quality);
            }
            ImageSource::External => w.u8(2),
        }
    }

    w.seq(f.sets.len());
    for set in &f.sets {
        put_name(&mut w, set.name.as_ref());
        w.u32(set.id.0);
        w.seq(set.entries.len());
        for e in &set.entries {
            put_name(&mut w, e.path.as_ref());
            w.id(e.image.map(|i| i.0));
            put_pair_i32(&mut w, e.min);
            put_pair_i32(&mut w, e.max);
        }
    }

    w.seq(f.fonts.len());
    for font in &f.fonts {
        w.str(&font.file);
        w.str(&font.alias);
    }

    w.seq(f.styles.len());
    for style in &f.styles {
        put_name(&mut w, style.name.as_ref());
        w.seq(style.tags.len());
        for tag in &style.tags {
            w.str(&tag.key);
            w.str(&tag.value);
        }
    }

    w.seq(f.color_classes.len());
    for cc in &f.color_classes {
        put_name(&mut w, cc.name.as_ref());
        put_color(&mut w, cc.color);
        put_color(&mut w, cc.color2);
        put_color(&mut w, cc.color3);
    }

    w.seq(f.externals.len());
    for ext in &f.externals {
        w.str(ext);
    }

    w.seq(f.spectra.len());
    for sp in &f.spectra {
        w.str(&sp.name);
        w.seq(sp.colors.len());
        for (color, weight) in &sp.colors {
            put_color(&mut w, *color);
            w.i32(*weight);
        }
    }

    w.seq(f.data.len());
    for item in &f.data {
        w.str(&item.key);
        w.str(&item.value);
    }

    w.seq(f.groups.len());
    for g in &f.groups {
        put_name(&mut w, g.name.as_ref());
        w.u32(g.id.0);
    }

    w.seq(f.aliases.len());
    for a in &f.aliases {
        w.str(&a.name);
        w.u32(a.id.0);
    }

    w.into_bytes()
}

/// Decode a header into a [`ThemeFile`] with an empty group list; the
/// caller fills groups from the per-collection entries. Returns the
/// directory `(name, id)` pairs so the loader can cross-check.
pub fn decode_header(
    bytes: &[u8],
    pool: &mut Interner,
) -> Result<(ThemeFile, Vec<(Option<Name>, GroupId)>)> {
    let mut r = EntryReader::new(bytes, "edje_file");
    let mut f = ThemeFile::new();
    f.compiler = r.str()?;
    f.version = r.u32()?;
    f.fontset_append = r.opt_str()?;

    for _ in 0..r.seq()? {
        let path = get_req_name(&mut r, pool)?;
        let id = ImageId(r.u32()?);
        let source = match r.u8()? {
            0 => ImageSource::InlinePerfect {
                compress: r.bool()?,
            },
            1 => ImageSource::InlineLossy { quality: r.u8()? },
            2 => ImageSource::External,
            value => {
                return Err(ContainerError::BadTag {
                    what: "image source",
                    value: value as u32,
                });
            }
        };
        f.images.push(ImageEntry { path, id, source });
    }

    for _ in 0..r.seq()? {
        let name = get_name(&mut r, pool)?;
        let id = SetId(r.u32()?);
        let mut entries = Vec::new();
        for _ in 0..r.seq()? {
            entries.push(SetEntry {
                path: get_name(&mut r, pool)?,
                image: r.id()?.map(ImageId),
                min: get_pair_i32(&mut r)?,
                max: get_pair_i32(&mut r)?,
            });
        }
        f.sets.push(ImageSet { name, id, entries });
    }

    for _ in 0..r.seq()? {
        f.fonts.push(FontEntry {
            file: get_req_name(&mut r, pool)?,
            alias: get_req_name(&mut r, pool)?,
        });
    }

    for _ in 0..r.seq()? {
        let name = get_name(&mut r, pool)?;
        let mut tags = Vec::new();
        for _ in 0..r.seq()? {
            tags.push(StyleTag {
                key: get_req_name(&mut r, pool)?,
                value: r.str()?,
            });
        }
        f.styles.push(Style { name, tags });
    }

    for _ in 0..r.seq()? {
        f.color_classes.push(ColorClass {
            name: get_name(&mut r, pool)?,
            color: get_color(&mut r)?,
            color2: get_color(&mut r)?,
            color3: get_color(&mut r)?,
        });
    }

    for _ in 0..r.seq()? {
        let name = get_req_name(&mut r, pool)?;
        f.externals.push(name);
    }

    for _ in 0..r.seq()? {
        let name = get_req_name(&mut r, pool)?;
        let mut colors = Vec::new();
        for _ in 0..r.seq()? {
            colors.push((get_color(&mut r)?, r.i32()?));
        }
        f.spectra.push(Spectrum { name, colors });
    }

    for _ in 0..r.seq()? {
        f.data.push(DataItem {
            key: get_req_name(&mut r, pool)?,
            value: r.str()?,
        });
    }

    let mut directory = Vec::new();
    for _ in 0..r.seq()? {
        let name = get_name(&mut r, pool)?;
        let id = GroupId(r.u32()?);
        directory.push((name, id));
    }

    for _ in 0..r.seq()? {
        f.aliases.push(GroupAlias {
            name: get_req_name(&mut r, pool)?,
            id: GroupId(r.u32()?),
        });
    }

    Ok((f, directory))
}

// ---------------------------------------------------------------------------
// groups
// ---------------------------------------------------------------------------

pub fn encode_group(g: &Group) -> Vec<u8> {
    let mut w = EntryWriter::new();
    put_name(&mut w, g.name.as_ref());
    w.u32(g.id.0);
    put_pair_i32(&mut w, g.min);
    put_pair_i32(&mut w, g.max);
    w.bool(g.script_only);
    w.bool(g.lua_script_only);

    w.seq(g.data.len());
    for item in &g.data {
        w.str(&item.key);
        w.str(&item.value);
    }

    w.seq(g.part_aliases.len());
    for (alias, real) in &g.part_aliases {
        w.str(alias);
        w.str(real);
    }

    w.seq(g.parts.len());
    for part in &g.parts {
        encode_part(&mut w, part);
    }

    w.seq(g.programs.len());
    for program in &g.programs {
        encode_program(&mut w, program);
    }

    w.into_bytes()
}

pub fn decode_group(bytes: &[u8], pool: &mut Interner) -> Result<Group> {
    let mut r = EntryReader::new(bytes, "collection");
    let name = get_name(&mut r, pool)?;
    let mut g = Group::new(GroupId(r.u32()?));
    g.name = name;
    g.min = get_pair_i32(&mut r)?;
    g.max = get_pair_i32(&mut r)?;
    g.script_only = r.bool()?;
    g.lua_script_only = r.bool()?;

    for _ in 0..r.seq()? {
        g.data.push(DataItem {
            key: get_req_name(&mut r, pool)?,
            value: r.str()?,
        });
    }

    for _ in 0..r.seq()? {
        let alias = get_req_name(&mut r, pool)?;
        let real = get_req_name(&mut r, pool)?;
        g.part_aliases.push((alias, real));
    }

    for _ in 0..r.seq()? {
        g.parts.push(decode_part(&mut r, pool)?);
    }

    for _ in 0..r.seq()? {
        g.programs.push(decode_program(&mut r, pool)?);
    }

    Ok(g)
}

// ---------------------------------------------------------------------------
// parts
// ---------------------------------------------------------------------------

fn encode_part(w: &mut EntryWriter, p: &Part) {
    put_name(w, p.name.as_ref());
    w.u32(p.id.0);
    w.u8(p.part_type as u8);
    w.u8(p.effect as u8);
    w.bool(p.mouse_events);
    w.bool(p.repeat_events);
    w.u32(p.ignore_flags.bits());
    w.bool(p.scale);
    w.u8(p.pointer_mode as u8);
    w.bool(p.precise_is_inside);
    w.bool(p.use_alternate_font_metrics);
    w.bool(p.multiline);
    w.u8(p.entry_mode as u8);
    w.u8(p.select_mode as u8);
    put_part_ref(w, p.clip_to);
    for source in [
        &p.source, &p.source2, &p.source3, &p.source4, &p.source5, &p.source6,
    ] {
        put_name(w, source.as_ref());
    }
    w.i32(p.dragable.x as i32);
    w.i32(p.dragable.step_x);
    w.i32(p.dragable.count_x);
    w.i32(p.dragable.y as i32);
    w.i32(p.dragable.step_y);
    w.i32(p.dragable.count_y);
    put_part_ref(w, p.dragable.confine);
    put_part_ref(w, p.dragable.events);
    put_api(w, p.api.as_ref());

    w.seq(p.descriptions.len());
    for d in &p.descriptions {
        encode_description(w, d);
    }

    w.seq(p.items.len());
    for item in &p.items {
        encode_item(w, item);
    }
}

fn decode_part(r: &mut EntryReader<'_>, pool: &mut Interner) -> Result<Part> {
    let name = get_name(r, pool)?;
    let mut p = Part::new(PartId(r.u32()?));
    p.name = name;
    p.part_type = r.tag("part type", PartType::from_u8)?;
    p.effect = r.tag("text effect", TextEffect::from_u8)?;
    p.mouse_events = r.bool()?;
    p.repeat_events = r.bool()?;
    p.ignore_flags = EventFlags::from_bits_truncate(r.u32()?);
    p.scale = r.bool()?;
    p.pointer_mode = r.tag("pointer mode", PointerMode::from_u8)?;
    p.precise_is_inside = r.bool()?;
    p.use_alternate_font_metrics = r.bool()?;
    p.multiline = r.bool()?;
    p.entry_mode = r.tag("entry mode", EntryMode::from_u8)?;
    p.select_mode = r.tag("select mode", SelectMode::from_u8)?;
    p.clip_to = get_part_ref(r)?;
    p.source = get_name(r, pool)?;
    p.source2 = get_name(r, pool)?;
    p.source3 = get_name(r, pool)?;
    p.source4 = get_name(r, pool)?;
    p.source5 = get_name(r, pool)?;
    p.source6 = get_name(r, pool)?;
    p.dragable = Dragable {
        x: r.i32()? as i8,
        step_x: r.i32()?,
        count_x: r.i32()?,
        y: r.i32()? as i8,
        step_y: r.i32()?,
        count_y: r.i32()?,
        confine: get_part_ref(r)?,
        events: get_part_ref(r)?,
    };
    p.api = get_api(r)?;

    for _ in 0..r.seq()? {
        p.descriptions.push(decode_description(r, pool)?);
    }
    for _ in 0..r.seq()? {
        p.items.push(decode_item(r, pool)?);
    }
    Ok(p)
}

fn encode_item(w: &mut EntryWriter, item: &PackItem) {
    put_name(w, item.name.as_ref());
    put_name(w, item.source.as_ref());
    put_pair_i32(w, item.min);
    put_pair_i32(w, item.prefer);
    put_pair_i32(w, item.max);
    w.i32(item.padding.0);
    w.i32(item.padding.1);
    w.i32(item.padding.2);
    w.i32(item.padding.3);
    put_pair_f64(w, item.align);
    put_pair_f64(w, item.weight);
    put_pair_i32(w, item.aspect);
    w.u8(item.aspect_mode as u8);
    w.opt_str(item.options.as_deref());
    w.i32(item.col);
    w.i32(item.row);
    w.i32(item.colspan);
    w.i32(item.rowspan);
}

fn decode_item(r: &mut EntryReader<'_>, pool: &mut Interner) -> Result<PackItem> {
    let mut item = PackItem::new();
    item.name = get_name(r, pool)?;
    item.source = get_name(r, pool)?;
    item.min = get_pair_i32(r)?;
    item.prefer = get_pair_i32(r)?;
    item.max = get_pair_i32(r)?;
    item.padding = (r.i32()?, r.i32()?, r.i32()?, r.i32()?);
    item.align = get_pair_f64(r)?;
    item.weight = get_pair_f64(r)?;
    item.aspect = get_pair_i32(r)?;
    item.aspect_mode = r.tag("aspect mode", AspectMode::from_u8)?;
    item.options = r.opt_str()?;
    item.col = r.i32()?;
    item.row = r.i32()?;
    item.colspan = r.i32()?;
    item.rowspan = r.i32()?;
    Ok(item)
}

// ---------------------------------------------------------------------------
// descriptions
// ---------------------------------------------------------------------------

fn encode_description(w: &mut EntryWriter, d: &Description) {
    put_name(w, d.state.name.as_ref());
    w.f64(d.state.value);
    w.bool(d.visible);
    put_pair_f64(w, d.align);
    put_pair_bool(w, d.fixed);
    put_pair_i32(w, d.min);
    put_pair_i32(w, d.max);
    put_pair_i32(w, d.step);
    put_pair_f64(w, d.aspect);
    w.u8(d.aspect_prefer as u8);
    for rel in [&d.rel1, &d.rel2] {
        put_pair_f64(w, rel.relative);
        put_pair_i32(w, rel.offset);
        put_part_ref(w, rel.to_x);
        put_part_ref(w, rel.to_y);
    }
    put_image_ref(w, d.image.normal);
    w.seq(d.image.tweens.len());
    for tween in &d.image.tweens {
        put_image_ref(w, *tween);
    }
    w.i32(d.image.border.0);
    w.i32(d.image.border.1);
    w.i32(d.image.border.2);
    w.i32(d.image.border.3);
    w.u8(d.image.middle as u8);
    w.bool(d.image.border_scale);
    w.u8(d.image.scale_hint as u8);
    w.bool(d.fill.smooth);
    put_pair_f64(w, d.fill.origin_rel);
    put_pair_i32(w, d.fill.origin_abs);
    put_pair_f64(w, d.fill.size_rel);
    put_pair_i32(w, d.fill.size_abs);
    w.u8(d.fill.fill_type as u8);
    w.i32(d.fill.angle);
    w.i32(d.fill.spread);
    put_name(w, d.color_class.as_ref());
    put_color(w, d.color);
    put_color(w, d.color2);
    put_color(w, d.color3);
    w.opt_str(d.text.text.as_deref());
    put_name(w, d.text.text_class.as_ref());
    put_name(w, d.text.font.as_ref());
    put_name(w, d.text.style.as_ref());
    w.opt_str(d.text.repch.as_deref());
    w.i32(d.text.size);
    put_pair_bool(w, d.text.fit);
    put_pair_bool(w, d.text.min);
    put_pair_bool(w, d.text.max);
    put_pair_f64(w, d.text.align);
    put_part_ref(w, d.text.source);
    put_part_ref(w, d.text.text_source);
    w.f64(d.text.elipsis);
    w.opt_str(d.box_.layout.as_deref());
    w.opt_str(d.box_.alt_layout.as_deref());
    put_pair_f64(w, d.box_.align);
    put_pair_i32(w, d.box_.padding);
    put_pair_bool(w, d.box_.min);
    w.u8(d.table.homogeneous as u8);
    put_pair_f64(w, d.table.align);
    put_pair_i32(w, d.table.padding);
    put_part_ref(w, d.map.perspective);
    put_part_ref(w, d.map.light);
    put_part_ref(w, d.map.rot_center);
    w.f64(d.map.rot.0);
    w.f64(d.map.rot.1);
    w.f64(d.map.rot.2);
    w.bool(d.map.on);
    w.bool(d.map.smooth);
    w.bool(d.map.alpha);
    w.bool(d.map.backface_cull);
    w.bool(d.map.persp_on);
    w.i32(d.persp.zplane);
    w.i32(d.persp.focal);
    w.seq(d.external_params.len());
    for param in &d.external_params {
        w.str(&param.name);
        match &param.value {
            ParamValue::Int(v) => {
                w.u8(0);
                w.i32(*v);
            }
            ParamValue::Double(v) => {
                w.u8(1);
                w.f64(*v);
            }
            ParamValue::String(v) => {
                w.u8(2);
                w.str(v);
            }
            ParamValue::Bool(v) => {
                w.u8(3);
                w.bool(*v);
            }
            ParamValue::Choice(v) => {
                w.u8(4);
                w.str(v);
            }
        }
    }
}

fn decode_description(r: &mut EntryReader<'_>, pool: &mut Interner) -> Result<Description> {
    let mut d = Description::new();
    d.state = StateId {
        name: get_name(r, pool)?,
        value: r.f64()?,
    };
    d.visible = r.bool()?;
    d.align = get_pair_f64(r)?;
    d.fixed = get_pair_bool(r)?;
    d.min = get_pair_i32(r)?;
    d.max = get_pair_i32(r)?;
    d.step = get_pair_i32(r)?;
    d.aspect = get_pair_f64(r)?;
    d.aspect_prefer = r.tag("aspect preference", AspectPrefer::from_u8)?;
    for rel in [&mut d.rel1, &mut d.rel2] {
        *rel = Rel {
            relative: get_pair_f64(r)?,
            offset: get_pair_i32(r)?,
            to_x: get_part_ref(r)?,
            to_y: get_part_ref(r)?,
        };
    }
    let normal = get_image_ref(r)?;
    let mut tweens = Vec::new();
    for _ in 0..r.seq()? {
        tweens.push(get_image_ref(r)?);
    }
    d.image = ImageState {
        normal,
        tweens,
        border: (r.i32()?, r.i32()?, r.i32()?, r.i32()?),
        middle: r.tag("middle policy", MiddlePolicy::from_u8)?,
        border_scale: r.bool()?,
        scale_hint: r.tag("scale hint", ScaleHint::from_u8)?,
    };
    d.fill = FillState {
        smooth: r.bool()?,
        origin_rel: get_pair_f64(r)?,
        origin_abs: get_pair_i32(r)?,
        size_rel: get_pair_f64(r)?,
        size_abs: get_pair_i32(r)?,
        fill_type: r.tag("fill type", FillType::from_u8)?,
        angle: r.i32()?,
        spread: r.i32()?,
    };
    d.color_class = get_name(r, pool)?;
    d.color = get_color(r)?;
    d.color2 = get_color(r)?;
    d.color3 = get_color(r)?;
    d.text = TextState {
        text: r.opt_str()?,
        text_class: get_name(r, pool)?,
        font: get_name(r, pool)?,
        style: get_name(r, pool)?,
        repch: r.opt_str()?,
        size: r.i32()?,
        fit: get_pair_bool(r)?,
        min: get_pair_bool(r)?,
        max: get_pair_bool(r)?,
        align: get_pair_f64(r)?,
        source: get_part_ref(r)?,
        text_source: get_part_ref(r)?,
        elipsis: r.f64()?,
    };
    d.box_ = BoxState {
        layout: r.opt_str()?,
        alt_layout: r.opt_str()?,
        align: get_pair_f64(r)?,
        padding: get_pair_i32(r)?,
        min: get_pair_bool(r)?,
    };
    d.table = TableState {
        homogeneous: r.tag("table homogeneity", TableHomogeneous::from_u8)?,
        align: get_pair_f64(r)?,
        padding: get_pair_i32(r)?,
    };
    d.map = MapState {
        perspective: get_part_ref(r)?,
        light: get_part_ref(r)?,
        rot_center: get_part_ref(r)?,
        rot: (r.f64()?, r.f64()?, r.f64()?),
        on: r.bool()?,
        smooth: r.bool()?,
        alpha: r.bool()?,
        backface_cull: r.bool()?,
        persp_on: r.bool()?,
    };
    d.persp = PerspectiveState {
        zplane: r.i32()?,
        focal: r.i32()?,
    };
    for _ in 0..r.seq()? {
        let name = get_req_name(r, pool)?;
        let value = match r.u8()? {
            0 => ParamValue::Int(r.i32()?),
            1 => ParamValue::Double(r.f64()?),
            2 => ParamValue::String(r.str()?),
            3 => ParamValue::Bool(r.bool()?),
            4 => ParamValue::Choice(r.str()?),
            value => {
                return Err(ContainerError::BadTag {
                    what: "external param",
                    value: value as u32,
                });
            }
        };
        d.external_params.push(ExternalParam { name, value });
    }
    Ok(d)
}

// ---------------------------------------------------------------------------
// programs
// ---------------------------------------------------------------------------

fn encode_program(w: &mut EntryWriter, p: &Program) {
    put_name(w, p.name.as_ref());
    w.u32(p.id.0);
    w.opt_str(p.signal.as_deref());
    w.opt_str(p.source.as_deref());
    put_name(w, p.filter.part.as_ref());
    put_name(w, p.filter.state.as_ref());
    put_pair_f64(w, p.in_);
    match &p.action {
        None => w.u8(255),
        Some(Action::StateSet { state, value }) => {
            w.u8(0);
            w.str(state);
            w.f64(*value);
        }
        Some(Action::ActionStop) => w.u8(1),
        Some(Action::SignalEmit { signal, source }) => {
            w.u8(2);
            w.str(signal);
            w.str(source);
        }
        Some(Action::DragValSet { x, y }) => {
            w.u8(3);
            w.f64(*x);
            w.f64(*y);
        }
        Some(Action::DragValStep { x, y }) => {
            w.u8(4);
            w.f64(*x);
            w.f64(*y);
        }
        Some(Action::DragValPage { x, y }) => {
            w.u8(5);
            w.f64(*x);
            w.f64(*y);
        }
        Some(Action::Script) => w.u8(6),
        Some(Action::LuaScript) => w.u8(7),
        Some(Action::FocusSet) => w.u8(8),
        Some(Action::FocusObject) => w.u8(9),
        Some(Action::ParamCopy {
            src,
            src_param,
            dst,
            dst_param,
        }) => {
            w.u8(10);
            put_part_ref(w, *src);
            w.str(src_param);
            put_part_ref(w, *dst);
            w.str(dst_param);
        }
        Some(Action::ParamSet { dst, param, value }) => {
            w.u8(11);
            put_part_ref(w, *dst);
            w.str(param);
            w.str(value);
        }
    }
    w.u8(p.transition as u8);
    w.f64(p.transition_time);
    w.seq(p.targets.len());
    for target in &p.targets {
        match target {
            TargetRef::Unset => w.u8(0),
            TargetRef::Part(id) => {
                w.u8(1);
                w.u32(id.0);
            }
            TargetRef::Program(id) => {
                w.u8(2);
                w.u32(id.0);
            }
        }
    }
    w.seq(p.after.len());
    for after in &p.after {
        w.id(after.map(|a| a.0));
    }
    put_api(w, p.api.as_ref());
}

fn decode_program(r: &mut EntryReader<'_>, pool: &mut Interner) -> Result<Program> {
    let name = get_name(r, pool)?;
    let mut p = Program::new(ProgramId(r.u32()?));
    p.name = name;
    p.signal = r.opt_str()?;
    p.source = r.opt_str()?;
    p.filter = Filter {
        part: get_name(r, pool)?,
        state: get_name(r, pool)?,
    };
    p.in_ = get_pair_f64(r)?;
    p.action = match r.u8()? {
        255 => None,
        0 => Some(Action::StateSet {
            state: r.str()?,
            value: r.f64()?,
        }),
        1 => Some(Action::ActionStop),
        2 => Some(Action::SignalEmit {
            signal: r.str()?,
            source: r.str()?,
        }),
        3 => Some(Action::DragValSet {
            x: r.f64()?,
            y: r.f64()?,
        }),
        4 => Some(Action::DragValStep {
            x: r.f64()?,
            y: r.f64()?,
        }),
        5 => Some(Action::DragValPage {
            x: r.f64()?,
            y: r.f64()?,
        }),
        6 => Some(Action::Script),
        7 => Some(Action::LuaScript),
        8 => Some(Action::FocusSet),
        9 => Some(Action::FocusObject),
        10 => Some(Action::ParamCopy {
            src: get_part_ref(r)?,
            src_param: r.str()?,
            dst: get_part_ref(r)?,
            dst_param: r.str()?,
        }),
        11 => Some(Action::ParamSet {
            dst: get_part_ref(r)?,
            param: r.str()?,
            value: r.str()?,
        }),
        value => {
            return Err(ContainerError::BadTag {
                what: "program action",
                value: value as u32,
            });
        }
    };
    p.transition = r.tag("transition", TweenMode::from_u8)?;
    p.transition_time = r.f64()?;
    for _ in 0..r.seq()? {
        p.targets.push(match r.u8()? {
            0 => TargetRef::Unset,
            1 => TargetRef::Part(PartId(r.u32()?)),
            2 => TargetRef::Program(ProgramId(r.u32()?)),
            value => {
                return Err(ContainerError::BadTag {
                    what: "program target",
                    value: value as u32,
                });
            }
        });
    }
    for _ in 0..r.seq()? {
        p.after.push(r.id()?.map(ProgramId));
    }
    p.api = get_api(r)?;
    Ok(p)
}

// ---------------------------------------------------------------------------
// scripts
// ---------------------------------------------------------------------------

pub fn encode_script(block: &ScriptBlock) -> Vec<u8> {
    let mut w = EntryWriter::new();
    w.opt_str(block.shared.as_deref());
    w.seq(block.programs.len());
    for (id, text) in &block.programs {
        w.u32(id.0);
        w.str(text);
    }
    w.into_bytes()
}

pub fn decode_script(bytes: &[u8], kind: ScriptKind) -> Result<ScriptBlock> {
    let mut r = EntryReader::new(bytes, "script");
    let shared = r.opt_str()?;
    let mut programs = Vec::new();
    for _ in 0..r.seq()? {
        let id = ProgramId(r.u32()?);
        programs.push((id, r.str()?));
    }
    Ok(ScriptBlock {
        kind: Some(kind),
        shared,
        programs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn group_round_trip() {
        let mut pool = Interner::new();
        let mut g = Group::new(GroupId(0));
        g.name = Some(pool.intern("main"));
        g.min = (64, 64);
        let mut part = Part::new(PartId(0));
        part.name = Some(pool.intern("bg"));
        part.part_type = PartType::Rectangle;
        let mut d = Description::new();
        d.color = Color::rgba(10, 20, 30, 40);
        d.rel1.to_x = Some(PartId(0));
        part.descriptions.push(d);
        g.parts.push(part);
        let mut prog = Program::new(ProgramId(0));
        prog.name = Some(pool.intern("go"));
        prog.signal = Some("mouse,down,1".to_string());
        prog.action = Some(Action::StateSet {
            state: "default".into(),
            value: 0.0,
        });
        prog.targets = vec![TargetRef::Part(PartId(0))];
        g.programs.push(prog);

        let bytes = encode_group(&g);
        let back = decode_group(&bytes, &mut pool).unwrap();
        assert_eq!(g, back);
    }

    #[test]
    fn header_round_trip() {
        let mut pool = Interner::new();
        let mut f = ThemeFile::new();
        f.compiler = "edje_cc".to_string();
        f.images.push(ImageEntry {
            path: pool.intern("bg.png"),
            id: ImageId(0),
            source: ImageSource::InlineLossy { quality: 90 },
        });
        f.sets.push(ImageSet {
            name: Some(pool.intern("icon")),
            id: SetId(0),
            entries: vec![SetEntry {
                path: Some(pool.intern("bg.png")),
                image: Some(ImageId(0)),
                min: (0, 0),
                max: (32, 32),
            }],
        });
        f.fonts.push(FontEntry {
            file: pool.intern("Vera.ttf"),
            alias: pool.intern("default"),
        });
        f.aliases.push(GroupAlias {
            name: pool.intern("other"),
            id: GroupId(0),
        });

        let bytes = encode_header(&f);
        let (back, dir) = decode_header(&bytes, &mut pool).unwrap();
        assert_eq!(f, back);
        assert!(dir.is_empty());
    }
}
