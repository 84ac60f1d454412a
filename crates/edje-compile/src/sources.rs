//! Canonical source regeneration.
//!
//! Every artifact carries a re-decompilable source rendering of its own
//! model under `edje_sources`. The writer emits tables and collections in
//! a fixed order with fixed indentation, prints only fields that differ
//! from a freshly constructed entity, and maps every resolved id back to
//! its name. Re-parsing the output must produce an equal model with the
//! same id assignment; the round-trip suite holds it to that.

use edje_model::desc::{Description, ParamValue};
use edje_model::file::{ImageSource, STYLE_BASE_KEY};
use edje_model::part::{PackItem, Part};
use edje_model::program::{Action, Filter, TargetRef};
use edje_model::types::{
    AspectMode, AspectPrefer, EntryMode, EventFlags, FillType, MiddlePolicy, PartId, PartType,
    PointerMode, ProgramId, ScaleHint, SelectMode, TableHomogeneous, TextEffect, TweenMode,
};
use edje_model::{Group, ImageRef, ThemeFile};
use std::fmt::Write as _;

struct Writer {
    out: String,
    indent: usize,
}

impl Writer {
    fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open(&mut self, name: &str) {
        self.line(&format!("{name} {{"));
        self.indent += 1;
    }

    fn close(&mut self) {
        self.indent -= 1;
        self.line("}");
    }

    /// Verbatim script body: braces plus the captured text unchanged.
    fn verbatim(&mut self, name: &str, body: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        let _ = write!(self.out, "{name} {{{body}}}");
        self.out.push('\n');
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Shortest spelling that parses back to the same f64.
fn num(v: f64) -> String {
    format!("{v}")
}

fn onoff(v: bool) -> &'static str {
    if v { "1" } else { "0" }
}

pub fn generate(file: &ThemeFile) -> String {
    let mut w = Writer::new();

    if !file.externals.is_empty() {
        w.open("externals");
        for ext in &file.externals {
            w.line(&format!("external: {};", quote(ext)));
        }
        w.close();
    }

    if !file.images.is_empty() || !file.sets.is_empty() {
        w.open("images");
        for img in &file.images {
            let spec = match img.source {
                ImageSource::InlinePerfect { compress: false } => "RAW".to_string(),
                ImageSource::InlinePerfect { compress: true } => "COMP".to_string(),
                ImageSource::InlineLossy { quality } => format!("LOSSY {quality}"),
                ImageSource::External => "USER".to_string(),
            };
            w.line(&format!("image: {} {spec};", quote(&img.path)));
        }
        for set in &file.sets {
            w.open("set");
            if let Some(name) = &set.name {
                w.line(&format!("name: {};", quote(name)));
            }
            for entry in &set.entries {
                let (Some(path), Some(image)) = (&entry.path, entry.image) else {
                    continue;
                };
                w.open("image");
                let spec = match file.images.get(image.index()).map(|i| i.source) {
                    Some(ImageSource::InlinePerfect { compress: true }) => "COMP".to_string(),
                    Some(ImageSource::InlineLossy { quality }) => format!("LOSSY {quality}"),
                    Some(ImageSource::External) => "USER".to_string(),
                    _ => "RAW".to_string(),
                };
                w.line(&format!("image: {} {spec};", quote(path)));
                w.line(&format!(
                    "size: {} {} {} {};",
                    entry.min.0, entry.min.1, entry.max.0, entry.max.1
                ));
                w.close();
            }
            w.close();
        }
        w.close();
    }

    if !file.fonts.is_empty() {
        w.open("fonts");
        for font in &file.fonts {
            w.line(&format!(
                "font: {} {};",
                quote(&font.file),
                quote(&font.alias)
            ));
        }
        w.close();
    }

    if !file.data.is_empty() {
        w.open("data");
        for item in &file.data {
            w.line(&format!(
                "item: {} {};",
                quote(&item.key),
                quote(&item.value)
            ));
        }
        w.close();
    }

    if !file.styles.is_empty() {
        w.open("styles");
        for style in &file.styles {
            w.open("style");
            if let Some(name) = &style.name {
                w.line(&format!("name: {};", quote(name)));
            }
            for tag in &style.tags {
                if tag.key == STYLE_BASE_KEY {
                    w.line(&format!("base: {};", quote(&tag.value)));
                } else {
                    w.line(&format!("tag: {} {};", quote(&tag.key), quote(&tag.value)));
                }
            }
            w.close();
        }
        w.close();
    }

    if !file.color_classes.is_empty() {
        w.open("color_classes");
        for cc in &file.color_classes {
            w.open("color_class");
            if let Some(name) = &cc.name {
                w.line(&format!("name: {};", quote(name)));
            }
            for (prop, c) in [("color", cc.color), ("color2", cc.color2), ("color3", cc.color3)] {
                w.line(&format!("{prop}: {} {} {} {};", c.r, c.g, c.b, c.a));
            }
            w.close();
        }
        w.close();
    }

    if !file.groups.is_empty() {
        w.open("collections");
        for group in &file.groups {
            write_group(&mut w, file, group);
        }
        w.close();
    }

    w.out
}

fn part_name(group: &Group, id: Option<PartId>) -> Option<&str> {
    group
        .parts
        .get(id?.index())
        .and_then(|p| p.name.as_deref())
}

fn program_name(group: &Group, id: Option<ProgramId>) -> Option<&str> {
    group
        .programs
        .get(id?.index())
        .and_then(|p| p.name.as_deref())
}

fn image_name(file: &ThemeFile, image: ImageRef) -> Option<&str> {
    match image {
        ImageRef::Image(id) => file.images.get(id.index()).map(|i| i.path.as_str()),
        ImageRef::Set(id) => file.sets.get(id.index()).and_then(|s| s.name.as_deref()),
    }
}

fn write_group(w: &mut Writer, file: &ThemeFile, group: &Group) {
    w.open("group");
    if let Some(name) = &group.name {
        w.line(&format!("name: {};", quote(name)));
    }
    for alias in file.aliases.iter().filter(|a| a.id == group.id) {
        w.line(&format!("alias: {};", quote(&alias.name)));
    }
    if group.min != (0, 0) {
        w.line(&format!("min: {} {};", group.min.0, group.min.1));
    }
    if group.max != (0, 0) {
        w.line(&format!("max: {} {};", group.max.0, group.max.1));
    }
    if group.script_only {
        w.line("script_only: 1;");
    }
    if group.lua_script_only {
        w.line("lua_script_only: 1;");
    }
    if !group.data.is_empty() {
        w.open("data");
        for item in &group.data {
            w.line(&format!(
                "item: {} {};",
                quote(&item.key),
                quote(&item.value)
            ));
        }
        w.close();
    }
    if let Some(shared) = &group.script.shared {
        let name = match group.script.kind {
            Some(edje_model::ScriptKind::Lua) => "lua_script",
            _ => "script",
        };
        w.verbatim(name, shared);
    }
    if !group.parts.is_empty() || !group.part_aliases.is_empty() {
        w.open("parts");
        for (alias, real) in &group.part_aliases {
            w.line(&format!("alias: {} {};", quote(alias), quote(real)));
        }
        for part in &group.parts {
            write_part(w, file, group, part);
        }
        w.close();
    }
    if !group.programs.is_empty() {
        w.open("programs");
        for program in &group.programs {
            write_program(w, group, program);
        }
        w.close();
    }
    w.close();
}

fn write_part(w: &mut Writer, file: &ThemeFile, group: &Group, part: &Part) {
    w.open("part");
    if let Some(name) = &part.name {
        w.line(&format!("name: {};", quote(name)));
    }
    let type_label = match part.part_type {
        PartType::None => Some("NONE"),
        PartType::Rectangle => Some("RECT"),
        PartType::Text => Some("TEXT"),
        PartType::Image => None, // the default
        PartType::Swallow => Some("SWALLOW"),
        PartType::Textblock => Some("TEXTBLOCK"),
        PartType::Gradient => None, // unreachable from source
        PartType::Group => Some("GROUP"),
        PartType::Box => Some("BOX"),
        PartType::Table => Some("TABLE"),
        PartType::External => Some("EXTERNAL"),
    };
    if let Some(label) = type_label {
        w.line(&format!("type: {label};"));
    }
    if let Some(api) = &part.api {
        match &api.description {
            Some(desc) => w.line(&format!("api: {} {};", quote(&api.name), quote(desc))),
            None => w.line(&format!("api: {};", quote(&api.name))),
        }
    }
    if part.effect != TextEffect::None {
        let label = match part.effect {
            TextEffect::None => unreachable!(),
            TextEffect::Plain => "PLAIN",
            TextEffect::Outline => "OUTLINE",
            TextEffect::SoftOutline => "SOFT_OUTLINE",
            TextEffect::Shadow => "SHADOW",
            TextEffect::SoftShadow => "SOFT_SHADOW",
            TextEffect::OutlineShadow => "OUTLINE_SHADOW",
            TextEffect::OutlineSoftShadow => "OUTLINE_SOFT_SHADOW",
            TextEffect::FarShadow => "FAR_SHADOW",
            TextEffect::FarSoftShadow => "FAR_SOFT_SHADOW",
            TextEffect::Glow => "GLOW",
        };
        w.line(&format!("effect: {label};"));
    }
    if !part.mouse_events {
        w.line("mouse_events: 0;");
    }
    if part.repeat_events {
        w.line("repeat_events: 1;");
    }
    if part.ignore_flags != EventFlags::empty() {
        w.line("ignore_flags: ON_HOLD;");
    }
    if part.scale {
        w.line("scale: 1;");
    }
    if part.pointer_mode != PointerMode::Autograb {
        w.line("pointer_mode: NOGRAB;");
    }
    if part.precise_is_inside {
        w.line("precise_is_inside: 1;");
    }
    if part.use_alternate_font_metrics {
        w.line("use_alternate_font_metrics: 1;");
    }
    if part.multiline {
        w.line("multiline: 1;");
    }
    if part.entry_mode != EntryMode::None {
        let label = match part.entry_mode {
            EntryMode::None => unreachable!(),
            EntryMode::Selectable => "PLAIN",
            EntryMode::Editable => "EDITABLE",
            EntryMode::Password => "PASSWORD",
        };
        w.line(&format!("entry_mode: {label};"));
    }
    if part.select_mode != SelectMode::Default {
        w.line("select_mode: EXPLICIT;");
    }
    if let Some(name) = part_name(group, part.clip_to) {
        w.line(&format!("clip_to: {};", quote(name)));
    }
    for (prop, value) in [
        ("source", &part.source),
        ("source2", &part.source2),
        ("source3", &part.source3),
        ("source4", &part.source4),
        ("source5", &part.source5),
        ("source6", &part.source6),
    ] {
        if let Some(v) = value {
            w.line(&format!("{prop}: {};", quote(v)));
        }
    }
    let d = &part.dragable;
    if d.x != 0
        || d.y != 0
        || d.step_x != 0
        || d.step_y != 0
        || d.count_x != 0
        || d.count_y != 0
        || d.confine.is_some()
        || d.events.is_some()
    {
        w.open("dragable");
        w.line(&format!("x: {} {} {};", d.x, d.step_x, d.count_x));
        w.line(&format!("y: {} {} {};", d.y, d.step_y, d.count_y));
        if let Some(name) = part_name(group, d.confine) {
            w.line(&format!("confine: {};", quote(name)));
        }
        if let Some(name) = part_name(group, d.events) {
            w.line(&format!("events: {};", quote(name)));
        }
        w.close();
    }
    if !part.items.is_empty() {
        let container = if part.part_type == PartType::Table {
            "table"
        } else {
            "box"
        };
        w.open(container);
        w.open("items");
        for item in &part.items {
            write_item(w, item, part.part_type);
        }
        w.close();
        w.close();
    }
    for desc in &part.descriptions {
        write_description(w, file, group, part, desc);
    }
    w.close();
}

fn write_item(w: &mut Writer, item: &PackItem, part_type: PartType) {
    let fresh = PackItem::new();
    w.open("item");
    if let Some(name) = &item.name {
        w.line(&format!("name: {};", quote(name)));
    }
    if let Some(source) = &item.source {
        w.line(&format!("source: {};", quote(source)));
    }
    if item.min != fresh.min {
        w.line(&format!("min: {} {};", item.min.0, item.min.1));
    }
    if item.prefer != fresh.prefer {
        w.line(&format!("prefer: {} {};", item.prefer.0, item.prefer.1));
    }
    if item.max != fresh.max {
        w.line(&format!("max: {} {};", item.max.0, item.max.1));
    }
    if item.padding != fresh.padding {
        w.line(&format!(
            "padding: {} {} {} {};",
            item.padding.0, item.padding.1, item.padding.2, item.padding.3
        ));
    }
    if item.align != fresh.align {
        w.line(&format!("align: {} {};", num(item.align.0), num(item.align.1)));
    }
    if item.weight != fresh.weight {
        w.line(&format!(
            "weight: {} {};",
            num(item.weight.0),
            num(item.weight.1)
        ));
    }
    if item.aspect != fresh.aspect {
        w.line(&format!("aspect: {} {};", item.aspect.0, item.aspect.1));
    }
    if item.aspect_mode != AspectMode::None {
        let label = match item.aspect_mode {
            AspectMode::None => unreachable!(),
            AspectMode::Neither => "NEITHER",
            AspectMode::Horizontal => "HORIZONTAL",
            AspectMode::Vertical => "VERTICAL",
            AspectMode::Both => "BOTH",
        };
        w.line(&format!("aspect_mode: {label};"));
    }
    if let Some(options) = &item.options {
        w.line(&format!("options: {};", quote(options)));
    }
    if part_type == PartType::Table {
        if item.col >= 0 && item.row >= 0 {
            w.line(&format!("position: {} {};", item.col, item.row));
        }
        if (item.colspan, item.rowspan) != (1, 1) {
            w.line(&format!("span: {} {};", item.colspan, item.rowspan));
        }
    }
    w.close();
}

fn write_description(
    w: &mut Writer,
    file: &ThemeFile,
    group: &Group,
    part: &Part,
    desc: &Description,
) {
    let fresh = Description::new();
    w.open("description");
    w.line(&format!(
        "state: {} {};",
        quote(desc.state.display_name()),
        num(desc.state.value)
    ));
    if !desc.visible {
        w.line("visible: 0;");
    }
    if desc.align != fresh.align {
        w.line(&format!("align: {} {};", num(desc.align.0), num(desc.align.1)));
    }
    if desc.fixed != fresh.fixed {
        w.line(&format!("fixed: {} {};", onoff(desc.fixed.0), onoff(desc.fixed.1)));
    }
    if desc.min != fresh.min {
        w.line(&format!("min: {} {};", desc.min.0, desc.min.1));
    }
    if desc.max != fresh.max {
        w.line(&format!("max: {} {};", desc.max.0, desc.max.1));
    }
    if desc.step != fresh.step {
        w.line(&format!("step: {} {};", desc.step.0, desc.step.1));
    }
    if desc.aspect != fresh.aspect {
        w.line(&format!(
            "aspect: {} {};",
            num(desc.aspect.0),
            num(desc.aspect.1)
        ));
    }
    if desc.aspect_prefer != AspectPrefer::None {
        let label = match desc.aspect_prefer {
            AspectPrefer::None => unreachable!(),
            AspectPrefer::Vertical => "VERTICAL",
            AspectPrefer::Horizontal => "HORIZONTAL",
            AspectPrefer::Both => "BOTH",
        };
        w.line(&format!("aspect_preference: {label};"));
    }
    if let Some(cc) = &desc.color_class {
        w.line(&format!("color_class: {};", quote(cc)));
    }
    for (prop, color, default) in [
        ("color", desc.color, fresh.color),
        ("color2", desc.color2, fresh.color2),
        ("color3", desc.color3, fresh.color3),
    ] {
        if color != default {
            w.line(&format!(
                "{prop}: {} {} {} {};",
                color.r, color.g, color.b, color.a
            ));
        }
    }
    for (name, rel, fresh_rel) in [("rel1", &desc.rel1, &fresh.rel1), ("rel2", &desc.rel2, &fresh.rel2)]
    {
        let has_to = rel.to_x.is_some() || rel.to_y.is_some();
        if rel.relative == fresh_rel.relative && rel.offset == fresh_rel.offset && !has_to {
            continue;
        }
        w.open(name);
        if rel.relative != fresh_rel.relative {
            w.line(&format!(
                "relative: {} {};",
                num(rel.relative.0),
                num(rel.relative.1)
            ));
        }
        if rel.offset != fresh_rel.offset {
            w.line(&format!("offset: {} {};", rel.offset.0, rel.offset.1));
        }
        match (part_name(group, rel.to_x), part_name(group, rel.to_y)) {
            (Some(x), Some(y)) if x == y => w.line(&format!("to: {};", quote(x))),
            (x, y) => {
                if let Some(x) = x {
                    w.line(&format!("to_x: {};", quote(x)));
                }
                if let Some(y) = y {
                    w.line(&format!("to_y: {};", quote(y)));
                }
            }
        }
        w.close();
    }
    write_image_state(w, file, desc, &fresh);
    write_fill_state(w, desc, &fresh);
    write_text_state(w, group, part, desc, &fresh);
    write_container_state(w, desc, &fresh);
    write_map_state(w, group, desc, &fresh);
    if desc.persp != fresh.persp {
        w.open("perspective");
        if desc.persp.zplane != fresh.persp.zplane {
            w.line(&format!("zplane: {};", desc.persp.zplane));
        }
        if desc.persp.focal != fresh.persp.focal {
            w.line(&format!("focal: {};", desc.persp.focal));
        }
        w.close();
    }
    if !desc.external_params.is_empty() {
        w.open("params");
        for param in &desc.external_params {
            let line = match &param.value {
                ParamValue::Int(v) => format!("int: {} {v};", quote(&param.name)),
                ParamValue::Double(v) => format!("double: {} {};", quote(&param.name), num(*v)),
                ParamValue::String(v) => {
                    format!("string: {} {};", quote(&param.name), quote(v))
                }
                ParamValue::Bool(v) => format!("bool: {} {};", quote(&param.name), onoff(*v)),
                ParamValue::Choice(v) => {
                    format!("choice: {} {};", quote(&param.name), quote(v))
                }
            };
            w.line(&line);
        }
        w.close();
    }
    w.close();
}

fn write_image_state(w: &mut Writer, file: &ThemeFile, desc: &Description, fresh: &Description) {
    let img = &desc.image;
    let fresh_img = &fresh.image;
    if img == fresh_img {
        return;
    }
    w.open("image");
    if let Some(name) = img.normal.and_then(|i| image_name(file, i)) {
        w.line(&format!("normal: {};", quote(name)));
    }
    for tween in img.tweens.iter().flatten() {
        if let Some(name) = image_name(file, *tween) {
            w.line(&format!("tween: {};", quote(name)));
        }
    }
    if img.border != fresh_img.border {
        w.line(&format!(
            "border: {} {} {} {};",
            img.border.0, img.border.1, img.border.2, img.border.3
        ));
    }
    if img.middle != MiddlePolicy::Default {
        let label = match img.middle {
            MiddlePolicy::Default => unreachable!(),
            MiddlePolicy::None => "NONE",
            MiddlePolicy::Solid => "SOLID",
        };
        w.line(&format!("middle: {label};"));
    }
    if img.border_scale {
        w.line("border_scale: 1;");
    }
    if img.scale_hint != ScaleHint::None {
        let label = match img.scale_hint {
            ScaleHint::None => unreachable!(),
            ScaleHint::Dynamic => "DYNAMIC",
            ScaleHint::Static => "STATIC",
        };
        w.line(&format!("scale_hint: {label};"));
    }
    w.close();
}

fn write_fill_state(w: &mut Writer, desc: &Description, fresh: &Description) {
    let fill = &desc.fill;
    let fresh_fill = &fresh.fill;
    if fill == fresh_fill {
        return;
    }
    w.open("fill");
    if !fill.smooth {
        w.line("smooth: 0;");
    }
    if fill.fill_type != FillType::Scale {
        w.line("type: TILE;");
    }
    if fill.origin_rel != fresh_fill.origin_rel || fill.origin_abs != fresh_fill.origin_abs {
        w.open("origin");
        if fill.origin_rel != fresh_fill.origin_rel {
            w.line(&format!(
                "relative: {} {};",
                num(fill.origin_rel.0),
                num(fill.origin_rel.1)
            ));
        }
        if fill.origin_abs != fresh_fill.origin_abs {
            w.line(&format!(
                "offset: {} {};",
                fill.origin_abs.0, fill.origin_abs.1
            ));
        }
        w.close();
    }
    if fill.size_rel != fresh_fill.size_rel || fill.size_abs != fresh_fill.size_abs {
        w.open("size");
        if fill.size_rel != fresh_fill.size_rel {
            w.line(&format!(
                "relative: {} {};",
                num(fill.size_rel.0),
                num(fill.size_rel.1)
            ));
        }
        if fill.size_abs != fresh_fill.size_abs {
            w.line(&format!("offset: {} {};", fill.size_abs.0, fill.size_abs.1));
        }
        w.close();
    }
    w.close();
}

fn write_text_state(
    w: &mut Writer,
    group: &Group,
    part: &Part,
    desc: &Description,
    fresh: &Description,
) {
    let text = &desc.text;
    let fresh_text = &fresh.text;
    if text == fresh_text {
        return;
    }
    let is_text = part.part_type == PartType::Text;
    w.open("text");
    if let Some(t) = &text.text {
        w.line(&format!("text: {};", quote(t)));
    }
    if let Some(v) = &text.text_class {
        w.line(&format!("text_class: {};", quote(v)));
    }
    if let Some(v) = &text.font {
        w.line(&format!("font: {};", quote(v)));
    }
    if let Some(v) = &text.style {
        w.line(&format!("style: {};", quote(v)));
    }
    if let Some(v) = &text.repch {
        w.line(&format!("repch: {};", quote(v)));
    }
    if text.size != fresh_text.size {
        w.line(&format!("size: {};", text.size));
    }
    if text.fit != fresh_text.fit {
        w.line(&format!("fit: {} {};", onoff(text.fit.0), onoff(text.fit.1)));
    }
    if text.min != fresh_text.min {
        w.line(&format!("min: {} {};", onoff(text.min.0), onoff(text.min.1)));
    }
    if text.max != fresh_text.max {
        w.line(&format!("max: {} {};", onoff(text.max.0), onoff(text.max.1)));
    }
    if is_text && text.align != fresh_text.align {
        w.line(&format!(
            "align: {} {};",
            num(text.align.0),
            num(text.align.1)
        ));
    }
    if let Some(name) = part_name(group, text.source) {
        w.line(&format!("source: {};", quote(name)));
    }
    if let Some(name) = part_name(group, text.text_source) {
        w.line(&format!("text_source: {};", quote(name)));
    }
    if is_text && text.elipsis != fresh_text.elipsis {
        w.line(&format!("elipsis: {};", num(text.elipsis)));
    }
    w.close();
}

fn write_container_state(w: &mut Writer, desc: &Description, fresh: &Description) {
    if desc.box_ != fresh.box_ {
        w.open("box");
        if let Some(layout) = &desc.box_.layout {
            match &desc.box_.alt_layout {
                Some(alt) => w.line(&format!("layout: {} {};", quote(layout), quote(alt))),
                None => w.line(&format!("layout: {};", quote(layout))),
            }
        }
        if desc.box_.align != fresh.box_.align {
            w.line(&format!(
                "align: {} {};",
                num(desc.box_.align.0),
                num(desc.box_.align.1)
            ));
        }
        if desc.box_.padding != fresh.box_.padding {
            w.line(&format!(
                "padding: {} {};",
                desc.box_.padding.0, desc.box_.padding.1
            ));
        }
        if desc.box_.min != fresh.box_.min {
            w.line(&format!(
                "min: {} {};",
                onoff(desc.box_.min.0),
                onoff(desc.box_.min.1)
            ));
        }
        w.close();
    }
    if desc.table != fresh.table {
        w.open("table");
        if desc.table.homogeneous != TableHomogeneous::None {
            let label = match desc.table.homogeneous {
                TableHomogeneous::None => unreachable!(),
                TableHomogeneous::Table => "TABLE",
                TableHomogeneous::Item => "ITEM",
            };
            w.line(&format!("homogeneous: {label};"));
        }
        if desc.table.align != fresh.table.align {
            w.line(&format!(
                "align: {} {};",
                num(desc.table.align.0),
                num(desc.table.align.1)
            ));
        }
        if desc.table.padding != fresh.table.padding {
            w.line(&format!(
                "padding: {} {};",
                desc.table.padding.0, desc.table.padding.1
            ));
        }
        w.close();
    }
}

fn write_map_state(w: &mut Writer, group: &Group, desc: &Description, fresh: &Description) {
    let map = &desc.map;
    let fresh_map = &fresh.map;
    if map == fresh_map {
        return;
    }
    w.open("map");
    // `perspective:` implies perspective_on, so emit the reference first
    // and only add the flag when it disagrees with the implication.
    let implied_persp_on = map.perspective.is_some();
    if let Some(name) = part_name(group, map.perspective) {
        w.line(&format!("perspective: {};", quote(name)));
    }
    if let Some(name) = part_name(group, map.light) {
        w.line(&format!("light: {};", quote(name)));
    }
    if map.on {
        w.line("on: 1;");
    }
    if !map.smooth {
        w.line("smooth: 0;");
    }
    if !map.alpha {
        w.line("alpha: 0;");
    }
    if map.backface_cull {
        w.line("backface_cull: 1;");
    }
    if map.persp_on != implied_persp_on {
        w.line(&format!("perspective_on: {};", onoff(map.persp_on)));
    }
    if map.rot_center.is_some() || map.rot != fresh_map.rot {
        w.open("rotation");
        if let Some(name) = part_name(group, map.rot_center) {
            w.line(&format!("center: {};", quote(name)));
        }
        if map.rot.0 != 0.0 {
            w.line(&format!("x: {};", num(map.rot.0)));
        }
        if map.rot.1 != 0.0 {
            w.line(&format!("y: {};", num(map.rot.1)));
        }
        if map.rot.2 != 0.0 {
            w.line(&format!("z: {};", num(map.rot.2)));
        }
        w.close();
    }
    w.close();
}

fn write_program(w: &mut Writer, group: &Group, program: &edje_model::Program) {
    w.open("program");
    if let Some(name) = &program.name {
        w.line(&format!("name: {};", quote(name)));
    }
    if let Some(signal) = &program.signal {
        w.line(&format!("signal: {};", quote(signal)));
    }
    if let Some(source) = &program.source {
        w.line(&format!("source: {};", quote(source)));
    }
    if !matches!(program.filter, Filter { part: None, state: None }) {
        match (&program.filter.part, &program.filter.state) {
            (Some(part), Some(state)) => {
                w.line(&format!("filter: {} {};", quote(part), quote(state)))
            }
            (None, Some(state)) => w.line(&format!("filter: {};", quote(state))),
            _ => {}
        }
    }
    if program.in_ != (0.0, 0.0) {
        w.line(&format!(
            "in: {} {};",
            num(program.in_.0),
            num(program.in_.1)
        ));
    }
    match &program.action {
        None | Some(Action::Script) | Some(Action::LuaScript) => {}
        Some(Action::StateSet { state, value }) => {
            w.line(&format!("action: STATE_SET {} {};", quote(state), num(*value)));
        }
        Some(Action::ActionStop) => w.line("action: ACTION_STOP;"),
        Some(Action::SignalEmit { signal, source }) => {
            w.line(&format!(
                "action: SIGNAL_EMIT {} {};",
                quote(signal),
                quote(source)
            ));
        }
        Some(Action::DragValSet { x, y }) => {
            w.line(&format!("action: DRAG_VAL_SET {} {};", num(*x), num(*y)));
        }
        Some(Action::DragValStep { x, y }) => {
            w.line(&format!("action: DRAG_VAL_STEP {} {};", num(*x), num(*y)));
        }
        Some(Action::DragValPage { x, y }) => {
            w.line(&format!("action: DRAG_VAL_PAGE {} {};", num(*x), num(*y)));
        }
        Some(Action::FocusSet) => w.line("action: FOCUS_SET;"),
        Some(Action::FocusObject) => w.line("action: FOCUS_OBJECT;"),
        Some(Action::ParamCopy {
            src,
            src_param,
            dst,
            dst_param,
        }) => {
            if let (Some(src), Some(dst)) = (part_name(group, *src), part_name(group, *dst)) {
                w.line(&format!(
                    "action: PARAM_COPY {} {} {} {};",
                    quote(src),
                    quote(src_param),
                    quote(dst),
                    quote(dst_param)
                ));
            }
        }
        Some(Action::ParamSet { dst, param, value }) => {
            if let Some(dst) = part_name(group, *dst) {
                w.line(&format!(
                    "action: PARAM_SET {} {} {};",
                    quote(dst),
                    quote(param),
                    quote(value)
                ));
            }
        }
    }
    if program.transition_time != 0.0 || program.transition != TweenMode::Linear {
        let label = match program.transition {
            TweenMode::Linear => "LINEAR",
            TweenMode::Sinusoidal => "SINUSOIDAL",
            TweenMode::Accelerate => "ACCELERATE",
            TweenMode::Decelerate => "DECELERATE",
        };
        w.line(&format!(
            "transition: {label} {};",
            num(program.transition_time)
        ));
    }
    for target in &program.targets {
        let name = match target {
            TargetRef::Unset => None,
            TargetRef::Part(id) => part_name(group, Some(*id)),
            TargetRef::Program(id) => program_name(group, Some(*id)),
        };
        if let Some(name) = name {
            w.line(&format!("target: {};", quote(name)));
        }
    }
    for after in &program.after {
        if let Some(name) = program_name(group, *after) {
            w.line(&format!("after: {};", quote(name)));
        }
    }
    if let Some(api) = &program.api {
        match &api.description {
            Some(desc) => w.line(&format!("api: {} {};", quote(&api.name), quote(desc))),
            None => w.line(&format!("api: {};", quote(&api.name))),
        }
    }
    if let Some(snippet) = group.script.snippet_for(program.id) {
        let name = match group.script.kind {
            Some(edje_model::ScriptKind::Lua) => "lua_script",
            _ => "script",
        };
        w.verbatim(name, snippet);
    }
    w.close();
}
