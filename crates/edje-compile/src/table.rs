//! The object/statement handler table and the parse session driving it.
//!
//! Every fully qualified dotted path the grammar accepts maps to one of:
//! a block entry (with or without an open-handler), a verbatim entry, or
//! a statement handler. The resource families (`images`, `fonts`,
//! `styles`, `color_classes`, `externals`) are reachable from many nesting
//! levels for file-maintenance convenience; those synonym sets are
//! expanded here once, at table construction, so the dispatch hot path is
//! a single hash lookup. Registration is first-wins, which lets a
//! specific handler shadow a family alias (e.g. `text.font` stays the
//! text property, not a font declaration).

use crate::build::Build;
use crate::handlers::{description as d, group as g, part as p, program as pr, resources as r};
use ahash::AHashMap;
use edc_parse::{Args, BlockKind, Diag, Dispatch, Pos, Verbatim};
use std::sync::Arc;
use tracing::debug;

pub type StFn = fn(&mut Build, &Args) -> Result<(), Diag>;
pub type ObFn = fn(&mut Build, &Pos) -> Result<(), Diag>;
pub type VbFn = fn(&mut Build, &Pos, &Verbatim) -> Result<(), Diag>;

enum BlockEntry {
    /// Structural or entity-creating block.
    Open(Option<ObFn>),
    /// Script block captured raw.
    Verbatim(VbFn),
}

pub struct HandlerTable {
    blocks: AHashMap<String, BlockEntry>,
    statements: AHashMap<String, StFn>,
}

fn join(prefix: &str, rest: &str) -> String {
    if prefix.is_empty() {
        rest.to_string()
    } else {
        format!("{prefix}.{rest}")
    }
}

impl HandlerTable {
    fn block(&mut self, path: &str, f: Option<ObFn>) {
        self.blocks
            .entry(path.to_string())
            .or_insert(BlockEntry::Open(f));
    }

    fn verb(&mut self, path: &str, f: VbFn) {
        self.blocks
            .entry(path.to_string())
            .or_insert(BlockEntry::Verbatim(f));
    }

    fn st(&mut self, path: &str, f: StFn) {
        self.statements.entry(path.to_string()).or_insert(f);
    }

    /// `image:` / `images { image: ... set { ... } }` family under one
    /// prefix. `bare` controls whether the prefix accepts `image:` and
    /// `set {}` directly (everywhere except the document root).
    fn image_family(&mut self, prefix: &str, bare: bool) {
        let mut at = |sub: &str, f: StFn| self.st(&join(prefix, sub), f);
        at("images.image", r::st_images_image);
        at("images.set.name", r::st_images_set_name);
        at("images.set.image.image", r::st_images_set_image_image);
        at("images.set.image.size", r::st_images_set_image_size);
        if bare {
            let mut at = |sub: &str, f: StFn| self.st(&join(prefix, sub), f);
            at("image", r::st_images_image);
            at("set.name", r::st_images_set_name);
            at("set.image.image", r::st_images_set_image_image);
            at("set.image.size", r::st_images_set_image_size);
        }
        self.block(&join(prefix, "images"), None);
        self.block(&join(prefix, "images.set"), Some(r::ob_images_set));
        self.block(
            &join(prefix, "images.set.image"),
            Some(r::ob_images_set_image),
        );
        if bare {
            self.block(&join(prefix, "set"), Some(r::ob_images_set));
            self.block(&join(prefix, "set.image"), Some(r::ob_images_set_image));
        }
    }

    fn font_family(&mut self, prefix: &str, bare: bool) {
        self.st(&join(prefix, "fonts.font"), r::st_fonts_font);
        if bare {
            self.st(&join(prefix, "font"), r::st_fonts_font);
        }
        self.block(&join(prefix, "fonts"), None);
    }

    fn style_family(&mut self, prefix: &str) {
        self.st(&join(prefix, "styles.style.name"), r::st_styles_style_name);
        self.st(&join(prefix, "styles.style.base"), r::st_styles_style_base);
        self.st(&join(prefix, "styles.style.tag"), r::st_styles_style_tag);
        self.block(&join(prefix, "styles"), None);
        self.block(&join(prefix, "styles.style"), Some(r::ob_styles_style));
    }

    fn color_class_family(&mut self, prefix: &str) {
        let base = join(prefix, "color_classes.color_class");
        self.st(&format!("{base}.name"), r::st_color_class_name);
        self.st(&format!("{base}.color"), r::st_color_class_color);
        self.st(&format!("{base}.color2"), r::st_color_class_color2);
        self.st(&format!("{base}.color3"), r::st_color_class_color3);
        self.block(&join(prefix, "color_classes"), None);
        self.block(&base, Some(r::ob_color_class));
    }

    fn external_family(&mut self, prefix: &str) {
        self.st(&join(prefix, "externals.external"), r::st_externals_external);
        self.block(&join(prefix, "externals"), None);
    }

    /// Full `program` statement/object set under one parent path.
    fn program_family(&mut self, parent: &str) {
        for head in ["program", "programs.program"] {
            let base = join(parent, head);
            self.block(&base, Some(pr::ob_program));
            self.verb(&format!("{base}.script"), pr::vb_program_script);
            self.verb(&format!("{base}.lua_script"), pr::vb_program_lua_script);
            self.st(&format!("{base}.name"), pr::st_program_name);
            self.st(&format!("{base}.signal"), pr::st_program_signal);
            self.st(&format!("{base}.source"), pr::st_program_source);
            self.st(&format!("{base}.filter"), pr::st_program_filter);
            self.st(&format!("{base}.in"), pr::st_program_in);
            self.st(&format!("{base}.action"), pr::st_program_action);
            self.st(&format!("{base}.transition"), pr::st_program_transition);
            self.st(&format!("{base}.target"), pr::st_program_target);
            self.st(&format!("{base}.after"), pr::st_program_after);
            self.st(&format!("{base}.api"), pr::st_program_api);
        }
        let programs = join(parent, "programs");
        self.block(&programs, None);
        // Resource blocks are accepted inside `programs` scopes too.
        self.image_family(&programs, true);
        self.font_family(&programs, true);
    }

    pub fn new() -> Self {
        let mut t = Self {
            blocks: AHashMap::new(),
            statements: AHashMap::new(),
        };

        const GROUP: &str = "collections.group";
        const PART: &str = "collections.group.parts.part";
        const DESC: &str = "collections.group.parts.part.description";

        // --- document root ------------------------------------------------
        t.external_family("");
        t.image_family("", false);
        t.font_family("", false);
        t.block("data", None);
        t.st("data.item", r::st_data_item);
        t.st("data.file", r::st_data_file);
        t.style_family("");
        t.color_class_family("");
        t.block("spectra", None);
        t.block("collections", Some(g::ob_collections));

        // --- collections level (file-split convenience aliases) ----------
        t.external_family("collections");
        t.image_family("collections", true);
        t.font_family("collections", true);
        t.style_family("collections");
        t.color_class_family("collections");

        // --- group --------------------------------------------------------
        t.block(GROUP, Some(g::ob_collections_group));
        t.st(&format!("{GROUP}.name"), g::st_group_name);
        t.st(&format!("{GROUP}.script_only"), g::st_group_script_only);
        t.st(
            &format!("{GROUP}.lua_script_only"),
            g::st_group_lua_script_only,
        );
        t.st(&format!("{GROUP}.alias"), g::st_group_alias);
        t.st(&format!("{GROUP}.min"), g::st_group_min);
        t.st(&format!("{GROUP}.max"), g::st_group_max);
        t.block(&format!("{GROUP}.data"), None);
        t.st(&format!("{GROUP}.data.item"), g::st_group_data_item);
        t.verb(&format!("{GROUP}.script"), g::vb_group_script);
        t.verb(&format!("{GROUP}.lua_script"), g::vb_group_lua_script);
        t.external_family(GROUP);
        t.image_family(GROUP, true);
        t.font_family(GROUP, true);
        t.style_family(GROUP);
        t.color_class_family(GROUP);
        t.program_family(GROUP);

        // --- parts --------------------------------------------------------
        let parts = format!("{GROUP}.parts");
        t.block(&parts, None);
        t.st(&format!("{parts}.alias"), g::st_parts_alias);
        t.image_family(&parts, true);
        t.font_family(&parts, true);
        t.style_family(&parts);
        t.color_class_family(&parts);
        t.program_family(&parts);
        t.verb(&format!("{parts}.script"), g::vb_group_script);
        t.verb(&format!("{parts}.lua_script"), g::vb_group_lua_script);

        // --- part ---------------------------------------------------------
        t.block(PART, Some(p::ob_part));
        let part_props: &[(&str, StFn)] = &[
            ("name", p::st_part_name),
            ("api", p::st_part_api),
            ("type", p::st_part_type),
            ("effect", p::st_part_effect),
            ("mouse_events", p::st_part_mouse_events),
            ("repeat_events", p::st_part_repeat_events),
            ("ignore_flags", p::st_part_ignore_flags),
            ("scale", p::st_part_scale),
            ("pointer_mode", p::st_part_pointer_mode),
            ("precise_is_inside", p::st_part_precise_is_inside),
            (
                "use_alternate_font_metrics",
                p::st_part_use_alternate_font_metrics,
            ),
            ("clip_to", p::st_part_clip_to),
            ("source", p::st_part_source),
            ("source2", p::st_part_source2),
            ("source3", p::st_part_source3),
            ("source4", p::st_part_source4),
            ("source5", p::st_part_source5),
            ("source6", p::st_part_source6),
            ("entry_mode", p::st_part_entry_mode),
            ("select_mode", p::st_part_select_mode),
            ("multiline", p::st_part_multiline),
            ("dragable.x", p::st_part_dragable_x),
            ("dragable.y", p::st_part_dragable_y),
            ("dragable.confine", p::st_part_dragable_confine),
            ("dragable.events", p::st_part_dragable_events),
        ];
        for (prop, f) in part_props {
            t.st(&format!("{PART}.{prop}"), *f);
        }
        t.block(&format!("{PART}.dragable"), None);
        t.image_family(PART, true);
        t.font_family(PART, true);
        t.style_family(PART);
        t.color_class_family(PART);
        t.program_family(PART);
        t.verb(&format!("{PART}.script"), g::vb_group_script);
        t.verb(&format!("{PART}.lua_script"), g::vb_group_lua_script);

        // Box and table items share property handlers; the table-only
        // `position`/`span` rules are enforced inside them.
        for container in ["box", "table"] {
            let base = format!("{PART}.{container}.items.item");
            t.block(&format!("{PART}.{container}"), None);
            t.block(&format!("{PART}.{container}.items"), None);
            t.block(&base, Some(p::ob_item));
            t.st(&format!("{base}.type"), p::st_item_type);
            t.st(&format!("{base}.name"), p::st_item_name);
            t.st(&format!("{base}.source"), p::st_item_source);
            t.st(&format!("{base}.min"), p::st_item_min);
            t.st(&format!("{base}.prefer"), p::st_item_prefer);
            t.st(&format!("{base}.max"), p::st_item_max);
            t.st(&format!("{base}.padding"), p::st_item_padding);
            t.st(&format!("{base}.align"), p::st_item_align);
            t.st(&format!("{base}.weight"), p::st_item_weight);
            t.st(&format!("{base}.aspect"), p::st_item_aspect);
            t.st(&format!("{base}.aspect_mode"), p::st_item_aspect_mode);
            t.st(&format!("{base}.options"), p::st_item_options);
        }
        t.st(
            &format!("{PART}.table.items.item.position"),
            p::st_item_position,
        );
        t.st(&format!("{PART}.table.items.item.span"), p::st_item_span);

        // --- description --------------------------------------------------
        t.block(DESC, Some(d::ob_description));
        let desc_props: &[(&str, StFn)] = &[
            ("inherit", d::st_inherit),
            ("state", d::st_state),
            ("visible", d::st_visible),
            ("align", d::st_align),
            ("fixed", d::st_fixed),
            ("min", d::st_min),
            ("max", d::st_max),
            ("step", d::st_step),
            ("aspect", d::st_aspect),
            ("aspect_preference", d::st_aspect_preference),
            ("color_class", d::st_color_class),
            ("color", d::st_color),
            ("color2", d::st_color2),
            ("color3", d::st_color3),
            ("rel1.relative", d::st_rel1_relative),
            ("rel1.offset", d::st_rel1_offset),
            ("rel1.to", d::st_rel1_to),
            ("rel1.to_x", d::st_rel1_to_x),
            ("rel1.to_y", d::st_rel1_to_y),
            ("rel2.relative", d::st_rel2_relative),
            ("rel2.offset", d::st_rel2_offset),
            ("rel2.to", d::st_rel2_to),
            ("rel2.to_x", d::st_rel2_to_x),
            ("rel2.to_y", d::st_rel2_to_y),
            ("image.normal", d::st_image_normal),
            ("image.tween", d::st_image_tween),
            ("image.border", d::st_image_border),
            ("image.middle", d::st_image_middle),
            ("image.border_scale", d::st_image_border_scale),
            ("image.scale_hint", d::st_image_scale_hint),
            ("fill.smooth", d::st_fill_smooth),
            ("fill.spread", d::st_fill_spread),
            ("fill.type", d::st_fill_type),
            ("fill.origin.relative", d::st_fill_origin_relative),
            ("fill.origin.offset", d::st_fill_origin_offset),
            ("fill.size.relative", d::st_fill_size_relative),
            ("fill.size.offset", d::st_fill_size_offset),
            ("text.text", d::st_text_text),
            ("text.text_class", d::st_text_text_class),
            ("text.font", d::st_text_font),
            ("text.style", d::st_text_style),
            ("text.repch", d::st_text_repch),
            ("text.size", d::st_text_size),
            ("text.fit", d::st_text_fit),
            ("text.min", d::st_text_min),
            ("text.max", d::st_text_max),
            ("text.align", d::st_text_align),
            ("text.source", d::st_text_source),
            ("text.text_source", d::st_text_text_source),
            ("text.elipsis", d::st_text_elipsis),
            ("box.layout", d::st_box_layout),
            ("box.align", d::st_box_align),
            ("box.padding", d::st_box_padding),
            ("box.min", d::st_box_min),
            ("table.homogeneous", d::st_table_homogeneous),
            ("table.align", d::st_table_align),
            ("table.padding", d::st_table_padding),
            ("map.perspective", d::st_map_perspective),
            ("map.light", d::st_map_light),
            ("map.rotation.center", d::st_map_rotation_center),
            ("map.rotation.x", d::st_map_rotation_x),
            ("map.rotation.y", d::st_map_rotation_y),
            ("map.rotation.z", d::st_map_rotation_z),
            ("map.on", d::st_map_on),
            ("map.smooth", d::st_map_smooth),
            ("map.alpha", d::st_map_alpha),
            ("map.backface_cull", d::st_map_backface_cull),
            ("map.perspective_on", d::st_map_perspective_on),
            ("perspective.zplane", d::st_perspective_zplane),
            ("perspective.focal", d::st_perspective_focal),
            ("params.int", d::st_params_int),
            ("params.double", d::st_params_double),
            ("params.string", d::st_params_string),
            ("params.bool", d::st_params_bool),
            ("params.choice", d::st_params_choice),
        ];
        for (prop, f) in desc_props {
            t.st(&format!("{DESC}.{prop}"), *f);
        }
        for sub in [
            "rel1",
            "rel2",
            "image",
            "fill",
            "fill.origin",
            "fill.size",
            "text",
            "text.fonts",
            "box",
            "table",
            "map",
            "map.rotation",
            "perspective",
            "params",
        ] {
            t.block(&format!("{DESC}.{sub}"), None);
        }
        // `text.fonts.font` and `text.font` as a font declaration are
        // shadowed by the text property set above; only the nested fonts
        // block form declares fonts here.
        t.st(&format!("{DESC}.text.fonts.font"), r::st_fonts_font);
        // Inside a description, `image:` declarations live in the nested
        // image/images blocks only; the bare spelling stays a block.
        t.image_family(DESC, false);
        t.image_family(&format!("{DESC}.image"), true);
        t.font_family(DESC, true);
        t.style_family(DESC);
        t.color_class_family(DESC);
        t.program_family(DESC);
        t.verb(&format!("{DESC}.script"), g::vb_group_script);
        t.verb(&format!("{DESC}.lua_script"), g::vb_group_lua_script);

        debug!(
            blocks = t.blocks.len(),
            statements = t.statements.len(),
            "handler table built"
        );
        t
    }
}

impl Default for HandlerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// One parse run: the table plus the mutable build state.
pub struct Session<'t> {
    table: &'t HandlerTable,
    build: Build,
    file: Option<Arc<str>>,
}

impl<'t> Session<'t> {
    pub fn new(table: &'t HandlerTable, build: Build) -> Self {
        Self {
            table,
            build,
            file: None,
        }
    }

    pub fn into_build(self) -> Build {
        self.build
    }
}

impl Dispatch for Session<'_> {
    fn open(&mut self, path: &str, pos: Pos) -> Result<BlockKind, Diag> {
        self.file.get_or_insert_with(|| pos.file.clone());
        match self.table.blocks.get(path) {
            Some(BlockEntry::Open(handler)) => {
                if let Some(f) = handler {
                    f(&mut self.build, &pos)?;
                }
                Ok(BlockKind::Container)
            }
            Some(BlockEntry::Verbatim(_)) => Ok(BlockKind::Verbatim),
            None => Err(Diag::syntax(pos, format!("unhandled keyword \"{path}\""))),
        }
    }

    fn close(&mut self, path: &str, pos: Pos) -> Result<(), Diag> {
        if path == "collections.group" {
            // The group is complete: every symbolic part/program reference
            // inside it must resolve now.
            let idx = self.build.group_index(&pos)?;
            let group = &mut self.build.file.groups[idx];
            self.build.lookups.resolve_group(group)?;
            self.build.cur.group = None;
            self.build.cur.part = None;
            self.build.cur.desc = None;
            self.build.cur.item = None;
            self.build.cur.program = None;
        }
        Ok(())
    }

    fn statement(&mut self, path: &str, args: Args) -> Result<(), Diag> {
        match self.table.statements.get(path) {
            Some(f) => f(&mut self.build, &args),
            None => Err(Diag::syntax(
                args.pos,
                format!("unhandled keyword \"{path}\""),
            )),
        }
    }

    fn verbatim(&mut self, path: &str, body: Verbatim) -> Result<(), Diag> {
        let file = self
            .file
            .clone()
            .unwrap_or_else(|| Arc::from("<input>"));
        let pos = Pos::new(&file, body.line_start);
        match self.table.blocks.get(path) {
            Some(BlockEntry::Verbatim(f)) => f(&mut self.build, &pos, &body),
            _ => Err(Diag::syntax(pos, format!("unhandled keyword \"{path}\""))),
        }
    }
}
