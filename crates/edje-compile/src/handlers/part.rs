//! Part handlers: part properties, dragging, box/table pack items.

use crate::build::Build;
use crate::lookup::PartSlot;
use edc_parse::{Args, Diag, Pos};
use edje_model::part::{PackItem, Part};
use edje_model::types::{
    Api, AspectMode, EntryMode, EventFlags, PartId, PartType, PointerMode, SelectMode, TextEffect,
};

pub fn ob_part(b: &mut Build, pos: &Pos) -> Result<(), Diag> {
    let group = b.group_mut(pos)?;
    let id = PartId::from(group.parts.len());
    group.parts.push(Part::new(id));
    b.cur.part = Some(id.index());
    b.cur.desc = None;
    b.cur.item = None;
    Ok(())
}

pub fn st_part_name(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let name = b.pool.intern(a.str(0)?);
    let idx = b.part_index(&a.pos)?;
    let group = b.group_mut(&a.pos)?;
    let clash = group
        .parts
        .iter()
        .enumerate()
        .any(|(i, p)| i != idx && p.name.as_ref() == Some(&name));
    if clash {
        return Err(Diag::uniqueness(
            a.pos.clone(),
            format!("There is already a part of the name {name}"),
        ));
    }
    group.parts[idx].name = Some(name);
    Ok(())
}

pub fn st_part_api(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect_min(1)?;
    let name = a.str(0)?.to_string();
    let description = if a.has(1) {
        a.expect(2)?;
        Some(a.str(1)?.to_string())
    } else {
        None
    };
    b.part_mut(&a.pos)?.api = Some(Api { name, description });
    Ok(())
}

pub fn st_part_type(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let t = a.enum_(
        0,
        &[
            ("NONE", PartType::None),
            ("RECT", PartType::Rectangle),
            ("TEXT", PartType::Text),
            ("IMAGE", PartType::Image),
            ("SWALLOW", PartType::Swallow),
            ("TEXTBLOCK", PartType::Textblock),
            ("GROUP", PartType::Group),
            ("BOX", PartType::Box),
            ("TABLE", PartType::Table),
            ("EXTERNAL", PartType::External),
        ],
    )?;
    b.part_mut(&a.pos)?.part_type = t;
    Ok(())
}

pub fn st_part_effect(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let e = a.enum_(
        0,
        &[
            ("NONE", TextEffect::None),
            ("PLAIN", TextEffect::Plain),
            ("OUTLINE", TextEffect::Outline),
            ("SOFT_OUTLINE", TextEffect::SoftOutline),
            ("SHADOW", TextEffect::Shadow),
            ("SOFT_SHADOW", TextEffect::SoftShadow),
            ("OUTLINE_SHADOW", TextEffect::OutlineShadow),
            ("OUTLINE_SOFT_SHADOW", TextEffect::OutlineSoftShadow),
            ("FAR_SHADOW", TextEffect::FarShadow),
            ("FAR_SOFT_SHADOW", TextEffect::FarSoftShadow),
            ("GLOW", TextEffect::Glow),
        ],
    )?;
    b.part_mut(&a.pos)?.effect = e;
    Ok(())
}

macro_rules! part_bool {
    ($name:ident, $field:ident) => {
        pub fn $name(b: &mut Build, a: &Args) -> Result<(), Diag> {
            a.expect(1)?;
            let v = a.bool(0)?;
            b.part_mut(&a.pos)?.$field = v;
            Ok(())
        }
    };
}

part_bool!(st_part_mouse_events, mouse_events);
part_bool!(st_part_repeat_events, repeat_events);
part_bool!(st_part_scale, scale);
part_bool!(st_part_precise_is_inside, precise_is_inside);
part_bool!(st_part_use_alternate_font_metrics, use_alternate_font_metrics);
part_bool!(st_part_multiline, multiline);

pub fn st_part_ignore_flags(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect_min(1)?;
    let bits = a.flags(0, &[("NONE", 0), ("ON_HOLD", EventFlags::ON_HOLD.bits())])?;
    b.part_mut(&a.pos)?.ignore_flags = EventFlags::from_bits_truncate(bits);
    Ok(())
}

pub fn st_part_pointer_mode(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let m = a.enum_(
        0,
        &[
            ("AUTOGRAB", PointerMode::Autograb),
            ("NOGRAB", PointerMode::Nograb),
        ],
    )?;
    b.part_mut(&a.pos)?.pointer_mode = m;
    Ok(())
}

pub fn st_part_entry_mode(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let m = a.enum_(
        0,
        &[
            ("NONE", EntryMode::None),
            ("PLAIN", EntryMode::Selectable),
            ("EDITABLE", EntryMode::Editable),
            ("PASSWORD", EntryMode::Password),
        ],
    )?;
    b.part_mut(&a.pos)?.entry_mode = m;
    Ok(())
}

pub fn st_part_select_mode(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let m = a.enum_(
        0,
        &[
            ("DEFAULT", SelectMode::Default),
            ("EXPLICIT", SelectMode::Explicit),
        ],
    )?;
    b.part_mut(&a.pos)?.select_mode = m;
    Ok(())
}

pub fn st_part_clip_to(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let part = b.part_index(&a.pos)?;
    b.lookups
        .queue_part(a.str(0)?, a.pos.clone(), PartSlot::ClipTo { part });
    Ok(())
}

macro_rules! part_source {
    ($name:ident, $field:ident) => {
        pub fn $name(b: &mut Build, a: &Args) -> Result<(), Diag> {
            a.expect(1)?;
            let v = b.pool.intern(a.str(0)?);
            b.part_mut(&a.pos)?.$field = Some(v);
            Ok(())
        }
    };
}

part_source!(st_part_source, source);
part_source!(st_part_source2, source2);
part_source!(st_part_source3, source3);
part_source!(st_part_source4, source4);
part_source!(st_part_source5, source5);
part_source!(st_part_source6, source6);

pub fn st_part_dragable_x(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(3)?;
    let enable = a.int_range(0, -1, 1)? as i8;
    let step = a.int_range(1, 0, i32::MAX)?;
    let count = a.int_range(2, 0, i32::MAX)?;
    let part = b.part_mut(&a.pos)?;
    part.dragable.x = enable;
    part.dragable.step_x = step;
    part.dragable.count_x = count;
    Ok(())
}

pub fn st_part_dragable_y(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(3)?;
    let enable = a.int_range(0, -1, 1)? as i8;
    let step = a.int_range(1, 0, i32::MAX)?;
    let count = a.int_range(2, 0, i32::MAX)?;
    let part = b.part_mut(&a.pos)?;
    part.dragable.y = enable;
    part.dragable.step_y = step;
    part.dragable.count_y = count;
    Ok(())
}

pub fn st_part_dragable_confine(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let part = b.part_index(&a.pos)?;
    b.lookups
        .queue_part(a.str(0)?, a.pos.clone(), PartSlot::DragConfine { part });
    Ok(())
}

pub fn st_part_dragable_events(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let part = b.part_index(&a.pos)?;
    b.lookups
        .queue_part(a.str(0)?, a.pos.clone(), PartSlot::DragEvents { part });
    Ok(())
}

// ---------------------------------------------------------------------------
// box / table pack items
// ---------------------------------------------------------------------------

fn require_container(b: &mut Build, pos: &Pos) -> Result<(), Diag> {
    let t = b.part_mut(pos)?.part_type;
    if !matches!(t, PartType::Box | PartType::Table) {
        return Err(Diag::context(
            pos.clone(),
            "box attributes in non-BOX or TABLE part",
        ));
    }
    Ok(())
}

fn require_table(b: &mut Build, pos: &Pos) -> Result<(), Diag> {
    if b.part_mut(pos)?.part_type != PartType::Table {
        return Err(Diag::context(
            pos.clone(),
            "table attributes in non-TABLE part",
        ));
    }
    Ok(())
}

pub fn ob_item(b: &mut Build, pos: &Pos) -> Result<(), Diag> {
    require_container(b, pos)?;
    let part = b.part_mut(pos)?;
    part.items.push(PackItem::new());
    let idx = part.items.len() - 1;
    b.cur.item = Some(idx);
    Ok(())
}

pub fn st_item_type(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let label = a.str(0)?;
    if label != "GROUP" {
        return Err(Diag::enumeration(
            a.pos.clone(),
            format!("token {label} not one of: GROUP"),
        ));
    }
    // Items hold GROUP objects only; nothing to store yet.
    b.item_mut(&a.pos)?;
    Ok(())
}

pub fn st_item_name(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let name = b.pool.intern(a.str(0)?);
    b.item_mut(&a.pos)?.name = Some(name);
    Ok(())
}

pub fn st_item_source(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let source = b.pool.intern(a.str(0)?);
    b.item_mut(&a.pos)?.source = Some(source);
    Ok(())
}

pub fn st_item_min(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(2)?;
    let v = (a.int_range(0, 0, 0x7ffffff)?, a.int_range(1, 0, 0x7ffffff)?);
    b.item_mut(&a.pos)?.min = v;
    Ok(())
}

pub fn st_item_prefer(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(2)?;
    let v = (a.int_range(0, 0, 0x7ffffff)?, a.int_range(1, 0, 0x7ffffff)?);
    b.item_mut(&a.pos)?.prefer = v;
    Ok(())
}

pub fn st_item_max(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(2)?;
    let v = (a.int_range(0, 0, 0x7ffffff)?, a.int_range(1, 0, 0x7ffffff)?);
    b.item_mut(&a.pos)?.max = v;
    Ok(())
}

pub fn st_item_padding(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(4)?;
    let v = (
        a.int_range(0, 0, 0x7ffffff)?,
        a.int_range(1, 0, 0x7ffffff)?,
        a.int_range(2, 0, 0x7ffffff)?,
        a.int_range(3, 0, 0x7ffffff)?,
    );
    b.item_mut(&a.pos)?.padding = v;
    Ok(())
}

pub fn st_item_align(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(2)?;
    let v = (a.float_range(0, -1.0, 1.0)?, a.float_range(1, -1.0, 1.0)?);
    b.item_mut(&a.pos)?.align = v;
    Ok(())
}

pub fn st_item_weight(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(2)?;
    let v = (
        a.float_range(0, 0.0, 99999.99)?,
        a.float_range(1, 0.0, 99999.99)?,
    );
    b.item_mut(&a.pos)?.weight = v;
    Ok(())
}

pub fn st_item_aspect(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(2)?;
    let v = (a.int_range(0, 0, i32::MAX)?, a.int_range(1, 0, i32::MAX)?);
    b.item_mut(&a.pos)?.aspect = v;
    Ok(())
}

pub fn st_item_aspect_mode(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let m = a.enum_(
        0,
        &[
            ("NONE", AspectMode::None),
            ("NEITHER", AspectMode::Neither),
            ("HORIZONTAL", AspectMode::Horizontal),
            ("VERTICAL", AspectMode::Vertical),
            ("BOTH", AspectMode::Both),
        ],
    )?;
    b.item_mut(&a.pos)?.aspect_mode = m;
    Ok(())
}

pub fn st_item_options(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let v = a.str(0)?.to_string();
    b.item_mut(&a.pos)?.options = Some(v);
    Ok(())
}

/// TABLE only: where the item sits in the grid.
pub fn st_item_position(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(2)?;
    require_table(b, &a.pos)?;
    let v = (a.int_range(0, 0, 0xffff)?, a.int_range(1, 0, 0xffff)?);
    let item = b.item_mut(&a.pos)?;
    item.col = v.0;
    item.row = v.1;
    Ok(())
}

/// TABLE only: how many cells the item covers.
pub fn st_item_span(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(2)?;
    require_table(b, &a.pos)?;
    let v = (a.int_range(0, 1, 0xffff)?, a.int_range(1, 1, 0xffff)?);
    let item = b.item_mut(&a.pos)?;
    item.colspan = v.0;
    item.rowspan = v.1;
    Ok(())
}
