//! Collections and group-level handlers, including embedded scripts.

use crate::build::Build;
use edc_parse::{Args, Diag, Pos, Verbatim};
use edje_model::file::GroupAlias;
use edje_model::group::ScriptKind;
use edje_model::types::GroupId;
use edje_model::Group;
use tracing::debug;

pub fn ob_collections(_b: &mut Build, _pos: &Pos) -> Result<(), Diag> {
    // The collection directory springs into existence with its first
    // group; the block itself is pure scoping.
    Ok(())
}

pub fn ob_collections_group(b: &mut Build, _pos: &Pos) -> Result<(), Diag> {
    let id = GroupId::from(b.file.groups.len());
    b.file.groups.push(Group::new(id));
    b.cur.group = Some(id.index());
    b.cur.part = None;
    b.cur.desc = None;
    b.cur.item = None;
    b.cur.program = None;
    Ok(())
}

/// Naming a group after an existing one replaces the earlier group
/// outright: its parts, programs and script sidecar vanish, directory ids
/// compact, and aliases chase their displaced targets.
pub fn st_group_name(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let name = b.pool.intern(a.str(0)?);
    let current = b.group_index(&a.pos)?;
    let displaced = b
        .file
        .groups
        .iter()
        .position(|g| g.id.index() != current && g.name.as_ref() == Some(&name));
    b.group_mut(&a.pos)?.name = Some(name.clone());
    if let Some(old) = displaced {
        debug!(group = name.as_str(), "duplicate group name, replacing");
        b.file.remove_group(old);
        b.lookups.forget_group(old);
        b.cur.group = Some(b.file.groups.len() - 1);
    }
    Ok(())
}

pub fn st_group_script_only(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let v = a.bool(0)?;
    b.group_mut(&a.pos)?.script_only = v;
    Ok(())
}

pub fn st_group_lua_script_only(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let v = a.bool(0)?;
    b.group_mut(&a.pos)?.lua_script_only = v;
    Ok(())
}

pub fn st_group_alias(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let name = b.pool.intern(a.str(0)?);
    let id = b.group_mut(&a.pos)?.id;
    b.file.aliases.push(GroupAlias { name, id });
    Ok(())
}

pub fn st_group_min(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(2)?;
    let min = (a.int_range(0, 0, i32::MAX)?, a.int_range(1, 0, i32::MAX)?);
    b.group_mut(&a.pos)?.min = min;
    Ok(())
}

pub fn st_group_max(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(2)?;
    let max = (a.int_range(0, 0, i32::MAX)?, a.int_range(1, 0, i32::MAX)?);
    b.group_mut(&a.pos)?.max = max;
    Ok(())
}

pub fn st_group_data_item(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(2)?;
    let key = b.pool.intern(a.str(0)?);
    let value = a.str(1)?.to_string();
    b.group_mut(&a.pos)?
        .data
        .push(edje_model::DataItem { key, value });
    Ok(())
}

/// `parts.alias: "shown" "real";` exposes a part under an extra name.
pub fn st_parts_alias(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(2)?;
    let alias = b.pool.intern(a.str(0)?);
    let real = b.pool.intern(a.str(1)?);
    b.group_mut(&a.pos)?.part_aliases.push((alias, real));
    Ok(())
}

fn group_shared_script(
    b: &mut Build,
    pos: &Pos,
    body: &Verbatim,
    kind: ScriptKind,
) -> Result<(), Diag> {
    let group = b.group_mut(pos)?;
    if group.script.shared.is_some() {
        return Err(Diag::semantic(
            pos.clone(),
            "There is already an existing script section for the group",
        ));
    }
    if group.script.kind.is_some_and(|k| k != kind) {
        return Err(Diag::semantic(
            pos.clone(),
            "You're trying to mix Embryo and Lua scripting in the same group",
        ));
    }
    group.script.kind = Some(kind);
    group.script.shared = Some(body.text.clone());
    Ok(())
}

pub fn vb_group_script(b: &mut Build, pos: &Pos, body: &Verbatim) -> Result<(), Diag> {
    group_shared_script(b, pos, body, ScriptKind::Embryo)
}

pub fn vb_group_lua_script(b: &mut Build, pos: &Pos, body: &Verbatim) -> Result<(), Diag> {
    group_shared_script(b, pos, body, ScriptKind::Lua)
}
