//! Program handlers: triggers, actions, transitions, target/after lists
//! and per-program scripts.

use crate::build::Build;
use crate::lookup::{PartSlot, ProgramSlot};
use edc_parse::{Args, Diag, Pos, Verbatim};
use edje_model::group::ScriptKind;
use edje_model::program::{Action, Program, TargetRef};
use edje_model::types::{Api, ProgramId, TweenMode};

pub fn ob_program(b: &mut Build, pos: &Pos) -> Result<(), Diag> {
    let group = b.group_mut(pos)?;
    let id = ProgramId::from(group.programs.len());
    group.programs.push(Program::new(id));
    b.cur.program = Some(id.index());
    Ok(())
}

pub fn st_program_name(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let name = b.pool.intern(a.str(0)?);
    let idx = b.program_index(&a.pos)?;
    let group = b.group_mut(&a.pos)?;
    let clash = group
        .programs
        .iter()
        .enumerate()
        .any(|(i, p)| i != idx && p.name.as_ref() == Some(&name));
    if clash {
        return Err(Diag::uniqueness(
            a.pos.clone(),
            format!("There is already a program of the name {name}"),
        ));
    }
    group.programs[idx].name = Some(name);
    Ok(())
}

pub fn st_program_signal(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let v = a.str(0)?.to_string();
    b.program_mut(&a.pos)?.signal = Some(v);
    Ok(())
}

pub fn st_program_source(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let v = a.str(0)?.to_string();
    b.program_mut(&a.pos)?.source = Some(v);
    Ok(())
}

/// One- or two-argument filter: `filter: "part" "state";` or just the
/// state, in which case the signal source is matched instead.
pub fn st_program_filter(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect_min(1)?;
    if a.has(1) {
        a.expect(2)?;
        let part = b.pool.intern(a.str(0)?);
        let state = b.pool.intern(a.str(1)?);
        let filter = &mut b.program_mut(&a.pos)?.filter;
        filter.part = Some(part);
        filter.state = Some(state);
    } else {
        let state = b.pool.intern(a.str(0)?);
        b.program_mut(&a.pos)?.filter.state = Some(state);
    }
    Ok(())
}

pub fn st_program_in(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(2)?;
    let v = (
        a.float_range(0, 0.0, 999_999_999.0)?,
        a.float_range(1, 0.0, 999_999_999.0)?,
    );
    b.program_mut(&a.pos)?.in_ = v;
    Ok(())
}

pub fn st_program_action(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect_min(1)?;
    let kind = a.enum_(
        0,
        &[
            ("STATE_SET", 0u8),
            ("ACTION_STOP", 1),
            ("SIGNAL_EMIT", 2),
            ("DRAG_VAL_SET", 3),
            ("DRAG_VAL_STEP", 4),
            ("DRAG_VAL_PAGE", 5),
            ("SCRIPT", 6),
            ("LUA_SCRIPT", 7),
            ("FOCUS_SET", 8),
            ("FOCUS_OBJECT", 9),
            ("PARAM_COPY", 10),
            ("PARAM_SET", 11),
        ],
    )?;
    let program = b.program_index(&a.pos)?;
    let action = match kind {
        0 => {
            a.expect(3)?;
            Action::StateSet {
                state: a.str(1)?.to_string(),
                value: a.float_range(2, 0.0, 1.0)?,
            }
        }
        1 => {
            a.expect(1)?;
            Action::ActionStop
        }
        2 => {
            a.expect(3)?;
            Action::SignalEmit {
                signal: a.str(1)?.to_string(),
                source: a.str(2)?.to_string(),
            }
        }
        3 => {
            a.expect(3)?;
            Action::DragValSet {
                x: a.float(1)?,
                y: a.float(2)?,
            }
        }
        4 => {
            a.expect(3)?;
            Action::DragValStep {
                x: a.float(1)?,
                y: a.float(2)?,
            }
        }
        5 => {
            a.expect(3)?;
            Action::DragValPage {
                x: a.float(1)?,
                y: a.float(2)?,
            }
        }
        6 => Action::Script,
        7 => Action::LuaScript,
        8 => {
            a.expect(1)?;
            Action::FocusSet
        }
        9 => {
            a.expect(1)?;
            Action::FocusObject
        }
        10 => {
            a.expect(5)?;
            b.lookups.queue_part(
                a.str(1)?,
                a.pos.clone(),
                PartSlot::ParamCopySrc { program },
            );
            b.lookups.queue_part(
                a.str(3)?,
                a.pos.clone(),
                PartSlot::ParamCopyDst { program },
            );
            Action::ParamCopy {
                src: None,
                src_param: a.str(2)?.to_string(),
                dst: None,
                dst_param: a.str(4)?.to_string(),
            }
        }
        _ => {
            a.expect(4)?;
            b.lookups.queue_part(
                a.str(1)?,
                a.pos.clone(),
                PartSlot::ParamCopyDst { program },
            );
            Action::ParamSet {
                dst: None,
                param: a.str(2)?.to_string(),
                value: a.str(3)?.to_string(),
            }
        }
    };
    b.program_mut(&a.pos)?.action = Some(action);
    Ok(())
}

pub fn st_program_transition(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(2)?;
    let mode = a.enum_(
        0,
        &[
            ("LINEAR", TweenMode::Linear),
            ("SINUSOIDAL", TweenMode::Sinusoidal),
            ("ACCELERATE", TweenMode::Accelerate),
            ("DECELERATE", TweenMode::Decelerate),
        ],
    )?;
    let time = a.float_range(1, 0.0, 999_999_999.0)?;
    let p = b.program_mut(&a.pos)?;
    p.transition = mode;
    p.transition_time = time;
    Ok(())
}

/// `target:` referent kind depends on the action, so the action must come
/// first.
pub fn st_program_target(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let program = b.program_index(&a.pos)?;
    let target_is_part = b
        .program_mut(&a.pos)?
        .action
        .as_ref()
        .and_then(Action::target_is_part);
    let Some(is_part) = target_is_part else {
        return Err(Diag::semantic(
            a.pos.clone(),
            "target may only be used after action",
        ));
    };
    let p = b.program_mut(&a.pos)?;
    let index = p.targets.len();
    p.targets.push(TargetRef::Unset);
    let name = a.str(0)?;
    if is_part {
        b.lookups
            .queue_part(name, a.pos.clone(), PartSlot::Target { program, index });
    } else {
        b.lookups
            .queue_program(name, a.pos.clone(), ProgramSlot::Target { program, index });
    }
    Ok(())
}

pub fn st_program_after(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect(1)?;
    let program = b.program_index(&a.pos)?;
    let p = b.program_mut(&a.pos)?;
    let index = p.after.len();
    p.after.push(None);
    b.lookups
        .queue_program(a.str(0)?, a.pos.clone(), ProgramSlot::After { program, index });
    Ok(())
}

pub fn st_program_api(b: &mut Build, a: &Args) -> Result<(), Diag> {
    a.expect_min(1)?;
    let name = a.str(0)?.to_string();
    let description = if a.has(1) {
        a.expect(2)?;
        Some(a.str(1)?.to_string())
    } else {
        None
    };
    b.program_mut(&a.pos)?.api = Some(Api { name, description });
    Ok(())
}

fn program_script(
    b: &mut Build,
    pos: &Pos,
    body: &Verbatim,
    kind: ScriptKind,
) -> Result<(), Diag> {
    let program = b.program_index(pos)?;
    let group = b.group_mut(pos)?;
    if group.script.kind.is_some_and(|k| k != kind) {
        return Err(Diag::semantic(
            pos.clone(),
            "You're trying to mix Embryo and Lua scripting in the same group",
        ));
    }
    group.script.kind = Some(kind);
    let id = group.programs[program].id;
    group.script.programs.push((id, body.text.clone()));
    group.programs[program].action = Some(match kind {
        ScriptKind::Embryo => Action::Script,
        ScriptKind::Lua => Action::LuaScript,
    });
    Ok(())
}

pub fn vb_program_script(b: &mut Build, pos: &Pos, body: &Verbatim) -> Result<(), Diag> {
    program_script(b, pos, body, ScriptKind::Embryo)
}

pub fn vb_program_lua_script(b: &mut Build, pos: &Pos, body: &Verbatim) -> Result<(), Diag> {
    program_script(b, pos, body, ScriptKind::Lua)
}
