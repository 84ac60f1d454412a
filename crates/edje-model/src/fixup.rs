//! Id renumbering passes.
//!
//! Deleting or reordering an entity leaves holes in the dense id range;
//! these passes rewrite every dependent reference and re-compact ids so
//! `entity[i].id == i` holds again afterwards. Every id-bearing field of
//! every state and program is covered; missing one here means a dangling
//! reference in the artifact, so the visitors below are the single source
//! of truth for "what refers to a part/program".

use crate::group::Group;
use crate::program::{Action, TargetRef};
use crate::types::{PartId, ProgramId};

/// Visit every `Option<PartId>` field in the group, excluding program
/// targets (whose delete semantics differ: they are dropped, not unset).
fn for_each_part_ref(group: &mut Group, mut f: impl FnMut(&mut Option<PartId>)) {
    for part in &mut group.parts {
        f(&mut part.clip_to);
        f(&mut part.dragable.confine);
        f(&mut part.dragable.events);
        for desc in &mut part.descriptions {
            f(&mut desc.rel1.to_x);
            f(&mut desc.rel1.to_y);
            f(&mut desc.rel2.to_x);
            f(&mut desc.rel2.to_y);
            f(&mut desc.text.source);
            f(&mut desc.text.text_source);
            f(&mut desc.map.perspective);
            f(&mut desc.map.light);
            f(&mut desc.map.rot_center);
        }
    }
    for program in &mut group.programs {
        match &mut program.action {
            Some(Action::ParamCopy { src, dst, .. }) => {
                f(src);
                f(dst);
            }
            Some(Action::ParamSet { dst, .. }) => f(dst),
            _ => {}
        }
    }
}

/// Remove the part at `index`. References to it become unset; program
/// targets naming it are dropped; remaining parts are renumbered densely.
pub fn remove_part(group: &mut Group, index: usize) {
    let removed = group.parts.remove(index).id;
    let shift = |id: PartId| {
        if id.index() > index {
            PartId(id.0 - 1)
        } else {
            id
        }
    };
    for_each_part_ref(group, |slot| {
        *slot = match *slot {
            Some(id) if id == removed => None,
            Some(id) => Some(shift(id)),
            None => None,
        };
    });
    for program in &mut group.programs {
        program.targets.retain_mut(|t| match t {
            TargetRef::Part(id) if *id == removed => false,
            TargetRef::Part(id) => {
                *id = shift(*id);
                true
            }
            _ => true,
        });
    }
    for (i, part) in group.parts.iter_mut().enumerate() {
        part.id = PartId::from(i);
    }
}

/// Exchange the ids of two parts (restacking). List order follows so the
/// `id == index` invariant is preserved.
pub fn swap_parts(group: &mut Group, a: usize, b: usize) {
    if a == b {
        return;
    }
    let (ida, idb) = (PartId::from(a), PartId::from(b));
    for_each_part_ref(group, |slot| {
        *slot = match *slot {
            Some(id) if id == ida => Some(idb),
            Some(id) if id == idb => Some(ida),
            other => other,
        };
    });
    for program in &mut group.programs {
        for t in &mut program.targets {
            if let TargetRef::Part(id) = t {
                if *id == ida {
                    *id = idb;
                } else if *id == idb {
                    *id = ida;
                }
            }
        }
    }
    group.parts.swap(a, b);
    group.parts[a].id = ida;
    group.parts[b].id = idb;
}

/// Remove the program at `index`. Targets and `after` entries naming it are
/// dropped; survivors are renumbered and their program references shifted.
pub fn remove_program(group: &mut Group, index: usize) {
    let removed = group.programs.remove(index).id;
    let shift = |id: ProgramId| {
        if id.index() > index {
            ProgramId(id.0 - 1)
        } else {
            id
        }
    };
    for program in &mut group.programs {
        program.targets.retain_mut(|t| match t {
            TargetRef::Program(id) if *id == removed => false,
            TargetRef::Program(id) => {
                *id = shift(*id);
                true
            }
            _ => true,
        });
        program.after.retain_mut(|slot| match slot {
            Some(id) if *id == removed => false,
            Some(id) => {
                *id = shift(*id);
                true
            }
            None => true,
        });
    }
    for (i, program) in group.programs.iter_mut().enumerate() {
        program.id = ProgramId::from(i);
    }
}

/// Re-establish `id == index` for parts and programs. A no-op on an
/// already-contiguous group.
pub fn fix_ids(group: &mut Group) {
    for (i, part) in group.parts.iter_mut().enumerate() {
        part.id = PartId::from(i);
    }
    for (i, program) in group.programs.iter_mut().enumerate() {
        program.id = ProgramId::from(i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desc::Description;
    use crate::intern::Name;
    use crate::part::Part;
    use crate::program::Program;
    use pretty_assertions::assert_eq;

    fn group_with_parts(n: usize) -> Group {
        let mut g = Group::new(crate::types::GroupId(0));
        for i in 0..n {
            let mut p = Part::new(PartId::from(i));
            p.name = Some(Name::from(format!("p{i}").as_str()));
            p.descriptions.push(Description::new());
            g.parts.push(p);
        }
        g
    }

    #[test]
    fn remove_part_rewrites_references() {
        let mut g = group_with_parts(4);
        // p3 clips to p2, anchors to p1, p0.
        g.parts[3].clip_to = Some(PartId(2));
        g.parts[3].descriptions[0].rel1.to_x = Some(PartId(1));
        g.parts[3].descriptions[0].rel2.to_y = Some(PartId(0));
        let mut prog = Program::new(ProgramId(0));
        prog.action = Some(Action::StateSet {
            state: "default".into(),
            value: 0.0,
        });
        prog.targets = vec![TargetRef::Part(PartId(1)), TargetRef::Part(PartId(3))];
        g.programs.push(prog);

        remove_part(&mut g, 1);

        let ids: Vec<u32> = g.parts.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        // p3 (now id 2) still clips to p2 (now id 1); the rel1 anchor to the
        // removed part is unset.
        assert_eq!(g.parts[2].clip_to, Some(PartId(1)));
        assert_eq!(g.parts[2].descriptions[0].rel1.to_x, None);
        assert_eq!(g.parts[2].descriptions[0].rel2.to_y, Some(PartId(0)));
        // The target naming the removed part is dropped, the other shifted.
        assert_eq!(g.programs[0].targets, vec![TargetRef::Part(PartId(2))]);
    }

    #[test]
    fn swap_parts_switches_every_dependency() {
        let mut g = group_with_parts(3);
        g.parts[2].clip_to = Some(PartId(0));
        g.parts[2].descriptions[0].text.source = Some(PartId(1));

        swap_parts(&mut g, 0, 1);

        assert_eq!(g.parts[0].name.as_deref(), Some("p1"));
        assert_eq!(g.parts[1].name.as_deref(), Some("p0"));
        assert_eq!(g.parts[2].clip_to, Some(PartId(1)));
        assert_eq!(g.parts[2].descriptions[0].text.source, Some(PartId(0)));
        for (i, p) in g.parts.iter().enumerate() {
            assert_eq!(p.id.index(), i);
        }
    }

    #[test]
    fn remove_program_renumbers_afters() {
        let mut g = group_with_parts(0);
        for i in 0..5 {
            let mut p = Program::new(ProgramId::from(i));
            p.name = Some(Name::from(format!("prog{i}").as_str()));
            g.programs.push(p);
        }
        // prog4 runs prog3 then prog2 afterwards.
        g.programs[4].after = vec![Some(ProgramId(3)), Some(ProgramId(2))];

        remove_program(&mut g, 2);

        let ids: Vec<u32> = g.programs.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        // prog4 is now id 3; its after list lost the deleted entry and the
        // surviving reference follows prog3 to its new id 2.
        assert_eq!(g.programs[3].after, vec![Some(ProgramId(2))]);
    }

    #[test]
    fn fix_ids_is_idempotent() {
        let mut g = group_with_parts(3);
        fix_ids(&mut g);
        let before = g.clone();
        fix_ids(&mut g);
        assert_eq!(before, g);
    }
}
