//! Property tests for the quantified model invariants: dense ids after
//! arbitrary delete sequences, reference integrity, and fixup
//! idempotence.

use edje_model::desc::Description;
use edje_model::intern::Name;
use edje_model::part::Part;
use edje_model::program::{Action, Program, TargetRef};
use edje_model::types::{GroupId, PartId, ProgramId};
use edje_model::{fixup, Group};
use proptest::prelude::*;

/// A group with `parts` parts and `programs` programs, every part wired
/// to every other via clip_to/rel chains and every program targeting a
/// part and chaining to the next program.
fn dense_group(parts: usize, programs: usize) -> Group {
    let mut g = Group::new(GroupId(0));
    for i in 0..parts {
        let mut p = Part::new(PartId::from(i));
        p.name = Some(Name::from(format!("part{i}").as_str()));
        let mut d = Description::new();
        if i > 0 {
            p.clip_to = Some(PartId::from(i - 1));
            d.rel1.to_x = Some(PartId::from(i - 1));
            d.rel2.to_y = Some(PartId::from((i + 1) % parts));
        }
        p.descriptions.push(d);
        g.parts.push(p);
    }
    for i in 0..programs {
        let mut p = Program::new(ProgramId::from(i));
        p.name = Some(Name::from(format!("prog{i}").as_str()));
        p.action = Some(Action::StateSet {
            state: "default".to_string(),
            value: 0.0,
        });
        if parts > 0 {
            p.targets.push(TargetRef::Part(PartId::from(i % parts)));
        }
        if i + 1 < programs {
            p.after.push(Some(ProgramId::from(i + 1)));
        }
        g.programs.push(p);
    }
    g
}

fn assert_group_integrity(g: &Group) {
    let parts = g.parts.len();
    let programs = g.programs.len();
    for (i, p) in g.parts.iter().enumerate() {
        assert_eq!(p.id.index(), i, "part ids must be dense");
        for r in [p.clip_to, p.dragable.confine, p.dragable.events] {
            if let Some(id) = r {
                assert!(id.index() < parts, "part reference within range");
            }
        }
        for d in &p.descriptions {
            for r in [
                d.rel1.to_x,
                d.rel1.to_y,
                d.rel2.to_x,
                d.rel2.to_y,
                d.text.source,
                d.text.text_source,
                d.map.perspective,
                d.map.light,
                d.map.rot_center,
            ] {
                if let Some(id) = r {
                    assert!(id.index() < parts, "state reference within range");
                }
            }
        }
    }
    for (i, p) in g.programs.iter().enumerate() {
        assert_eq!(p.id.index(), i, "program ids must be dense");
        for t in &p.targets {
            match t {
                TargetRef::Part(id) => assert!(id.index() < parts),
                TargetRef::Program(id) => assert!(id.index() < programs),
                TargetRef::Unset => {}
            }
        }
        for a in p.after.iter().flatten() {
            assert!(a.index() < programs, "after reference within range");
        }
    }
}

proptest! {
    #[test]
    fn part_deletions_keep_ids_dense(
        initial in 2usize..12,
        deletions in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
    ) {
        let mut g = dense_group(initial, 3);
        for del in deletions {
            if g.parts.is_empty() {
                break;
            }
            let idx = del.index(g.parts.len());
            fixup::remove_part(&mut g, idx);
            assert_group_integrity(&g);
        }
    }

    #[test]
    fn program_deletions_keep_ids_dense(
        initial in 2usize..12,
        deletions in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
    ) {
        let mut g = dense_group(3, initial);
        for del in deletions {
            if g.programs.is_empty() {
                break;
            }
            let idx = del.index(g.programs.len());
            fixup::remove_program(&mut g, idx);
            assert_group_integrity(&g);
        }
    }

    #[test]
    fn swaps_preserve_integrity_and_self_invert(
        size in 2usize..10,
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let mut g = dense_group(size, 2);
        let before = g.clone();
        let (a, b) = (a.index(size), b.index(size));
        fixup::swap_parts(&mut g, a, b);
        assert_group_integrity(&g);
        fixup::swap_parts(&mut g, a, b);
        prop_assert_eq!(before, g);
    }

    #[test]
    fn fixup_on_contiguous_group_is_noop(size in 0usize..10) {
        let mut g = dense_group(size, size);
        let before = g.clone();
        fixup::fix_ids(&mut g);
        prop_assert_eq!(before, g);
    }
}
