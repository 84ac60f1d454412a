//! Editing scenarios over a real compiled artifact: structural mutations
//! must preserve dense ids and reference integrity, and a failed
//! mutation must leave the model untouched.

use edje_compile::out::write_artifact;
use edje_compile::{compile_source, CompileOptions};
use edje_edit::{EditError, EditSession};
use edje_model::types::{PartId, ProgramId, PartType};
use edje_model::TargetRef;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn build_artifact(dir: &std::path::Path, src: &str) -> PathBuf {
    let path = dir.join("theme.edj");
    let build = compile_source(src, "theme.edc", &CompileOptions::default()).unwrap();
    write_artifact(&build, &path).unwrap();
    path
}

const FIVE_PROGRAMS: &str = r#"
collections { group { name: "g";
    parts { part { name: "p"; type: RECT;
        description { state: "default" 0.0; } } }
    programs {
        program { name: "p0"; action: ACTION_STOP; }
        program { name: "p1"; action: ACTION_STOP; }
        program { name: "p2"; action: ACTION_STOP; }
        program { name: "p3"; action: ACTION_STOP; }
        program { name: "p4"; action: ACTION_STOP; after: "p3"; after: "p2"; }
    }
} }
"#;

#[test]
fn program_delete_renumbers_and_rewrites_afters() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_artifact(dir.path(), FIVE_PROGRAMS);
    let mut session = EditSession::open(&path).unwrap();

    session.program_del("g", "p2").unwrap();

    let group = &session.model().groups[0];
    let names: Vec<_> = group
        .programs
        .iter()
        .map(|p| p.name.as_deref().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["p0", "p1", "p3", "p4"]);
    for (i, p) in group.programs.iter().enumerate() {
        assert_eq!(p.id.index(), i);
    }
    // p4 (now id 3): the after entry naming p2 is gone, the one naming p3
    // follows it to its new id 2.
    assert_eq!(group.programs[3].after, vec![Some(ProgramId(2))]);
}

const TWO_PARTS: &str = r#"
collections { group { name: "g"; parts {
    part { name: "under"; type: RECT;
        description { state: "default" 0.0; } }
    part { name: "over"; type: RECT; clip_to: "under";
        description { state: "default" 0.0; rel1 { to: "under"; } } }
} programs {
    program { name: "go"; action: STATE_SET "default" 0.0; target: "under"; }
} } }
"#;

#[test]
fn part_delete_drops_targets_and_unsets_references() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_artifact(dir.path(), TWO_PARTS);
    let mut session = EditSession::open(&path).unwrap();

    session.part_del("g", "under").unwrap();

    let group = &session.model().groups[0];
    assert_eq!(group.parts.len(), 1);
    assert_eq!(group.parts[0].name.as_deref(), Some("over"));
    assert_eq!(group.parts[0].id, PartId(0));
    assert_eq!(group.parts[0].clip_to, None);
    assert_eq!(group.parts[0].descriptions[0].rel1.to_x, None);
    assert!(group.programs[0].targets.is_empty());
}

#[test]
fn part_restack_switches_dependent_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_artifact(dir.path(), TWO_PARTS);
    let mut session = EditSession::open(&path).unwrap();

    session.part_restack_below("g", "over").unwrap();

    let group = &session.model().groups[0];
    assert_eq!(group.parts[0].name.as_deref(), Some("over"));
    assert_eq!(group.parts[1].name.as_deref(), Some("under"));
    // "over" now sits at id 0 and its references chased "under" to id 1.
    assert_eq!(group.parts[0].clip_to, Some(PartId(1)));
    assert_eq!(group.parts[0].descriptions[0].rel1.to_x, Some(PartId(1)));
    assert_eq!(group.programs[0].targets, vec![TargetRef::Part(PartId(1))]);

    // Already at the bottom: refused, model unchanged.
    let before = session.model().clone();
    assert!(matches!(
        session.part_restack_below("g", "over"),
        Err(EditError::Invalid(_))
    ));
    assert_eq!(before, *session.model());
}

#[test]
fn group_and_state_mutations_enforce_uniqueness() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_artifact(dir.path(), TWO_PARTS);
    let mut session = EditSession::open(&path).unwrap();

    assert!(matches!(
        session.group_add("g"),
        Err(EditError::NameTaken { .. })
    ));
    session.group_add("fresh").unwrap();
    assert_eq!(session.groups(), vec!["g", "fresh"]);

    session.part_add("fresh", "bg", PartType::Rectangle).unwrap();
    assert!(matches!(
        session.part_add("fresh", "bg", PartType::Rectangle),
        Err(EditError::NameTaken { .. })
    ));

    session.state_add("fresh", "bg", "active", 1.0).unwrap();
    assert!(matches!(
        session.state_add("fresh", "bg", "active", 1.0),
        Err(EditError::NameTaken { .. })
    ));
    assert!(matches!(
        session.state_add("fresh", "bg", "custom", 0.0),
        Err(EditError::Invalid(_))
    ));
    assert!(matches!(
        session.state_del("fresh", "bg", "default", 0.0),
        Err(EditError::Invalid(_))
    ));
    session.state_del("fresh", "bg", "active", 1.0).unwrap();
}

#[test]
fn state_copy_is_independent_of_the_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_artifact(dir.path(), TWO_PARTS);
    let mut session = EditSession::open(&path).unwrap();

    session.state_add("g", "under", "hot", 0.0).unwrap();
    session
        .state_color_set(
            "g",
            "under",
            ("default", 0.0),
            edje_model::types::Color::rgba(9, 9, 9, 9),
        )
        .unwrap();
    session
        .state_copy("g", "under", ("default", 0.0), ("hot", 0.0))
        .unwrap();

    // Mutating the copy leaves the source alone.
    session
        .state_color_set(
            "g",
            "under",
            ("hot", 0.0),
            edje_model::types::Color::rgba(1, 2, 3, 4),
        )
        .unwrap();
    let part = &session.model().groups[0].parts[0];
    assert_eq!(
        part.descriptions[0].color,
        edje_model::types::Color::rgba(9, 9, 9, 9)
    );
    assert_eq!(
        part.descriptions[1].color,
        edje_model::types::Color::rgba(1, 2, 3, 4)
    );
    assert_eq!(part.descriptions[1].state.display_name(), "hot");
}

#[test]
fn group_delete_compacts_and_rewrites_aliases() {
    let dir = tempfile::tempdir().unwrap();
    let src = r#"
collections {
    group { name: "a"; }
    group { name: "b"; alias: "b-alias"; }
    group { name: "c"; }
}
"#;
    let path = build_artifact(dir.path(), src);
    let mut session = EditSession::open(&path).unwrap();

    session.group_del("a").unwrap();

    assert_eq!(session.groups(), vec!["b", "c"]);
    let model = session.model();
    for (i, g) in model.groups.iter().enumerate() {
        assert_eq!(g.id.index(), i);
    }
    assert_eq!(model.aliases[0].id.index(), 0);
}

#[test]
fn save_round_trips_the_edited_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_artifact(dir.path(), TWO_PARTS);
    let mut session = EditSession::open(&path).unwrap();

    session.group_add("added").unwrap();
    session.part_add("added", "bg", PartType::Rectangle).unwrap();
    session.program_add("g", "late").unwrap();
    session.program_signal_set("g", "late", "show").unwrap();
    let edited = session.model().clone();
    session.save().unwrap();

    let reopened = EditSession::open(&path).unwrap();
    assert_eq!(edited, *reopened.model());
}

#[test]
fn rename_collision_is_refused_without_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_artifact(dir.path(), TWO_PARTS);
    let mut session = EditSession::open(&path).unwrap();
    let before = session.model().clone();

    assert!(matches!(
        session.part_rename("g", "over", "under"),
        Err(EditError::NameTaken { .. })
    ));
    assert!(matches!(
        session.part_rename("g", "ghost", "new"),
        Err(EditError::NotFound { .. })
    ));
    assert_eq!(before, *session.model());
}
