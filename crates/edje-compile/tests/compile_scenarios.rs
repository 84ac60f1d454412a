//! End-to-end compilation scenarios over in-memory sources: the model
//! the parser builds, the ids the resolver assigns, and the diagnostics
//! bad input must produce.

use edc_parse::DiagKind;
use edje_compile::{compile_str, CompileOptions};
use edje_model::types::Color;
use edje_model::{Action, ImageRef, ImageSource, PartId, PartType, ProgramId, TargetRef};
use pretty_assertions::assert_eq;

fn compile(src: &str) -> edje_model::ThemeFile {
    compile_str(src, "test.edc", &CompileOptions::default()).expect("compilation should succeed")
}

fn compile_err(src: &str) -> edc_parse::Diag {
    compile_str(src, "test.edc", &CompileOptions::default())
        .expect_err("compilation should fail")
}

#[test]
fn trivial_group() {
    let file = compile(
        r#"collections { group { name: "g";
             parts { part { name: "bg"; type: RECT;
               description { state: "default" 0.0; color: 10 20 30 40; }
             } }
           } }"#,
    );
    assert_eq!(file.groups.len(), 1);
    let group = &file.groups[0];
    assert_eq!(group.id.0, 0);
    assert_eq!(group.name.as_deref(), Some("g"));
    assert_eq!(group.parts.len(), 1);
    let part = &group.parts[0];
    assert_eq!(part.id, PartId(0));
    assert_eq!(part.part_type, PartType::Rectangle);
    assert_eq!(part.descriptions[0].color, Color::rgba(10, 20, 30, 40));
}

#[test]
fn forward_rel_reference_resolves_at_group_close() {
    let file = compile(
        r#"collections { group { name: "g"; parts {
             part { name: "a"; type: RECT;
               description { state: "default" 0.0; rel1 { to: "b"; } } }
             part { name: "b"; type: RECT;
               description { state: "default" 0.0; } }
           } } }"#,
    );
    let a = &file.groups[0].parts[0].descriptions[0];
    assert_eq!(a.rel1.to_x, Some(PartId(1)));
    assert_eq!(a.rel1.to_y, Some(PartId(1)));
}

#[test]
fn inherit_carries_pending_reference() {
    // The parent's rel2.to is unresolved at the point of inherit; both
    // parent and child must independently land on part "c".
    let file = compile(
        r#"collections { group { name: "g"; parts {
             part { name: "a"; type: RECT;
               description { state: "default" 0.0; rel2 { to: "c"; } }
               description { state: "s1" 0.0; inherit: "default" 0.0; }
             }
             part { name: "c"; type: RECT;
               description { state: "default" 0.0; } }
           } } }"#,
    );
    let part = &file.groups[0].parts[0];
    let c = Some(PartId(1));
    assert_eq!(part.descriptions[0].rel2.to_x, c);
    assert_eq!(part.descriptions[1].rel2.to_x, c);
    assert_eq!(part.descriptions[1].rel2.to_y, c);
    assert_eq!(part.descriptions[1].state.display_name(), "s1");
}

#[test]
fn inherit_deep_copies_owned_strings() {
    let file = compile(
        r#"collections { group { name: "g"; parts {
             part { name: "t"; type: TEXT;
               description { state: "default" 0.0;
                 text { text: "hello"; font: "sans"; } }
               description { state: "big" 0.0; inherit: "default" 0.0;
                 text { text: "other"; } }
             }
           } } }"#,
    );
    let part = &file.groups[0].parts[0];
    assert_eq!(part.descriptions[0].text.text.as_deref(), Some("hello"));
    assert_eq!(part.descriptions[1].text.text.as_deref(), Some("other"));
    assert_eq!(part.descriptions[1].text.font.as_deref(), Some("sans"));
}

#[test]
fn duplicate_group_replaces_earlier_one() {
    let file = compile(
        r#"collections {
             group { name: "other"; }
             group { name: "g"; alias: "old-alias";
               parts { part { name: "p"; type: RECT;
                 description { state: "default" 0.0; } } } }
             group { name: "late"; alias: "late-alias"; }
             group { name: "g";
               parts { part { name: "q"; type: RECT;
                 description { state: "default" 0.0; } } } }
           }"#,
    );
    let names: Vec<_> = file
        .groups
        .iter()
        .map(|g| g.name.as_deref().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["other", "late", "g"]);
    for (i, g) in file.groups.iter().enumerate() {
        assert_eq!(g.id.0 as usize, i);
    }
    // The displaced group's alias is gone; the survivor's alias moved with
    // its group id.
    assert_eq!(file.aliases.len(), 1);
    assert_eq!(file.aliases[0].name.as_str(), "late-alias");
    assert_eq!(file.aliases[0].id.0, 1);
    // The surviving "g" holds the replacement's parts.
    let g = &file.groups[2];
    assert_eq!(g.parts[0].name.as_deref(), Some("q"));
}

#[test]
fn program_targets_and_afters_resolve() {
    let file = compile(
        r#"collections { group { name: "g";
             parts { part { name: "p"; type: RECT;
               description { state: "default" 0.0; } } }
             programs {
               program { name: "go"; signal: "mouse,down,1"; source: "p";
                 action: STATE_SET "default" 0.0;
                 target: "p"; after: "stop"; }
               program { name: "stop"; action: ACTION_STOP; target: "go"; }
             }
           } }"#,
    );
    let programs = &file.groups[0].programs;
    assert_eq!(programs[0].targets, vec![TargetRef::Part(PartId(0))]);
    assert_eq!(programs[0].after, vec![Some(ProgramId(1))]);
    assert_eq!(programs[1].targets, vec![TargetRef::Program(ProgramId(0))]);
    assert!(matches!(
        programs[0].action,
        Some(Action::StateSet { ref state, value }) if state == "default" && value == 0.0
    ));
}

#[test]
fn image_table_dedups_by_path() {
    let file = compile(
        r#"images {
             image: "a.png" COMP;
             image: "b.png" LOSSY 80;
             image: "a.png" COMP;
           }
           collections { group { name: "g"; parts {
             part { name: "i";
               description { state: "default" 0.0; image { normal: "b.png"; } } }
           } } }"#,
    );
    assert_eq!(file.images.len(), 2);
    assert_eq!(file.images[0].path.as_str(), "a.png");
    assert_eq!(
        file.images[1].source,
        ImageSource::InlineLossy { quality: 80 }
    );
    let desc = &file.groups[0].parts[0].descriptions[0];
    assert_eq!(desc.image.normal, Some(ImageRef::Image(file.images[1].id)));
}

#[test]
fn image_sets_share_the_global_table() {
    let file = compile(
        r#"images {
             set { name: "icon";
               image { image: "small.png" COMP; size: 0 0 32 32; }
               image { image: "large.png" COMP; size: 33 33 512 512; }
             }
           }
           collections { group { name: "g"; parts {
             part { name: "i";
               description { state: "default" 0.0; image { normal: "icon"; } } }
           } } }"#,
    );
    assert_eq!(file.images.len(), 2);
    assert_eq!(file.sets.len(), 1);
    let set = &file.sets[0];
    assert_eq!(set.entries[0].image, Some(file.images[0].id));
    let desc = &file.groups[0].parts[0].descriptions[0];
    assert_eq!(desc.image.normal, Some(ImageRef::Set(set.id)));
}

#[test]
fn dragable_count_round_trips_through_the_model() {
    let file = compile(
        r#"collections { group { name: "g"; parts {
             part { name: "knob"; type: RECT;
               dragable { x: 1 4 7; y: -1 2 9; confine: "knob"; }
               description { state: "default" 0.0; } }
           } } }"#,
    );
    let d = &file.groups[0].parts[0].dragable;
    assert_eq!((d.x, d.step_x, d.count_x), (1, 4, 7));
    assert_eq!((d.y, d.step_y, d.count_y), (-1, 2, 9));
    assert_eq!(d.confine, Some(PartId(0)));
}

#[test]
fn range_violation_reports_kind_and_line() {
    let err = compile_err(
        "collections { group { name: \"g\";\nparts { part { name: \"p\"; type: RECT;\ndescription { state: \"default\" 0.0;\ncolor: 10 20 30 999;\n} } } } }",
    );
    assert_eq!(err.kind, DiagKind::Range);
    assert_eq!(err.pos.line, 4);
    assert!(err.to_string().contains("test.edc:4"));
}

#[test]
fn unresolved_part_reference_is_fatal() {
    let err = compile_err(
        r#"collections { group { name: "g"; parts {
             part { name: "a"; type: RECT;
               description { state: "default" 0.0; rel1 { to: "ghost"; } } }
           } } }"#,
    );
    assert_eq!(err.kind, DiagKind::Reference);
    assert!(err.msg.contains("ghost"));
}

#[test]
fn reserved_state_name_is_rejected() {
    let err = compile_err(
        r#"collections { group { name: "g"; parts {
             part { name: "p"; type: RECT;
               description { state: "custom" 0.0; } }
           } } }"#,
    );
    assert_eq!(err.kind, DiagKind::Semantic);
}

#[test]
fn inherit_before_state_is_rejected() {
    let err = compile_err(
        r#"collections { group { name: "g"; parts {
             part { name: "p"; type: RECT;
               description { state: "default" 0.0; }
               description { inherit: "default" 0.0; } }
           } } }"#,
    );
    assert_eq!(err.kind, DiagKind::Semantic);
    assert!(err.msg.contains("after state"));
}

#[test]
fn inherit_on_default_description_is_rejected() {
    let err = compile_err(
        r#"collections { group { name: "g"; parts {
             part { name: "p"; type: RECT;
               description { state: "default" 0.0; inherit: "default" 0.0; } }
           } } }"#,
    );
    assert_eq!(err.kind, DiagKind::Semantic);
    assert!(err.msg.contains("default description"));
}

#[test]
fn target_before_action_is_rejected() {
    let err = compile_err(
        r#"collections { group { name: "g"; programs {
             program { name: "p"; target: "x"; }
           } } }"#,
    );
    assert_eq!(err.kind, DiagKind::Semantic);
    assert!(err.msg.contains("after action"));
}

#[test]
fn duplicate_part_name_is_rejected() {
    let err = compile_err(
        r#"collections { group { name: "g"; parts {
             part { name: "p"; type: RECT; description { state: "default" 0.0; } }
             part { name: "p"; type: RECT; description { state: "default" 0.0; } }
           } } }"#,
    );
    assert_eq!(err.kind, DiagKind::Uniqueness);
}

#[test]
fn box_properties_on_plain_part_are_context_errors() {
    let err = compile_err(
        r#"collections { group { name: "g"; parts {
             part { name: "p"; type: RECT;
               box { items { item { source: "x"; } } }
               description { state: "default" 0.0; } }
           } } }"#,
    );
    assert_eq!(err.kind, DiagKind::Context);
}

#[test]
fn table_position_on_box_part_is_a_context_error() {
    let err = compile_err(
        r#"collections { group { name: "g"; parts {
             part { name: "p"; type: BOX;
               table { items { item { source: "x"; position: 0 0; } } }
               description { state: "default" 0.0; } }
           } } }"#,
    );
    assert_eq!(err.kind, DiagKind::Context);
}

#[test]
fn image_property_on_rect_part_is_a_context_error() {
    let err = compile_err(
        r#"images { image: "a.png" COMP; }
           collections { group { name: "g"; parts {
             part { name: "p"; type: RECT;
               description { state: "default" 0.0; image { normal: "a.png"; } } }
           } } }"#,
    );
    assert_eq!(err.kind, DiagKind::Context);
}

#[test]
fn set_size_window_must_be_ordered() {
    let err = compile_err(
        r#"images { set { name: "s";
             image { image: "a.png" COMP; size: 100 100 10 10; }
           } }"#,
    );
    assert_eq!(err.kind, DiagKind::Range);
    assert!(err.msg.contains("right order"));
}

#[test]
fn mixing_embryo_and_lua_is_rejected() {
    let err = compile_err(
        "collections { group { name: \"g\";\nscript { public x() { return 1; } }\nlua_script { local x = 1 }\n} }",
    );
    assert_eq!(err.kind, DiagKind::Semantic);
}

#[test]
fn scripts_are_captured_verbatim() {
    let file = compile(
        "collections { group { name: \"g\";\nscript {\npublic clicked() { emit(\"x\", \"y\"); }\n}\nprograms { program { name: \"p\"; signal: \"s\"; source: \"*\";\nscript { run_program(PROGRAM:\"p\"); }\n} } } }",
    );
    let group = &file.groups[0];
    let shared = group.script.shared.as_deref().unwrap();
    assert!(shared.contains("public clicked() { emit(\"x\", \"y\"); }"));
    assert_eq!(group.script.programs.len(), 1);
    assert!(matches!(group.programs[0].action, Some(Action::Script)));
}

#[test]
fn unknown_enum_label_is_an_enumeration_error() {
    let err = compile_err(
        r#"collections { group { name: "g"; parts {
             part { name: "p"; type: SIDEWAYS;
               description { state: "default" 0.0; } }
           } } }"#,
    );
    assert_eq!(err.kind, DiagKind::Enumeration);
}

#[test]
fn unknown_property_is_a_syntax_error() {
    let err = compile_err(r#"collections { group { name: "g"; frobnicate: 1; } }"#);
    assert_eq!(err.kind, DiagKind::Syntax);
    assert!(err.msg.contains("frobnicate"));
}

#[test]
fn group_data_and_part_aliases_are_kept() {
    let file = compile(
        r#"collections { group { name: "g";
             data { item: "key" "value"; }
             parts {
               alias: "shown" "real";
               part { name: "real"; type: RECT;
                 description { state: "default" 0.0; } }
             }
           } }"#,
    );
    let group = &file.groups[0];
    assert_eq!(group.data[0].key.as_str(), "key");
    assert_eq!(group.data[0].value, "value");
    assert_eq!(group.part_aliases.len(), 1);
    assert_eq!(group.part_aliases[0].0.as_str(), "shown");
}

#[test]
fn resource_blocks_are_reachable_from_nested_scopes() {
    // The same image/font/style declarations may appear at file level,
    // under collections, groups, parts, a part, or a description's image
    // block; all of them feed the file-global tables.
    let file = compile(
        r#"images { image: "top.png" COMP; }
           collections {
             image: "collections.png" COMP;
             group { name: "g";
               images { image: "group.png" COMP; }
               fonts { font: "a.ttf" "alias-a"; }
               parts {
                 image: "parts.png" COMP;
                 part { name: "p";
                   font: "b.ttf" "alias-b";
                   images { image: "part.png" COMP; }
                   description { state: "default" 0.0;
                     image { image: "desc.png" COMP; normal: "desc.png"; }
                   }
                 }
               }
               programs {
                 image: "programs.png" COMP;
                 program { name: "noop"; action: ACTION_STOP; }
               }
             }
           }"#,
    );
    let paths: Vec<_> = file.images.iter().map(|i| i.path.to_string()).collect();
    assert_eq!(
        paths,
        vec![
            "top.png",
            "collections.png",
            "group.png",
            "parts.png",
            "part.png",
            "desc.png",
            "programs.png",
        ]
    );
    for (i, img) in file.images.iter().enumerate() {
        assert_eq!(img.id.index(), i);
    }
    assert_eq!(file.fonts.len(), 2);
    let desc = &file.groups[0].parts[0].descriptions[0];
    assert_eq!(desc.image.normal, Some(ImageRef::Image(file.images[5].id)));
}

#[test]
fn program_sugar_paths_share_semantics() {
    // `program` straight in the group, nested in a part, and under the
    // plural block are the same construct.
    let file = compile(
        r#"collections { group { name: "g";
             program { name: "a"; action: ACTION_STOP; }
             parts {
               part { name: "p"; type: RECT;
                 description { state: "default" 0.0; }
                 program { name: "b"; action: ACTION_STOP; target: "a"; }
               }
             }
             programs { program { name: "c"; action: ACTION_STOP; target: "b"; } }
           } }"#,
    );
    let programs = &file.groups[0].programs;
    let names: Vec<_> = programs
        .iter()
        .map(|p| p.name.as_deref().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(programs[1].targets, vec![TargetRef::Program(ProgramId(0))]);
    assert_eq!(programs[2].targets, vec![TargetRef::Program(ProgramId(1))]);
}

#[test]
fn duplicate_program_name_is_rejected() {
    let err = compile_err(
        r#"collections { group { name: "g"; programs {
             program { name: "p"; action: ACTION_STOP; }
             program { name: "p"; action: ACTION_STOP; }
           } } }"#,
    );
    assert_eq!(err.kind, DiagKind::Uniqueness);
}

#[test]
fn duplicate_state_within_part_is_rejected() {
    let err = compile_err(
        r#"collections { group { name: "g"; parts {
             part { name: "p"; type: RECT;
               description { state: "default" 0.0; }
               description { state: "active" 0.5; }
               description { state: "active" 0.5; }
             }
           } } }"#,
    );
    assert_eq!(err.kind, DiagKind::Uniqueness);
}

#[test]
fn external_parts_collect_typed_params() {
    use edje_model::desc::ParamValue;
    let file = compile(
        r#"externals { external: "elm"; }
           collections { group { name: "g"; parts {
             part { name: "w"; type: EXTERNAL; source: "elm/button";
               description { state: "default" 0.0;
                 params { int: "count" 3; string: "label" "hi";
                          bool: "on" 1; double: "weight" 0.5;
                          string: "label" "bye"; }
               } }
           } } }"#,
    );
    assert_eq!(file.externals.len(), 1);
    let params = &file.groups[0].parts[0].descriptions[0].external_params;
    assert_eq!(params.len(), 4);
    // Redeclared "label" overwrote in place.
    assert_eq!(params[1].value, ParamValue::String("bye".to_string()));
    assert_eq!(params[0].value, ParamValue::Int(3));
}
