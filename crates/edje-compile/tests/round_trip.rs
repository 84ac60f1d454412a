//! Artifact round-trip properties: write → read equality, regenerated
//! canonical source re-parsing to an equal model, and byte-stable
//! serialization.

use edje_compile::out::{read_artifact, read_sources, write_artifact};
use edje_compile::{compile_source, compile_str, sources, CompileOptions};
use edje_container::BlobReader;
use pretty_assertions::assert_eq;

const THEME: &str = r#"
images {
    image: "decoration.png" USER;
}
data {
    item: "version" "2";
}
styles {
    style { name: "entry"; base: "font=default size=12";
            tag: "b" "+ font_weight=bold"; }
}
color_classes {
    color_class { name: "accent"; color: 51 153 255 255; }
}
collections {
    group { name: "widget"; alias: "widget/legacy"; min: 64 32;
        data { item: "role" "button"; }
        script {
            public pressed;
        }
        parts {
            alias: "label" "text";
            part { name: "bg"; type: RECT;
                description { state: "default" 0.0;
                    color_class: "accent";
                    color: 200 200 200 255;
                }
                description { state: "pressed" 0.0; inherit: "default" 0.0;
                    color: 100 100 100 255;
                }
            }
            part { name: "text"; type: TEXT; effect: SOFT_SHADOW;
                clip_to: "bg";
                description { state: "default" 0.0;
                    rel1 { relative: 0.1 0.1; to: "bg"; }
                    rel2 { relative: 0.9 0.9; offset: -2 -2; to_x: "bg"; }
                    text { text: "Ok"; font: "default"; size: 12;
                           align: 0.5 0.5; min: 1 1; }
                }
            }
            part { name: "grab"; type: RECT; repeat_events: 1;
                dragable { x: 1 2 0; y: 0 0 0; confine: "bg"; }
                description { state: "default" 0.0; visible: 0; }
            }
        }
        programs {
            program { name: "down"; signal: "mouse,down,1"; source: "grab";
                action: STATE_SET "pressed" 0.0;
                transition: SINUSOIDAL 0.2;
                target: "bg"; after: "notify";
            }
            program { name: "notify";
                action: SIGNAL_EMIT "widget,pressed" "";
            }
            program { name: "halt"; signal: "widget,halt"; source: "*";
                action: ACTION_STOP; target: "down";
            }
        }
    }
    group { name: "screen";
        parts {
            part { name: "content"; type: GROUP; source: "widget";
                description { state: "default" 0.0; }
            }
        }
    }
}
"#;

#[test]
fn artifact_read_matches_written_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("theme.edj");
    let build = compile_source(THEME, "theme.edc", &CompileOptions::default()).unwrap();
    write_artifact(&build, &path).unwrap();

    let (read_back, _pool) = read_artifact(&path).unwrap();
    assert_eq!(build.file, read_back);

    let reader = BlobReader::open(&path).unwrap();
    assert!(reader.contains("edje_file"));
    assert!(reader.contains("collections/0"));
    assert!(reader.contains("collections/1"));
    assert!(reader.contains("scripts/0"));
}

#[test]
fn fonts_are_embedded_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let font_bytes = b"not really a font, but faithful bytes";
    std::fs::write(dir.path().join("Vera.ttf"), font_bytes).unwrap();

    let src = r#"
fonts { font: "Vera.ttf" "default"; }
collections { group { name: "g"; } }
"#;
    let mut opts = CompileOptions::default();
    opts.paths.font_dirs.push(dir.path().to_path_buf());
    let build = compile_source(src, "theme.edc", &opts).unwrap();
    let out_path = dir.path().join("theme.edj");
    write_artifact(&build, &out_path).unwrap();

    let reader = BlobReader::open(&out_path).unwrap();
    assert_eq!(reader.get("fonts/default"), Some(&font_bytes[..]));
}

#[test]
fn regenerated_source_reparses_to_an_equal_model() {
    let opts = CompileOptions::default();
    let first = compile_str(THEME, "theme.edc", &opts).unwrap();
    let regen = sources::generate(&first);
    let second = compile_str(&regen, "regen.edc", &opts)
        .unwrap_or_else(|e| panic!("regenerated source failed to parse: {e}\n---\n{regen}"));
    assert_eq!(first, second);
}

#[test]
fn regeneration_is_a_fixed_point() {
    let opts = CompileOptions::default();
    let first = compile_str(THEME, "theme.edc", &opts).unwrap();
    let regen = sources::generate(&first);
    let second = compile_str(&regen, "regen.edc", &opts).unwrap();
    // Once canonicalized, the text itself is stable.
    assert_eq!(regen, sources::generate(&second));
}

#[test]
fn serialization_is_byte_stable() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.edj");
    let b = dir.path().join("b.edj");
    let build = compile_source(THEME, "theme.edc", &CompileOptions::default()).unwrap();
    write_artifact(&build, &a).unwrap();
    write_artifact(&build, &b).unwrap();
    assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
}

#[test]
fn embedded_sources_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("theme.edj");
    let build = compile_source(THEME, "theme.edc", &CompileOptions::default()).unwrap();
    write_artifact(&build, &path).unwrap();

    let reader = BlobReader::open(&path).unwrap();
    let entries = read_sources(&reader).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "generated.edc");
    let reparsed = compile_str(&entries[0].1, "embedded.edc", &CompileOptions::default()).unwrap();
    assert_eq!(build.file, reparsed);
}

#[test]
fn inline_images_are_imported_and_encoded() {
    let dir = tempfile::tempdir().unwrap();
    // A tiny 2x2 image on disk for the importer to find.
    let img_path = dir.path().join("dot.png");
    let mut img = image::RgbaImage::new(2, 2);
    img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
    img.save(&img_path).unwrap();

    let src = r#"
images { image: "dot.png" COMP; image: "dot2.png" LOSSY 60; }
collections { group { name: "g"; parts {
    part { name: "i";
        description { state: "default" 0.0; image { normal: "dot.png"; } } }
} } }
"#;
    std::fs::copy(&img_path, dir.path().join("dot2.png")).unwrap();
    let mut opts = CompileOptions::default();
    opts.paths.image_dirs.push(dir.path().to_path_buf());

    let build = compile_source(src, "theme.edc", &opts).unwrap();
    let out_path = dir.path().join("theme.edj");
    write_artifact(&build, &out_path).unwrap();

    let reader = BlobReader::open(&out_path).unwrap();
    let png_blob = reader.get("images/0").expect("COMP image embedded");
    let jpeg_blob = reader.get("images/1").expect("LOSSY image embedded");
    // Payload: tag, width, height, then the encoded pixel run.
    assert_eq!(png_blob[0], 1);
    assert_eq!(jpeg_blob[0], 2);
}

#[test]
fn missing_inline_image_aborts_the_write() {
    let dir = tempfile::tempdir().unwrap();
    let src = r#"
images { image: "nowhere.png" COMP; }
collections { group { name: "g"; } }
"#;
    let build = compile_source(src, "theme.edc", &CompileOptions::default()).unwrap();
    let out_path = dir.path().join("theme.edj");
    let err = write_artifact(&build, &out_path).unwrap_err();
    assert_eq!(err.kind, edc_parse::DiagKind::Resource);
    // Best effort: no partial artifact left behind.
    assert!(!out_path.exists());
}
