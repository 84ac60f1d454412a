use criterion::{criterion_group, criterion_main, Criterion};
use edc_parse::{parse, Args, BlockKind, Diag, Dispatch, Pos, Verbatim};
use std::hint::black_box;

/// Sink that accepts everything; measures driver + lexer throughput
/// without handler-table cost.
struct Sink;

impl Dispatch for Sink {
    fn open(&mut self, _path: &str, _pos: Pos) -> Result<BlockKind, Diag> {
        Ok(BlockKind::Container)
    }
    fn close(&mut self, _path: &str, _pos: Pos) -> Result<(), Diag> {
        Ok(())
    }
    fn statement(&mut self, _path: &str, args: Args) -> Result<(), Diag> {
        black_box(args.len());
        Ok(())
    }
    fn verbatim(&mut self, _path: &str, _body: Verbatim) -> Result<(), Diag> {
        Ok(())
    }
}

fn synthetic_theme(groups: usize, parts: usize) -> String {
    let mut src = String::from("collections {\n");
    for g in 0..groups {
        src.push_str(&format!("  group {{ name: \"g{g}\";\n    parts {{\n"));
        for p in 0..parts {
            src.push_str(&format!(
                "      part {{ name: \"p{p}\"; type: RECT;\n        description {{ state: \"default\" 0.0; color: 128 128 128 255; rel1 {{ relative: 0.0 0.0; }} }}\n      }}\n"
            ));
        }
        src.push_str("    }\n  }\n");
    }
    src.push_str("}\n");
    src
}

fn bench_parse(c: &mut Criterion) {
    let src = synthetic_theme(8, 32);
    c.bench_function("parse_8x32", |b| {
        b.iter(|| {
            let mut sink = Sink;
            parse(black_box(&src), "bench.edc", &mut sink).unwrap();
        })
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
