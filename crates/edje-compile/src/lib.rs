//! The theme compiler: handler table, reference resolver, resource
//! importer and binary serializer on top of the `edc-parse` front end.
//!
//! Pipeline: parse source into the model via the handler table, resolve
//! queued part/program lookups at each group close and image lookups at
//! end of parse, validate, then write the artifact (header, collections,
//! imported resources, scripts, regenerated canonical source).

pub mod build;
pub mod handlers;
pub mod import;
pub mod lookup;
pub mod out;
pub mod sources;
pub mod table;
pub mod validate;

use build::Build;
use edc_parse::Diag;
use edje_config::SearchPaths;
use edje_model::ThemeFile;
use std::path::Path;
use table::Session;
use tracing::info;

/// Knobs of one compilation run.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Compiler tag stamped into the artifact header.
    pub compiler: String,
    pub paths: SearchPaths,
    /// Whether to embed the regenerated canonical source.
    pub embed_sources: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            compiler: "edje_cc".to_string(),
            paths: SearchPaths::default(),
            embed_sources: true,
        }
    }
}

/// Parse, resolve and validate a source string, returning the full build
/// state (model plus importer bookkeeping). The front half of
/// [`compile_to_file`]; serialization consumes the result.
pub fn compile_source(src: &str, file_name: &str, opts: &CompileOptions) -> Result<Build, Diag> {
    let table = table::HandlerTable::new();
    let build = Build::new(opts.clone());
    let mut session = Session::new(&table, build);
    edc_parse::parse(src, file_name, &mut session)?;
    let mut build = session.into_build();
    build.lookups.resolve_images(&mut build.file)?;
    validate::validate(&build, file_name)?;
    info!(
        groups = build.file.groups.len(),
        images = build.file.images.len(),
        "source compiled"
    );
    Ok(build)
}

/// Convenience wrapper returning just the model.
pub fn compile_str(src: &str, file_name: &str, opts: &CompileOptions) -> Result<ThemeFile, Diag> {
    compile_source(src, file_name, opts).map(|b| b.file)
}

/// Full pipeline: read `input`, compile, import resources and write the
/// artifact at `output`.
pub fn compile_to_file(input: &Path, output: &Path, opts: &CompileOptions) -> Result<(), Diag> {
    let file_name = input.display().to_string();
    let src = std::fs::read_to_string(input).map_err(|e| {
        Diag::resource(
            edc_parse::Pos::new(&std::sync::Arc::from(file_name.as_str()), 0),
            format!("cannot read input file: {e}"),
        )
    })?;
    let build = compile_source(&src, &file_name, opts)?;
    out::write_artifact(&build, output)?;
    info!(output = %output.display(), "artifact written");
    Ok(())
}
