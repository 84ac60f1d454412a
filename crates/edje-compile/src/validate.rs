//! Post-parse validation: everything that can only be judged once the
//! whole source has been read and references resolved.

use crate::build::Build;
use edc_parse::{Diag, Pos};
use std::sync::Arc;

/// Structural checks on the finished model. Reference resolution has
/// already run; this pass catches what handlers could not see locally.
/// Diagnostics point at the end of the input (`line 0`) since the
/// offending construct is an omission, not a statement.
pub fn validate(b: &Build, file_name: &str) -> Result<(), Diag> {
    let file: Arc<str> = Arc::from(file_name);
    let fail = |kind: fn(Pos, String) -> Diag, msg: String| Err(kind(Pos::new(&file, 0), msg));

    for set in &b.file.sets {
        if set.name.is_none() {
            return fail(Diag::semantic, "image set is missing a name".to_string());
        }
        for entry in &set.entries {
            if entry.path.is_none() || entry.image.is_none() {
                return fail(
                    Diag::semantic,
                    format!(
                        "set \"{}\" has an image block without an image",
                        set.name.as_deref().unwrap_or_default()
                    ),
                );
            }
        }
    }

    for group in &b.file.groups {
        let Some(gname) = group.name.as_deref() else {
            return fail(Diag::semantic, "group is missing a name".to_string());
        };
        for (i, part) in group.parts.iter().enumerate() {
            debug_assert_eq!(part.id.index(), i);
            if part.descriptions.is_empty() {
                return fail(
                    Diag::semantic,
                    format!(
                        "part \"{}\" in group \"{gname}\" has no default description",
                        part.name.as_deref().unwrap_or("<unnamed>")
                    ),
                );
            }
        }
        for (i, program) in group.programs.iter().enumerate() {
            debug_assert_eq!(program.id.index(), i);
        }
    }
    Ok(())
}
