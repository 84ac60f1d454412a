//! Intermediate object model of the theme compiler.
//!
//! The model sits between the parsed source and the binary artifact: the
//! parser's handlers build it up, the resolver patches symbolic references
//! into typed ids, the fixup passes keep ids dense across deletions, and
//! the codec maps the whole tree onto container entries. The editing API
//! mutates the same structures under the same invariants.
//!
//! Ownership is a strict tree: the file owns tables and groups, a group
//! owns parts and programs, a part owns its descriptions and items. Every
//! cross-entity reference is a typed dense id (`Option` for "unset").

pub mod codec;
pub mod desc;
pub mod file;
pub mod fixup;
pub mod group;
pub mod intern;
pub mod part;
pub mod program;
pub mod types;

pub use desc::{Description, StateId};
pub use file::{ImageEntry, ImageSource, ThemeFile};
pub use group::{DataItem, Group, ScriptBlock, ScriptKind};
pub use intern::{Interner, Name};
pub use part::{PackItem, Part};
pub use program::{Action, Program, TargetRef};
pub use types::{GroupId, ImageId, ImageRef, PartId, PartType, ProgramId, SetId};
