//! Groups (collections): the unit of compilation output.

use crate::intern::Name;
use crate::part::Part;
use crate::program::Program;
use crate::types::{GroupId, PartId, ProgramId};

/// Embedded scripting language of a group. A group commits to one or the
/// other the first time any script block appears; mixing is rejected by
/// the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    Embryo,
    Lua,
}

/// Verbatim script text tied to a group: an optional shared block plus
/// per-program snippets keyed by program id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScriptBlock {
    pub kind: Option<ScriptKind>,
    pub shared: Option<String>,
    pub programs: Vec<(ProgramId, String)>,
}

impl ScriptBlock {
    pub fn is_empty(&self) -> bool {
        self.shared.is_none() && self.programs.is_empty()
    }

    pub fn snippet_for(&self, id: ProgramId) -> Option<&str> {
        self.programs
            .iter()
            .find(|(pid, _)| *pid == id)
            .map(|(_, s)| s.as_str())
    }
}

/// Key/value string attached to the file or to a group.
#[derive(Debug, Clone, PartialEq)]
pub struct DataItem {
    pub key: Name,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: Option<Name>,
    pub id: GroupId,
    pub min: (i32, i32),
    pub max: (i32, i32),
    pub script_only: bool,
    pub lua_script_only: bool,
    pub data: Vec<DataItem>,
    pub parts: Vec<Part>,
    pub programs: Vec<Program>,
    /// `parts.alias: "visible name" "real part";`
    pub part_aliases: Vec<(Name, Name)>,
    pub script: ScriptBlock,
}

impl Group {
    pub fn new(id: GroupId) -> Self {
        Self {
            name: None,
            id,
            min: (0, 0),
            max: (0, 0),
            script_only: false,
            lua_script_only: false,
            data: Vec::new(),
            parts: Vec::new(),
            programs: Vec::new(),
            part_aliases: Vec::new(),
            script: ScriptBlock::default(),
        }
    }

    pub fn part_by_name(&self, name: &str) -> Option<PartId> {
        self.parts
            .iter()
            .find(|p| p.name.as_deref() == Some(name))
            .map(|p| p.id)
    }

    pub fn program_by_name(&self, name: &str) -> Option<ProgramId> {
        self.programs
            .iter()
            .find(|p| p.name.as_deref() == Some(name))
            .map(|p| p.id)
    }

    pub fn current_part_mut(&mut self) -> Option<&mut Part> {
        self.parts.last_mut()
    }

    pub fn current_program_mut(&mut self) -> Option<&mut Program> {
        self.programs.last_mut()
    }
}
