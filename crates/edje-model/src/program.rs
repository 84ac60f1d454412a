//! Programs: triggered rules inside a group.

use crate::intern::Name;
use crate::types::{Api, PartId, ProgramId, TweenMode};

/// What a program does when its signal/source patterns match.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    StateSet { state: String, value: f64 },
    ActionStop,
    SignalEmit { signal: String, source: String },
    DragValSet { x: f64, y: f64 },
    DragValStep { x: f64, y: f64 },
    DragValPage { x: f64, y: f64 },
    Script,
    LuaScript,
    FocusSet,
    FocusObject,
    ParamCopy {
        src: Option<PartId>,
        src_param: String,
        dst: Option<PartId>,
        dst_param: String,
    },
    ParamSet {
        dst: Option<PartId>,
        param: String,
        value: String,
    },
}

impl Action {
    /// Whether `target:` statements on this action reference parts (true)
    /// or programs (false). `None` for actions that take no targets.
    pub fn target_is_part(&self) -> Option<bool> {
        match self {
            Action::StateSet { .. }
            | Action::DragValSet { .. }
            | Action::DragValStep { .. }
            | Action::DragValPage { .. }
            | Action::FocusSet => Some(true),
            Action::ActionStop => Some(false),
            _ => None,
        }
    }
}

/// One `target:` entry; the referent kind follows the program's action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRef {
    /// Queued but not yet resolved.
    Unset,
    Part(PartId),
    Program(ProgramId),
}

/// Optional guard: run only while `part` (or the signal source) sits in
/// state `state`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filter {
    pub part: Option<Name>,
    pub state: Option<Name>,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.part.is_none() && self.state.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub name: Option<Name>,
    pub id: ProgramId,
    pub signal: Option<String>,
    pub source: Option<String>,
    pub filter: Filter,
    /// Delay: fixed seconds plus a random range.
    pub in_: (f64, f64),
    pub action: Option<Action>,
    pub transition: TweenMode,
    pub transition_time: f64,
    pub targets: Vec<TargetRef>,
    pub after: Vec<Option<ProgramId>>,
    pub api: Option<Api>,
}

impl Program {
    pub fn new(id: ProgramId) -> Self {
        Self {
            name: None,
            id,
            signal: None,
            source: None,
            filter: Filter::default(),
            in_: (0.0, 0.0),
            action: None,
            transition: TweenMode::Linear,
            transition_time: 0.0,
            targets: Vec::new(),
            after: Vec::new(),
            api: None,
        }
    }
}
