//! Mutable compilation state threaded through every handler.
//!
//! The original discipline here is "the current entity is the last one
//! appended to its list". That implicit rule becomes an explicit cursor
//! struct: open-handlers record the index of the entity they create, and
//! statement handlers address their target through the cursor. No global
//! state; one [`Build`] per compilation.

use crate::lookup::Lookups;
use crate::CompileOptions;
use ahash::AHashMap;
use edc_parse::{Diag, Pos};
use edje_model::desc::Description;
use edje_model::file::{ColorClass, ImageSet, Style};
use edje_model::part::{PackItem, Part};
use edje_model::{Group, Interner, Program, ThemeFile};

/// Indices of the entities statements currently apply to. Everything is
/// append-only while a group is open, so indices stay valid until the
/// enclosing scope closes.
#[derive(Debug, Default, Clone)]
pub struct Cursor {
    pub set: Option<usize>,
    pub style: Option<usize>,
    pub color_class: Option<usize>,
    pub group: Option<usize>,
    pub part: Option<usize>,
    pub desc: Option<usize>,
    pub item: Option<usize>,
    pub program: Option<usize>,
}

pub struct Build {
    pub file: ThemeFile,
    pub pool: Interner,
    pub lookups: Lookups,
    pub opts: CompileOptions,
    pub cur: Cursor,
    /// Where each image entry was declared; importer diagnostics point
    /// back at the declaration.
    pub image_decl: AHashMap<u32, Pos>,
    /// Same for fonts, keyed by alias.
    pub font_decl: AHashMap<String, Pos>,
}

impl Build {
    pub fn new(opts: CompileOptions) -> Self {
        let mut file = ThemeFile::new();
        file.compiler = opts.compiler.clone();
        Self {
            file,
            pool: Interner::new(),
            lookups: Lookups::default(),
            opts,
            cur: Cursor::default(),
            image_decl: AHashMap::new(),
            font_decl: AHashMap::new(),
        }
    }

    fn missing(pos: &Pos, what: &str) -> Diag {
        Diag::context(pos.clone(), format!("{what} attributes outside a {what}"))
    }

    pub fn group_mut(&mut self, pos: &Pos) -> Result<&mut Group, Diag> {
        let idx = self.cur.group.ok_or_else(|| Self::missing(pos, "group"))?;
        self.file
            .groups
            .get_mut(idx)
            .ok_or_else(|| Self::missing(pos, "group"))
    }

    pub fn part_mut(&mut self, pos: &Pos) -> Result<&mut Part, Diag> {
        let part = self.cur.part.ok_or_else(|| Self::missing(pos, "part"))?;
        self.group_mut(pos)?
            .parts
            .get_mut(part)
            .ok_or_else(|| Self::missing(pos, "part"))
    }

    pub fn desc_mut(&mut self, pos: &Pos) -> Result<&mut Description, Diag> {
        let desc = self
            .cur
            .desc
            .ok_or_else(|| Self::missing(pos, "description"))?;
        self.part_mut(pos)?
            .descriptions
            .get_mut(desc)
            .ok_or_else(|| Self::missing(pos, "description"))
    }

    pub fn item_mut(&mut self, pos: &Pos) -> Result<&mut PackItem, Diag> {
        let item = self.cur.item.ok_or_else(|| Self::missing(pos, "item"))?;
        self.part_mut(pos)?
            .items
            .get_mut(item)
            .ok_or_else(|| Self::missing(pos, "item"))
    }

    pub fn program_mut(&mut self, pos: &Pos) -> Result<&mut Program, Diag> {
        let program = self
            .cur
            .program
            .ok_or_else(|| Self::missing(pos, "program"))?;
        self.group_mut(pos)?
            .programs
            .get_mut(program)
            .ok_or_else(|| Self::missing(pos, "program"))
    }

    pub fn set_mut(&mut self, pos: &Pos) -> Result<&mut ImageSet, Diag> {
        let set = self.cur.set.ok_or_else(|| Self::missing(pos, "set"))?;
        self.file
            .sets
            .get_mut(set)
            .ok_or_else(|| Self::missing(pos, "set"))
    }

    pub fn style_mut(&mut self, pos: &Pos) -> Result<&mut Style, Diag> {
        let style = self.cur.style.ok_or_else(|| Self::missing(pos, "style"))?;
        self.file
            .styles
            .get_mut(style)
            .ok_or_else(|| Self::missing(pos, "style"))
    }

    pub fn color_class_mut(&mut self, pos: &Pos) -> Result<&mut ColorClass, Diag> {
        let cc = self
            .cur
            .color_class
            .ok_or_else(|| Self::missing(pos, "color_class"))?;
        self.file
            .color_classes
            .get_mut(cc)
            .ok_or_else(|| Self::missing(pos, "color_class"))
    }

    /// Index of the currently open group, for lookup slot addressing.
    pub fn group_index(&self, pos: &Pos) -> Result<usize, Diag> {
        self.cur.group.ok_or_else(|| Self::missing(pos, "group"))
    }

    pub fn part_index(&self, pos: &Pos) -> Result<usize, Diag> {
        self.cur.part.ok_or_else(|| Self::missing(pos, "part"))
    }

    pub fn desc_index(&self, pos: &Pos) -> Result<usize, Diag> {
        self.cur
            .desc
            .ok_or_else(|| Self::missing(pos, "description"))
    }

    pub fn program_index(&self, pos: &Pos) -> Result<usize, Diag> {
        self.cur
            .program
            .ok_or_else(|| Self::missing(pos, "program"))
    }
}
