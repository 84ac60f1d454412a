//! Deferred reference resolution.
//!
//! Handlers never resolve names inline: a `rel1.to` may point at a part
//! declared pages later. Instead they enqueue a lookup record naming the
//! exact field to fill, expressed as a typed slot descriptor. Part and
//! program lookups replay when their group closes; image lookups are
//! file-global and replay once the whole source is parsed.
//!
//! Slave records serve `inherit`: the child state must end up with
//! whatever id the parent's pending lookup produces, while staying
//! independently re-targetable. They replay after direct lookups, in
//! queue order, by copying the current value of the source slot.

use edc_parse::{Diag, Pos};
use edje_model::program::Action;
use edje_model::{Group, ImageRef, PartId, ProgramId, TargetRef, ThemeFile};
use tracing::trace;

/// An `Option<PartId>` field somewhere in a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartSlot {
    ClipTo { part: usize },
    DragConfine { part: usize },
    DragEvents { part: usize },
    Rel1X { part: usize, desc: usize },
    Rel1Y { part: usize, desc: usize },
    Rel2X { part: usize, desc: usize },
    Rel2Y { part: usize, desc: usize },
    TextSource { part: usize, desc: usize },
    TextTextSource { part: usize, desc: usize },
    MapPerspective { part: usize, desc: usize },
    MapLight { part: usize, desc: usize },
    MapRotCenter { part: usize, desc: usize },
    ParamCopySrc { program: usize },
    ParamCopyDst { program: usize },
    /// A `target:` entry of a part-targeted action.
    Target { program: usize, index: usize },
}

impl PartSlot {
    fn field<'g>(self, g: &'g mut Group) -> Option<&'g mut Option<PartId>> {
        use PartSlot::*;
        match self {
            ClipTo { part } => Some(&mut g.parts.get_mut(part)?.clip_to),
            DragConfine { part } => Some(&mut g.parts.get_mut(part)?.dragable.confine),
            DragEvents { part } => Some(&mut g.parts.get_mut(part)?.dragable.events),
            Rel1X { part, desc } => {
                Some(&mut g.parts.get_mut(part)?.descriptions.get_mut(desc)?.rel1.to_x)
            }
            Rel1Y { part, desc } => {
                Some(&mut g.parts.get_mut(part)?.descriptions.get_mut(desc)?.rel1.to_y)
            }
            Rel2X { part, desc } => {
                Some(&mut g.parts.get_mut(part)?.descriptions.get_mut(desc)?.rel2.to_x)
            }
            Rel2Y { part, desc } => {
                Some(&mut g.parts.get_mut(part)?.descriptions.get_mut(desc)?.rel2.to_y)
            }
            TextSource { part, desc } => {
                Some(&mut g.parts.get_mut(part)?.descriptions.get_mut(desc)?.text.source)
            }
            TextTextSource { part, desc } => Some(
                &mut g
                    .parts
                    .get_mut(part)?
                    .descriptions
                    .get_mut(desc)?
                    .text
                    .text_source,
            ),
            MapPerspective { part, desc } => Some(
                &mut g
                    .parts
                    .get_mut(part)?
                    .descriptions
                    .get_mut(desc)?
                    .map
                    .perspective,
            ),
            MapLight { part, desc } => {
                Some(&mut g.parts.get_mut(part)?.descriptions.get_mut(desc)?.map.light)
            }
            MapRotCenter { part, desc } => Some(
                &mut g
                    .parts
                    .get_mut(part)?
                    .descriptions
                    .get_mut(desc)?
                    .map
                    .rot_center,
            ),
            ParamCopySrc { program } => match g.programs.get_mut(program)?.action.as_mut()? {
                Action::ParamCopy { src, .. } => Some(src),
                _ => None,
            },
            ParamCopyDst { program } => match g.programs.get_mut(program)?.action.as_mut()? {
                Action::ParamCopy { dst, .. } => Some(dst),
                Action::ParamSet { dst, .. } => Some(dst),
                _ => None,
            },
            Target { .. } => None,
        }
    }

    fn get(self, g: &mut Group) -> Option<PartId> {
        if let PartSlot::Target { program, index } = self {
            return match g.programs.get(program)?.targets.get(index)? {
                TargetRef::Part(id) => Some(*id),
                _ => None,
            };
        }
        self.field(g).and_then(|f| *f)
    }

    fn set(self, g: &mut Group, id: PartId) {
        if let PartSlot::Target { program, index } = self {
            if let Some(t) = g
                .programs
                .get_mut(program)
                .and_then(|p| p.targets.get_mut(index))
            {
                *t = TargetRef::Part(id);
            }
            return;
        }
        if let Some(f) = self.field(g) {
            *f = Some(id);
        }
    }
}

/// An `Option<ProgramId>`-like field somewhere in a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramSlot {
    Target { program: usize, index: usize },
    After { program: usize, index: usize },
}

impl ProgramSlot {
    fn set(self, g: &mut Group, id: ProgramId) {
        match self {
            ProgramSlot::Target { program, index } => {
                if let Some(t) = g
                    .programs
                    .get_mut(program)
                    .and_then(|p| p.targets.get_mut(index))
                {
                    *t = TargetRef::Program(id);
                }
            }
            ProgramSlot::After { program, index } => {
                if let Some(a) = g
                    .programs
                    .get_mut(program)
                    .and_then(|p| p.after.get_mut(index))
                {
                    *a = Some(id);
                }
            }
        }
    }
}

/// An `Option<ImageRef>` field; group-scoped address, file-global name
/// space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Normal {
        group: usize,
        part: usize,
        desc: usize,
    },
    Tween {
        group: usize,
        part: usize,
        desc: usize,
        index: usize,
    },
}

impl ImageSlot {
    fn group(self) -> usize {
        match self {
            ImageSlot::Normal { group, .. } | ImageSlot::Tween { group, .. } => group,
        }
    }

    fn field<'f>(self, file: &'f mut ThemeFile) -> Option<&'f mut Option<ImageRef>> {
        match self {
            ImageSlot::Normal { group, part, desc } => Some(
                &mut file
                    .groups
                    .get_mut(group)?
                    .parts
                    .get_mut(part)?
                    .descriptions
                    .get_mut(desc)?
                    .image
                    .normal,
            ),
            ImageSlot::Tween {
                group,
                part,
                desc,
                index,
            } => file
                .groups
                .get_mut(group)?
                .parts
                .get_mut(part)?
                .descriptions
                .get_mut(desc)?
                .image
                .tweens
                .get_mut(index),
        }
    }

    fn get(self, file: &mut ThemeFile) -> Option<ImageRef> {
        self.field(file).and_then(|f| *f)
    }

    fn set(self, file: &mut ThemeFile, image: ImageRef) {
        if let Some(f) = self.field(file) {
            *f = Some(image);
        }
    }
}

struct PartLookup {
    name: String,
    pos: Pos,
    slot: PartSlot,
}

struct ProgramLookup {
    name: String,
    pos: Pos,
    slot: ProgramSlot,
}

struct ImageLookup {
    name: String,
    pos: Pos,
    slot: ImageSlot,
}

/// All pending lookups of a compilation. Part/program/slave queues belong
/// to the currently open group and drain when it closes; image queues
/// drain at end of parse.
#[derive(Default)]
pub struct Lookups {
    parts: Vec<PartLookup>,
    part_slaves: Vec<(PartSlot, PartSlot)>,
    programs: Vec<ProgramLookup>,
    images: Vec<ImageLookup>,
    image_slaves: Vec<(ImageSlot, ImageSlot)>,
}

impl Lookups {
    pub fn queue_part(&mut self, name: &str, pos: Pos, slot: PartSlot) {
        trace!(name, ?slot, "queue part lookup");
        self.parts.push(PartLookup {
            name: name.to_string(),
            pos,
            slot,
        });
    }

    pub fn queue_part_slave(&mut self, src: PartSlot, dst: PartSlot) {
        self.part_slaves.push((src, dst));
    }

    pub fn queue_program(&mut self, name: &str, pos: Pos, slot: ProgramSlot) {
        trace!(name, ?slot, "queue program lookup");
        self.programs.push(ProgramLookup {
            name: name.to_string(),
            pos,
            slot,
        });
    }

    pub fn queue_image(&mut self, name: &str, pos: Pos, slot: ImageSlot) {
        trace!(name, ?slot, "queue image lookup");
        self.images.push(ImageLookup {
            name: name.to_string(),
            pos,
            slot,
        });
    }

    pub fn queue_image_slave(&mut self, src: ImageSlot, dst: ImageSlot) {
        self.image_slaves.push((src, dst));
    }

    /// Replay every group-scoped lookup against the group that just
    /// closed. Direct lookups first, then slave copies in queue order so
    /// inherit chains settle front to back.
    pub fn resolve_group(&mut self, group: &mut Group) -> Result<(), Diag> {
        for lk in self.parts.drain(..) {
            let Some(id) = group.part_by_name(&lk.name) else {
                return Err(Diag::reference(
                    lk.pos,
                    format!("unable to locate part name \"{}\"", lk.name),
                ));
            };
            lk.slot.set(group, id);
        }
        for (src, dst) in self.part_slaves.drain(..) {
            if let Some(id) = src.get(group) {
                dst.set(group, id);
            }
        }
        for lk in self.programs.drain(..) {
            let Some(id) = group.program_by_name(&lk.name) else {
                return Err(Diag::reference(
                    lk.pos,
                    format!("unable to locate program name \"{}\"", lk.name),
                ));
            };
            lk.slot.set(group, id);
        }
        Ok(())
    }

    /// Replay file-global image lookups; called once after parsing.
    pub fn resolve_images(&mut self, file: &mut ThemeFile) -> Result<(), Diag> {
        for lk in self.images.drain(..) {
            let image = if let Some(id) = file.image_by_path(&lk.name) {
                ImageRef::Image(id)
            } else if let Some(id) = file.set_by_name(&lk.name) {
                ImageRef::Set(id)
            } else {
                return Err(Diag::reference(
                    lk.pos,
                    format!("unable to locate image name \"{}\"", lk.name),
                ));
            };
            lk.slot.set(file, image);
        }
        for (src, dst) in self.image_slaves.drain(..) {
            if let Some(image) = src.get(file) {
                dst.set(file, image);
            }
        }
        Ok(())
    }

    /// A group was removed from the directory: drop queued image records
    /// addressing it and shift indices of every record behind it.
    pub fn forget_group(&mut self, removed_group: usize) {
        self.images.retain(|lk| lk.slot.group() != removed_group);
        self.image_slaves
            .retain(|(src, dst)| src.group() != removed_group && dst.group() != removed_group);
        let shift = |slot: &mut ImageSlot| match slot {
            ImageSlot::Normal { group, .. } | ImageSlot::Tween { group, .. } => {
                if *group > removed_group {
                    *group -= 1;
                }
            }
        };
        for lk in &mut self.images {
            shift(&mut lk.slot);
        }
        for (src, dst) in &mut self.image_slaves {
            shift(src);
            shift(dst);
        }
    }
}
