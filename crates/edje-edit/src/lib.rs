//! In-place mutation of a compiled theme artifact.
//!
//! An [`EditSession`] loads the model out of an artifact, exposes
//! invariant-preserving mutations (unique names per scope, dense ids,
//! ownership tree), and re-serializes on demand. A mutation that would
//! violate an invariant returns an error and leaves the model untouched.
//! Resource blobs (images, fonts) are copied through from the source
//! artifact on save; the editing layer never re-imports from disk.

use edje_compile::out::{self, ReadError, KEY_HEADER, KEY_SOURCES};
use edje_compile::sources;
use edje_container::{BlobReader, BlobWriter, ContainerError, EntryWriter};
use edje_model::desc::{Description, StateId};
use edje_model::file::GroupAlias;
use edje_model::group::ScriptKind;
use edje_model::part::Part;
use edje_model::types::{Color, GroupId, PartId, PartType, ProgramId};
use edje_model::{fixup, Group, Interner, Program, ThemeFile};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum EditError {
    #[error("no {kind} named \"{name}\"")]
    NotFound { kind: &'static str, name: String },
    #[error("a {kind} named \"{name}\" already exists")]
    NameTaken { kind: &'static str, name: String },
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Container(#[from] ContainerError),
}

pub type Result<T> = std::result::Result<T, EditError>;

fn invalid(msg: impl Into<String>) -> EditError {
    EditError::Invalid(msg.into())
}

pub struct EditSession {
    file: ThemeFile,
    pool: Interner,
    path: PathBuf,
    /// For each image entry, the id it had when the artifact was opened
    /// (`None` for entries added in this session). Deleting entries
    /// renumbers ids, and save uses this to move each surviving blob to
    /// its current key.
    image_origin: Vec<Option<u32>>,
    /// Same idea for fonts, keyed by the alias the blob was stored under
    /// at open time; rename keeps the pixels reachable.
    font_origin: Vec<Option<String>>,
}

impl EditSession {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let (file, pool) = out::read_artifact(&path)?;
        let image_origin = file.images.iter().map(|i| Some(i.id.0)).collect();
        let font_origin = file
            .fonts
            .iter()
            .map(|f| Some(f.alias.to_string()))
            .collect();
        info!(path = %path.display(), groups = file.groups.len(), "edit session opened");
        Ok(Self {
            file,
            pool,
            path,
            image_origin,
            font_origin,
        })
    }

    pub fn model(&self) -> &ThemeFile {
        &self.file
    }

    // -- groups -----------------------------------------------------------

    pub fn groups(&self) -> Vec<String> {
        self.file
            .groups
            .iter()
            .filter_map(|g| g.name.as_deref().map(str::to_string))
            .collect()
    }

    fn group_index(&self, name: &str) -> Result<usize> {
        self.file
            .group_by_name(name)
            .map(GroupId::index)
            .ok_or_else(|| EditError::NotFound {
                kind: "group",
                name: name.to_string(),
            })
    }

    fn group_ref(&mut self, name: &str) -> Result<&mut Group> {
        let idx = self.group_index(name)?;
        Ok(&mut self.file.groups[idx])
    }

    pub fn group_add(&mut self, name: &str) -> Result<()> {
        if self.file.group_by_name(name).is_some() {
            return Err(EditError::NameTaken {
                kind: "group",
                name: name.to_string(),
            });
        }
        let id = GroupId::from(self.file.groups.len());
        let mut group = Group::new(id);
        group.name = Some(self.pool.intern(name));
        self.file.groups.push(group);
        debug!(group = name, id = id.0, "group added");
        Ok(())
    }

    pub fn group_del(&mut self, name: &str) -> Result<()> {
        let idx = self.group_index(name)?;
        self.file.remove_group(idx);
        Ok(())
    }

    pub fn group_rename(&mut self, old: &str, new: &str) -> Result<()> {
        if old == new {
            return Ok(());
        }
        if self.file.group_by_name(new).is_some() {
            return Err(EditError::NameTaken {
                kind: "group",
                name: new.to_string(),
            });
        }
        let name = self.pool.intern(new);
        self.group_ref(old)?.name = Some(name);
        Ok(())
    }

    pub fn group_min_set(&mut self, group: &str, w: i32, h: i32) -> Result<()> {
        if w < 0 || h < 0 {
            return Err(invalid("group min must be non-negative"));
        }
        self.group_ref(group)?.min = (w, h);
        Ok(())
    }

    pub fn group_max_set(&mut self, group: &str, w: i32, h: i32) -> Result<()> {
        if w < 0 || h < 0 {
            return Err(invalid("group max must be non-negative"));
        }
        self.group_ref(group)?.max = (w, h);
        Ok(())
    }

    pub fn alias_add(&mut self, group: &str, alias: &str) -> Result<()> {
        let id = GroupId::from(self.group_index(group)?);
        if self.file.group_by_name(alias).is_some()
            || self.file.aliases.iter().any(|a| a.name == alias)
        {
            return Err(EditError::NameTaken {
                kind: "group alias",
                name: alias.to_string(),
            });
        }
        let name = self.pool.intern(alias);
        self.file.aliases.push(GroupAlias { name, id });
        Ok(())
    }

    pub fn alias_del(&mut self, alias: &str) -> Result<()> {
        let before = self.file.aliases.len();
        self.file.aliases.retain(|a| a.name != alias);
        if self.file.aliases.len() == before {
            return Err(EditError::NotFound {
                kind: "group alias",
                name: alias.to_string(),
            });
        }
        Ok(())
    }

    // -- parts ------------------------------------------------------------

    pub fn parts(&self, group: &str) -> Result<Vec<String>> {
        let idx = self.group_index(group)?;
        Ok(self.file.groups[idx]
            .parts
            .iter()
            .filter_map(|p| p.name.as_deref().map(str::to_string))
            .collect())
    }

    fn part_index(group: &Group, name: &str) -> Result<usize> {
        group
            .part_by_name(name)
            .map(PartId::index)
            .ok_or_else(|| EditError::NotFound {
                kind: "part",
                name: name.to_string(),
            })
    }

    /// Add a part with a fresh default description, mirroring what the
    /// compiler would create for an empty `part {}` block plus `state`.
    pub fn part_add(&mut self, group: &str, name: &str, part_type: PartType) -> Result<()> {
        let interned = self.pool.intern(name);
        let g = self.group_ref(group)?;
        if g.part_by_name(name).is_some() {
            return Err(EditError::NameTaken {
                kind: "part",
                name: name.to_string(),
            });
        }
        let id = PartId::from(g.parts.len());
        let mut part = Part::new(id);
        part.name = Some(interned);
        part.part_type = part_type;
        part.descriptions.push(Description::new());
        g.parts.push(part);
        debug!(group, part = name, "part added");
        Ok(())
    }

    /// Delete a part. Dangling references become unset, program targets
    /// naming it are dropped, ids compact.
    pub fn part_del(&mut self, group: &str, name: &str) -> Result<()> {
        let g = self.group_ref(group)?;
        let idx = Self::part_index(g, name)?;
        fixup::remove_part(g, idx);
        Ok(())
    }

    pub fn part_rename(&mut self, group: &str, old: &str, new: &str) -> Result<()> {
        if old == new {
            return Ok(());
        }
        let interned = self.pool.intern(new);
        let g = self.group_ref(group)?;
        if g.part_by_name(new).is_some() {
            return Err(EditError::NameTaken {
                kind: "part",
                name: new.to_string(),
            });
        }
        let idx = Self::part_index(g, old)?;
        g.parts[idx].name = Some(interned);
        Ok(())
    }

    /// Move a part one stacking slot down (toward the background).
    pub fn part_restack_below(&mut self, group: &str, name: &str) -> Result<()> {
        let g = self.group_ref(group)?;
        let idx = Self::part_index(g, name)?;
        if idx == 0 {
            return Err(invalid(format!("part \"{name}\" is already at the bottom")));
        }
        fixup::swap_parts(g, idx - 1, idx);
        Ok(())
    }

    /// Move a part one stacking slot up (toward the viewer).
    pub fn part_restack_above(&mut self, group: &str, name: &str) -> Result<()> {
        let g = self.group_ref(group)?;
        let idx = Self::part_index(g, name)?;
        if idx + 1 >= g.parts.len() {
            return Err(invalid(format!("part \"{name}\" is already at the top")));
        }
        fixup::swap_parts(g, idx, idx + 1);
        Ok(())
    }

    pub fn part_clip_to_set(
        &mut self,
        group: &str,
        part: &str,
        clip: Option<&str>,
    ) -> Result<()> {
        let g = self.group_ref(group)?;
        let target = match clip {
            Some(clip_name) => Some(g.part_by_name(clip_name).ok_or_else(|| {
                EditError::NotFound {
                    kind: "part",
                    name: clip_name.to_string(),
                }
            })?),
            None => None,
        };
        let idx = Self::part_index(g, part)?;
        g.parts[idx].clip_to = target;
        Ok(())
    }

    // -- states -----------------------------------------------------------

    fn state_index(part: &Part, name: &str, value: f64) -> Result<usize> {
        part.find_desc(name, value).ok_or_else(|| EditError::NotFound {
            kind: "state",
            name: format!("{name} {value}"),
        })
    }

    pub fn state_add(
        &mut self,
        group: &str,
        part: &str,
        name: &str,
        value: f64,
    ) -> Result<()> {
        if name == "custom" {
            return Err(invalid("state name \"custom\" is reserved"));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(invalid("state value must be within [0, 1]"));
        }
        let interned = self.pool.intern(name);
        let g = self.group_ref(group)?;
        let idx = Self::part_index(g, part)?;
        let p = &mut g.parts[idx];
        if p.find_desc(name, value).is_some() {
            return Err(EditError::NameTaken {
                kind: "state",
                name: format!("{name} {value}"),
            });
        }
        let mut desc = Description::new();
        desc.state = StateId {
            name: Some(interned),
            value,
        };
        p.descriptions.push(desc);
        Ok(())
    }

    pub fn state_del(&mut self, group: &str, part: &str, name: &str, value: f64) -> Result<()> {
        let g = self.group_ref(group)?;
        let pidx = Self::part_index(g, part)?;
        let p = &mut g.parts[pidx];
        let sidx = Self::state_index(p, name, value)?;
        if sidx == 0 {
            return Err(invalid("the default state cannot be deleted"));
        }
        p.descriptions.remove(sidx);
        Ok(())
    }

    /// Deep copy of one state onto another existing state of the same
    /// part. Resolved ids travel as-is; the destination keeps its name.
    pub fn state_copy(
        &mut self,
        group: &str,
        part: &str,
        from: (&str, f64),
        to: (&str, f64),
    ) -> Result<()> {
        let g = self.group_ref(group)?;
        let pidx = Self::part_index(g, part)?;
        let p = &mut g.parts[pidx];
        let src = Self::state_index(p, from.0, from.1)?;
        let dst = Self::state_index(p, to.0, to.1)?;
        if src == dst {
            return Ok(());
        }
        let copied = p.descriptions[dst].inherit_from(&p.descriptions[src]);
        p.descriptions[dst] = copied;
        Ok(())
    }

    pub fn state_color_set(
        &mut self,
        group: &str,
        part: &str,
        state: (&str, f64),
        color: Color,
    ) -> Result<()> {
        let g = self.group_ref(group)?;
        let pidx = Self::part_index(g, part)?;
        let p = &mut g.parts[pidx];
        let sidx = Self::state_index(p, state.0, state.1)?;
        p.descriptions[sidx].color = color;
        Ok(())
    }

    pub fn state_visible_set(
        &mut self,
        group: &str,
        part: &str,
        state: (&str, f64),
        visible: bool,
    ) -> Result<()> {
        let g = self.group_ref(group)?;
        let pidx = Self::part_index(g, part)?;
        let p = &mut g.parts[pidx];
        let sidx = Self::state_index(p, state.0, state.1)?;
        p.descriptions[sidx].visible = visible;
        Ok(())
    }

    // -- programs ---------------------------------------------------------

    pub fn programs(&self, group: &str) -> Result<Vec<String>> {
        let idx = self.group_index(group)?;
        Ok(self.file.groups[idx]
            .programs
            .iter()
            .filter_map(|p| p.name.as_deref().map(str::to_string))
            .collect())
    }

    fn program_index(group: &Group, name: &str) -> Result<usize> {
        group
            .program_by_name(name)
            .map(ProgramId::index)
            .ok_or_else(|| EditError::NotFound {
                kind: "program",
                name: name.to_string(),
            })
    }

    pub fn program_add(&mut self, group: &str, name: &str) -> Result<()> {
        let interned = self.pool.intern(name);
        let g = self.group_ref(group)?;
        if g.program_by_name(name).is_some() {
            return Err(EditError::NameTaken {
                kind: "program",
                name: name.to_string(),
            });
        }
        let id = ProgramId::from(g.programs.len());
        let mut program = Program::new(id);
        program.name = Some(interned);
        g.programs.push(program);
        Ok(())
    }

    pub fn program_del(&mut self, group: &str, name: &str) -> Result<()> {
        let g = self.group_ref(group)?;
        let idx = Self::program_index(g, name)?;
        fixup::remove_program(g, idx);
        Ok(())
    }

    pub fn program_rename(&mut self, group: &str, old: &str, new: &str) -> Result<()> {
        if old == new {
            return Ok(());
        }
        let interned = self.pool.intern(new);
        let g = self.group_ref(group)?;
        if g.program_by_name(new).is_some() {
            return Err(EditError::NameTaken {
                kind: "program",
                name: new.to_string(),
            });
        }
        let idx = Self::program_index(g, old)?;
        g.programs[idx].name = Some(interned);
        Ok(())
    }

    pub fn program_signal_set(&mut self, group: &str, name: &str, signal: &str) -> Result<()> {
        let g = self.group_ref(group)?;
        let idx = Self::program_index(g, name)?;
        g.programs[idx].signal = Some(signal.to_string());
        Ok(())
    }

    pub fn program_source_set(&mut self, group: &str, name: &str, source: &str) -> Result<()> {
        let g = self.group_ref(group)?;
        let idx = Self::program_index(g, name)?;
        g.programs[idx].source = Some(source.to_string());
        Ok(())
    }

    pub fn program_after_add(&mut self, group: &str, name: &str, after: &str) -> Result<()> {
        let g = self.group_ref(group)?;
        let after_id = g
            .program_by_name(after)
            .ok_or_else(|| EditError::NotFound {
                kind: "program",
                name: after.to_string(),
            })?;
        let idx = Self::program_index(g, name)?;
        g.programs[idx].after.push(Some(after_id));
        Ok(())
    }

    // -- file-level tables --------------------------------------------------

    pub fn data_set(&mut self, key: &str, value: &str) -> Result<()> {
        let interned = self.pool.intern(key);
        match self.file.data.iter_mut().find(|d| d.key == key) {
            Some(item) => item.value = value.to_string(),
            None => self.file.data.push(edje_model::DataItem {
                key: interned,
                value: value.to_string(),
            }),
        }
        Ok(())
    }

    pub fn data_del(&mut self, key: &str) -> Result<()> {
        let before = self.file.data.len();
        self.file.data.retain(|d| d.key != key);
        if self.file.data.len() == before {
            return Err(EditError::NotFound {
                kind: "data item",
                name: key.to_string(),
            });
        }
        Ok(())
    }

    pub fn group_data_set(&mut self, group: &str, key: &str, value: &str) -> Result<()> {
        let interned = self.pool.intern(key);
        let g = self.group_ref(group)?;
        match g.data.iter_mut().find(|d| d.key == key) {
            Some(item) => item.value = value.to_string(),
            None => g.data.push(edje_model::DataItem {
                key: interned,
                value: value.to_string(),
            }),
        }
        Ok(())
    }

    pub fn color_class_add(&mut self, name: &str) -> Result<()> {
        if self
            .file
            .color_classes
            .iter()
            .any(|c| c.name.as_deref() == Some(name))
        {
            return Err(EditError::NameTaken {
                kind: "color class",
                name: name.to_string(),
            });
        }
        let mut cc = edje_model::file::ColorClass::new();
        cc.name = Some(self.pool.intern(name));
        self.file.color_classes.push(cc);
        Ok(())
    }

    /// Color classes are referenced by name from states, so deletion only
    /// needs the table edit; stale references fall back to state colors at
    /// runtime, same as a class the theme never defined.
    pub fn color_class_del(&mut self, name: &str) -> Result<()> {
        let before = self.file.color_classes.len();
        self.file
            .color_classes
            .retain(|c| c.name.as_deref() != Some(name));
        if self.file.color_classes.len() == before {
            return Err(EditError::NotFound {
                kind: "color class",
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub fn color_class_colors_set(
        &mut self,
        name: &str,
        color: Color,
        color2: Color,
        color3: Color,
    ) -> Result<()> {
        let cc = self
            .file
            .color_classes
            .iter_mut()
            .find(|c| c.name.as_deref() == Some(name))
            .ok_or_else(|| EditError::NotFound {
                kind: "color class",
                name: name.to_string(),
            })?;
        cc.color = color;
        cc.color2 = color2;
        cc.color3 = color3;
        Ok(())
    }

    pub fn style_add(&mut self, name: &str, base: &str) -> Result<()> {
        if self
            .file
            .styles
            .iter()
            .any(|s| s.name.as_deref() == Some(name))
        {
            return Err(EditError::NameTaken {
                kind: "style",
                name: name.to_string(),
            });
        }
        let style_name = self.pool.intern(name);
        let key = self.pool.intern(edje_model::file::STYLE_BASE_KEY);
        self.file.styles.push(edje_model::file::Style {
            name: Some(style_name),
            tags: vec![edje_model::file::StyleTag {
                key,
                value: base.to_string(),
            }],
        });
        Ok(())
    }

    pub fn style_del(&mut self, name: &str) -> Result<()> {
        let before = self.file.styles.len();
        self.file.styles.retain(|s| s.name.as_deref() != Some(name));
        if self.file.styles.len() == before {
            return Err(EditError::NotFound {
                kind: "style",
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub fn images(&self) -> Vec<String> {
        self.file
            .images
            .iter()
            .map(|i| i.path.to_string())
            .collect()
    }

    pub fn fonts(&self) -> Vec<String> {
        self.file
            .fonts
            .iter()
            .map(|f| f.alias.to_string())
            .collect()
    }

    /// Drop a font entry; its blob is left out of the next save. States
    /// reference fonts by name, so nothing needs renumbering.
    pub fn font_del(&mut self, alias: &str) -> Result<()> {
        let idx = self
            .file
            .fonts
            .iter()
            .position(|f| f.alias == alias)
            .ok_or_else(|| EditError::NotFound {
                kind: "font",
                name: alias.to_string(),
            })?;
        self.file.fonts.remove(idx);
        self.font_origin.remove(idx);
        Ok(())
    }

    /// Change a font's alias. The blob follows the entry to its new
    /// `fonts/<alias>` key on save.
    pub fn font_rename(&mut self, old: &str, new: &str) -> Result<()> {
        if old == new {
            return Ok(());
        }
        if self.file.fonts.iter().any(|f| f.alias == new) {
            return Err(EditError::NameTaken {
                kind: "font",
                name: new.to_string(),
            });
        }
        let interned = self.pool.intern(new);
        let font = self
            .file
            .fonts
            .iter_mut()
            .find(|f| f.alias == old)
            .ok_or_else(|| EditError::NotFound {
                kind: "font",
                name: old.to_string(),
            })?;
        font.alias = interned;
        Ok(())
    }

    /// Change the path of an image entry. References travel by id, so
    /// only the table entry changes.
    pub fn image_rename(&mut self, old: &str, new: &str) -> Result<()> {
        if old == new {
            return Ok(());
        }
        if self.file.image_by_path(new).is_some() {
            return Err(EditError::NameTaken {
                kind: "image",
                name: new.to_string(),
            });
        }
        let interned = self.pool.intern(new);
        let entry = self
            .file
            .images
            .iter_mut()
            .find(|i| i.path == old)
            .ok_or_else(|| EditError::NotFound {
                kind: "image",
                name: old.to_string(),
            })?;
        entry.path = interned;
        Ok(())
    }

    /// Register an externally-referenced image (USER source). Inline
    /// sources would need pixel import, which the editing layer does not
    /// do; the compiler owns that path.
    pub fn image_add_external(&mut self, path: &str) -> Result<()> {
        if self.file.image_by_path(path).is_some() {
            return Err(EditError::NameTaken {
                kind: "image",
                name: path.to_string(),
            });
        }
        let interned = self.pool.intern(path);
        let id = edje_model::ImageId::from(self.file.images.len());
        self.file.images.push(edje_model::ImageEntry {
            path: interned,
            id,
            source: edje_model::ImageSource::External,
        });
        self.image_origin.push(None);
        Ok(())
    }

    /// Remove an image entry. Refused while any state still references it;
    /// callers retarget states first. Ids above the removed entry shift
    /// down, and every surviving reference follows.
    pub fn image_del(&mut self, path: &str) -> Result<()> {
        let id = self
            .file
            .image_by_path(path)
            .ok_or_else(|| EditError::NotFound {
                kind: "image",
                name: path.to_string(),
            })?;
        let in_use = self.file.groups.iter().any(|g| {
            g.parts.iter().any(|p| {
                p.descriptions.iter().any(|d| {
                    d.image.normal == Some(edje_model::ImageRef::Image(id))
                        || d.image
                            .tweens
                            .iter()
                            .any(|t| *t == Some(edje_model::ImageRef::Image(id)))
                })
            })
        }) || self
            .file
            .sets
            .iter()
            .any(|s| s.entries.iter().any(|e| e.image == Some(id)));
        if in_use {
            return Err(invalid(format!("image \"{path}\" is still referenced")));
        }
        self.file.images.remove(id.index());
        self.image_origin.remove(id.index());
        for entry in &mut self.file.images {
            if entry.id.index() > id.index() {
                entry.id = edje_model::ImageId(entry.id.0 - 1);
            }
        }
        let shift = |r: &mut Option<edje_model::ImageRef>| {
            if let Some(edje_model::ImageRef::Image(img)) = r {
                if img.index() > id.index() {
                    *img = edje_model::ImageId(img.0 - 1);
                }
            }
        };
        for group in &mut self.file.groups {
            for part in &mut group.parts {
                for desc in &mut part.descriptions {
                    shift(&mut desc.image.normal);
                    for tween in &mut desc.image.tweens {
                        shift(tween);
                    }
                }
            }
        }
        for set in &mut self.file.sets {
            for entry in &mut set.entries {
                if let Some(img) = &mut entry.image {
                    if img.index() > id.index() {
                        *img = edje_model::ImageId(img.0 - 1);
                    }
                }
            }
        }
        Ok(())
    }

    // -- persistence ------------------------------------------------------

    pub fn save(&self) -> Result<()> {
        self.save_as(&self.path)
    }

    /// Re-serialize the model. Header, collections, scripts and sources
    /// are regenerated; image and font blobs are copied from the original
    /// artifact unchanged.
    pub fn save_as(&self, dest: &Path) -> Result<()> {
        use edje_model::codec;

        let original = BlobReader::open(&self.path)?;
        let mut store = BlobWriter::create(dest)?;
        store.insert(KEY_HEADER, &codec::encode_header(&self.file))?;
        for group in &self.file.groups {
            store.insert(
                &format!("collections/{}", group.id.0),
                &codec::encode_group(group),
            )?;
            if !group.script.is_empty() {
                let key = match group.script.kind {
                    Some(ScriptKind::Lua) => format!("lua_scripts/{}", group.id.0),
                    _ => format!("scripts/{}", group.id.0),
                };
                store.insert(&key, &codec::encode_script(&group.script))?;
            }
        }
        // Resource blobs follow their entries: images to their current
        // ids, fonts to their current aliases. Entries deleted in this
        // session simply have no surviving entry to copy for.
        for (entry, origin) in self.file.images.iter().zip(&self.image_origin) {
            let Some(origin) = origin else { continue };
            if let Some(bytes) = original.get(&format!("images/{origin}")) {
                store.insert(&format!("images/{}", entry.id.0), bytes)?;
            }
        }
        for (font, origin) in self.file.fonts.iter().zip(&self.font_origin) {
            let Some(origin) = origin else { continue };
            if let Some(bytes) = original.get(&format!("fonts/{origin}")) {
                store.insert(&format!("fonts/{}", font.alias), bytes)?;
            }
        }
        let text = sources::generate(&self.file);
        let mut w = EntryWriter::new();
        w.seq(1);
        w.str("generated.edc");
        w.bytes(text.as_bytes());
        store.insert(KEY_SOURCES, &w.into_bytes())?;
        store.finish()?;
        info!(dest = %dest.display(), "artifact saved");
        Ok(())
    }
}
