//! The top-level artifact model: resource tables plus the collection
//! directory.

use crate::group::{DataItem, Group};
use crate::intern::Name;
use crate::types::{Color, GroupId, ImageId, SetId};
use tracing::debug;

/// How an image entry's pixels travel into the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// RAW (compress = false) or COMP (compress = true).
    InlinePerfect { compress: bool },
    /// LOSSY with a 0..=100 quality.
    InlineLossy { quality: u8 },
    /// USER: referenced, never embedded.
    External,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntry {
    pub path: Name,
    pub id: ImageId,
    pub source: ImageSource,
}

/// One member of an image set. Built up field by field while its block is
/// open; a member that never names an image is rejected at validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SetEntry {
    pub path: Option<Name>,
    pub image: Option<ImageId>,
    pub min: (i32, i32),
    pub max: (i32, i32),
}

impl SetEntry {
    pub fn new() -> Self {
        Self {
            path: None,
            image: None,
            min: (0, 0),
            max: (0, 0),
        }
    }
}

impl Default for SetEntry {
    fn default() -> Self {
        Self::new()
    }
}

/// Size-adaptive image: picks the entry whose window matches.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSet {
    pub name: Option<Name>,
    pub id: SetId,
    pub entries: Vec<SetEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontEntry {
    pub file: Name,
    pub alias: Name,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleTag {
    pub key: Name,
    pub value: String,
}

/// Reserved tag key holding a style's base formatting string.
pub const STYLE_BASE_KEY: &str = "DEFAULT";

#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub name: Option<Name>,
    pub tags: Vec<StyleTag>,
}

impl Style {
    pub fn has_base(&self) -> bool {
        self.tags.iter().any(|t| t.key == STYLE_BASE_KEY)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorClass {
    pub name: Option<Name>,
    pub color: Color,
    pub color2: Color,
    pub color3: Color,
}

impl ColorClass {
    pub fn new() -> Self {
        Self {
            name: None,
            color: Color::BLACK_TRANSPARENT,
            color2: Color::BLACK_TRANSPARENT,
            color3: Color::BLACK_TRANSPARENT,
        }
    }
}

impl Default for ColorClass {
    fn default() -> Self {
        Self::new()
    }
}

/// Legacy gradient spectrum table; carried for artifact compatibility,
/// populated by nothing in the current grammar.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    pub name: Name,
    pub colors: Vec<(Color, i32)>,
}

/// Additional name resolving to an existing collection id.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupAlias {
    pub name: Name,
    pub id: GroupId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeFile {
    pub compiler: String,
    pub version: u32,
    pub fontset_append: Option<String>,
    pub images: Vec<ImageEntry>,
    pub sets: Vec<ImageSet>,
    pub fonts: Vec<FontEntry>,
    pub styles: Vec<Style>,
    pub color_classes: Vec<ColorClass>,
    pub externals: Vec<Name>,
    pub spectra: Vec<Spectrum>,
    pub data: Vec<DataItem>,
    pub groups: Vec<Group>,
    pub aliases: Vec<GroupAlias>,
}

pub const FORMAT_VERSION: u32 = 3;

impl ThemeFile {
    pub fn new() -> Self {
        Self {
            compiler: String::new(),
            version: FORMAT_VERSION,
            fontset_append: None,
            images: Vec::new(),
            sets: Vec::new(),
            fonts: Vec::new(),
            styles: Vec::new(),
            color_classes: Vec::new(),
            externals: Vec::new(),
            spectra: Vec::new(),
            data: Vec::new(),
            groups: Vec::new(),
            aliases: Vec::new(),
        }
    }

    pub fn image_by_path(&self, path: &str) -> Option<ImageId> {
        self.images
            .iter()
            .find(|i| i.path == path)
            .map(|i| i.id)
    }

    pub fn set_by_name(&self, name: &str) -> Option<SetId> {
        self.sets
            .iter()
            .find(|s| s.name.as_deref() == Some(name))
            .map(|s| s.id)
    }

    pub fn group_by_name(&self, name: &str) -> Option<GroupId> {
        self.groups
            .iter()
            .find(|g| g.name.as_deref() == Some(name))
            .map(|g| g.id)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.index())
    }

    pub fn current_group_mut(&mut self) -> Option<&mut Group> {
        self.groups.last_mut()
    }

    /// Remove the group at `index`, compact the directory so ids stay dense,
    /// and rewrite aliases that pointed at displaced ids. Aliases aimed at
    /// the removed group itself are dropped.
    ///
    /// Used both by the duplicate-group-name replacement rule during
    /// compilation and by the editing API.
    pub fn remove_group(&mut self, index: usize) {
        let removed = self.groups.remove(index);
        debug!(
            group = removed.name.as_deref().unwrap_or("<unnamed>"),
            id = removed.id.0,
            "group displaced"
        );
        self.aliases.retain(|a| a.id != removed.id);
        for alias in &mut self.aliases {
            if alias.id.index() > index {
                alias.id = GroupId(alias.id.0 - 1);
            }
        }
        for (i, group) in self.groups.iter_mut().enumerate() {
            group.id = GroupId::from(i);
        }
    }
}

impl Default for ThemeFile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_group_compacts_and_rewrites_aliases() {
        let mut f = ThemeFile::new();
        for name in ["a", "b", "c"] {
            let id = GroupId::from(f.groups.len());
            let mut g = Group::new(id);
            g.name = Some(Name::from(name));
            f.groups.push(g);
        }
        f.aliases.push(GroupAlias {
            name: Name::from("alias-a"),
            id: GroupId(0),
        });
        f.aliases.push(GroupAlias {
            name: Name::from("alias-c"),
            id: GroupId(2),
        });

        f.remove_group(0);

        assert_eq!(f.groups.len(), 2);
        assert_eq!(f.group_by_name("b"), Some(GroupId(0)));
        assert_eq!(f.group_by_name("c"), Some(GroupId(1)));
        // Alias to the removed group is gone, the other follows its target.
        assert_eq!(f.aliases.len(), 1);
        assert_eq!(f.aliases[0].name, "alias-c");
        assert_eq!(f.aliases[0].id, GroupId(1));
    }
}
