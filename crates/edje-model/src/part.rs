//! Parts: the layout elements of a group, plus box/table pack items.

use crate::desc::Description;
use crate::intern::Name;
use crate::types::{
    Api, AspectMode, EntryMode, EventFlags, PartId, PartType, PointerMode, SelectMode, TextEffect,
};

/// Dragging behavior of a part. `enable` is tri-valued: 0 disabled, 1
/// enabled from 0.0, -1 enabled from 1.0. `count` has no compiler-side
/// meaning and round-trips untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Dragable {
    pub x: i8,
    pub step_x: i32,
    pub count_x: i32,
    pub y: i8,
    pub step_y: i32,
    pub count_y: i32,
    pub confine: Option<PartId>,
    pub events: Option<PartId>,
}

impl Dragable {
    fn new() -> Self {
        Self {
            x: 0,
            step_x: 0,
            count_x: 0,
            y: 0,
            step_y: 0,
            count_y: 0,
            confine: None,
            events: None,
        }
    }
}

/// One packed child of a BOX or TABLE part. Always of GROUP type today.
#[derive(Debug, Clone, PartialEq)]
pub struct PackItem {
    pub name: Option<Name>,
    pub source: Option<Name>,
    pub min: (i32, i32),
    pub prefer: (i32, i32),
    /// Negative means unbounded.
    pub max: (i32, i32),
    pub padding: (i32, i32, i32, i32), // l r t b
    pub align: (f64, f64),
    pub weight: (f64, f64),
    pub aspect: (i32, i32),
    pub aspect_mode: AspectMode,
    pub options: Option<String>,
    /// Grid placement, TABLE parts only. Negative col/row means unplaced.
    pub col: i32,
    pub row: i32,
    pub colspan: i32,
    pub rowspan: i32,
}

impl PackItem {
    pub fn new() -> Self {
        Self {
            name: None,
            source: None,
            min: (0, 0),
            prefer: (0, 0),
            max: (-1, -1),
            padding: (0, 0, 0, 0),
            align: (0.5, 0.5),
            weight: (0.0, 0.0),
            aspect: (0, 0),
            aspect_mode: AspectMode::None,
            options: None,
            col: -1,
            row: -1,
            colspan: 1,
            rowspan: 1,
        }
    }
}

impl Default for PackItem {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub name: Option<Name>,
    pub id: PartId,
    pub part_type: PartType,
    pub effect: TextEffect,
    pub mouse_events: bool,
    pub repeat_events: bool,
    pub ignore_flags: EventFlags,
    pub scale: bool,
    pub pointer_mode: PointerMode,
    pub precise_is_inside: bool,
    pub use_alternate_font_metrics: bool,
    pub multiline: bool,
    pub entry_mode: EntryMode,
    pub select_mode: SelectMode,
    pub clip_to: Option<PartId>,
    pub source: Option<Name>,
    pub source2: Option<Name>,
    pub source3: Option<Name>,
    pub source4: Option<Name>,
    pub source5: Option<Name>,
    pub source6: Option<Name>,
    pub dragable: Dragable,
    pub api: Option<Api>,
    /// First entry is the default state.
    pub descriptions: Vec<Description>,
    /// BOX/TABLE children.
    pub items: Vec<PackItem>,
}

impl Part {
    pub fn new(id: PartId) -> Self {
        Self {
            name: None,
            id,
            part_type: PartType::Image,
            effect: TextEffect::None,
            mouse_events: true,
            repeat_events: false,
            ignore_flags: EventFlags::empty(),
            scale: false,
            pointer_mode: PointerMode::Autograb,
            precise_is_inside: false,
            use_alternate_font_metrics: false,
            multiline: false,
            entry_mode: EntryMode::None,
            select_mode: SelectMode::Default,
            clip_to: None,
            source: None,
            source2: None,
            source3: None,
            source4: None,
            source5: None,
            source6: None,
            dragable: Dragable::new(),
            api: None,
            descriptions: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn default_desc(&self) -> Option<&Description> {
        self.descriptions.first()
    }

    /// The description statements currently apply to: the most recently
    /// appended one.
    pub fn current_desc_mut(&mut self) -> Option<&mut Description> {
        self.descriptions.last_mut()
    }

    pub fn find_desc(&self, name: &str, value: f64) -> Option<usize> {
        self.descriptions
            .iter()
            .position(|d| d.state.matches(name, value))
    }

    /// Parent resolution for `inherit`: exact default short-circuit, then
    /// name match with the nearest index value winning.
    pub fn find_inherit_parent(&self, name: &str, value: f64) -> Option<usize> {
        if name == "default" && value == 0.0 {
            return if self.descriptions.is_empty() {
                None
            } else {
                Some(0)
            };
        }
        let mut best: Option<(usize, f64)> = None;
        for (i, d) in self.descriptions.iter().enumerate() {
            if d.state.display_name() != name {
                continue;
            }
            let dst = (d.state.value - value).abs();
            if best.is_none_or(|(_, cur)| dst < cur) {
                best = Some((i, dst));
            }
        }
        best.map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desc::StateId;

    fn part_with_states(states: &[(&str, f64)]) -> Part {
        let mut p = Part::new(PartId(0));
        for (name, value) in states {
            let mut d = Description::new();
            d.state = StateId {
                name: Some(Name::from(*name)),
                value: *value,
            };
            p.descriptions.push(d);
        }
        p
    }

    #[test]
    fn inherit_parent_prefers_nearest_value() {
        let p = part_with_states(&[("default", 0.0), ("active", 0.2), ("active", 0.9)]);
        assert_eq!(p.find_inherit_parent("active", 1.0), Some(2));
        assert_eq!(p.find_inherit_parent("active", 0.0), Some(1));
        assert_eq!(p.find_inherit_parent("default", 0.0), Some(0));
        assert_eq!(p.find_inherit_parent("missing", 0.0), None);
    }
}
