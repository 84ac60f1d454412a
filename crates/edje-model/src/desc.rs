//! State descriptions: one record per named state of a part.
//!
//! The first description appended to a part is its default state. Defaults
//! below are load-bearing: the canonical-source writer emits only fields
//! that differ from a fresh description, so `Description::new()` must match
//! what the parser would produce for an empty `description {}` block.

use crate::intern::Name;
use crate::types::{
    AspectPrefer, Color, FillType, ImageRef, MiddlePolicy, PartId, ScaleHint, TableHomogeneous,
};

/// Identity of a state: name plus fractional index. The default state of a
/// part reads as `"default" 0.0` even when the source never names it.
#[derive(Debug, Clone, PartialEq)]
pub struct StateId {
    pub name: Option<Name>,
    pub value: f64,
}

impl StateId {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("default")
    }

    /// Two states collide when both name and value match.
    pub fn matches(&self, name: &str, value: f64) -> bool {
        self.display_name() == name && self.value == value
    }
}

/// One corner anchor (`rel1` or `rel2`).
#[derive(Debug, Clone, PartialEq)]
pub struct Rel {
    pub relative: (f64, f64),
    pub offset: (i32, i32),
    pub to_x: Option<PartId>,
    pub to_y: Option<PartId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageState {
    pub normal: Option<ImageRef>,
    pub tweens: Vec<Option<ImageRef>>,
    pub border: (i32, i32, i32, i32), // l r t b
    pub middle: MiddlePolicy,
    pub border_scale: bool,
    pub scale_hint: ScaleHint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillState {
    pub smooth: bool,
    pub origin_rel: (f64, f64),
    pub origin_abs: (i32, i32),
    pub size_rel: (f64, f64),
    pub size_abs: (i32, i32),
    pub fill_type: FillType,
    pub angle: i32,
    pub spread: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextState {
    pub text: Option<String>,
    pub text_class: Option<Name>,
    pub font: Option<Name>,
    pub style: Option<Name>,
    pub repch: Option<String>,
    pub size: i32,
    pub fit: (bool, bool),
    pub min: (bool, bool),
    pub max: (bool, bool),
    pub align: (f64, f64),
    pub source: Option<PartId>,
    pub text_source: Option<PartId>,
    pub elipsis: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxState {
    pub layout: Option<String>,
    pub alt_layout: Option<String>,
    pub align: (f64, f64),
    pub padding: (i32, i32),
    pub min: (bool, bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    pub homogeneous: TableHomogeneous,
    pub align: (f64, f64),
    pub padding: (i32, i32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapState {
    pub perspective: Option<PartId>,
    pub light: Option<PartId>,
    pub rot_center: Option<PartId>,
    pub rot: (f64, f64, f64),
    pub on: bool,
    pub smooth: bool,
    pub alpha: bool,
    pub backface_cull: bool,
    pub persp_on: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveState {
    pub zplane: i32,
    pub focal: i32,
}

/// Typed parameter handed to an EXTERNAL part.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalParam {
    pub name: Name,
    pub value: ParamValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Int(i32),
    Double(f64),
    String(String),
    Bool(bool),
    Choice(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    pub state: StateId,
    pub visible: bool,
    pub align: (f64, f64),
    pub fixed: (bool, bool),
    pub min: (i32, i32),
    pub max: (i32, i32),
    pub step: (i32, i32),
    pub aspect: (f64, f64),
    pub aspect_prefer: AspectPrefer,
    pub rel1: Rel,
    pub rel2: Rel,
    pub image: ImageState,
    pub fill: FillState,
    pub color_class: Option<Name>,
    pub color: Color,
    pub color2: Color,
    pub color3: Color,
    pub text: TextState,
    pub box_: BoxState,
    pub table: TableState,
    pub map: MapState,
    pub persp: PerspectiveState,
    pub external_params: Vec<ExternalParam>,
}

impl Description {
    pub fn new() -> Self {
        Self {
            state: StateId {
                name: None,
                value: 0.0,
            },
            visible: true,
            align: (0.5, 0.5),
            fixed: (false, false),
            min: (0, 0),
            max: (-1, -1),
            step: (0, 0),
            aspect: (0.0, 0.0),
            aspect_prefer: AspectPrefer::None,
            rel1: Rel {
                relative: (0.0, 0.0),
                offset: (0, 0),
                to_x: None,
                to_y: None,
            },
            rel2: Rel {
                relative: (1.0, 1.0),
                offset: (-1, -1),
                to_x: None,
                to_y: None,
            },
            image: ImageState {
                normal: None,
                tweens: Vec::new(),
                border: (0, 0, 0, 0),
                middle: MiddlePolicy::Default,
                border_scale: false,
                scale_hint: ScaleHint::None,
            },
            fill: FillState {
                smooth: true,
                origin_rel: (0.0, 0.0),
                origin_abs: (0, 0),
                size_rel: (1.0, 1.0),
                size_abs: (0, 0),
                fill_type: FillType::Scale,
                angle: 0,
                spread: 0,
            },
            color_class: None,
            color: Color::rgba(255, 255, 255, 255),
            color2: Color::rgba(0, 0, 0, 255),
            color3: Color::rgba(0, 0, 0, 128),
            text: TextState {
                text: None,
                text_class: None,
                font: None,
                style: None,
                repch: None,
                size: 0,
                fit: (false, false),
                min: (false, false),
                max: (false, false),
                align: (0.5, 0.5),
                source: None,
                text_source: None,
                elipsis: 0.0,
            },
            box_: BoxState {
                layout: None,
                alt_layout: None,
                align: (0.5, 0.5),
                padding: (0, 0),
                min: (false, false),
            },
            table: TableState {
                homogeneous: TableHomogeneous::None,
                align: (0.5, 0.5),
                padding: (0, 0),
            },
            map: MapState {
                perspective: None,
                light: None,
                rot_center: None,
                rot: (0.0, 0.0, 0.0),
                on: false,
                smooth: true,
                alpha: true,
                backface_cull: false,
                persp_on: false,
            },
            persp: PerspectiveState {
                zplane: 0,
                focal: 1000,
            },
            external_params: Vec::new(),
        }
    }

    /// Deep copy used by `inherit`: the clone keeps its own state identity,
    /// every other field comes from the parent. By-name references are
    /// copied as-is here; the caller re-queues slave lookups so pending
    /// names retarget parent and child independently.
    pub fn inherit_from(&self, parent: &Description) -> Description {
        let mut copy = parent.clone();
        copy.state = self.state.clone();
        copy
    }

    /// Insert or overwrite an external parameter by name.
    pub fn set_external_param(&mut self, name: Name, value: ParamValue) {
        if let Some(existing) = self.external_params.iter_mut().find(|p| p.name == name) {
            existing.value = value;
        } else {
            self.external_params.push(ExternalParam { name, value });
        }
    }
}

impl Default for Description {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inherit_keeps_identity_and_copies_the_rest() {
        let mut parent = Description::new();
        parent.color = Color::rgba(1, 2, 3, 4);
        parent.text.text = Some("hello".to_string());

        let mut child = Description::new();
        child.state = StateId {
            name: Some(Name::from("clicked")),
            value: 0.5,
        };
        let child = child.inherit_from(&parent);

        assert_eq!(child.state.display_name(), "clicked");
        assert_eq!(child.state.value, 0.5);
        assert_eq!(child.color, Color::rgba(1, 2, 3, 4));
        assert_eq!(child.text.text.as_deref(), Some("hello"));
    }

    #[test]
    fn external_param_overwrites_in_place() {
        let mut d = Description::new();
        d.set_external_param(Name::from("label"), ParamValue::String("a".into()));
        d.set_external_param(Name::from("label"), ParamValue::String("b".into()));
        assert_eq!(d.external_params.len(), 1);
        assert_eq!(
            d.external_params[0].value,
            ParamValue::String("b".to_string())
        );
    }
}
