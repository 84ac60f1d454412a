//! Typed ids, enumerations and small value types shared by the whole model.
//!
//! Ids are dense indexes into their owning table; a distinct newtype per
//! entity kind keeps a part id from ever being handed to a program lookup.
//! "Unset" is `Option::None` everywhere in memory; the wire format maps it
//! to `-1` and back.

use bitflags::bitflags;

macro_rules! dense_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<usize> for $name {
            fn from(i: usize) -> Self {
                Self(i as u32)
            }
        }
    };
}

dense_id!(
    /// Position of a part within its group.
    PartId
);
dense_id!(
    /// Position of a program within its group.
    ProgramId
);
dense_id!(
    /// Position of an image entry in the file-global image table.
    ImageId
);
dense_id!(
    /// Position of an image set in the file-global set table.
    SetId
);
dense_id!(
    /// Position of a group in the collection directory.
    GroupId
);

/// Resolved image reference: either a plain table entry or a size-adaptive
/// set. Carried through state descriptions and tween lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRef {
    Image(ImageId),
    Set(SetId),
}

/// Non-premultiplied RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
    pub const BLACK_TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
}

bitflags! {
    /// Input event flags a part may choose to ignore.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EventFlags: u32 {
        const ON_HOLD = 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum PartType {
    None = 0,
    Rectangle = 1,
    Text = 2,
    #[default]
    Image = 3,
    Swallow = 4,
    Textblock = 5,
    /// Legacy type kept for artifact compatibility; not reachable from the
    /// `type:` property.
    Gradient = 6,
    Group = 7,
    Box = 8,
    Table = 9,
    External = 10,
}

impl PartType {
    pub fn from_u8(v: u8) -> Option<Self> {
        use PartType::*;
        Some(match v {
            0 => None,
            1 => Rectangle,
            2 => Text,
            3 => Image,
            4 => Swallow,
            5 => Textblock,
            6 => Gradient,
            7 => Group,
            8 => Box,
            9 => Table,
            10 => External,
            _ => return Option::None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum TextEffect {
    #[default]
    None = 0,
    Plain = 1,
    Outline = 2,
    SoftOutline = 3,
    Shadow = 4,
    SoftShadow = 5,
    OutlineShadow = 6,
    OutlineSoftShadow = 7,
    FarShadow = 8,
    FarSoftShadow = 9,
    Glow = 10,
}

impl TextEffect {
    pub fn from_u8(v: u8) -> Option<Self> {
        use TextEffect::*;
        Some(match v {
            0 => None,
            1 => Plain,
            2 => Outline,
            3 => SoftOutline,
            4 => Shadow,
            5 => SoftShadow,
            6 => OutlineShadow,
            7 => OutlineSoftShadow,
            8 => FarShadow,
            9 => FarSoftShadow,
            10 => Glow,
            _ => return Option::None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum PointerMode {
    #[default]
    Autograb = 0,
    Nograb = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum EntryMode {
    #[default]
    None = 0,
    Selectable = 1,
    Editable = 2,
    Password = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SelectMode {
    #[default]
    Default = 0,
    Explicit = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AspectPrefer {
    #[default]
    None = 0,
    Vertical = 1,
    Horizontal = 2,
    Both = 3,
}

/// Aspect control for box/table pack items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AspectMode {
    #[default]
    None = 0,
    Neither = 1,
    Horizontal = 2,
    Vertical = 3,
    Both = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum TableHomogeneous {
    #[default]
    None = 0,
    Table = 1,
    Item = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum FillType {
    #[default]
    Scale = 0,
    Tile = 1,
}

/// What to do with the center area of a bordered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum MiddlePolicy {
    #[default]
    Default = 0,
    None = 1,
    Solid = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ScaleHint {
    #[default]
    None = 0,
    Dynamic = 1,
    Static = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum TweenMode {
    #[default]
    Linear = 0,
    Sinusoidal = 1,
    Accelerate = 2,
    Decelerate = 3,
}

impl TweenMode {
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0 => Self::Linear,
            1 => Self::Sinusoidal,
            2 => Self::Accelerate,
            3 => Self::Decelerate,
            _ => return None,
        })
    }
}

/// Binding hint for external tooling, carried on parts and programs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Api {
    pub name: String,
    pub description: Option<String>,
}

macro_rules! u8_decoder {
    ($ty:ident { $($raw:literal => $variant:ident),+ $(,)? }) => {
        impl $ty {
            pub fn from_u8(v: u8) -> Option<Self> {
                match v {
                    $($raw => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

u8_decoder!(PointerMode { 0 => Autograb, 1 => Nograb });
u8_decoder!(EntryMode { 0 => None, 1 => Selectable, 2 => Editable, 3 => Password });
u8_decoder!(SelectMode { 0 => Default, 1 => Explicit });
u8_decoder!(AspectPrefer { 0 => None, 1 => Vertical, 2 => Horizontal, 3 => Both });
u8_decoder!(AspectMode { 0 => None, 1 => Neither, 2 => Horizontal, 3 => Vertical, 4 => Both });
u8_decoder!(TableHomogeneous { 0 => None, 1 => Table, 2 => Item });
u8_decoder!(FillType { 0 => Scale, 1 => Tile });
u8_decoder!(MiddlePolicy { 0 => Default, 1 => None, 2 => Solid });
u8_decoder!(ScaleHint { 0 => None, 1 => Dynamic, 2 => Static });
