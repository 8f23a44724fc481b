//! Strokes, text elements and the references that address them.

use super::{CardId, CardInstanceId, PageId, StrokeId};
use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
    pub fn parse_hex(color: &str) -> Option<Self> {
        let hex = color.trim().strip_prefix('#')?;
        let short = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok().map(|v| v * 17);
        let long = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            3 => Some(Self::new(short(0)?, short(1)?, short(2)?, 255)),
            4 => Some(Self::new(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Self::new(long(0)?, long(2)?, long(4)?, 255)),
            8 => Some(Self::new(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => None,
        }
    }
}

impl From<Color> for Rgba8 {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Rgba8> for Color {
    fn from(color: Rgba8) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Container that owns a stroke. Ownership is exclusive and fixed for the
/// stroke's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokeOwner {
    Card(CardId),
    Page(PageId),
}

/// Color and weight applied to a new stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Rgba8,
    pub weight: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Rgba8::black(),
            weight: 2.0,
        }
    }
}

/// A freehand ink stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub id: StrokeId,
    pub owner: StrokeOwner,
    /// Points in drawing order, in the owner's coordinate space.
    pub points: Vec<Point>,
    pub color: Rgba8,
    pub weight: f64,
}

impl Stroke {
    /// Create an empty stroke owned by `owner`.
    pub fn new(owner: StrokeOwner, style: StrokeStyle) -> Self {
        Self {
            id: StrokeId::generate(),
            owner,
            points: Vec::new(),
            color: style.color,
            weight: style.weight,
        }
    }
}

/// A text note anchored at a point relative to its container's origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub position: Point,
    pub value: String,
}

impl TextElement {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            value: String::new(),
        }
    }
}

/// Which sequence a [`TextElementReference`] indexes into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextContainer {
    /// Text of the card placed by this instance.
    CardInstance(CardInstanceId),
    Page(PageId),
}

/// Index-based address of a text element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextElementReference {
    pub container: TextContainer,
    pub index: usize,
}

impl TextElementReference {
    pub fn page(page_id: PageId, index: usize) -> Self {
        Self {
            container: TextContainer::Page(page_id),
            index,
        }
    }

    pub fn card_instance(instance_id: CardInstanceId, index: usize) -> Self {
        Self {
            container: TextContainer::CardInstance(instance_id),
            index,
        }
    }
}
