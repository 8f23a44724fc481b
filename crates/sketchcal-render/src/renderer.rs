//! Renderer trait abstraction.

use kurbo::{Point, Rect};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Failed to serialize display list: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// How a primitive is painted.
#[derive(Debug, Clone)]
pub enum Paint {
    Fill(Color),
    Stroke {
        color: Color,
        width: f64,
    },
    FillAndStroke {
        fill: Color,
        stroke: Color,
        width: f64,
    },
    /// Stroke with alternating on/off dash lengths.
    DashedStroke {
        color: Color,
        width: f64,
        dashes: Vec<f64>,
    },
    /// Text drawn in a CSS-style font, e.g. `"18px Arial"`.
    Font {
        font: String,
        color: Color,
    },
}

impl Paint {
    pub fn fill(color: Color) -> Self {
        Paint::Fill(color)
    }

    pub fn stroke(color: Color, width: f64) -> Self {
        Paint::Stroke { color, width }
    }

    pub fn fill_and_stroke(fill: Color, stroke: Color, width: f64) -> Self {
        Paint::FillAndStroke { fill, stroke, width }
    }

    pub fn dashed(color: Color, width: f64, dashes: &[f64]) -> Self {
        Paint::DashedStroke {
            color,
            width,
            dashes: dashes.to_vec(),
        }
    }

    pub fn font(font: impl Into<String>, color: Color) -> Self {
        Paint::Font {
            font: font.into(),
            color,
        }
    }
}

/// Trait for rendering backends.
///
/// The scene builder emits page-space primitives through this trait. Backends
/// own any view transform and image lookup.
pub trait Renderer {
    /// Rectangle with rounded corners of `radius`.
    fn rect(&mut self, rect: Rect, radius: f64, paint: &Paint) -> RenderResult<()>;

    fn line(&mut self, from: Point, to: Point, paint: &Paint) -> RenderResult<()>;

    /// Open polyline through `points`.
    fn poly(&mut self, points: &[Point], paint: &Paint) -> RenderResult<()>;

    /// Text with its baseline starting at `position`.
    fn text(&mut self, text: &str, position: Point, paint: &Paint) -> RenderResult<()>;

    /// Named image with its top-left corner at `position`.
    fn image(&mut self, name: &str, position: Point) -> RenderResult<()>;
}
