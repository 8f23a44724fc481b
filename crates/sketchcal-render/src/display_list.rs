//! Recording renderer.
//!
//! Captures draw calls as plain data so a frame can be inspected in tests or
//! dumped as JSON by the headless binary.

use crate::renderer::{Paint, RenderResult, Renderer, RendererError};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use sketchcal_core::model::Rgba8;

/// Serializable form of [`Paint`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaintSpec {
    Fill { color: Rgba8 },
    Stroke { color: Rgba8, width: f64 },
    FillAndStroke { fill: Rgba8, stroke: Rgba8, width: f64 },
    DashedStroke { color: Rgba8, width: f64, dashes: Vec<f64> },
    Font { font: String, color: Rgba8 },
}

impl From<&Paint> for PaintSpec {
    fn from(paint: &Paint) -> Self {
        match paint {
            Paint::Fill(color) => PaintSpec::Fill {
                color: (*color).into(),
            },
            Paint::Stroke { color, width } => PaintSpec::Stroke {
                color: (*color).into(),
                width: *width,
            },
            Paint::FillAndStroke { fill, stroke, width } => PaintSpec::FillAndStroke {
                fill: (*fill).into(),
                stroke: (*stroke).into(),
                width: *width,
            },
            Paint::DashedStroke { color, width, dashes } => PaintSpec::DashedStroke {
                color: (*color).into(),
                width: *width,
                dashes: dashes.clone(),
            },
            Paint::Font { font, color } => PaintSpec::Font {
                font: font.clone(),
                color: (*color).into(),
            },
        }
    }
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Rect { rect: Rect, radius: f64, paint: PaintSpec },
    Line { from: Point, to: Point, paint: PaintSpec },
    Poly { points: Vec<Point>, paint: PaintSpec },
    Text { text: String, position: Point, paint: PaintSpec },
    Image { name: String, position: Point },
}

/// Renderer that records every primitive in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayList {
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// All recorded text strings, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All recorded image names, in draw order.
    pub fn images(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Image { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn to_json(&self) -> RenderResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn ensure_finite(points: &[Point]) -> RenderResult<()> {
    match points.iter().find(|p| !p.is_finite()) {
        Some(point) => Err(RendererError::RenderFailed(format!(
            "non-finite coordinate {:?}",
            point
        ))),
        None => Ok(()),
    }
}

impl Renderer for DisplayList {
    fn rect(&mut self, rect: Rect, radius: f64, paint: &Paint) -> RenderResult<()> {
        ensure_finite(&[rect.origin(), Point::new(rect.x1, rect.y1)])?;
        self.commands.push(DrawCommand::Rect {
            rect,
            radius,
            paint: paint.into(),
        });
        Ok(())
    }

    fn line(&mut self, from: Point, to: Point, paint: &Paint) -> RenderResult<()> {
        ensure_finite(&[from, to])?;
        self.commands.push(DrawCommand::Line {
            from,
            to,
            paint: paint.into(),
        });
        Ok(())
    }

    fn poly(&mut self, points: &[Point], paint: &Paint) -> RenderResult<()> {
        ensure_finite(points)?;
        self.commands.push(DrawCommand::Poly {
            points: points.to_vec(),
            paint: paint.into(),
        });
        Ok(())
    }

    fn text(&mut self, text: &str, position: Point, paint: &Paint) -> RenderResult<()> {
        ensure_finite(&[position])?;
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
            paint: paint.into(),
        });
        Ok(())
    }

    fn image(&mut self, name: &str, position: Point) -> RenderResult<()> {
        ensure_finite(&[position])?;
        self.commands.push(DrawCommand::Image {
            name: name.to_string(),
            position,
        });
        Ok(())
    }
}
