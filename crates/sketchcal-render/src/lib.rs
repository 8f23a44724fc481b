//! SketchCal Render Library
//!
//! Renderer abstraction, scene building for pages, cards and the selection
//! chrome, and a recording renderer for headless use.

mod display_list;
mod renderer;
pub mod scene;

pub use display_list::{DisplayList, DrawCommand, PaintSpec};
pub use renderer::{Paint, RenderResult, Renderer, RendererError};
pub use scene::{RenderContext, build_frame, build_scene, build_selection};
