//! Pointer and keyboard routing to the active tool.

use crate::geom;
use crate::model::StrokeStyle;
use crate::selection::{PropertiesEditor, SelectionController, TextInput};
use crate::state::NewStroke;
use crate::store::DocumentStore;
use crate::tools::ToolKind;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
}

/// Keyboard event, keys named as in the DOM `KeyboardEvent.key` values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

/// Turns raw input into state manager and selection calls.
pub struct InputRouter<S: DocumentStore, T: TextInput, P: PropertiesEditor> {
    controller: SelectionController<S, T, P>,
    tool: ToolKind,
    style: StrokeStyle,
    /// Stroke being drawn with the pen.
    stroke: Option<NewStroke>,
    pressed: bool,
    last_position: Option<Point>,
}

impl<S: DocumentStore, T: TextInput, P: PropertiesEditor> InputRouter<S, T, P> {
    pub fn new(controller: SelectionController<S, T, P>) -> Self {
        let style = controller.manager().settings().pen;
        Self {
            controller,
            tool: ToolKind::default(),
            style,
            stroke: None,
            pressed: false,
            last_position: None,
        }
    }

    pub fn controller(&self) -> &SelectionController<S, T, P> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SelectionController<S, T, P> {
        &mut self.controller
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Switch tools. Ends any stroke in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tool != tool {
            log::debug!("Tool changed: {:?} -> {:?}", self.tool, tool);
        }
        self.tool = tool;
        self.stroke = None;
        self.pressed = false;
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }

    /// Whether a pen stroke is in progress.
    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position } => {
                self.pressed = true;
                self.pointer_down(position);
                self.last_position = Some(position);
            }
            PointerEvent::Move { position } => {
                if self.pressed && self.tool.is_continuous() {
                    self.pointer_drag(position);
                }
                self.last_position = Some(position);
            }
            PointerEvent::Up { position } => {
                self.pressed = false;
                self.stroke = None;
                self.last_position = Some(position);
            }
        }
    }

    fn pointer_down(&mut self, position: Point) {
        match self.tool {
            ToolKind::Select => {
                if !self.controller.click(position) {
                    self.controller.select_at_position(position);
                }
            }
            ToolKind::Pen => {
                let manager = self.controller.manager_mut();
                self.stroke = manager.create_new_stroke(position, self.style);
                if let Some(started) = &self.stroke {
                    manager.add_point_to_stroke(&started.stroke, position - started.offset);
                }
            }
            ToolKind::Eraser => {
                self.controller.manager_mut().erase(position);
            }
            ToolKind::Text => {
                if let Some(reference) = self.controller.manager_mut().create_new_text(position) {
                    self.controller.text_input_mut().open(reference);
                }
            }
            ToolKind::Card => {
                let instance = self.controller.manager_mut().create_new_card(position);
                self.controller
                    .manager_mut()
                    .set_selected_card_instance(Some(instance.id));
            }
            ToolKind::CalendarCard => {
                let manager = self.controller.manager_mut();
                let calendar_ids = manager.settings().default_calendar_ids.clone();
                let instance = manager.create_new_calendar_card(position, calendar_ids);
                manager.set_selected_card_instance(Some(instance.id));
            }
        }
    }

    fn pointer_drag(&mut self, position: Point) {
        match self.tool {
            ToolKind::Select => {
                if let Some(last) = self.last_position {
                    self.controller.drag(geom::sub(position, last));
                }
            }
            ToolKind::Pen => {
                if let Some(started) = &self.stroke {
                    self.controller
                        .manager_mut()
                        .add_point_to_stroke(&started.stroke, position - started.offset);
                }
            }
            ToolKind::Eraser => {
                self.controller.manager_mut().erase(position);
            }
            ToolKind::Text | ToolKind::Card | ToolKind::CalendarCard => {}
        }
    }

    /// Handle a key. Returns `true` if the key did something.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        let KeyEvent::Pressed(key) = event else {
            return false;
        };
        match key.as_str() {
            "ArrowRight" | "PageDown" => {
                self.controller.manager_mut().goto_next_page();
                true
            }
            "ArrowLeft" | "PageUp" => {
                self.controller.manager_mut().goto_prev_page();
                true
            }
            "Escape" => {
                self.controller.clear();
                true
            }
            "Delete" | "Backspace" => {
                let Some(id) = self.controller.manager().selected_card_instance().cloned() else {
                    return false;
                };
                self.controller.manager_mut().delete_card_instance(&id);
                self.controller.clear();
                true
            }
            _ => false,
        }
    }
}
