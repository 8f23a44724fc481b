//! Canvas tools.

use serde::{Deserialize, Serialize};

/// What a pointer press on the canvas does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    /// Select cards, use the action bar, edit text.
    #[default]
    Select,
    /// Draw freehand strokes.
    Pen,
    Eraser,
    /// Place a text element.
    Text,
    /// Place a default card.
    Card,
    /// Place a calendar card for today.
    CalendarCard,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::Select,
        ToolKind::Pen,
        ToolKind::Eraser,
        ToolKind::Text,
        ToolKind::Card,
        ToolKind::CalendarCard,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Pen => "Pen",
            ToolKind::Eraser => "Eraser",
            ToolKind::Text => "Text",
            ToolKind::Card => "Card",
            ToolKind::CalendarCard => "Calendar card",
        }
    }

    /// Whether holding the pointer down and moving continues the action.
    pub fn is_continuous(self) -> bool {
        matches!(self, ToolKind::Select | ToolKind::Pen | ToolKind::Eraser)
    }
}
