//! Session scripts: a recorded sequence of input to replay headlessly.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sketchcal_core::calendar::MemoryCalendar;
use sketchcal_core::input::{KeyEvent, PointerEvent};
use sketchcal_core::selection::PropertyEdit;
use sketchcal_core::tools::ToolKind;
use std::path::Path;

use crate::app::SessionError;

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Tool(ToolKind),
    Pointer(PointerEvent),
    Key(KeyEvent),
    /// Replace the value of the text element last opened for editing.
    Type(String),
    /// Edit from the properties form.
    Property(PropertyEdit),
    CloseProperties,
    /// Emit a frame.
    Render,
}

/// A replayable session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    /// Calendars and events visible to calendar cards.
    pub calendars: MemoryCalendar,
    /// Fixed wall-clock time for rendering. Defaults to the real time.
    pub now: Option<NaiveDateTime>,
    pub steps: Vec<Step>,
}

impl Session {
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use std::io::Write;

    #[test]
    fn test_parse_steps() {
        let session = Session::from_json(
            r#"{
                "steps": [
                    { "tool": "Pen" },
                    { "pointer": { "Down": { "position": { "x": 1.0, "y": 2.0 } } } },
                    { "key": { "Pressed": "ArrowRight" } },
                    { "type": "hello" },
                    { "property": { "Calendar": { "id": "work", "active": true } } },
                    "close_properties",
                    "render"
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(
            session.steps,
            vec![
                Step::Tool(ToolKind::Pen),
                Step::Pointer(PointerEvent::Down { position: Point::new(1.0, 2.0) }),
                Step::Key(KeyEvent::Pressed("ArrowRight".to_string())),
                Step::Type("hello".to_string()),
                Step::Property(PropertyEdit::Calendar { id: "work".to_string(), active: true }),
                Step::CloseProperties,
                Step::Render,
            ]
        );
        assert!(session.now.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "now": "2025-01-06T14:30:00", "steps": ["render"] }}"#).unwrap();
        let session = Session::load(file.path()).unwrap();
        assert_eq!(session.steps, vec![Step::Render]);
        assert!(session.now.is_some());
    }

    #[test]
    fn test_bad_script() {
        assert!(matches!(Session::from_json("[1, 2]"), Err(SessionError::Parse(_))));
    }
}
