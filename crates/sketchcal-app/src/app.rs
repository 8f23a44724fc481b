//! Headless application: replays scripted input and renders frames.

use crate::session::{Session, Step};
use chrono::NaiveDateTime;
use sketchcal_core::calendar::{CalendarSource, MemoryCalendar};
use sketchcal_core::input::InputRouter;
use sketchcal_core::model::TextElementReference;
use sketchcal_core::selection::{PropertiesEditor, PropertiesForm, SelectionController, TextInput};
use sketchcal_core::settings::{Settings, SettingsError};
use sketchcal_core::state::StateManager;
use sketchcal_core::store::MemoryStore;
use sketchcal_render::{DisplayList, RenderContext, RendererError, build_frame};
use thiserror::Error;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read session: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid session JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("{0}")]
    Usage(String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub viewport_width: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
        }
    }
}

/// Text input that remembers the element last opened for editing.
#[derive(Debug, Default)]
pub struct PendingText {
    pub current: Option<TextElementReference>,
}

impl TextInput for PendingText {
    fn open(&mut self, reference: TextElementReference) {
        log::debug!("Editing text {:?}", reference);
        self.current = Some(reference);
    }
}

/// Properties editor that records every form it was asked to show.
#[derive(Debug, Default)]
pub struct FormLog {
    pub forms: Vec<PropertiesForm>,
}

impl PropertiesEditor for FormLog {
    fn open(&mut self, form: PropertiesForm) {
        log::debug!("Properties opened for card {}", form.card_id);
        self.forms.push(form);
    }
}

type Router = InputRouter<MemoryStore, PendingText, FormLog>;

/// Main application struct.
pub struct App {
    config: AppConfig,
    router: Router,
    calendars: MemoryCalendar,
    now: Option<NaiveDateTime>,
}

impl App {
    pub fn new(settings: Settings, calendars: MemoryCalendar, config: AppConfig) -> Self {
        let manager = StateManager::with_settings(MemoryStore::new(), settings);
        let controller = SelectionController::new(manager, PendingText::default(), FormLog::default())
            .with_calendars(calendars.calendars());
        Self {
            config,
            router: InputRouter::new(controller),
            calendars,
            now: None,
        }
    }

    /// Render with a fixed wall-clock time.
    pub fn with_now(mut self, now: Option<NaiveDateTime>) -> Self {
        self.now = now;
        self
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Apply one step. `Render` steps return the frame.
    pub fn apply(&mut self, step: &Step) -> Result<Option<DisplayList>, SessionError> {
        match step {
            Step::Tool(tool) => self.router.set_tool(*tool),
            Step::Pointer(event) => self.router.handle_pointer(*event),
            Step::Key(event) => {
                if !self.router.handle_key(event) {
                    log::debug!("Unhandled key {:?}", event);
                }
            }
            Step::Type(value) => {
                let controller = self.router.controller_mut();
                match controller.text_input().current.clone() {
                    Some(reference) => controller
                        .manager_mut()
                        .update_text_element(&reference, value.as_str()),
                    None => log::warn!("Typed {:?} with no text element open", value),
                }
            }
            Step::Property(edit) => self.router.controller_mut().apply_property_edit(edit.clone()),
            Step::CloseProperties => self.router.controller_mut().close_properties(),
            Step::Render => return self.render().map(Some),
        }
        Ok(None)
    }

    /// Render the current page and selection.
    pub fn render(&self) -> Result<DisplayList, SessionError> {
        let manager = self.router.controller().manager();
        let state = manager.state();
        let mut ctx = RenderContext::new(
            &state,
            manager.current_page(),
            manager.settings(),
            &self.calendars,
            self.config.viewport_width,
        )
        .with_selection(manager.selected_card_instance());
        if let Some(now) = self.now {
            ctx = ctx.with_now(now);
        }

        let mut list = DisplayList::new();
        build_frame(&mut list, &ctx)?;
        Ok(list)
    }

    /// Replay `session`. Returns a frame per `Render` step, or a single final
    /// frame if the script has none.
    pub fn run(&mut self, session: &Session) -> Result<Vec<DisplayList>, SessionError> {
        let mut frames = Vec::new();
        for step in &session.steps {
            if let Some(frame) = self.apply(step)? {
                frames.push(frame);
            }
        }
        if frames.is_empty() {
            frames.push(self.render()?);
        }
        log::info!("Replayed {} steps into {} frames", session.steps.len(), frames.len());
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kurbo::Point;
    use sketchcal_core::calendar::CalendarEvent;
    use sketchcal_core::input::{KeyEvent, PointerEvent};
    use sketchcal_core::selection::PropertyEdit;
    use sketchcal_core::tools::ToolKind;
    use sketchcal_render::DrawCommand;

    fn down(x: f64, y: f64) -> Step {
        Step::Pointer(PointerEvent::Down { position: Point::new(x, y) })
    }

    fn up(x: f64, y: f64) -> Step {
        Step::Pointer(PointerEvent::Up { position: Point::new(x, y) })
    }

    fn monday_at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn app() -> App {
        App::new(Settings::default(), MemoryCalendar::new(), AppConfig::default())
            .with_now(Some(monday_at(12)))
    }

    #[test]
    fn test_empty_session_renders_one_frame() {
        let frames = app().run(&Session::default()).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].texts(), vec!["1"]);
    }

    #[test]
    fn test_typed_text_is_rendered() {
        let session = Session {
            steps: vec![
                Step::Tool(ToolKind::Text),
                down(300.0, 300.0),
                up(300.0, 300.0),
                Step::Type("Dentist at 3".to_string()),
                Step::Render,
            ],
            ..Session::default()
        };
        let frames = app().run(&session).unwrap();
        assert_eq!(frames.len(), 1);
        assert!(frames[0].texts().contains(&"Dentist at 3"));
    }

    #[test]
    fn test_page_navigation_frames() {
        let session = Session {
            steps: vec![
                Step::Key(KeyEvent::Pressed("PageDown".to_string())),
                Step::Render,
                Step::Key(KeyEvent::Pressed("PageUp".to_string())),
                Step::Render,
            ],
            ..Session::default()
        };
        let frames = app().run(&session).unwrap();
        assert_eq!(frames[0].texts(), vec!["2"]);
        assert_eq!(frames[1].texts(), vec!["1"]);
    }

    #[test]
    fn test_calendar_card_properties_flow() {
        let mut calendars = MemoryCalendar::new();
        calendars.add_calendar("work", "Work");
        calendars.add_event(CalendarEvent {
            calendar_id: "work".to_string(),
            summary: "Planning".to_string(),
            start: monday_at(10),
            end: monday_at(11),
        });
        let mut app = App::new(Settings::default(), calendars, AppConfig::default())
            .with_now(Some(monday_at(12)));

        let session = Session {
            steps: vec![
                Step::Tool(ToolKind::CalendarCard),
                down(100.0, 100.0),
                up(100.0, 100.0),
                Step::Tool(ToolKind::Select),
                // properties cell of the action bar
                down(230.0, 60.0),
                up(230.0, 60.0),
                Step::Property(PropertyEdit::Date(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap())),
                Step::Property(PropertyEdit::Calendar { id: "work".to_string(), active: true }),
                Step::CloseProperties,
                Step::Render,
            ],
            ..Session::default()
        };
        let frames = app.run(&session).unwrap();

        let forms = &app.router().controller().properties_editor().forms;
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].calendars[0].id, "work");
        assert!(!forms[0].calendars[0].checked);
        assert!(!app.router().controller().show_properties());

        let frame = &frames[0];
        assert!(frame.texts().contains(&"Mon, Jan 6"));
        assert!(frame.texts().contains(&"Planning"));
        assert!(frame.images().contains(&"calendar.png"));
        assert!(frame
            .commands
            .iter()
            .any(|command| matches!(command, DrawCommand::Line { .. })));
    }

    #[test]
    fn test_demo_session_replays() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/monday.json");
        let session = Session::load(path).unwrap();
        let mut app = App::new(Settings::default(), session.calendars.clone(), AppConfig::default())
            .with_now(session.now);
        let frames = app.run(&session).unwrap();

        assert_eq!(frames.len(), 1);
        let texts = frames[0].texts();
        assert!(texts.contains(&"Standup"));
        assert!(!texts.contains(&"Groceries"));
        assert!(texts.contains(&"Call the plumber"));
    }

    #[test]
    fn test_type_without_open_text_is_ignored() {
        let mut app = app();
        let before = app.router().controller().manager().state();
        app.apply(&Step::Type("lost".to_string())).unwrap();
        assert_eq!(*app.router().controller().manager().state(), *before);
    }
}
