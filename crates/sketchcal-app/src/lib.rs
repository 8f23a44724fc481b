//! SketchCal Application
//!
//! Headless shell that wires the state manager, selection controller and
//! input router to a recording renderer and replays scripted sessions.

mod app;
mod session;
mod shortcuts;

pub use app::{App, AppConfig, FormLog, PendingText, SessionError};
pub use session::{Session, Step};
pub use shortcuts::{Shortcut, ShortcutRegistry};
