//! SketchCal Core Library
//!
//! Platform-agnostic document model and interaction logic for the SketchCal
//! canvas: pages of freehand ink and text, reusable cards placed and
//! transcluded across pages, and calendar cards showing a day of events.

pub mod calendar;
pub mod geom;
pub mod hit_test;
pub mod input;
pub mod model;
pub mod selection;
pub mod settings;
pub mod state;
pub mod store;
pub mod time;
pub mod tools;

pub use calendar::{CalendarEvent, CalendarInfo, CalendarSource, MemoryCalendar};
pub use input::{InputRouter, KeyEvent, PointerEvent};
pub use model::{
    Card, CardId, CardInstance, CardInstanceId, CardKind, Page, PageId, State, Stroke, StrokeId,
    StrokeOwner, StrokeStyle, TextElementReference,
};
pub use selection::{
    Action, ActionBarLayout, PropertiesEditor, PropertiesForm, PropertyEdit, SelectionController,
    TextInput, action_bar_layout,
};
pub use settings::{Settings, SettingsError};
pub use state::{NewInstance, NewStroke, StateManager};
pub use store::{DocumentStore, MemoryStore};
pub use time::get_time_offset;
pub use tools::ToolKind;
