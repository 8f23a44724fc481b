//! Interaction settings.
//!
//! Every tunable distance, size and calendar constant lives here so the state
//! manager, selection controller, input router and scene builder agree on
//! them. Settings are plain JSON; missing fields take their defaults.

use crate::model::StrokeStyle;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Settings errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Tunables for hit-testing, card creation and calendar layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// A text element is hit when the pointer is strictly closer than this.
    pub text_hit_radius: f64,
    /// Squared-distance threshold for erasing card strokes.
    pub card_erase_threshold: f64,
    /// Squared-distance threshold for erasing page strokes.
    pub page_erase_threshold: f64,
    /// Width and height of one action bar cell.
    pub action_cell_size: f64,
    /// Distance from the action bar's top edge to the instance's top edge.
    pub action_bar_offset: f64,
    /// Offset of copies and transclusions from their source instance.
    pub duplicate_offset: f64,
    pub default_card_width: f64,
    pub default_card_height: f64,
    pub calendar_card_width: f64,
    pub calendar_card_height: f64,
    /// Height of the date header above the hour grid.
    pub calendar_header_height: f64,
    /// First hour shown on a calendar card.
    pub calendar_start_hour: u32,
    /// Hour at the bottom edge of a calendar card.
    pub calendar_end_hour: u32,
    /// Calendars attached to newly created calendar cards.
    pub default_calendar_ids: Vec<String>,
    /// Style for new strokes.
    pub pen: StrokeStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            text_hit_radius: 10.0,
            card_erase_threshold: 5.0,
            page_erase_threshold: 10.0,
            action_cell_size: 40.0,
            action_bar_offset: 50.0,
            duplicate_offset: 20.0,
            default_card_width: 5.0,
            default_card_height: 5.0,
            calendar_card_width: 200.0,
            calendar_card_height: 750.0,
            calendar_header_height: 150.0,
            calendar_start_hour: 8,
            calendar_end_hour: 21,
            default_calendar_ids: Vec::new(),
            pen: StrokeStyle::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to pretty JSON.
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        log::info!("Loaded settings from {}", path.display());
        Self::from_json(&json)
    }

    /// Number of hour rows on a calendar card. Zero for an inverted range.
    pub fn calendar_hours(&self) -> u32 {
        self.calendar_end_hour.saturating_sub(self.calendar_start_hour)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.calendar_end_hour <= self.calendar_start_hour || self.calendar_end_hour > 24 {
            return Err(SettingsError::Invalid(format!(
                "calendar hours {}..{} are not an increasing range within a day",
                self.calendar_start_hour, self.calendar_end_hour
            )));
        }
        if self.action_cell_size <= 0.0 {
            return Err(SettingsError::Invalid(
                "action_cell_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
