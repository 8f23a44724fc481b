//! Card selection, the per-instance action bar and the properties form.

use crate::calendar::CalendarInfo;
use crate::geom;
use crate::model::{Card, CardId, CardInstance, TextElementReference};
use crate::settings::Settings;
use crate::state::{NewInstance, StateManager};
use crate::store::DocumentStore;
use chrono::NaiveDate;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Receives text elements the user wants to edit.
pub trait TextInput {
    fn open(&mut self, reference: TextElementReference);
}

/// Shows the properties form of a card.
pub trait PropertiesEditor {
    fn open(&mut self, form: PropertiesForm);
}

/// Buttons of the action bar, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Copy,
    Transclude,
    Delete,
    Properties,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::Copy,
        Action::Transclude,
        Action::Delete,
        Action::Properties,
    ];
}

/// One action bar button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionCell {
    pub action: Action,
    pub rect: Rect,
}

/// Geometry of the action bar above a selected instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionBarLayout {
    pub bar: Rect,
    pub cells: [ActionCell; 4],
}

impl ActionBarLayout {
    /// Action under `position`. The bar's edges count as inside; the right
    /// edge belongs to the last cell.
    pub fn action_at(&self, position: Point) -> Option<Action> {
        let bar = self.bar;
        if position.x < bar.x0 || position.x > bar.x1 || position.y < bar.y0 || position.y > bar.y1 {
            return None;
        }
        let cell_width = bar.width() / self.cells.len() as f64;
        let index = ((position.x - bar.x0) / cell_width).floor() as usize;
        self.cells
            .get(index.min(self.cells.len() - 1))
            .map(|cell| cell.action)
    }
}

/// Lay out the action bar for `instance`: a row of square cells whose top
/// edge sits `action_bar_offset` above the instance.
pub fn action_bar_layout(instance: &CardInstance, settings: &Settings) -> ActionBarLayout {
    let size = settings.action_cell_size;
    let origin = Point::new(instance.x, instance.y - settings.action_bar_offset);
    let cell = |index: usize| {
        let x = origin.x + index as f64 * size;
        ActionCell {
            action: Action::ALL[index],
            rect: Rect::new(x, origin.y, x + size, origin.y + size),
        }
    };
    ActionBarLayout {
        bar: Rect::new(
            origin.x,
            origin.y,
            origin.x + size * Action::ALL.len() as f64,
            origin.y + size,
        ),
        cells: [cell(0), cell(1), cell(2), cell(3)],
    }
}

/// A calendar row in the properties form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarOption {
    pub id: String,
    pub summary: String,
    pub checked: bool,
}

/// Content of the properties modal for a calendar card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertiesForm {
    pub card_id: CardId,
    pub date: NaiveDate,
    pub calendars: Vec<CalendarOption>,
}

impl PropertiesForm {
    /// Build the form for `card`. Only calendar cards have one.
    pub fn for_card(card: &Card, calendars: &[CalendarInfo]) -> Option<Self> {
        let props = card.calendar_props()?;
        Some(Self {
            card_id: card.id.clone(),
            date: props.date,
            calendars: calendars
                .iter()
                .map(|info| CalendarOption {
                    id: info.id.clone(),
                    summary: info.summary.clone(),
                    checked: props.has_calendar(&info.id),
                })
                .collect(),
        })
    }
}

/// An edit made in the properties editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyEdit {
    Date(NaiveDate),
    Calendar { id: String, active: bool },
}

/// Selection logic on top of a [`StateManager`].
///
/// The selected instance lives on the manager so page navigation can carry
/// it along. If the instance is deleted elsewhere the selection stays
/// `active` until [`clear`](Self::clear); acting on it does nothing.
pub struct SelectionController<S: DocumentStore, T: TextInput, P: PropertiesEditor> {
    manager: StateManager<S>,
    text_input: T,
    properties_editor: P,
    calendars: Vec<CalendarInfo>,
    /// Card whose properties form is open.
    properties_card: Option<CardId>,
}

impl<S: DocumentStore, T: TextInput, P: PropertiesEditor> SelectionController<S, T, P> {
    pub fn new(manager: StateManager<S>, text_input: T, properties_editor: P) -> Self {
        Self {
            manager,
            text_input,
            properties_editor,
            calendars: Vec::new(),
            properties_card: None,
        }
    }

    /// Calendars listed in the properties form.
    pub fn with_calendars(mut self, calendars: Vec<CalendarInfo>) -> Self {
        self.calendars = calendars;
        self
    }

    pub fn manager(&self) -> &StateManager<S> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut StateManager<S> {
        &mut self.manager
    }

    pub fn text_input(&self) -> &T {
        &self.text_input
    }

    pub fn text_input_mut(&mut self) -> &mut T {
        &mut self.text_input
    }

    pub fn properties_editor(&self) -> &P {
        &self.properties_editor
    }

    pub fn show_properties(&self) -> bool {
        self.properties_card.is_some()
    }

    /// The card the open properties form edits.
    pub fn properties_card(&self) -> Option<&CardId> {
        self.properties_card.as_ref()
    }

    /// Whether an instance is selected, even one that no longer exists.
    pub fn active(&self) -> bool {
        self.manager.selected_card_instance().is_some()
    }

    /// The selected instance, if it still exists.
    pub fn selected(&self) -> Option<CardInstance> {
        let id = self.manager.selected_card_instance()?;
        self.manager.get_card_instance(id)
    }

    /// Select whatever is under `position`. Text wins over cards and is
    /// handed to the text input without touching the selection.
    pub fn select_at_position(&mut self, position: Point) {
        if let Some(reference) = self.manager.find_text_element_at(position) {
            self.text_input.open(reference);
            return;
        }
        let hit = self.manager.find_card_instance_at(position).map(|instance| instance.id);
        self.manager.set_selected_card_instance(hit);
    }

    /// Handle a click on the selected instance's action bar. Returns `false`
    /// if the click is not on the bar.
    pub fn click(&mut self, position: Point) -> bool {
        let Some(instance) = self.selected() else {
            return false;
        };
        let layout = action_bar_layout(&instance, self.manager.settings());
        let Some(action) = layout.action_at(position) else {
            return false;
        };
        let offset = self.manager.settings().duplicate_offset;
        let duplicate_at = geom::add(instance.origin(), Vec2::new(offset, offset));

        match action {
            Action::Copy => {
                if let Some(card_id) = self.manager.copy_card(&instance.card_id) {
                    let copy = self.manager.create_card_instance(NewInstance {
                        card_id,
                        position: duplicate_at,
                        link_to: None,
                    });
                    self.manager.set_selected_card_instance(Some(copy.id));
                }
            }
            Action::Transclude => {
                let linked = self.manager.create_card_instance(NewInstance {
                    card_id: instance.card_id.clone(),
                    position: duplicate_at,
                    link_to: Some(instance.id.clone()),
                });
                self.manager.set_selected_card_instance(Some(linked.id));
            }
            Action::Delete => {
                self.manager.delete_card_instance(&instance.id);
                self.clear();
            }
            Action::Properties => {
                let form = self
                    .manager
                    .get_card(&instance.card_id)
                    .and_then(|card| PropertiesForm::for_card(&card, &self.calendars));
                match form {
                    Some(form) => {
                        self.properties_card = Some(form.card_id.clone());
                        self.properties_editor.open(form);
                    }
                    None => log::debug!("Card {} has no properties", instance.card_id),
                }
            }
        }
        true
    }

    /// Translate the selected instance by `delta`.
    pub fn drag(&mut self, delta: Vec2) {
        if let Some(instance) = self.selected() {
            self.manager
                .move_card_instance(&instance.id, geom::add(instance.origin(), delta));
        }
    }

    pub fn clear(&mut self) {
        self.manager.set_selected_card_instance(None);
        self.properties_card = None;
    }

    /// Apply an edit from the properties editor to the card the form was
    /// opened for, whatever is selected now.
    pub fn apply_property_edit(&mut self, edit: PropertyEdit) {
        let Some(card_id) = self.properties_card.clone() else {
            log::debug!("Property edit with no properties form open");
            return;
        };
        match edit {
            PropertyEdit::Date(date) => self.manager.update_card_date(&card_id, date),
            PropertyEdit::Calendar { id, active } => {
                self.manager.update_card_calendar(&card_id, &id, active)
            }
        }
    }

    pub fn close_properties(&mut self) {
        self.properties_card = None;
    }
}
