//! State manager: the single entry point for reading and editing a document.

use crate::geom;
use crate::hit_test;
use crate::model::{
    Card, CardId, CardInstance, CardInstanceId, Page, PageId, State, Stroke, StrokeId,
    StrokeOwner, StrokeStyle, TextElement, TextElementReference, clone_card,
};
use crate::settings::Settings;
use crate::store::DocumentStore;
use chrono::NaiveDate;
use kurbo::{Point, Vec2};
use std::sync::Arc;

/// Arguments for [`StateManager::create_card_instance`].
#[derive(Debug, Clone)]
pub struct NewInstance {
    pub card_id: CardId,
    pub position: Point,
    /// Instance this one transcludes, if any.
    pub link_to: Option<CardInstanceId>,
}

/// A freshly started stroke.
#[derive(Debug, Clone)]
pub struct NewStroke {
    pub stroke: Stroke,
    /// Page-space origin of the stroke's container. Subtract it from page
    /// positions before appending points.
    pub offset: Vec2,
}

/// Reads snapshots from a [`DocumentStore`] and funnels every edit through
/// it. Also tracks which page is shown and which instance is selected.
///
/// Lookups by id tolerate entities that vanished between calls (e.g. removed
/// by a peer): reads return `None` and edits do nothing.
#[derive(Debug)]
pub struct StateManager<S: DocumentStore> {
    store: S,
    settings: Settings,
    current_page: PageId,
    selected_card_instance: Option<CardInstanceId>,
}

impl<S: DocumentStore> StateManager<S> {
    /// Create a manager with default settings.
    pub fn new(store: S) -> Self {
        Self::with_settings(store, Settings::default())
    }

    /// Create a manager showing the first page of the document.
    ///
    /// A document with no pages gets one.
    pub fn with_settings(mut store: S, settings: Settings) -> Self {
        let first = store.snapshot().page_order.first().cloned();
        let current_page = match first {
            Some(id) => id,
            None => {
                let page = Page::new();
                let id = page.id.clone();
                log::info!("Document has no pages, created {}", id);
                store.mutate(|state| state.push_page(page));
                id
            }
        };
        Self {
            store,
            settings,
            current_page,
            selected_card_instance: None,
        }
    }

    /// Latest published snapshot.
    pub fn state(&self) -> Arc<State> {
        self.store.snapshot()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn current_page(&self) -> &PageId {
        &self.current_page
    }

    pub fn selected_card_instance(&self) -> Option<&CardInstanceId> {
        self.selected_card_instance.as_ref()
    }

    pub fn set_selected_card_instance(&mut self, id: Option<CardInstanceId>) {
        self.selected_card_instance = id;
    }

    // --- Navigation ---

    /// Switch to `page_id`, carrying the selected instance along.
    pub fn goto_page(&mut self, page_id: PageId) {
        if let Some(selected) = self.selected_card_instance.clone() {
            let target = page_id.clone();
            let moved = self.store.mutate(|state| {
                let instance = state.card_instances.get_mut(&selected)?;
                instance.page_id = target;
                Some(())
            });
            if moved.is_none() {
                log::debug!("Selected instance {} no longer exists, not moving it", selected);
            }
        }
        self.current_page = page_id;
    }

    /// Go to the page after the current one, appending a new page if the
    /// current page is the last.
    pub fn goto_next_page(&mut self) {
        let existing = {
            let snapshot = self.store.snapshot();
            let next_index = snapshot
                .page_index(&self.current_page)
                .map_or(0, |index| index + 1);
            snapshot.page_order.get(next_index).cloned()
        };
        let next = match existing {
            Some(id) => id,
            None => {
                let page = Page::new();
                let id = page.id.clone();
                self.store.mutate(|state| state.push_page(page));
                log::info!("Created page {}", id);
                id
            }
        };
        self.goto_page(next);
    }

    /// Go to the page before the current one. Does nothing on the first page.
    pub fn goto_prev_page(&mut self) {
        let previous = {
            let snapshot = self.store.snapshot();
            let Some(index) = snapshot.page_index(&self.current_page) else {
                log::debug!("Current page {} is not in the page order", self.current_page);
                return;
            };
            index
                .checked_sub(1)
                .and_then(|previous| snapshot.page_order.get(previous).cloned())
        };
        if let Some(previous) = previous {
            self.goto_page(previous);
        }
    }

    /// 1-based position of the current page in the page order.
    pub fn page_number(&self) -> Option<usize> {
        self.store
            .snapshot()
            .page_index(&self.current_page)
            .map(|index| index + 1)
    }

    // --- Cards ---

    /// Create a default card and place it at `position` on the current page.
    pub fn create_new_card(&mut self, position: Point) -> CardInstance {
        let card = Card::new(
            self.settings.default_card_width,
            self.settings.default_card_height,
        );
        self.insert_card_with_instance(card, position)
    }

    /// Create a calendar card for today and place it at `position`.
    pub fn create_new_calendar_card(
        &mut self,
        position: Point,
        calendar_ids: Vec<String>,
    ) -> CardInstance {
        let today = chrono::Local::now().date_naive();
        self.create_calendar_card_for(position, calendar_ids, today)
    }

    /// Create a calendar card showing `date` and place it at `position`.
    pub fn create_calendar_card_for(
        &mut self,
        position: Point,
        calendar_ids: Vec<String>,
        date: NaiveDate,
    ) -> CardInstance {
        let card = Card::new_calendar(
            self.settings.calendar_card_width,
            self.settings.calendar_card_height,
            calendar_ids,
            date,
        );
        self.insert_card_with_instance(card, position)
    }

    fn insert_card_with_instance(&mut self, card: Card, position: Point) -> CardInstance {
        let instance = self.new_instance(NewInstance {
            card_id: card.id.clone(),
            position,
            link_to: None,
        });
        log::info!("Created card {} with instance {}", card.id, instance.id);
        let stored = instance.clone();
        self.store.mutate(|state| {
            state.cards.insert(card.id.clone(), card);
            state.insert_instance(stored);
        });
        instance
    }

    /// Copy card `card_id` under a new id. The copy has no instances.
    pub fn copy_card(&mut self, card_id: &CardId) -> Option<CardId> {
        let copied = self.store.mutate(|state| {
            let copy = clone_card(state.cards.get(card_id)?);
            let id = copy.id.clone();
            state.cards.insert(id.clone(), copy);
            Some(id)
        });
        match &copied {
            Some(id) => log::info!("Copied card {} to {}", card_id, id),
            None => log::debug!("Cannot copy missing card {}", card_id),
        }
        copied
    }

    pub fn update_card_size(&mut self, card_id: &CardId, width: f64, height: f64) {
        let updated = self.store.mutate(|state| {
            let card = state.cards.get_mut(card_id)?;
            card.width = width;
            card.height = height;
            Some(())
        });
        if updated.is_none() {
            log::debug!("Cannot resize missing card {}", card_id);
        }
    }

    /// Set the day shown by a calendar card.
    pub fn update_card_date(&mut self, card_id: &CardId, date: NaiveDate) {
        let updated = self.store.mutate(|state| {
            state.cards.get_mut(card_id)?.calendar_props_mut()?.date = date;
            Some(())
        });
        if updated.is_none() {
            log::debug!("Card {} is missing or not a calendar card", card_id);
        }
    }

    /// Attach (`active`) or detach a calendar on a calendar card.
    pub fn update_card_calendar(&mut self, card_id: &CardId, calendar_id: &str, active: bool) {
        let updated = self.store.mutate(|state| {
            state
                .cards
                .get_mut(card_id)?
                .calendar_props_mut()?
                .set_calendar(calendar_id, active);
            Some(())
        });
        if updated.is_none() {
            log::debug!("Card {} is missing or not a calendar card", card_id);
        }
    }

    pub fn get_card(&self, card_id: &CardId) -> Option<Card> {
        self.store.snapshot().cards.get(card_id).cloned()
    }

    // --- Instances ---

    fn new_instance(&self, new: NewInstance) -> CardInstance {
        CardInstance {
            id: CardInstanceId::generate(),
            card_id: new.card_id,
            page_id: self.current_page.clone(),
            link_to_card_instance_id: new.link_to,
            x: new.position.x,
            y: new.position.y,
        }
    }

    /// Place a card on the current page.
    pub fn create_card_instance(&mut self, new: NewInstance) -> CardInstance {
        let instance = self.new_instance(new);
        let stored = instance.clone();
        self.store.mutate(|state| state.insert_instance(stored));
        instance
    }

    pub fn move_card_instance(&mut self, id: &CardInstanceId, position: Point) {
        let moved = self.store.mutate(|state| {
            let instance = state.card_instances.get_mut(id)?;
            instance.x = position.x;
            instance.y = position.y;
            Some(())
        });
        if moved.is_none() {
            log::debug!("Cannot move missing instance {}", id);
        }
    }

    /// Remove an instance. Its card stays in the document.
    pub fn delete_card_instance(&mut self, id: &CardInstanceId) {
        let removed = self.store.mutate(|state| state.remove_instance(id));
        match removed {
            Some(instance) => log::info!("Deleted instance {} of card {}", id, instance.card_id),
            None => log::debug!("Cannot delete missing instance {}", id),
        }
    }

    pub fn get_card_instance(&self, id: &CardInstanceId) -> Option<CardInstance> {
        self.store.snapshot().card_instances.get(id).cloned()
    }

    /// Instances on the current page, in instance order.
    pub fn card_instances_on_current_page(&self) -> Vec<CardInstance> {
        self.store
            .snapshot()
            .instances_on_page(&self.current_page)
            .into_iter()
            .cloned()
            .collect()
    }

    // --- Spatial queries ---

    pub fn find_card_instance_at(&self, position: Point) -> Option<CardInstance> {
        let snapshot = self.store.snapshot();
        hit_test::find_card_instance_at(&snapshot, &self.current_page, position).cloned()
    }

    pub fn find_text_element_at(&self, position: Point) -> Option<TextElementReference> {
        hit_test::find_text_element_at(
            &self.store.snapshot(),
            &self.current_page,
            position,
            self.settings.text_hit_radius,
        )
    }

    /// Remove at most one stroke near `position` and return its id.
    pub fn erase(&mut self, position: Point) -> Option<StrokeId> {
        let target = hit_test::find_stroke_to_erase(
            &self.store.snapshot(),
            &self.current_page,
            position,
            self.settings.card_erase_threshold,
            self.settings.page_erase_threshold,
        )?;
        let removed = self.store.mutate(|state| {
            let strokes = state.strokes_mut(&target.owner)?;
            let index = strokes.iter().position(|s| s.id == target.stroke_id)?;
            Some(strokes.remove(index).id)
        });
        if let Some(id) = &removed {
            log::debug!("Erased stroke {}", id);
        }
        removed
    }

    // --- Strokes ---

    /// Start a stroke at `position`: on the card under it, or on the current
    /// page. Returns `None` if the container vanished meanwhile.
    pub fn create_new_stroke(&mut self, position: Point, style: StrokeStyle) -> Option<NewStroke> {
        let hit = self.find_card_instance_at(position);
        let (owner, offset) = match hit {
            Some(instance) => {
                let offset = instance.origin().to_vec2();
                (StrokeOwner::Card(instance.card_id), offset)
            }
            None => (StrokeOwner::Page(self.current_page.clone()), Vec2::ZERO),
        };
        let stroke = Stroke::new(owner, style);
        let stored = stroke.clone();
        let attached = self.store.mutate(|state| {
            let strokes = state.strokes_mut(&stored.owner)?;
            strokes.push(stored);
            Some(())
        });
        if attached.is_none() {
            log::debug!("Stroke container for {} is gone", stroke.id);
            return None;
        }
        Some(NewStroke { stroke, offset })
    }

    /// Append `point`, given in the stroke container's space.
    pub fn add_point_to_stroke(&mut self, stroke: &Stroke, point: Point) {
        let appended = self.store.mutate(|state| {
            state.stroke_mut(&stroke.owner, &stroke.id)?.points.push(point);
            Some(())
        });
        if appended.is_none() {
            log::debug!("Stroke {} no longer exists", stroke.id);
        }
    }

    // --- Text ---

    /// Add an empty text element at `position`, on the card under it or on
    /// the current page.
    pub fn create_new_text(&mut self, position: Point) -> Option<TextElementReference> {
        let hit = self
            .find_card_instance_at(position)
            .map(|instance| (instance.id.clone(), instance.card_id.clone(), instance.origin()));
        let page_id = self.current_page.clone();

        let reference = self.store.mutate(|state| match hit {
            Some((instance_id, card_id, origin)) => {
                let card = state.cards.get_mut(&card_id)?;
                card.text_elements
                    .push(TextElement::new(geom::page_to_card(position, origin)));
                Some(TextElementReference::card_instance(
                    instance_id,
                    card.text_elements.len() - 1,
                ))
            }
            None => {
                let page = state.pages.get_mut(&page_id)?;
                page.text_elements.push(TextElement::new(position));
                Some(TextElementReference::page(page_id, page.text_elements.len() - 1))
            }
        });
        if reference.is_none() {
            log::debug!("Text container at {:?} is gone", position);
        }
        reference
    }

    /// Page-space anchor of a text element.
    pub fn get_text_element_position(&self, reference: &TextElementReference) -> Option<Point> {
        let snapshot = self.store.snapshot();
        let (element, origin) = hit_test::resolve_text_element(&snapshot, reference)?;
        Some(geom::card_to_page(element.position, origin))
    }

    pub fn get_text_element_value(&self, reference: &TextElementReference) -> Option<String> {
        let snapshot = self.store.snapshot();
        hit_test::resolve_text_element(&snapshot, reference).map(|(element, _)| element.value.clone())
    }

    pub fn update_text_element(&mut self, reference: &TextElementReference, value: impl Into<String>) {
        let value = value.into();
        let updated = self.store.mutate(|state| {
            hit_test::resolve_text_element_mut(state, reference)?.value = value;
            Some(())
        });
        if updated.is_none() {
            log::debug!("Text reference {:?} no longer resolves", reference);
        }
    }
}
