//! Entity model: pages, cards, card instances, strokes and text.
//!
//! Pure data. Consistency between the maps is maintained by
//! [`StateManager`](crate::state::StateManager), not here.

mod card;
mod id;
mod ink;

pub use card::{CalendarProps, Card, CardInstance, CardKind, clone_card};
pub use id::Id;
pub use ink::{Rgba8, Stroke, StrokeOwner, StrokeStyle, TextContainer, TextElement, TextElementReference};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type StrokeId = Id<Stroke>;
pub type CardId = Id<Card>;
pub type CardInstanceId = Id<CardInstance>;
pub type PageId = Id<Page>;

/// Title given to new documents.
pub const DEFAULT_TITLE: &str = "Untitled Sketchy Calendar";

/// A canvas page with its own ink and text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub strokes: Vec<Stroke>,
    pub text_elements: Vec<TextElement>,
}

impl Page {
    /// Create an empty page.
    pub fn new() -> Self {
        Self {
            id: PageId::generate(),
            strokes: Vec::new(),
            text_elements: Vec::new(),
        }
    }

    pub fn stroke_mut(&mut self, id: &StrokeId) -> Option<&mut Stroke> {
        self.strokes.iter_mut().find(|s| &s.id == id)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

/// Root of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub title: String,
    pub cards: HashMap<CardId, Card>,
    pub pages: HashMap<PageId, Page>,
    pub card_instances: HashMap<CardInstanceId, CardInstance>,
    /// Navigation order of pages.
    pub page_order: Vec<PageId>,
    /// Insertion order of card instances; the iteration order for hit-testing
    /// and rendering.
    #[serde(default)]
    pub instance_order: Vec<CardInstanceId>,
}

impl Default for State {
    fn default() -> Self {
        Self::new_empty()
    }
}

impl State {
    /// A new document with a single empty page.
    pub fn new_empty() -> Self {
        let first = Page::new();
        let first_id = first.id.clone();
        Self {
            title: DEFAULT_TITLE.to_string(),
            cards: HashMap::new(),
            pages: HashMap::from([(first_id.clone(), first)]),
            card_instances: HashMap::new(),
            page_order: vec![first_id],
            instance_order: Vec::new(),
        }
    }

    /// Append a page to the document and to the navigation order.
    pub fn push_page(&mut self, page: Page) {
        self.page_order.push(page.id.clone());
        self.pages.insert(page.id.clone(), page);
    }

    /// Position of `page_id` in the navigation order.
    pub fn page_index(&self, page_id: &PageId) -> Option<usize> {
        self.page_order.iter().position(|id| id == page_id)
    }

    /// Insert an instance at the end of the instance order.
    pub fn insert_instance(&mut self, instance: CardInstance) {
        let id = instance.id.clone();
        if self.card_instances.insert(id.clone(), instance).is_none() {
            self.instance_order.push(id);
        }
    }

    /// Remove an instance and its place in the instance order.
    pub fn remove_instance(&mut self, id: &CardInstanceId) -> Option<CardInstance> {
        self.instance_order.retain(|other| other != id);
        self.card_instances.remove(id)
    }

    /// All instances in instance order.
    ///
    /// Instances missing from `instance_order` (e.g. written by a peer that
    /// only touched the map) follow the ordered ones, sorted by id so the
    /// result stays deterministic.
    pub fn instances(&self) -> Vec<&CardInstance> {
        let mut ordered: Vec<&CardInstance> = self
            .instance_order
            .iter()
            .filter_map(|id| self.card_instances.get(id))
            .collect();
        if ordered.len() < self.card_instances.len() {
            let mut stray: Vec<&CardInstance> = self
                .card_instances
                .values()
                .filter(|inst| !self.instance_order.contains(&inst.id))
                .collect();
            stray.sort_by(|a, b| a.id.cmp(&b.id));
            ordered.extend(stray);
        }
        ordered
    }

    /// Instances placed on `page_id`, in instance order.
    pub fn instances_on_page(&self, page_id: &PageId) -> Vec<&CardInstance> {
        self.instances()
            .into_iter()
            .filter(|inst| &inst.page_id == page_id)
            .collect()
    }

    /// Stroke sequence of `owner`, if the owner still exists.
    pub fn strokes_mut(&mut self, owner: &StrokeOwner) -> Option<&mut Vec<Stroke>> {
        match owner {
            StrokeOwner::Card(card_id) => Some(&mut self.cards.get_mut(card_id)?.strokes),
            StrokeOwner::Page(page_id) => Some(&mut self.pages.get_mut(page_id)?.strokes),
        }
    }

    /// Stroke `id` within the container named by `owner`.
    pub fn stroke_mut(&mut self, owner: &StrokeOwner, id: &StrokeId) -> Option<&mut Stroke> {
        match owner {
            StrokeOwner::Card(card_id) => self.cards.get_mut(card_id)?.stroke_mut(id),
            StrokeOwner::Page(page_id) => self.pages.get_mut(page_id)?.stroke_mut(id),
        }
    }

    /// Number of instances referencing `card_id`.
    pub fn instance_count(&self, card_id: &CardId) -> usize {
        self.card_instances
            .values()
            .filter(|inst| &inst.card_id == card_id)
            .count()
    }
}
