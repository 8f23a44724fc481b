//! Cards (reusable content definitions) and their placements.

use super::{CardId, CardInstanceId, PageId, Stroke, StrokeId, StrokeOwner, TextElement};
use chrono::NaiveDate;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Properties carried by calendar cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarProps {
    /// External calendar ids shown on the card. Kept free of duplicates.
    pub calendar_ids: Vec<String>,
    /// Day the card shows.
    pub date: NaiveDate,
}

impl CalendarProps {
    /// Add or remove `calendar_id`. Adding an id already present and removing
    /// an absent one are both no-ops.
    pub fn set_calendar(&mut self, calendar_id: &str, active: bool) {
        if active {
            if !self.calendar_ids.iter().any(|id| id == calendar_id) {
                self.calendar_ids.push(calendar_id.to_string());
            }
        } else {
            self.calendar_ids.retain(|id| id != calendar_id);
        }
    }

    pub fn has_calendar(&self, calendar_id: &str) -> bool {
        self.calendar_ids.iter().any(|id| id == calendar_id)
    }
}

/// Card variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum CardKind {
    #[default]
    Default,
    Calendar(CalendarProps),
}

/// A reusable content definition. Has a size but no position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub width: f64,
    pub height: f64,
    pub strokes: Vec<Stroke>,
    pub text_elements: Vec<TextElement>,
    pub kind: CardKind,
}

impl Card {
    /// Create an empty default card.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            id: CardId::generate(),
            width,
            height,
            strokes: Vec::new(),
            text_elements: Vec::new(),
            kind: CardKind::Default,
        }
    }

    /// Create an empty calendar card.
    pub fn new_calendar(width: f64, height: f64, calendar_ids: Vec<String>, date: NaiveDate) -> Self {
        let mut card = Self::new(width, height);
        let mut props = CalendarProps {
            calendar_ids: Vec::with_capacity(calendar_ids.len()),
            date,
        };
        for id in &calendar_ids {
            props.set_calendar(id, true);
        }
        card.kind = CardKind::Calendar(props);
        card
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_calendar(&self) -> bool {
        matches!(self.kind, CardKind::Calendar(_))
    }

    pub fn calendar_props(&self) -> Option<&CalendarProps> {
        match &self.kind {
            CardKind::Calendar(props) => Some(props),
            CardKind::Default => None,
        }
    }

    pub fn calendar_props_mut(&mut self) -> Option<&mut CalendarProps> {
        match &mut self.kind {
            CardKind::Calendar(props) => Some(props),
            CardKind::Default => None,
        }
    }

    pub fn stroke_mut(&mut self, id: &StrokeId) -> Option<&mut Stroke> {
        self.strokes.iter_mut().find(|s| &s.id == id)
    }
}

/// Deep-copy `card` under a fresh id.
///
/// Copied strokes get fresh ids and are owned by the new card, keeping stroke
/// ids unique within the document.
pub fn clone_card(card: &Card) -> Card {
    let mut copy = card.clone();
    copy.id = CardId::generate();
    for stroke in &mut copy.strokes {
        stroke.id = StrokeId::generate();
        stroke.owner = StrokeOwner::Card(copy.id.clone());
    }
    copy
}

/// A placement of a card on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardInstance {
    pub id: CardInstanceId,
    pub card_id: CardId,
    pub page_id: PageId,
    /// Set when this instance was created by transcluding another instance.
    pub link_to_card_instance_id: Option<CardInstanceId>,
    pub x: f64,
    pub y: f64,
}

impl CardInstance {
    /// Top-left corner in page space.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Page-space box covered by this instance when showing `card`.
    pub fn bounds(&self, card: &Card) -> Rect {
        Rect::from_origin_size(self.origin(), card.size())
    }

    /// Closed containment test: edges count as inside.
    pub fn contains(&self, card: &Card, position: Point) -> bool {
        position.x >= self.x
            && position.x <= self.x + card.width
            && position.y >= self.y
            && position.y <= self.y + card.height
    }

    pub fn is_transclusion(&self) -> bool {
        self.link_to_card_instance_id.is_some()
    }
}
