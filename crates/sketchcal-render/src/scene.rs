//! Scene building: turns a document snapshot into renderer primitives.

use crate::renderer::{Paint, RenderResult, Renderer};
use chrono::NaiveDateTime;
use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use sketchcal_core::calendar::CalendarSource;
use sketchcal_core::geom;
use sketchcal_core::model::{
    CalendarProps, Card, CardInstance, CardInstanceId, PageId, Rgba8, State, Stroke, TextElement,
};
use sketchcal_core::selection::{Action, action_bar_layout};
use sketchcal_core::settings::Settings;
use sketchcal_core::time::get_time_offset;

const PAGE_NUMBER_FONT: &str = "20px Arial";
const HAND_FONT: &str = "18px Architects Daughter";
const LABEL_FONT: &str = "18px Arial";

const GRAY: Rgba8 = Rgba8::new(128, 128, 128, 255);
const LIGHT_GRAY: Rgba8 = Rgba8::new(170, 170, 170, 255);
const SHADOW: Rgba8 = Rgba8::new(0, 0, 0, 17);
const BORDER: Rgba8 = Rgba8::new(0, 0, 0, 34);
const EVENT_FILL: Rgba8 = Rgba8::new(0, 0, 0, 17);
const NOW_LINE: Rgba8 = Rgba8::new(204, 116, 116, 255);
const SELECTION: Rgba8 = Rgba8::new(0, 0, 255, 255);

pub const TRANSCLUDE_ICON: &str = "transclude-light.png";

/// Image drawn in an action bar cell.
pub fn action_icon(action: Action) -> &'static str {
    match action {
        Action::Copy => "copy.png",
        Action::Transclude => "transclude.png",
        Action::Delete => "delete.png",
        Action::Properties => "calendar.png",
    }
}

fn color(rgba: Rgba8) -> Color {
    rgba.into()
}

/// Everything needed to draw one frame of the current page.
pub struct RenderContext<'a> {
    pub state: &'a State,
    pub page_id: &'a PageId,
    pub settings: &'a Settings,
    pub calendars: &'a dyn CalendarSource,
    /// Width of the visible area, for right-aligned chrome.
    pub viewport_width: f64,
    /// Local wall-clock time, for the "now" line on today's calendar cards.
    pub now: NaiveDateTime,
    pub selected: Option<&'a CardInstanceId>,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        state: &'a State,
        page_id: &'a PageId,
        settings: &'a Settings,
        calendars: &'a dyn CalendarSource,
        viewport_width: f64,
    ) -> Self {
        Self {
            state,
            page_id,
            settings,
            calendars,
            viewport_width,
            now: chrono::Local::now().naive_local(),
            selected: None,
        }
    }

    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    pub fn with_selection(mut self, selected: Option<&'a CardInstanceId>) -> Self {
        self.selected = selected;
        self
    }
}

/// Draw the page followed by the selection chrome.
pub fn build_frame(renderer: &mut dyn Renderer, ctx: &RenderContext) -> RenderResult<()> {
    build_scene(renderer, ctx)?;
    build_selection(renderer, ctx)
}

/// Draw the current page: page number, page ink and text, then every card
/// instance on the page in instance order.
pub fn build_scene(renderer: &mut dyn Renderer, ctx: &RenderContext) -> RenderResult<()> {
    let state = ctx.state;

    if let Some(index) = state.page_index(ctx.page_id) {
        renderer.text(
            &(index + 1).to_string(),
            Point::new(ctx.viewport_width - 30.0, 30.0),
            &Paint::font(PAGE_NUMBER_FONT, color(GRAY)),
        )?;
    }

    match state.pages.get(ctx.page_id) {
        Some(page) => {
            render_ink(renderer, &page.strokes, &page.text_elements, Point::ZERO)?;
        }
        None => log::debug!("Page {} is not in the document", ctx.page_id),
    }

    for instance in state.instances_on_page(ctx.page_id) {
        let Some(card) = state.cards.get(&instance.card_id) else {
            continue;
        };
        render_card_instance(renderer, ctx, instance, card)?;
    }
    Ok(())
}

fn render_ink(
    renderer: &mut dyn Renderer,
    strokes: &[Stroke],
    text_elements: &[TextElement],
    origin: Point,
) -> RenderResult<()> {
    for stroke in strokes {
        let points: Vec<Point> = stroke
            .points
            .iter()
            .map(|&p| geom::card_to_page(p, origin))
            .collect();
        renderer.poly(&points, &Paint::stroke(color(stroke.color), stroke.weight))?;
    }
    let font = Paint::font(HAND_FONT, color(Rgba8::black()));
    for element in text_elements {
        renderer.text(&element.value, geom::card_to_page(element.position, origin), &font)?;
    }
    Ok(())
}

fn render_card_instance(
    renderer: &mut dyn Renderer,
    ctx: &RenderContext,
    instance: &CardInstance,
    card: &Card,
) -> RenderResult<()> {
    let bounds = instance.bounds(card);
    renderer.rect(bounds + Vec2::new(2.0, 2.0), 3.0, &Paint::fill(color(SHADOW)))?;
    renderer.rect(
        bounds,
        3.0,
        &Paint::fill_and_stroke(color(Rgba8::white()), color(BORDER), 0.5),
    )?;

    let linked = instance
        .link_to_card_instance_id
        .as_ref()
        .is_some_and(|id| ctx.state.card_instances.contains_key(id));
    if linked {
        renderer.image(
            TRANSCLUDE_ICON,
            Point::new(instance.x + card.width - 40.0, instance.y),
        )?;
    }

    if let Some(props) = card.calendar_props() {
        render_calendar(renderer, ctx, instance, card, props)?;
    }

    render_ink(renderer, &card.strokes, &card.text_elements, instance.origin())
}

fn render_calendar(
    renderer: &mut dyn Renderer,
    ctx: &RenderContext,
    instance: &CardInstance,
    card: &Card,
    props: &CalendarProps,
) -> RenderResult<()> {
    let settings = ctx.settings;
    let header = settings.calendar_header_height;
    let body = card.height - header;
    let hours = settings.calendar_hours();
    let offset_of = |time: NaiveDateTime| {
        header
            + get_time_offset(
                time,
                settings.calendar_start_hour,
                settings.calendar_end_hour,
                0.0,
                body,
            )
    };

    let grid_paint = Paint::stroke(color(LIGHT_GRAY), 1.0);
    let label_paint = Paint::fill(color(LIGHT_GRAY));
    for row in 0..hours {
        let hour = settings.calendar_start_hour + row;
        let y = instance.y + header + body / f64::from(hours) * f64::from(row);
        renderer.text(
            &format!("{}:00", hour),
            Point::new(instance.x + 10.0, y + 15.0),
            &label_paint,
        )?;
        renderer.line(
            Point::new(instance.x, y),
            Point::new(instance.x + card.width, y),
            &grid_paint,
        )?;
    }

    renderer.text(
        &props.date.format("%a, %b %-d").to_string(),
        Point::new(instance.x + 10.0, instance.y + 30.0),
        &Paint::font(LABEL_FONT, color(GRAY)),
    )?;

    if ctx.now.date() == props.date {
        let y = instance.y + offset_of(ctx.now);
        renderer.line(
            Point::new(instance.x, y),
            Point::new(instance.x + card.width, y),
            &Paint::stroke(color(NOW_LINE), 1.0),
        )?;
    }

    for event in ctx.calendars.events_on_day(props.date, &props.calendar_ids) {
        // Events spilling into neighbouring days are cut at the card edges.
        let start = if event.start.date() < props.date {
            instance.y + header
        } else {
            instance.y + offset_of(event.start)
        };
        let end = if event.end.date() > props.date {
            instance.y + card.height
        } else {
            instance.y + offset_of(event.end)
        };
        renderer.rect(
            Rect::new(instance.x + 50.0, start, instance.x + card.width, end),
            3.0,
            &Paint::fill(color(EVENT_FILL)),
        )?;
        renderer.text(
            &event.summary,
            Point::new(instance.x + 60.0, start + 15.0),
            &label_paint,
        )?;
    }
    Ok(())
}

/// Draw the outline and action bar of the selected instance. Draws nothing
/// when nothing is selected or the selection no longer resolves.
pub fn build_selection(renderer: &mut dyn Renderer, ctx: &RenderContext) -> RenderResult<()> {
    let Some(selected) = ctx.selected else {
        return Ok(());
    };
    let Some(instance) = ctx.state.card_instances.get(selected) else {
        return Ok(());
    };
    let Some(card) = ctx.state.cards.get(&instance.card_id) else {
        return Ok(());
    };

    renderer.rect(
        instance.bounds(card).inflate(4.0, 4.0),
        4.0,
        &Paint::dashed(color(SELECTION), 1.0, &[10.0, 10.0]),
    )?;

    let layout = action_bar_layout(instance, ctx.settings);
    renderer.rect(layout.bar + Vec2::new(2.0, 2.0), 3.0, &Paint::fill(color(SHADOW)))?;
    renderer.rect(
        layout.bar,
        3.0,
        &Paint::fill_and_stroke(color(Rgba8::white()), color(BORDER), 1.0),
    )?;

    for cell in &layout.cells {
        if cell.action == Action::Properties {
            renderer.line(
                Point::new(cell.rect.x0, cell.rect.y0),
                Point::new(cell.rect.x0, cell.rect.y1),
                &Paint::stroke(color(BORDER), 1.0),
            )?;
        }
        renderer.image(action_icon(cell.action), cell.rect.origin())?;
    }
    Ok(())
}
