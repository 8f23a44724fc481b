//! Point and vector helpers.
//!
//! Card strokes and text live in card-local space. Every comparison against a
//! page-space pointer position, and every render of card content, goes
//! through [`card_to_page`]; authoring goes the other way through
//! [`page_to_card`].

use kurbo::{Point, Vec2};

/// Translate `point` by `delta`.
pub fn add(point: Point, delta: Vec2) -> Point {
    point + delta
}

/// Vector from `b` to `a`.
pub fn sub(a: Point, b: Point) -> Vec2 {
    a - b
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (a - b).hypot()
}

/// Squared Euclidean distance between two points.
pub fn distance_squared(a: Point, b: Point) -> f64 {
    (a - b).hypot2()
}

/// Map a card-local point into page space for a card placed at `origin`.
pub fn card_to_page(local: Point, origin: Point) -> Point {
    local + origin.to_vec2()
}

/// Map a page-space point into the local space of a card placed at `origin`.
pub fn page_to_card(page: Point, origin: Point) -> Point {
    page - origin.to_vec2()
}

/// Whether any of `points` (card-local to `origin`) lies within `threshold`
/// of `position`, comparing *squared* distance against `threshold` as given.
pub fn any_point_near(position: Point, points: &[Point], origin: Point, threshold: f64) -> bool {
    points
        .iter()
        .any(|&p| distance_squared(card_to_page(p, origin), position) < threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let d = distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert!((d - 5.0).abs() < f64::EPSILON);
        let d2 = distance_squared(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert!((d2 - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_card_page_roundtrip() {
        let origin = Point::new(100.0, 40.0);
        let local = Point::new(5.0, 7.0);
        let page = card_to_page(local, origin);
        assert_eq!(page, Point::new(105.0, 47.0));
        assert_eq!(page_to_card(page, origin), local);
    }

    #[test]
    fn test_any_point_near_uses_squared_distance() {
        let points = [Point::new(0.0, 0.0)];
        // distance 3 => squared 9, below 10
        assert!(any_point_near(Point::new(3.0, 0.0), &points, Point::ZERO, 10.0));
        // distance 4 => squared 16, not below 10
        assert!(!any_point_near(Point::new(4.0, 0.0), &points, Point::ZERO, 10.0));
    }

    #[test]
    fn test_any_point_near_translates_by_origin() {
        let points = [Point::new(1.0, 1.0)];
        let origin = Point::new(50.0, 50.0);
        assert!(any_point_near(Point::new(51.0, 51.0), &points, origin, 5.0));
        assert!(!any_point_near(Point::new(1.0, 1.0), &points, origin, 5.0));
    }

    #[test]
    fn test_add_sub() {
        let p = add(Point::new(1.0, 2.0), Vec2::new(3.0, 4.0));
        assert_eq!(p, Point::new(4.0, 6.0));
        assert_eq!(sub(p, Point::new(1.0, 2.0)), Vec2::new(3.0, 4.0));
    }
}
