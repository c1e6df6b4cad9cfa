use sketchboard_shared::{Point, ShapeKind};

/// Geometry of a shape preview, stroked but never filled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outline {
    Line { from: Point, to: Point },
    /// `width` and `height` may be negative when the cursor is above or left of the anchor.
    Rectangle { origin: Point, width: f32, height: f32 },
    Circle { center: Point, radius: f32 },
    Triangle { points: [Point; 3] },
}

impl Outline {
    /// The straight edges of the outline. Empty for circles.
    pub fn segments(&self) -> Vec<(Point, Point)> {
        match *self {
            Outline::Line { from, to } => vec![(from, to)],
            Outline::Rectangle {
                origin,
                width,
                height,
            } => {
                let a = origin;
                let b = Point::new(origin.x + width, origin.y);
                let c = Point::new(origin.x + width, origin.y + height);
                let d = Point::new(origin.x, origin.y + height);
                vec![(a, b), (b, c), (c, d), (d, a)]
            }
            Outline::Triangle { points: [a, b, c] } => vec![(a, b), (b, c), (c, a)],
            Outline::Circle { .. } => Vec::new(),
        }
    }
}

pub fn shape_outline(kind: ShapeKind, anchor: Point, cursor: Point) -> Outline {
    match kind {
        ShapeKind::Line => Outline::Line {
            from: anchor,
            to: cursor,
        },
        ShapeKind::Rectangle => Outline::Rectangle {
            origin: anchor,
            width: cursor.x - anchor.x,
            height: cursor.y - anchor.y,
        },
        ShapeKind::Circle => Outline::Circle {
            center: anchor,
            radius: anchor.distance(cursor) / 2.0,
        },
        ShapeKind::Triangle => Outline::Triangle {
            points: [
                anchor,
                cursor,
                Point::new(2.0 * anchor.x - cursor.x, cursor.y),
            ],
        },
    }
}

pub fn distance_to_segment(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    if dx.abs() < f64::EPSILON && dy.abs() < f64::EPSILON {
        return ((px - x1).powi(2) + (py - y1).powi(2)).sqrt();
    }
    let t = ((px - x1) * dx + (py - y1) * dy) / (dx * dx + dy * dy);
    let t = t.clamp(0.0, 1.0);
    let proj_x = x1 + t * dx;
    let proj_y = y1 + t * dy;
    ((px - proj_x).powi(2) + (py - proj_y).powi(2)).sqrt()
}
