//! Connection path routing.
//!
//! Routing is a pure function of the two endpoint/side pairs, so the same
//! call serves creation time and every geometry-change recompute. None of
//! the policies avoid obstacles: an elbow may cross other objects.

use crate::geometry::anchor_position;
use crate::model::{Canvas, Connection, Point, Side};
use serde::{Deserialize, Serialize};

/// Distance an elbow route travels straight out of its start anchor.
pub const DEFAULT_STANDOFF: f32 = 20.0;

/// How a committed connection is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutePolicy {
    /// Single segment. Used for the in-progress preview line.
    Straight,
    /// Standoff from the start anchor, then one axis-aligned bend.
    #[default]
    Elbow,
    /// Cubic S-curve, with the label drawn at its midpoint.
    Curved,
}

impl RoutePolicy {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "straight" => Some(RoutePolicy::Straight),
            "elbow" => Some(RoutePolicy::Elbow),
            "curved" => Some(RoutePolicy::Curved),
            _ => None,
        }
    }
}

/// A single path command (SVG-like but simplified).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    MoveTo(Point),
    LineTo(Point),
    CubicTo(Point, Point, Point), // c1, c2, end
}

/// A routed path description.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub commands: Vec<PathCmd>,
}

impl Route {
    pub fn start(&self) -> Option<Point> {
        match self.commands.first()? {
            PathCmd::MoveTo(p) => Some(*p),
            _ => None,
        }
    }

    pub fn end(&self) -> Option<Point> {
        self.commands.last().map(|cmd| match cmd {
            PathCmd::MoveTo(p) | PathCmd::LineTo(p) | PathCmd::CubicTo(_, _, p) => *p,
        })
    }

    /// Point halfway along the path, used to place connection labels.
    pub fn midpoint(&self) -> Point {
        let mut segments: Vec<(Point, PathCmd)> = Vec::new();
        let mut cursor = Point::default();
        for cmd in &self.commands {
            match cmd {
                PathCmd::MoveTo(p) => cursor = *p,
                PathCmd::LineTo(p) | PathCmd::CubicTo(_, _, p) => {
                    segments.push((cursor, *cmd));
                    cursor = *p;
                }
            }
        }

        // A single curve is symmetric in t; evaluate it directly.
        if let [(from, PathCmd::CubicTo(c1, c2, to))] = segments.as_slice() {
            return cubic_point(*from, *c1, *c2, *to, 0.5);
        }

        let lengths: Vec<f32> = segments
            .iter()
            .map(|(from, cmd)| match cmd {
                PathCmd::LineTo(to) | PathCmd::CubicTo(_, _, to) => distance(*from, *to),
                PathCmd::MoveTo(_) => 0.0,
            })
            .collect();
        let total: f32 = lengths.iter().sum();
        if total == 0.0 {
            return self.start().unwrap_or(cursor);
        }

        let mut remaining = total / 2.0;
        for ((from, cmd), len) in segments.iter().zip(&lengths) {
            if remaining <= *len && *len > 0.0 {
                let to = match cmd {
                    PathCmd::LineTo(p) | PathCmd::CubicTo(_, _, p) | PathCmd::MoveTo(p) => *p,
                };
                let t = remaining / len;
                return Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
            }
            remaining -= len;
        }
        cursor
    }
}

/// Routing parameters shared by every connection on a board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Router {
    pub policy: RoutePolicy,
    pub standoff: f32,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            policy: RoutePolicy::Elbow,
            standoff: DEFAULT_STANDOFF,
        }
    }
}

impl Router {
    pub fn new(policy: RoutePolicy, standoff: f32) -> Self {
        Self { policy, standoff }
    }

    /// Route from `p1` (leaving through `side1`) to `p2` (entering `side2`).
    pub fn route(&self, p1: Point, side1: Side, p2: Point, side2: Side) -> Route {
        match self.policy {
            RoutePolicy::Straight => straight(p1, p2),
            RoutePolicy::Elbow => elbow(p1, side1, p2, side2, self.standoff),
            RoutePolicy::Curved => curved(p1, p2),
        }
    }

    /// Route a stored connection from the current anchor positions.
    ///
    /// Returns `None` when either endpoint is missing from `canvas`.
    pub fn route_connection(&self, canvas: &Canvas, connection: &Connection) -> Option<Route> {
        let p1 = anchor_position(canvas, connection.start, connection.start_side)?;
        let p2 = anchor_position(canvas, connection.end, connection.end_side)?;
        Some(self.route(p1, connection.start_side, p2, connection.end_side))
    }
}

pub fn straight(p1: Point, p2: Point) -> Route {
    Route {
        commands: vec![PathCmd::MoveTo(p1), PathCmd::LineTo(p2)],
    }
}

/// Leave `p1` by `standoff` along `side1`'s outward direction, then bend once.
///
/// Left/right starts go horizontal first; top/bottom starts go vertical
/// first. The end side does not change the shape.
pub fn elbow(p1: Point, side1: Side, p2: Point, _side2: Side, standoff: f32) -> Route {
    let (dx, dy) = side1.outward();
    let exit = p1.offset(dx * standoff, dy * standoff);
    let bend = if side1.is_horizontal() {
        Point::new(p2.x, exit.y)
    } else {
        Point::new(exit.x, p2.y)
    };
    Route {
        commands: vec![
            PathCmd::MoveTo(p1),
            PathCmd::LineTo(exit),
            PathCmd::LineTo(bend),
            PathCmd::LineTo(p2),
        ],
    }
}

/// Cubic S-curve; control points sit half the horizontal distance inward.
pub fn curved(p1: Point, p2: Point) -> Route {
    let offset = (p2.x - p1.x).abs() / 2.0;
    Route {
        commands: vec![
            PathCmd::MoveTo(p1),
            PathCmd::CubicTo(
                Point::new(p1.x + offset, p1.y),
                Point::new(p2.x - offset, p2.y),
                p2,
            ),
        ],
    }
}

fn distance(a: Point, b: Point) -> f32 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f32) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Point::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_is_one_segment() {
        let r = straight(Point::new(0.0, 0.0), Point::new(10.0, 20.0));
        assert_eq!(r.commands.len(), 2);
        assert_eq!(r.end(), Some(Point::new(10.0, 20.0)));
        assert_eq!(r.midpoint(), Point::new(5.0, 10.0));
    }

    #[test]
    fn elbow_from_right_goes_horizontal_first() {
        let r = elbow(
            Point::new(100.0, 100.0),
            Side::Right,
            Point::new(300.0, 250.0),
            Side::Left,
            20.0,
        );
        assert_eq!(
            r.commands,
            vec![
                PathCmd::MoveTo(Point::new(100.0, 100.0)),
                PathCmd::LineTo(Point::new(120.0, 100.0)),
                PathCmd::LineTo(Point::new(300.0, 100.0)),
                PathCmd::LineTo(Point::new(300.0, 250.0)),
            ]
        );
    }

    #[test]
    fn elbow_from_top_goes_vertical_first() {
        let r = elbow(
            Point::new(50.0, 200.0),
            Side::Top,
            Point::new(400.0, 40.0),
            Side::Bottom,
            20.0,
        );
        assert_eq!(
            r.commands,
            vec![
                PathCmd::MoveTo(Point::new(50.0, 200.0)),
                PathCmd::LineTo(Point::new(50.0, 180.0)),
                PathCmd::LineTo(Point::new(50.0, 40.0)),
                PathCmd::LineTo(Point::new(400.0, 40.0)),
            ]
        );
    }

    #[test]
    fn elbow_segments_are_axis_aligned() {
        for side in Side::ALL {
            let r = elbow(
                Point::new(13.0, 7.0),
                side,
                Point::new(-90.0, 310.0),
                Side::Left,
                DEFAULT_STANDOFF,
            );
            let pts: Vec<Point> = r
                .commands
                .iter()
                .map(|c| match c {
                    PathCmd::MoveTo(p) | PathCmd::LineTo(p) => *p,
                    PathCmd::CubicTo(..) => panic!("elbow never curves"),
                })
                .collect();
            for w in pts.windows(2) {
                assert!(w[0].x == w[1].x || w[0].y == w[1].y, "{side}: {w:?}");
            }
        }
    }

    #[test]
    fn curved_control_offset_is_half_horizontal_distance() {
        let r = curved(Point::new(0.0, 0.0), Point::new(200.0, 100.0));
        assert_eq!(
            r.commands[1],
            PathCmd::CubicTo(
                Point::new(100.0, 0.0),
                Point::new(100.0, 100.0),
                Point::new(200.0, 100.0)
            )
        );
        assert_eq!(r.midpoint(), Point::new(100.0, 50.0));
    }

    #[test]
    fn router_is_pure() {
        let router = Router::default();
        let a = router.route(Point::new(1.0, 2.0), Side::Bottom, Point::new(9.0, 9.0), Side::Top);
        let b = router.route(Point::new(1.0, 2.0), Side::Bottom, Point::new(9.0, 9.0), Side::Top);
        assert_eq!(a, b);
        assert_eq!(a.start(), Some(Point::new(1.0, 2.0)));
        assert_eq!(a.end(), Some(Point::new(9.0, 9.0)));
    }

    #[test]
    fn policy_tokens() {
        assert_eq!(RoutePolicy::from_token("curved"), Some(RoutePolicy::Curved));
        assert_eq!(RoutePolicy::from_token("zigzag"), None);
        assert_eq!(
            serde_json::to_string(&RoutePolicy::Elbow).unwrap(),
            "\"elbow\""
        );
    }

    #[test]
    fn route_connection_skips_dangling_endpoints() {
        use crate::id::{LineId, ObjectId};
        use crate::model::{CanvasSize, LineStyle, ObjectKind, ObjectType, SceneObject};

        let mut canvas = Canvas::new(CanvasSize::new(2000, 1000));
        canvas.objects.push(SceneObject::new(
            ObjectId::intern("rt_a"),
            Point::new(0.0, 0.0),
            ObjectKind::defaults(ObjectType::Title),
        ));
        let mut line = Connection {
            id: LineId::intern("rt_line"),
            start: ObjectId::intern("rt_a"),
            start_side: Side::Right,
            end: ObjectId::intern("rt_b"),
            end_side: Side::Left,
            style: LineStyle::Solid,
            label: None,
        };
        let router = Router::default();
        assert_eq!(router.route_connection(&canvas, &line), None);

        canvas.objects.push(SceneObject::new(
            ObjectId::intern("rt_b"),
            Point::new(400.0, 200.0),
            ObjectKind::defaults(ObjectType::Memo),
        ));
        let route = router.route_connection(&canvas, &line).unwrap();
        assert_eq!(route.start(), Some(Point::new(160.0, 25.0)));
        assert_eq!(route.end(), Some(Point::new(400.0, 240.0)));

        line.end_side = Side::Top;
        let route = router.route_connection(&canvas, &line).unwrap();
        assert_eq!(route.end(), Some(Point::new(480.0, 200.0)));
    }
}
