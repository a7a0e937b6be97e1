//! Hit testing: point → object, anchor, handle, or connection.
//!
//! Walks objects front-to-back (last painted = topmost). Within one object,
//! anchors win over the resize handle, which wins over the body. Connections
//! sit under every object and are tested last.

use crate::paint::{to_bez_path, to_kurbo};
use kurbo::ParamCurveNearest;
use sb_core::config::BoardConfig;
use sb_core::geometry::object_bounds;
use sb_core::id::{LineId, ObjectId};
use sb_core::model::{Canvas, Point, Side};
use sb_core::routing::Router;

/// Pointer distance within which a connection path is hit.
pub const LINE_HIT_TOLERANCE: f32 = 6.0;

/// What lies under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Anchor { object: ObjectId, side: Side },
    ResizeHandle(ObjectId),
    Body(ObjectId),
    Connection(LineId),
}

impl HitTarget {
    /// The object this target belongs to, if any.
    pub fn object(&self) -> Option<ObjectId> {
        match *self {
            HitTarget::Anchor { object, .. }
            | HitTarget::ResizeHandle(object)
            | HitTarget::Body(object) => Some(object),
            HitTarget::Connection(_) => None,
        }
    }
}

/// Find the topmost target at canvas position `p`.
/// Returns `None` for empty canvas.
pub fn hit_test(
    canvas: &Canvas,
    router: &Router,
    config: &BoardConfig,
    p: Point,
) -> Option<HitTarget> {
    for object in canvas.objects.iter().rev() {
        let b = object_bounds(object);

        for side in Side::ALL {
            let a = b.anchor(side);
            if distance(a, p) <= config.anchor_hit_radius {
                return Some(HitTarget::Anchor {
                    object: object.id,
                    side,
                });
            }
        }

        let handle = config.resize_handle_size;
        if b.contains(p.x, p.y) && p.x >= b.right() - handle && p.y >= b.bottom() - handle {
            return Some(HitTarget::ResizeHandle(object.id));
        }

        if b.contains(p.x, p.y) {
            return Some(HitTarget::Body(object.id));
        }
    }

    hit_test_connection(canvas, router, p).map(HitTarget::Connection)
}

/// Find the topmost connection whose routed path passes within
/// `LINE_HIT_TOLERANCE` of `p`.
pub fn hit_test_connection(canvas: &Canvas, router: &Router, p: Point) -> Option<LineId> {
    let target = to_kurbo(p);
    let tolerance = f64::from(LINE_HIT_TOLERANCE);
    canvas.connections.iter().rev().find_map(|connection| {
        let route = router.route_connection(canvas, connection)?;
        let hit = to_bez_path(&route)
            .segments()
            .any(|seg| seg.nearest(target, 1e-3).distance_sq <= tolerance * tolerance);
        hit.then_some(connection.id)
    })
}

fn distance(a: Point, b: Point) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}
