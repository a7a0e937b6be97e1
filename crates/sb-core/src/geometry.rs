//! Object bounds and anchor positions.
//!
//! Geometry is a pure function of stored object state: position plus either
//! the explicit size or the type's intrinsic size. All coordinates are canvas
//! space; pointer events must be converted from viewport space first.

use crate::id::ObjectId;
use crate::model::{Canvas, ObjectType, Point, SceneObject, Side, Size};

/// Minimum object width (matches the `.obj` min-width on the page).
pub const MIN_WIDTH: f32 = 120.0;
/// Minimum object height accepted by resize.
pub const MIN_HEIGHT: f32 = 40.0;

/// Size used when an object has no explicit size.
pub fn intrinsic_size(object_type: ObjectType) -> Size {
    match object_type {
        ObjectType::Title => Size::new(160.0, 50.0),
        ObjectType::Plot => Size::new(180.0, 90.0),
        ObjectType::Character => Size::new(140.0, 140.0),
        ObjectType::Memo => Size::new(160.0, 80.0),
    }
}

/// Clamp a requested size to the minimum object size.
pub fn clamp_size(size: Size) -> Size {
    Size::new(size.width.max(MIN_WIDTH), size.height.max(MIN_HEIGHT))
}

/// Axis-aligned bounding box in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Midpoint of the given side.
    pub fn anchor(&self, side: Side) -> Point {
        let c = self.center();
        match side {
            Side::Top => Point::new(c.x, self.y),
            Side::Bottom => Point::new(c.x, self.bottom()),
            Side::Left => Point::new(self.x, c.y),
            Side::Right => Point::new(self.right(), c.y),
        }
    }

    /// Check if this bounds intersects with a rectangle (AABB overlap).
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Current bounding box of an object.
pub fn object_bounds(object: &SceneObject) -> Bounds {
    let size = object
        .size
        .unwrap_or_else(|| intrinsic_size(object.object_type()));
    Bounds {
        x: object.position.x,
        y: object.position.y,
        width: size.width,
        height: size.height,
    }
}

/// Absolute anchor coordinate of `id` on `side`.
///
/// Returns `None` when the object is not on the canvas; callers skip.
pub fn anchor_position(canvas: &Canvas, id: ObjectId, side: Side) -> Option<Point> {
    canvas.object(id).map(|o| object_bounds(o).anchor(side))
}

/// Far corner of the union of all object bounds, or the origin if empty.
pub fn content_extent(canvas: &Canvas) -> Point {
    canvas
        .objects
        .iter()
        .map(object_bounds)
        .fold(Point::default(), |acc, b| {
            Point::new(acc.x.max(b.right()), acc.y.max(b.bottom()))
        })
}
