//! Canvas → display list.
//!
//! Walks the live canvas and emits a flat, serializable description of
//! what to draw: object boxes in paint order, connector paths as SVG `d`
//! strings, and the in-progress preview line. The UI layer owns the actual
//! painting.

use kurbo::BezPath;
use sb_core::geometry::object_bounds;
use sb_core::model::{Canvas, ObjectKind, ObjectType, Point, SceneObject};
use sb_core::routing::{PathCmd, Route, Router, straight};
use serde::Serialize;

// ─── Display list ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayList {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Bottom-to-top paint order.
    pub objects: Vec<ObjectItem>,
    pub connectors: Vec<ConnectorItem>,
    /// Straight line following the pointer while a connection is being drawn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectItem {
    pub id: String,
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorItem {
    pub id: String,
    /// SVG path data.
    pub d: String,
    pub dashed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub label_x: f32,
    pub label_y: f32,
}

// ─── Builders ────────────────────────────────────────────────────────────

/// Build the display list for `canvas`.
///
/// Connections whose endpoints are missing are skipped; they stay in the
/// model and reappear once both objects exist again.
pub fn build_display_list(
    canvas: &Canvas,
    router: &Router,
    preview: Option<(Point, Point)>,
) -> DisplayList {
    let objects = canvas.objects.iter().map(object_item).collect();

    let mut connectors = Vec::with_capacity(canvas.connections.len());
    for connection in &canvas.connections {
        let Some(route) = router.route_connection(canvas, connection) else {
            log::trace!("skip dangling connection {}", connection.id);
            continue;
        };
        let label_at = route.midpoint();
        connectors.push(ConnectorItem {
            id: connection.id.to_string(),
            d: to_bez_path(&route).to_svg(),
            dashed: connection.style.is_dashed(),
            label: connection.label.clone(),
            label_x: label_at.x,
            label_y: label_at.y,
        });
    }

    DisplayList {
        canvas_width: canvas.size.width,
        canvas_height: canvas.size.height,
        objects,
        connectors,
        preview: preview.map(|(from, to)| to_bez_path(&straight(from, to)).to_svg()),
    }
}

fn object_item(object: &SceneObject) -> ObjectItem {
    let bounds = object_bounds(object);
    let (resolved, annotation, image) = match &object.kind {
        ObjectKind::Plot {
            resolved,
            annotation,
            ..
        } => (Some(*resolved), Some(annotation.clone()), None),
        ObjectKind::Character { image, .. } => {
            (None, None, image.as_ref().map(|i| i.as_str().to_string()))
        }
        ObjectKind::Title { .. } | ObjectKind::Memo { .. } => (None, None, None),
    };
    ObjectItem {
        id: object.id.to_string(),
        object_type: object.object_type(),
        x: bounds.x,
        y: bounds.y,
        width: bounds.width,
        height: bounds.height,
        color: object.kind.color().to_hex(),
        content: object.kind.content().to_string(),
        resolved,
        annotation,
        image,
    }
}

/// Convert a route to a kurbo path.
pub fn to_bez_path(route: &Route) -> BezPath {
    let mut bez = BezPath::new();
    for cmd in &route.commands {
        match *cmd {
            PathCmd::MoveTo(p) => bez.move_to(to_kurbo(p)),
            PathCmd::LineTo(p) => bez.line_to(to_kurbo(p)),
            PathCmd::CubicTo(c1, c2, p) => bez.curve_to(to_kurbo(c1), to_kurbo(c2), to_kurbo(p)),
        }
    }
    bez
}

pub(crate) fn to_kurbo(p: Point) -> kurbo::Point {
    kurbo::Point::new(f64::from(p.x), f64::from(p.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sb_core::id::{LineId, ObjectId};
    use sb_core::model::{CanvasSize, Connection, LineStyle, Side};
    use sb_core::routing::RoutePolicy;

    fn two_object_canvas() -> Canvas {
        let mut canvas = Canvas::new(CanvasSize::new(2000, 1000));
        canvas.objects.push(SceneObject::new(
            ObjectId::intern("p_title"),
            Point::new(100.0, 100.0),
            ObjectKind::defaults(ObjectType::Title),
        ));
        canvas.objects.push(SceneObject::new(
            ObjectId::intern("p_plot"),
            Point::new(400.0, 300.0),
            ObjectKind::defaults(ObjectType::Plot),
        ));
        canvas.connections.push(Connection {
            id: LineId::intern("p_line"),
            start: ObjectId::intern("p_title"),
            start_side: Side::Right,
            end: ObjectId::intern("p_plot"),
            end_side: Side::Left,
            style: LineStyle::Dashed,
            label: Some("because".into()),
        });
        canvas
    }

    #[test]
    fn elbow_connector_path_data() {
        let list = build_display_list(&two_object_canvas(), &Router::default(), None);
        assert_eq!(list.connectors.len(), 1);
        let c = &list.connectors[0];
        assert!(c.d.starts_with('M'), "path data: {}", c.d);
        assert_eq!(c.d.matches('L').count(), 3, "elbow has three segments: {}", c.d);
        assert!(c.dashed);
        assert_eq!(c.label.as_deref(), Some("because"));
    }

    #[test]
    fn dangling_connector_is_skipped() {
        let mut canvas = two_object_canvas();
        canvas.objects.retain(|o| o.id != ObjectId::intern("p_plot"));
        let list = build_display_list(&canvas, &Router::default(), None);
        assert!(list.connectors.is_empty());
        assert_eq!(list.objects.len(), 1);
    }

    #[test]
    fn curved_connector_is_one_cubic() {
        let router = Router::new(RoutePolicy::Curved, 20.0);
        let list = build_display_list(&two_object_canvas(), &router, None);
        assert!(list.connectors[0].d.contains('C'));
    }

    #[test]
    fn preview_is_straight() {
        let list = build_display_list(
            &two_object_canvas(),
            &Router::default(),
            Some((Point::new(260.0, 125.0), Point::new(500.0, 500.0))),
        );
        let d = list.preview.unwrap();
        assert_eq!(d.matches('L').count(), 1, "preview path data: {d}");
        assert!(!d.contains('C'));
    }

    #[test]
    fn object_items_carry_type_fields() {
        let list = build_display_list(&two_object_canvas(), &Router::default(), None);
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["objects"][1]["type"], "plot");
        assert_eq!(json["objects"][1]["resolved"], false);
        assert!(json["objects"][0].get("resolved").is_none());
        assert_eq!(json["canvasWidth"], 2000);
    }
}
