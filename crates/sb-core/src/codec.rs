//! JSON persistence codec.
//!
//! The document types mirror the saved file format field-for-field
//! (camelCase keys, pixel values as `"120px"` strings, every object carrying
//! the full attribute set). `encode` / `decode` convert between the document
//! and the typed `Scenario`; `decode` validates everything up front so a
//! broken file never partially applies.

use crate::error::{BoardError, Result};
use crate::geometry::intrinsic_size;
use crate::id::{LineId, ObjectId, TabId};
use crate::model::*;
use crate::units::{format_px, parse_px};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ─── Document types ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDocument {
    pub title: String,
    #[serde(default)]
    pub current_tab_id: Option<TabId>,
    /// Counters may be absent in hand-written files; `0` means "derive".
    #[serde(default)]
    pub next_tab_id: u32,
    #[serde(default)]
    pub next_obj_id: u64,
    #[serde(default)]
    pub next_line_id: u64,
    pub tabs: Vec<TabDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabDocument {
    pub id: TabId,
    pub name: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub objects: Vec<ObjectDocument>,
    pub lines: Vec<LineDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDocument {
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    pub x: String,
    pub y: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub bg_color: String,
    #[serde(default)]
    pub plot_toggle: bool,
    #[serde(default)]
    pub annotation: String,
    #[serde(default)]
    pub img_src: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDocument {
    pub id: LineId,
    pub start: ObjectId,
    pub start_dir: Side,
    pub end: ObjectId,
    pub end_dir: Side,
    #[serde(default)]
    pub dashed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

// ─── Encode ──────────────────────────────────────────────────────────────

/// Convert a scenario to its document form. Callers snapshot live edits first.
pub fn encode(scenario: &Scenario) -> ScenarioDocument {
    ScenarioDocument {
        title: scenario.title.clone(),
        current_tab_id: scenario.active,
        next_tab_id: scenario.next_tab_id,
        next_obj_id: scenario.next_obj_id,
        next_line_id: scenario.next_line_id,
        tabs: scenario.tabs.iter().map(encode_tab).collect(),
    }
}

fn encode_tab(tab: &Tab) -> TabDocument {
    TabDocument {
        id: tab.id,
        name: tab.name.clone(),
        canvas_width: tab.canvas.size.width,
        canvas_height: tab.canvas.size.height,
        objects: tab.canvas.objects.iter().map(encode_object).collect(),
        lines: tab.canvas.connections.iter().map(encode_line).collect(),
    }
}

fn encode_object(object: &SceneObject) -> ObjectDocument {
    let (plot_toggle, annotation, img_src) = match &object.kind {
        ObjectKind::Plot {
            resolved,
            annotation,
            ..
        } => (*resolved, annotation.clone(), String::new()),
        ObjectKind::Character { image, .. } => (
            false,
            String::new(),
            image.as_ref().map(|i| i.as_str().to_string()).unwrap_or_default(),
        ),
        ObjectKind::Title { .. } | ObjectKind::Memo { .. } => (false, String::new(), String::new()),
    };

    ObjectDocument {
        id: object.id,
        object_type: object.object_type(),
        x: format_px(object.position.x),
        y: format_px(object.position.y),
        width: object.size.map(|s| format_px(s.width)),
        height: object.size.map(|s| format_px(s.height)),
        content: object.kind.content().to_string(),
        bg_color: object.kind.color().to_hex(),
        plot_toggle,
        annotation,
        img_src,
    }
}

fn encode_line(line: &Connection) -> LineDocument {
    LineDocument {
        id: line.id,
        start: line.start,
        start_dir: line.start_side,
        end: line.end,
        end_dir: line.end_side,
        dashed: line.style.is_dashed(),
        label: line.label.clone(),
    }
}

// ─── Decode ──────────────────────────────────────────────────────────────

/// Validate a document and build the scenario it describes.
///
/// Counters and the active tab are taken as written; use
/// `Scenario::repair_counters` before minting new IDs.
///
/// # Errors
/// Returns `MalformedDocument` on duplicate IDs, IDs or counters at the top
/// of their range, bad pixel lengths, bad colors, or image sources that are
/// not data URIs.
pub fn decode(doc: ScenarioDocument) -> Result<Scenario> {
    if doc.next_tab_id == u32::MAX {
        return Err(no_headroom("nextTabId", u64::from(u32::MAX)));
    }
    for (field, value) in [("nextObjId", doc.next_obj_id), ("nextLineId", doc.next_line_id)] {
        if value == u64::MAX {
            return Err(no_headroom(field, value));
        }
    }

    let mut tab_ids = HashSet::new();
    let mut object_ids = HashSet::new();
    let mut line_ids = HashSet::new();
    let mut tabs = Vec::with_capacity(doc.tabs.len());

    for tab in doc.tabs {
        if !tab_ids.insert(tab.id) {
            return Err(BoardError::MalformedDocument(format!(
                "duplicate tab id {}",
                tab.id.0
            )));
        }
        if tab.id.0 == u32::MAX {
            return Err(no_headroom("tab id", u64::from(tab.id.0)));
        }
        let mut canvas = Canvas::new(CanvasSize::new(tab.canvas_width, tab.canvas_height));
        for object in tab.objects {
            if object.id.sequence() == Some(u64::MAX) {
                return Err(no_headroom("object id", u64::MAX));
            }
            if !object_ids.insert(object.id) {
                return Err(BoardError::MalformedDocument(format!(
                    "duplicate object id `{}`",
                    object.id
                )));
            }
            canvas.objects.push(decode_object(object)?);
        }
        for line in tab.lines {
            if line.id.sequence() == Some(u64::MAX) {
                return Err(no_headroom("line id", u64::MAX));
            }
            if !line_ids.insert(line.id) {
                return Err(BoardError::MalformedDocument(format!(
                    "duplicate line id `{}`",
                    line.id
                )));
            }
            canvas.connections.push(Connection {
                id: line.id,
                start: line.start,
                start_side: line.start_dir,
                end: line.end,
                end_side: line.end_dir,
                style: LineStyle::from_dashed(line.dashed),
                label: line.label,
            });
        }
        tabs.push(Tab {
            id: tab.id,
            name: tab.name,
            canvas,
        });
    }

    log::debug!(
        "decoded scenario `{}` with {} tab(s), {} object(s), {} line(s)",
        doc.title,
        tabs.len(),
        object_ids.len(),
        line_ids.len()
    );

    Ok(Scenario {
        title: doc.title,
        tabs,
        next_tab_id: doc.next_tab_id,
        next_obj_id: doc.next_obj_id,
        next_line_id: doc.next_line_id,
        active: doc.current_tab_id,
    })
}

/// An id or counter at the top of its range leaves no id to mint next.
fn no_headroom(what: &str, value: u64) -> BoardError {
    BoardError::MalformedDocument(format!("{what} {value} leaves no room for new ids"))
}

fn decode_object(doc: ObjectDocument) -> Result<SceneObject> {
    let position = Point::new(parse_px(&doc.x)?, parse_px(&doc.y)?);
    let size = decode_size(doc.object_type, doc.width.as_deref(), doc.height.as_deref())?;

    let color = if doc.bg_color.trim().is_empty() {
        doc.object_type.default_color()
    } else {
        Color::from_hex(&doc.bg_color).ok_or_else(|| {
            BoardError::MalformedDocument(format!(
                "object `{}` has invalid color `{}`",
                doc.id, doc.bg_color
            ))
        })?
    };

    let kind = match doc.object_type {
        ObjectType::Title => ObjectKind::Title {
            content: doc.content,
            color,
        },
        ObjectType::Plot => ObjectKind::Plot {
            content: doc.content,
            resolved: doc.plot_toggle,
            annotation: doc.annotation,
            color,
        },
        ObjectType::Character => ObjectKind::Character {
            content: doc.content,
            image: if doc.img_src.is_empty() {
                None
            } else {
                Some(DataUri::parse(&doc.img_src)?)
            },
            color,
        },
        ObjectType::Memo => ObjectKind::Memo {
            content: doc.content,
            color,
        },
    };

    Ok(SceneObject {
        id: doc.id,
        position,
        size,
        kind,
    })
}

/// Empty strings count as absent (an unsized element reports `""`).
fn decode_size(
    object_type: ObjectType,
    width: Option<&str>,
    height: Option<&str>,
) -> Result<Option<Size>> {
    let parse = |v: Option<&str>| -> Result<Option<f32>> {
        match v.map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse_px(text).map(Some),
        }
    };
    let intrinsic = intrinsic_size(object_type);
    Ok(match (parse(width)?, parse(height)?) {
        (None, None) => None,
        (w, h) => Some(Size::new(
            w.unwrap_or(intrinsic.width),
            h.unwrap_or(intrinsic.height),
        )),
    })
}

// ─── JSON entry points ───────────────────────────────────────────────────

/// Serialize a scenario to pretty-printed JSON.
pub fn to_json(scenario: &Scenario) -> Result<String> {
    Ok(serde_json::to_string_pretty(&encode(scenario))?)
}

/// Parse and validate a saved document. All-or-nothing.
///
/// # Errors
/// Returns `MalformedDocument` for invalid JSON, missing required fields,
/// or any validation failure in `decode`.
pub fn from_json(text: &str) -> Result<Scenario> {
    let doc: ScenarioDocument = serde_json::from_str(text)?;
    decode(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MINIMAL: &str = r##"{
        "title": "Heist",
        "currentTabId": 1,
        "nextTabId": 2, "nextObjId": 3, "nextLineId": 2,
        "tabs": [{
            "id": 1, "name": "Act I", "canvasWidth": 2000, "canvasHeight": 1000,
            "objects": [
                { "id": "obj-1", "type": "title", "x": "100px", "y": "100px",
                  "content": "Opening", "bgColor": "#ffffff", "plotToggle": false,
                  "annotation": "", "imgSrc": "" },
                { "id": "obj-2", "type": "plot", "x": "400px", "y": "300px",
                  "width": "200px", "height": "100px",
                  "content": "The vault", "bgColor": "#ff0000", "plotToggle": true,
                  "annotation": "red herring", "imgSrc": "" }
            ],
            "lines": [
                { "id": "line-1", "start": "obj-1", "startDir": "right",
                  "end": "obj-2", "endDir": "left", "dashed": true }
            ]
        }]
    }"##;

    #[test]
    fn decode_minimal_document() {
        let s = from_json(MINIMAL).unwrap();
        assert_eq!(s.title, "Heist");
        assert_eq!(s.active, Some(TabId(1)));
        let canvas = &s.tabs[0].canvas;
        assert_eq!(canvas.objects.len(), 2);
        let plot = canvas.object(ObjectId::intern("obj-2")).unwrap();
        assert_eq!(plot.position, Point::new(400.0, 300.0));
        assert_eq!(plot.size, Some(Size::new(200.0, 100.0)));
        match &plot.kind {
            ObjectKind::Plot {
                resolved,
                annotation,
                ..
            } => {
                assert!(*resolved);
                assert_eq!(annotation, "red herring");
            }
            other => panic!("expected Plot, got {other:?}"),
        }
        assert_eq!(canvas.connections[0].style, LineStyle::Dashed);
    }

    #[test]
    fn encode_decode_encode_is_stable() {
        let doc1 = encode(&from_json(MINIMAL).unwrap());
        let doc2 = encode(&decode(doc1.clone()).unwrap());
        assert_eq!(doc1, doc2);
    }

    #[test]
    fn missing_tabs_is_malformed() {
        let err = from_json(r#"{ "title": "x" }"#).unwrap_err();
        assert!(matches!(err, BoardError::MalformedDocument(_)));
    }

    #[test]
    fn syntax_error_is_malformed() {
        assert!(matches!(
            from_json("{ not json"),
            Err(BoardError::MalformedDocument(_))
        ));
    }

    #[test]
    fn unknown_type_token_is_malformed() {
        let text = MINIMAL.replace(r#""type": "title""#, r#""type": "banner""#);
        assert!(matches!(
            from_json(&text),
            Err(BoardError::MalformedDocument(_))
        ));
    }

    #[test]
    fn duplicate_object_id_is_malformed() {
        let text = MINIMAL.replace(r#""id": "obj-2""#, r#""id": "obj-1""#);
        let err = from_json(&text).unwrap_err();
        assert_eq!(
            err,
            BoardError::MalformedDocument("duplicate object id `obj-1`".into())
        );
    }

    #[test]
    fn non_data_uri_image_is_malformed() {
        let text = MINIMAL.replace(
            r#""type": "title""#,
            r#""type": "char""#,
        )
        .replacen(r#""imgSrc": """#, r#""imgSrc": "file:///tmp/a.png""#, 1);
        assert!(from_json(&text).is_err());
    }

    #[test]
    fn empty_size_and_color_fall_back() {
        let text = r#"{ "title": "t", "tabs": [{ "id": 4, "name": "n",
            "canvasWidth": 10, "canvasHeight": 10, "lines": [],
            "objects": [{ "id": "m", "type": "desc", "x": "1px", "y": "2px",
                          "width": "", "height": "", "bgColor": "" }] }] }"#;
        let s = from_json(text).unwrap();
        let obj = &s.tabs[0].canvas.objects[0];
        assert_eq!(obj.size, None);
        assert_eq!(obj.kind.color(), ObjectType::Memo.default_color());
        assert_eq!(s.next_obj_id, 0);
        assert_eq!(s.active, None);
    }

    #[test]
    fn encode_emits_full_attribute_set() {
        let s = from_json(MINIMAL).unwrap();
        let json: serde_json::Value = serde_json::from_str(&to_json(&s).unwrap()).unwrap();
        let title = &json["tabs"][0]["objects"][0];
        assert_eq!(title["type"], "title");
        assert_eq!(title["x"], "100px");
        assert_eq!(title["plotToggle"], false);
        assert_eq!(title["imgSrc"], "");
        assert!(title.get("width").is_none());
        let line = &json["tabs"][0]["lines"][0];
        assert_eq!(line["startDir"], "right");
        assert!(line.get("label").is_none());
    }
}
