//! Core data model for scenario boards.
//!
//! A `Scenario` owns an ordered list of `Tab`s. Each tab owns one `Canvas`:
//! the placed objects (in paint order), the connection lines between them,
//! and the canvas size. Connections only store endpoint IDs and sides;
//! their geometry is always derived from the live object positions.

use crate::error::{BoardError, Result};
use crate::id::{LineId, ObjectId, TabId};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

// ─── Geometry primitives ─────────────────────────────────────────────────

/// A point in canvas pixel space (not viewport space).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Explicit object size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Canvas dimensions. Grow-only in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// One of the four anchor sides of an object's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "top" => Some(Side::Top),
            "bottom" => Some(Side::Bottom),
            "left" => Some(Side::Left),
            "right" => Some(Side::Right),
            _ => None,
        }
    }

    /// Left and right anchors leave the object horizontally.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    /// Unit vector pointing away from the object through this side.
    pub fn outward(self) -> (f32, f32) {
        match self {
            Side::Top => (0.0, -1.0),
            Side::Bottom => (0.0, 1.0),
            Side::Left => (-1.0, 0.0),
            Side::Right => (1.0, 0.0),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string: `#RGB`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let pair = |i: usize| -> Option<f32> {
            Some((hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?) as f32 / 255.0)
        };

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::rgba(
                    (r * 17) as f32 / 255.0,
                    (g * 17) as f32 / 255.0,
                    (b * 17) as f32 / 255.0,
                    1.0,
                ))
            }
            6 => Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, 1.0)),
            8 => Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
            _ => None,
        }
    }

    /// Emit as lowercase `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (channel(self.r), channel(self.g), channel(self.b), channel(self.a));
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color `{s}`")))
    }
}

// ─── Embedded images ─────────────────────────────────────────────────────

/// A self-contained image payload encoded as a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DataUri(String);

impl DataUri {
    /// Validate an existing URI string.
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| BoardError::MalformedDocument("image source is not a data URI".into()))?;
        if !rest.contains(',') {
            return Err(BoardError::MalformedDocument(
                "data URI has no payload separator".into(),
            ));
        }
        Ok(Self(uri.to_string()))
    }

    /// Encode raw image bytes as a base64 data URI.
    pub fn encode(mime: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{mime};base64,{}", BASE64.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The media type, e.g. `image/png`. Empty when the URI omits it.
    pub fn mime(&self) -> &str {
        let meta = self.meta();
        meta.split(';').next().unwrap_or_default()
    }

    /// Decode the payload bytes. Only base64 payloads are supported.
    pub fn decode(&self) -> Result<Vec<u8>> {
        if !self.meta().ends_with(";base64") {
            return Err(BoardError::MalformedDocument(
                "data URI payload is not base64".into(),
            ));
        }
        let payload = self.0.split_once(',').map(|(_, p)| p).unwrap_or_default();
        BASE64
            .decode(payload)
            .map_err(|e| BoardError::MalformedDocument(format!("bad image payload: {e}")))
    }

    fn meta(&self) -> &str {
        let rest = &self.0["data:".len()..];
        rest.split_once(',').map(|(m, _)| m).unwrap_or(rest)
    }
}

// ─── Objects ─────────────────────────────────────────────────────────────

/// The closed set of object types, with their wire tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "plot")]
    Plot,
    #[serde(rename = "char")]
    Character,
    #[serde(rename = "desc")]
    Memo,
}

impl ObjectType {
    pub const ALL: [ObjectType; 4] = [
        ObjectType::Title,
        ObjectType::Plot,
        ObjectType::Character,
        ObjectType::Memo,
    ];

    /// Token used in saved documents and palette drag payloads.
    pub fn token(self) -> &'static str {
        match self {
            ObjectType::Title => "title",
            ObjectType::Plot => "plot",
            ObjectType::Character => "char",
            ObjectType::Memo => "desc",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.token() == token)
    }

    /// Default accent/background color for fresh objects of this type.
    pub fn default_color(self) -> Color {
        match self {
            ObjectType::Title => Color::rgba(1.0, 1.0, 1.0, 1.0),
            ObjectType::Plot => Color::rgba(0.0, 0.0, 0.0, 1.0),
            ObjectType::Character => Color::rgba(1.0, 1.0, 1.0, 1.0),
            ObjectType::Memo => Color::rgba(1.0, 249.0 / 255.0, 196.0 / 255.0, 1.0),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Type-dependent object attributes. Each variant carries only its own fields.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Title {
        content: String,
        color: Color,
    },
    /// Plot / incident card with a resolved marker and an annotation line.
    Plot {
        content: String,
        resolved: bool,
        annotation: String,
        color: Color,
    },
    Character {
        content: String,
        image: Option<DataUri>,
        color: Color,
    },
    Memo {
        content: String,
        color: Color,
    },
}

impl ObjectKind {
    /// Fresh attributes for a newly dropped object.
    pub fn defaults(object_type: ObjectType) -> Self {
        let color = object_type.default_color();
        match object_type {
            ObjectType::Title => ObjectKind::Title {
                content: String::new(),
                color,
            },
            ObjectType::Plot => ObjectKind::Plot {
                content: String::new(),
                resolved: false,
                annotation: String::new(),
                color,
            },
            ObjectType::Character => ObjectKind::Character {
                content: String::new(),
                image: None,
                color,
            },
            ObjectType::Memo => ObjectKind::Memo {
                content: String::new(),
                color,
            },
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectKind::Title { .. } => ObjectType::Title,
            ObjectKind::Plot { .. } => ObjectType::Plot,
            ObjectKind::Character { .. } => ObjectType::Character,
            ObjectKind::Memo { .. } => ObjectType::Memo,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            ObjectKind::Title { content, .. }
            | ObjectKind::Plot { content, .. }
            | ObjectKind::Character { content, .. }
            | ObjectKind::Memo { content, .. } => content,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            ObjectKind::Title { color, .. }
            | ObjectKind::Plot { color, .. }
            | ObjectKind::Character { color, .. }
            | ObjectKind::Memo { color, .. } => *color,
        }
    }

    /// Assign one attribute, rejecting attributes the variant does not carry.
    pub fn apply(&mut self, attribute: Attribute) -> Result<()> {
        let object_type = self.object_type();
        let mismatch = |attribute: &Attribute| BoardError::AttributeMismatch {
            attribute: attribute.name(),
            object_type,
        };

        match (self, attribute) {
            (
                ObjectKind::Title { content, .. }
                | ObjectKind::Plot { content, .. }
                | ObjectKind::Character { content, .. }
                | ObjectKind::Memo { content, .. },
                Attribute::Content(text),
            ) => *content = text,
            (
                ObjectKind::Title { color, .. }
                | ObjectKind::Plot { color, .. }
                | ObjectKind::Character { color, .. }
                | ObjectKind::Memo { color, .. },
                Attribute::Color(c),
            ) => *color = c,
            (ObjectKind::Plot { resolved, .. }, Attribute::Resolved(value)) => *resolved = value,
            (ObjectKind::Plot { annotation, .. }, Attribute::Annotation(text)) => {
                *annotation = text
            }
            (ObjectKind::Character { image, .. }, Attribute::Image(payload)) => *image = payload,
            (_, other) => return Err(mismatch(&other)),
        }
        Ok(())
    }
}

/// A single attribute assignment, as produced by in-place edits in the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Content(String),
    Color(Color),
    Resolved(bool),
    Annotation(String),
    Image(Option<DataUri>),
}

impl Attribute {
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Content(_) => "content",
            Attribute::Color(_) => "color",
            Attribute::Resolved(_) => "resolved",
            Attribute::Annotation(_) => "annotation",
            Attribute::Image(_) => "image",
        }
    }
}

/// A placed object on a canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Immutable once created.
    pub id: ObjectId,
    /// Top-left corner in canvas space.
    pub position: Point,
    /// Explicit size; `None` means the type's intrinsic size.
    pub size: Option<Size>,
    pub kind: ObjectKind,
}

impl SceneObject {
    pub fn new(id: ObjectId, position: Point, kind: ObjectKind) -> Self {
        Self {
            id,
            position,
            size: None,
            kind,
        }
    }

    pub fn object_type(&self) -> ObjectType {
        self.kind.object_type()
    }
}

// ─── Connections ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

impl LineStyle {
    pub fn toggled(self) -> Self {
        match self {
            LineStyle::Solid => LineStyle::Dashed,
            LineStyle::Dashed => LineStyle::Solid,
        }
    }

    pub fn is_dashed(self) -> bool {
        self == LineStyle::Dashed
    }

    pub fn from_dashed(dashed: bool) -> Self {
        if dashed { LineStyle::Dashed } else { LineStyle::Solid }
    }
}

/// A directed edge between two anchors. Holds no geometry of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: LineId,
    pub start: ObjectId,
    pub start_side: Side,
    pub end: ObjectId,
    pub end_side: Side,
    pub style: LineStyle,
    pub label: Option<String>,
}

impl Connection {
    pub fn touches(&self, id: ObjectId) -> bool {
        self.start == id || self.end == id
    }
}

// ─── Canvas / Tab / Scenario ─────────────────────────────────────────────

/// Objects, connections, and size of one drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub size: CanvasSize,
    /// Paint order: later objects are on top.
    pub objects: Vec<SceneObject>,
    pub connections: Vec<Connection>,
}

impl Canvas {
    pub fn new(size: CanvasSize) -> Self {
        Self {
            size,
            objects: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn connection(&self, id: LineId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    pub fn connection_mut(&mut self, id: LineId) -> Option<&mut Connection> {
        self.connections.iter_mut().find(|c| c.id == id)
    }

    /// IDs of every connection with `id` as start or end.
    pub fn connections_touching(&self, id: ObjectId) -> SmallVec<[LineId; 4]> {
        self.connections
            .iter()
            .filter(|c| c.touches(id))
            .map(|c| c.id)
            .collect()
    }

    /// Remove an object and every connection that references it.
    pub fn remove_object(
        &mut self,
        id: ObjectId,
    ) -> Option<(SceneObject, SmallVec<[Connection; 4]>)> {
        let pos = self.objects.iter().position(|o| o.id == id)?;
        let object = self.objects.remove(pos);
        let mut removed = SmallVec::new();
        self.connections.retain(|c| {
            if c.touches(id) {
                removed.push(c.clone());
                false
            } else {
                true
            }
        });
        Some((object, removed))
    }

    pub fn remove_connection(&mut self, id: LineId) -> Option<Connection> {
        let pos = self.connections.iter().position(|c| c.id == id)?;
        Some(self.connections.remove(pos))
    }
}

/// An independent canvas with a display name.
#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    /// Stable; renaming never changes it.
    pub id: TabId,
    pub name: String,
    pub canvas: Canvas,
}

/// The root value: everything that gets saved to a file.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub title: String,
    pub tabs: Vec<Tab>,
    /// Monotonic ID counters. Never decremented, even after deletion.
    pub next_tab_id: u32,
    pub next_obj_id: u64,
    pub next_line_id: u64,
    pub active: Option<TabId>,
}

impl Scenario {
    /// An empty scenario with no tabs.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tabs: Vec::new(),
            next_tab_id: 1,
            next_obj_id: 1,
            next_line_id: 1,
            active: None,
        }
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    /// Mint the next tab id.
    ///
    /// # Errors
    /// `CounterExhausted` once the counter cannot advance; the last
    /// representable value is never handed out.
    pub fn mint_tab_id(&mut self) -> Result<TabId> {
        let next = self
            .next_tab_id
            .checked_add(1)
            .ok_or(BoardError::CounterExhausted("nextTabId"))?;
        Ok(TabId(std::mem::replace(&mut self.next_tab_id, next)))
    }

    pub fn mint_object_id(&mut self) -> Result<ObjectId> {
        let next = self
            .next_obj_id
            .checked_add(1)
            .ok_or(BoardError::CounterExhausted("nextObjId"))?;
        Ok(ObjectId::mint(std::mem::replace(&mut self.next_obj_id, next)))
    }

    pub fn mint_line_id(&mut self) -> Result<LineId> {
        let next = self
            .next_line_id
            .checked_add(1)
            .ok_or(BoardError::CounterExhausted("nextLineId"))?;
        Ok(LineId::mint(std::mem::replace(&mut self.next_line_id, next)))
    }

    /// Append an empty tab and return its id. Does not change the active tab.
    pub fn push_tab(&mut self, name: impl Into<String>, size: CanvasSize) -> Result<TabId> {
        let id = self.mint_tab_id()?;
        self.tabs.push(Tab {
            id,
            name: name.into(),
            canvas: Canvas::new(size),
        });
        Ok(id)
    }

    /// A scenario holding one empty, active tab with id 1.
    pub fn with_first_tab(
        title: impl Into<String>,
        tab_name: impl Into<String>,
        size: CanvasSize,
    ) -> Self {
        let id = TabId(1);
        Self {
            title: title.into(),
            tabs: vec![Tab {
                id,
                name: tab_name.into(),
                canvas: Canvas::new(size),
            }],
            next_tab_id: 2,
            next_obj_id: 1,
            next_line_id: 1,
            active: Some(id),
        }
    }

    /// Smallest counter values that cannot mint an ID already present.
    ///
    /// Saturates at the type maximum; the `mint_*` functions refuse that
    /// value, so an id at the top of the range is never minted again.
    pub fn minimum_counters(&self) -> (u32, u64, u64) {
        let tab = self
            .tabs
            .iter()
            .map(|t| t.id.0.checked_add(1).unwrap_or(u32::MAX))
            .max()
            .unwrap_or(1);
        let obj = self
            .tabs
            .iter()
            .flat_map(|t| &t.canvas.objects)
            .filter_map(|o| o.id.sequence())
            .map(|n| n.checked_add(1).unwrap_or(u64::MAX))
            .max()
            .unwrap_or(1);
        let line = self
            .tabs
            .iter()
            .flat_map(|t| &t.canvas.connections)
            .filter_map(|c| c.id.sequence())
            .map(|n| n.checked_add(1).unwrap_or(u64::MAX))
            .max()
            .unwrap_or(1);
        (tab, obj, line)
    }

    /// Bump any counter that would re-mint an existing ID.
    /// Returns `true` if a counter changed.
    pub fn repair_counters(&mut self) -> bool {
        let (tab, obj, line) = self.minimum_counters();
        let before = (self.next_tab_id, self.next_obj_id, self.next_line_id);
        self.next_tab_id = self.next_tab_id.max(tab);
        self.next_obj_id = self.next_obj_id.max(obj);
        self.next_line_id = self.next_line_id.max(line);
        before != (self.next_tab_id, self.next_obj_id, self.next_line_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection(id: &str, start: &str, end: &str) -> Connection {
        Connection {
            id: LineId::intern(id),
            start: ObjectId::intern(start),
            start_side: Side::Right,
            end: ObjectId::intern(end),
            end_side: Side::Left,
            style: LineStyle::Solid,
            label: None,
        }
    }

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#6C5CE7").unwrap();
        assert_eq!(c.to_hex(), "#6c5ce7");

        let c2 = Color::from_hex("#FF000080").unwrap();
        assert!((c2.a - 128.0 / 255.0).abs() < 0.01);
        assert_eq!(c2.to_hex().len(), 9);

        assert_eq!(Color::from_hex("#fff").unwrap().to_hex(), "#ffffff");
        assert!(Color::from_hex("#12").is_none());
        assert!(Color::from_hex("#zzzzzz").is_none());
    }

    #[test]
    fn data_uri_encode_decode() {
        let uri = DataUri::encode("image/png", &[0x89, b'P', b'N', b'G']);
        assert!(uri.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(uri.mime(), "image/png");
        assert_eq!(uri.decode().unwrap(), vec![0x89, b'P', b'N', b'G']);

        assert!(DataUri::parse("https://example.com/a.png").is_err());
        assert!(DataUri::parse("data:image/png;base64").is_err());
        assert!(DataUri::parse("data:text/plain,hello").unwrap().decode().is_err());
    }

    #[test]
    fn object_type_tokens() {
        for ty in ObjectType::ALL {
            assert_eq!(ObjectType::from_token(ty.token()), Some(ty));
        }
        assert_eq!(ObjectType::from_token("memo"), None);
        assert_eq!(ObjectType::Character.token(), "char");
    }

    #[test]
    fn apply_rejects_foreign_attributes() {
        let mut kind = ObjectKind::defaults(ObjectType::Character);
        let err = kind
            .apply(Attribute::Annotation("note".into()))
            .unwrap_err();
        assert_eq!(
            err,
            BoardError::AttributeMismatch {
                attribute: "annotation",
                object_type: ObjectType::Character,
            }
        );

        let mut title = ObjectKind::defaults(ObjectType::Title);
        let image = DataUri::encode("image/png", b"x");
        assert!(title.apply(Attribute::Image(Some(image))).is_err());
        title.apply(Attribute::Content("Act I".into())).unwrap();
        assert_eq!(title.content(), "Act I");
    }

    #[test]
    fn apply_plot_toggle_and_annotation() {
        let mut plot = ObjectKind::defaults(ObjectType::Plot);
        plot.apply(Attribute::Resolved(true)).unwrap();
        plot.apply(Attribute::Annotation("bait".into())).unwrap();
        match plot {
            ObjectKind::Plot {
                resolved,
                annotation,
                ..
            } => {
                assert!(resolved);
                assert_eq!(annotation, "bait");
            }
            _ => panic!("expected Plot"),
        }
    }

    #[test]
    fn remove_object_cascades_connections() {
        let mut canvas = Canvas::new(CanvasSize::new(2000, 1000));
        for id in ["a", "b", "c"] {
            canvas.objects.push(SceneObject::new(
                ObjectId::intern(id),
                Point::default(),
                ObjectKind::defaults(ObjectType::Memo),
            ));
        }
        canvas.connections.push(connection("l1", "a", "b"));
        canvas.connections.push(connection("l2", "c", "a"));
        canvas.connections.push(connection("l3", "b", "c"));

        let (removed, lines) = canvas.remove_object(ObjectId::intern("a")).unwrap();
        assert_eq!(removed.id, ObjectId::intern("a"));
        assert_eq!(lines.len(), 2);
        assert_eq!(canvas.connections.len(), 1);
        assert!(canvas.connections_touching(ObjectId::intern("a")).is_empty());
        assert!(canvas.remove_object(ObjectId::intern("a")).is_none());
    }

    #[test]
    fn counters_never_reuse_ids() {
        let mut scenario = Scenario::new("s");
        let a = scenario.mint_object_id().unwrap();
        let b = scenario.mint_object_id().unwrap();
        assert_ne!(a, b);
        assert_eq!(scenario.next_obj_id, 3);
    }

    #[test]
    fn exhausted_counter_refuses_to_mint() {
        let mut scenario = Scenario::new("s");
        scenario.next_tab_id = u32::MAX;
        scenario.next_line_id = u64::MAX;
        assert_eq!(
            scenario.mint_tab_id(),
            Err(BoardError::CounterExhausted("nextTabId"))
        );
        assert_eq!(
            scenario.push_tab("late", CanvasSize::new(10, 10)),
            Err(BoardError::CounterExhausted("nextTabId"))
        );
        assert!(scenario.tabs.is_empty());
        assert!(scenario.mint_line_id().is_err());
        assert_eq!(scenario.next_line_id, u64::MAX);
    }

    #[test]
    fn minimum_counters_saturate_at_the_top_id() {
        let mut scenario = Scenario::new("s");
        scenario.tabs.push(Tab {
            id: TabId(u32::MAX),
            name: "edge".into(),
            canvas: Canvas::new(CanvasSize::new(10, 10)),
        });
        scenario.tabs[0].canvas.objects.push(SceneObject::new(
            ObjectId::mint(u64::MAX),
            Point::default(),
            ObjectKind::defaults(ObjectType::Memo),
        ));
        assert_eq!(scenario.minimum_counters(), (u32::MAX, u64::MAX, 1));
        assert!(scenario.repair_counters());
        assert!(scenario.mint_tab_id().is_err());
        assert!(scenario.mint_object_id().is_err());
    }

    #[test]
    fn repair_counters_bumps_stale_values() {
        let mut scenario = Scenario::new("s");
        let tab = scenario.push_tab("main", CanvasSize::new(100, 100)).unwrap();
        let canvas = &mut scenario.tab_mut(tab).unwrap().canvas;
        canvas.objects.push(SceneObject::new(
            ObjectId::mint(9),
            Point::default(),
            ObjectKind::defaults(ObjectType::Title),
        ));
        assert!(scenario.repair_counters());
        assert_eq!(scenario.next_obj_id, 10);
        assert!(!scenario.repair_counters());
    }
}
