//! Integration tests: JSON → Scenario → JSON round-trip.
//!
//! Verifies that saving and reloading loses no objects, lines, attributes,
//! or counters, and that anchors computed after a reload match.

use pretty_assertions::assert_eq;
use sb_core::codec::{decode, encode, from_json, to_json};
use sb_core::geometry::anchor_position;
use sb_core::model::*;
use sb_core::{BoardError, LineId, ObjectId, TabId};

const TWO_TABS: &str = include_str!("fixtures/two_tabs.json");

// ─── Helpers ─────────────────────────────────────────────────────────────

fn reload(scenario: &Scenario) -> Scenario {
    let text = to_json(scenario).expect("encode failed");
    from_json(&text).unwrap_or_else(|e| panic!("reload failed: {e}\n{text}"))
}

fn object(id: &str, ty: ObjectType, x: f32, y: f32) -> SceneObject {
    SceneObject::new(ObjectId::intern(id), Point::new(x, y), ObjectKind::defaults(ty))
}

// ─── Tests ───────────────────────────────────────────────────────────────

#[test]
fn fixture_loads_every_attribute() {
    let s = from_json(TWO_TABS).unwrap();
    assert_eq!(s.title, "The Long Night");
    assert_eq!(s.tabs.len(), 2);
    assert_eq!((s.next_tab_id, s.next_obj_id, s.next_line_id), (3, 5, 3));

    let act1 = &s.tabs[0].canvas;
    let mara = act1.object(ObjectId::intern("obj-2")).unwrap();
    match &mara.kind {
        ObjectKind::Character { content, image, .. } => {
            assert_eq!(content, "Mara");
            assert_eq!(image.as_ref().map(DataUri::mime), Some("image/png"));
        }
        other => panic!("expected Character, got {other:?}"),
    }

    let suspects = act1.connection(LineId::intern("line-2")).unwrap();
    assert_eq!(suspects.style, LineStyle::Dashed);
    assert_eq!(suspects.label.as_deref(), Some("suspects"));
    assert_eq!(s.tabs[1].canvas.size, CanvasSize::new(2500, 1500));
}

#[test]
fn fixture_is_a_fixed_point() {
    let doc1 = encode(&from_json(TWO_TABS).unwrap());
    let doc2 = encode(&decode(doc1.clone()).unwrap());
    assert_eq!(doc1, doc2, "encode → decode → encode changed the document");
}

#[test]
fn title_to_memo_connection_survives_reload() {
    let mut s = Scenario::new("Sketch");
    let tab = s.push_tab("Tab 1", CanvasSize::new(2000, 1000)).unwrap();
    s.active = Some(tab);
    let o1 = s.mint_object_id().unwrap();
    let o2 = s.mint_object_id().unwrap();
    let line = s.mint_line_id().unwrap();
    {
        let canvas = &mut s.tab_mut(tab).unwrap().canvas;
        canvas.objects.push(object(o1.as_str(), ObjectType::Title, 100.0, 100.0));
        canvas.objects.push(object(o2.as_str(), ObjectType::Memo, 400.0, 300.0));
        canvas.connections.push(Connection {
            id: line,
            start: o1,
            start_side: Side::Right,
            end: o2,
            end_side: Side::Left,
            style: LineStyle::Solid,
            label: None,
        });
    }

    let loaded = reload(&s);
    let before = &s.tab(tab).unwrap().canvas;
    let after = &loaded.tab(tab).unwrap().canvas;

    assert_eq!(after.connections, before.connections);
    for (id, side) in [(o1, Side::Right), (o2, Side::Left)] {
        assert_eq!(
            anchor_position(after, id, side),
            anchor_position(before, id, side),
            "anchor {id}:{side} moved across reload"
        );
    }
    assert_eq!(loaded.active, Some(TabId(1)));
    assert_eq!(loaded.next_obj_id, 3);
}

#[test]
fn dangling_connection_is_kept() {
    let text = TWO_TABS.replace(r#""end": "obj-3", "endDir": "left""#, r#""end": "obj-99", "endDir": "left""#);
    let s = from_json(&text).unwrap();
    let reloaded = reload(&s);
    let line = reloaded.tabs[0]
        .canvas
        .connection(LineId::intern("line-1"))
        .unwrap();
    assert_eq!(line.end, ObjectId::intern("obj-99"));
}

#[test]
fn missing_tabs_field_is_rejected() {
    let err = from_json(r#"{ "title": "No tabs", "nextTabId": 1 }"#).unwrap_err();
    assert!(
        matches!(err, BoardError::MalformedDocument(ref m) if m.contains("tabs")),
        "unexpected error: {err:?}"
    );
}

#[test]
fn bad_pixel_length_is_rejected() {
    let text = TWO_TABS.replace(r#""x": "100px""#, r#""x": "wide""#);
    assert!(matches!(
        from_json(&text),
        Err(BoardError::MalformedDocument(_))
    ));
}

#[test]
fn ids_at_the_top_of_their_range_are_rejected() {
    let cases = [
        TWO_TABS.replace(r#""id": 2,"#, r#""id": 4294967295,"#),
        TWO_TABS.replace(r#""id": "obj-4""#, r#""id": "obj-18446744073709551615""#),
        TWO_TABS.replace(r#""id": "line-2""#, r#""id": "line-18446744073709551615""#),
        TWO_TABS.replace(r#""nextTabId": 3"#, r#""nextTabId": 4294967295"#),
        TWO_TABS.replace(r#""nextObjId": 5"#, r#""nextObjId": 18446744073709551615"#),
    ];
    for text in &cases {
        assert_ne!(text.as_str(), TWO_TABS, "fixture edit did not apply");
        match from_json(text) {
            Err(BoardError::MalformedDocument(msg)) => {
                assert!(msg.contains("leaves no room"), "unexpected message: {msg}");
            }
            other => panic!("expected MalformedDocument, got {other:?}"),
        }
    }
}

#[test]
fn custom_ids_near_the_top_still_load() {
    let text = TWO_TABS.replace(r#""id": "obj-4""#, r#""id": "obj-18446744073709551614""#);
    let mut s = from_json(&text).unwrap();
    assert!(s.repair_counters());
    assert_eq!(s.next_obj_id, u64::MAX);
    assert_eq!(
        s.mint_object_id(),
        Err(BoardError::CounterExhausted("nextObjId"))
    );
}
