//! WASM bridge for Scenario Board. Exposes the Rust engine to the page.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the DOM and
//! painting; it forwards input here and repaints from `display_list()`
//! whenever a handler returns `true`.

use sb_core::config::BoardConfig;
use sb_core::id::{LineId, ObjectId, TabId};
use sb_core::lint::{LintSeverity, lint_scenario};
use sb_core::model::{Attribute, Color};
use sb_editor::persist::{ImageTicket, LoadOutcome, LoadTicket};
use sb_editor::{BoardEngine, InputEvent, Modifiers, RenderSignal};
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

/// The main WASM-facing board controller.
///
/// Holds the engine plus the outstanding async tickets, which JS refers to
/// by number.
#[wasm_bindgen]
pub struct ScenarioBoard {
    engine: BoardEngine,
    next_handle: u32,
    load_tickets: HashMap<u32, LoadTicket>,
    image_tickets: HashMap<u32, ImageTicket>,
    last_error: Option<String>,
}

#[wasm_bindgen]
impl ScenarioBoard {
    /// Create a board. `config_json` may override any `BoardConfig` field.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Self {
        console_error_panic_hook_setup();

        let config = match config_json.as_deref().map(BoardConfig::from_json) {
            Some(Ok(config)) => config,
            Some(Err(err)) => {
                log::warn!("ignoring board config: {err}");
                BoardConfig::default()
            }
            None => BoardConfig::default(),
        };

        Self {
            engine: BoardEngine::new(config),
            next_handle: 0,
            load_tickets: HashMap::new(),
            image_tickets: HashMap::new(),
            last_error: None,
        }
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Handle pointer down (viewport coordinates). Returns true if a repaint is needed.
    pub fn handle_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let mods = Modifiers { shift, ctrl, alt, meta };
        self.engine.dispatch(&InputEvent::from_pointer_down(x, y, mods))
    }

    pub fn handle_pointer_move(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let mods = Modifiers { shift, ctrl, alt, meta };
        self.engine.dispatch(&InputEvent::from_pointer_move(x, y, mods))
    }

    pub fn handle_pointer_up(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let mods = Modifiers { shift, ctrl, alt, meta };
        self.engine.dispatch(&InputEvent::from_pointer_up(x, y, mods))
    }

    /// Handle a keydown. `key` is `KeyboardEvent.key`; pass `editing` while
    /// an object's text field has focus so only Escape is acted on.
    pub fn handle_key(
        &mut self,
        key: &str,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
        editing: bool,
    ) -> bool {
        let mods = Modifiers { shift, ctrl, alt, meta };
        let event = if editing {
            InputEvent::editing_key(key, mods)
        } else {
            InputEvent::key(key, mods)
        };
        self.engine.dispatch(&event)
    }

    /// Drop a palette item (`title`, `plot`, `char`, `desc`) at a viewport position.
    pub fn drop_object(&mut self, token: &str, x: f32, y: f32) -> bool {
        self.engine.dispatch(&InputEvent::Drop {
            token: token.to_string(),
            x,
            y,
        })
    }

    /// Report the canvas container's scroll offset.
    pub fn set_scroll(&mut self, x: f32, y: f32) {
        self.engine.dispatch(&InputEvent::Scroll { x, y });
    }

    // ─── Attributes ──────────────────────────────────────────────────────

    pub fn set_content(&mut self, id: &str, text: &str) -> bool {
        self.set_attribute(id, Attribute::Content(text.to_string()))
    }

    /// `hex` is the value of an `<input type="color">`.
    pub fn set_color(&mut self, id: &str, hex: &str) -> bool {
        match Color::from_hex(hex) {
            Some(color) => self.set_attribute(id, Attribute::Color(color)),
            None => {
                self.last_error = Some(format!("invalid color `{hex}`"));
                false
            }
        }
    }

    pub fn set_resolved(&mut self, id: &str, resolved: bool) -> bool {
        self.set_attribute(id, Attribute::Resolved(resolved))
    }

    pub fn set_annotation(&mut self, id: &str, text: &str) -> bool {
        self.set_attribute(id, Attribute::Annotation(text.to_string()))
    }

    pub fn clear_image(&mut self, id: &str) -> bool {
        self.set_attribute(id, Attribute::Image(None))
    }

    /// Embed an image synchronously.
    pub fn attach_image(&mut self, id: &str, mime: &str, bytes: &[u8]) -> bool {
        let result = self.engine.attach_image(ObjectId::intern(id), mime, bytes);
        self.record(result).is_some()
    }

    /// Start an async image read for a character. Returns a ticket handle,
    /// or `None` if the object cannot hold an image.
    pub fn begin_image(&mut self, id: &str) -> Option<u32> {
        let result = self.engine.begin_image(ObjectId::intern(id));
        let ticket = self.record(result)?;
        let handle = self.mint_handle();
        self.image_tickets.insert(handle, ticket);
        Some(handle)
    }

    /// Complete an image read. Returns true if the image was applied.
    pub fn finish_image(&mut self, handle: u32, mime: &str, bytes: &[u8]) -> bool {
        let Some(ticket) = self.image_tickets.remove(&handle) else {
            return false;
        };
        let result = self.engine.finish_image(ticket, mime, bytes);
        self.record(result) == Some(LoadOutcome::Applied)
    }

    // ─── Connections & objects ───────────────────────────────────────────

    pub fn toggle_line_style(&mut self, id: &str) -> bool {
        let result = self.engine.toggle_style(LineId::intern(id));
        self.record(result).is_some()
    }

    pub fn set_line_label(&mut self, id: &str, label: Option<String>) -> bool {
        let result = self.engine.set_label(LineId::intern(id), label);
        self.record(result).is_some()
    }

    /// Delete a connection. Ask the user before calling.
    pub fn remove_line(&mut self, id: &str) -> bool {
        let result = self.engine.remove_connection(LineId::intern(id));
        self.record(result).is_some()
    }

    pub fn remove_object(&mut self, id: &str) -> bool {
        let result = self.engine.remove_object(ObjectId::intern(id));
        self.record(result).is_some()
    }

    // ─── Tabs & title ────────────────────────────────────────────────────

    pub fn add_tab(&mut self, name: Option<String>) -> Option<u32> {
        let result = self.engine.add_tab(name.as_deref());
        self.record(result).map(|id| id.0)
    }

    pub fn switch_tab(&mut self, id: u32) -> bool {
        let result = self.engine.switch_to(TabId(id));
        self.record(result).is_some()
    }

    pub fn rename_tab(&mut self, id: u32, name: &str) -> bool {
        let result = self.engine.rename_tab(TabId(id), name);
        self.record(result).is_some()
    }

    /// JSON array of `{id, name, active, objects, lines, canvasWidth, canvasHeight}`.
    pub fn tabs_json(&self) -> String {
        serde_json::to_string(&self.engine.tabs()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn set_title(&mut self, title: &str) {
        self.engine.set_title(title);
    }

    pub fn title(&self) -> String {
        self.engine.scenario().title.clone()
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Serialize the board. Returns an empty string on failure (see `last_error`).
    pub fn save(&mut self) -> String {
        let result = self.engine.save();
        self.record(result).unwrap_or_default()
    }

    /// Replace the board with a saved document. On failure the current
    /// board is untouched and `last_error` holds the message.
    pub fn load(&mut self, text: &str) -> bool {
        let result = self.engine.load(text);
        self.record(result).is_some()
    }

    /// Start an async file read for a load. Earlier handles become stale.
    pub fn begin_load(&mut self) -> u32 {
        let ticket = self.engine.begin_load();
        let handle = self.mint_handle();
        self.load_tickets.clear();
        self.load_tickets.insert(handle, ticket);
        handle
    }

    /// Complete a load. Returns true only if the document was applied.
    pub fn finish_load(&mut self, handle: u32, text: &str) -> bool {
        let Some(ticket) = self.load_tickets.remove(&handle) else {
            log::debug!("load handle {handle} is stale");
            return false;
        };
        let result = self.engine.finish_load(ticket, text);
        self.record(result) == Some(LoadOutcome::Applied)
    }

    /// Message from the last failed operation, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.clone()
    }

    // ─── Output ──────────────────────────────────────────────────────────

    /// JSON display list of the active tab.
    pub fn display_list(&self) -> String {
        serde_json::to_string(&self.engine.display_list()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Pending render signals as an array of strings, e.g. `"objectMoved:obj-3"`.
    pub fn drain_signals(&mut self) -> js_sys::Array {
        self.engine
            .drain_signals()
            .iter()
            .map(|s| JsValue::from_str(&signal_name(s)))
            .collect()
    }

    /// ID of the object or connection that `Delete` would remove.
    pub fn hovered_id(&self) -> Option<String> {
        use sb_render::hit::HitTarget;
        self.engine.hovered().map(|h| match h {
            HitTarget::Connection(line) => line.to_string(),
            HitTarget::Anchor { object, .. }
            | HitTarget::ResizeHandle(object)
            | HitTarget::Body(object) => object.to_string(),
        })
    }
}

impl ScenarioBoard {
    fn set_attribute(&mut self, id: &str, attribute: Attribute) -> bool {
        let result = self.engine.set_attribute(ObjectId::intern(id), attribute);
        self.record(result).is_some()
    }

    /// Store the error message of a failed call and convert to `Option`.
    fn record<T>(&mut self, result: sb_core::Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Some(value)
            }
            Err(err) => {
                log::debug!("board operation failed: {err}");
                self.last_error = Some(err.to_string());
                None
            }
        }
    }

    fn mint_handle(&mut self) -> u32 {
        self.next_handle = self.next_handle.wrapping_add(1);
        self.next_handle
    }
}

fn signal_name(signal: &RenderSignal) -> String {
    match signal {
        RenderSignal::ObjectCreated(id) => format!("objectCreated:{id}"),
        RenderSignal::ObjectMoved(id) => format!("objectMoved:{id}"),
        RenderSignal::ObjectResized(id) => format!("objectResized:{id}"),
        RenderSignal::ObjectUpdated(id) => format!("objectUpdated:{id}"),
        RenderSignal::ObjectRemoved(id) => format!("objectRemoved:{id}"),
        RenderSignal::ConnectionCreated(id) => format!("connectionCreated:{id}"),
        RenderSignal::ConnectionRemoved(id) => format!("connectionRemoved:{id}"),
        RenderSignal::ConnectionRestyled(id) => format!("connectionRestyled:{id}"),
        RenderSignal::PreviewChanged => "previewChanged".into(),
        RenderSignal::RoutesRecomputed => "routesRecomputed".into(),
        RenderSignal::CanvasResized(size) => {
            format!("canvasResized:{}x{}", size.width, size.height)
        }
        RenderSignal::TabSwitched(id) => format!("tabSwitched:{}", id.0),
        RenderSignal::TabsChanged => "tabsChanged".into(),
        RenderSignal::TitleChanged => "titleChanged".into(),
        RenderSignal::ScenarioLoaded => "scenarioLoaded".into(),
    }
}

/// Set up a panic hook that logs to the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Scenario Board WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone validation (no board needed) ─────────────────────────────

/// Validate a saved scenario. Returns JSON:
/// `{"ok":true,"warnings":[...]}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate(source: &str) -> String {
    let value = match sb_core::codec::from_json(source) {
        Ok(scenario) => {
            let warnings: Vec<String> = lint_scenario(&scenario)
                .into_iter()
                .filter(|d| d.severity == LintSeverity::Warning)
                .map(|d| format!("[{}] {}", d.rule, d.message))
                .collect();
            serde_json::json!({ "ok": true, "warnings": warnings })
        }
        Err(err) => serde_json::json!({ "ok": false, "error": err.to_string() }),
    };
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn drop_then_save_and_validate() {
        let mut board = ScenarioBoard::new(None);
        assert!(board.drop_object("plot", 40.0, 40.0));
        let saved = board.save();
        let report: serde_json::Value = serde_json::from_str(&validate(&saved)).unwrap();
        assert_eq!(report["ok"], true);
    }

    #[test]
    fn failed_load_sets_last_error() {
        let mut board = ScenarioBoard::new(None);
        assert!(!board.load("{}"));
        assert!(board.last_error().unwrap().contains("malformed document"));
    }

    #[test]
    fn stale_load_handle_is_dropped() {
        let mut board = ScenarioBoard::new(Some(r#"{ "defaultTitle": "Mine" }"#.into()));
        let doc = board.save();
        let old = board.begin_load();
        let new = board.begin_load();
        assert!(!board.finish_load(old, &doc));
        assert!(board.finish_load(new, &doc));
        assert_eq!(board.title(), "Mine");
    }

    #[test]
    fn keys_typed_while_editing_leave_objects_alone() {
        let mut board = ScenarioBoard::new(None);
        board.drop_object("title", 100.0, 100.0);
        board.handle_pointer_move(130.0, 120.0, false, false, false, false);
        assert_eq!(board.hovered_id().as_deref(), Some("obj-1"));

        assert!(!board.handle_key("Backspace", false, false, false, false, true));
        assert_eq!(board.hovered_id().as_deref(), Some("obj-1"));
        assert!(board.handle_key("Backspace", false, false, false, false, false));
        assert_eq!(board.hovered_id(), None);
    }

    #[test]
    fn add_tab_returns_the_new_id() {
        let mut board = ScenarioBoard::new(None);
        assert_eq!(board.add_tab(Some("Act II".into())), Some(2));
        assert_eq!(board.add_tab(None), Some(3));
    }

    #[test]
    fn image_round_trip_through_handles() {
        let mut board = ScenarioBoard::new(None);
        board.drop_object("char", 0.0, 0.0);
        let handle = board.begin_image("obj-1").unwrap();
        assert!(board.finish_image(handle, "image/png", &[1, 2, 3]));
        assert!(board.begin_image("missing").is_none());
        assert!(board.last_error().is_some());
    }
}

