//! Board engine: the live scene plus the stored scenario.
//!
//! The engine is the single owner of editor state:
//!
//! - **Scenario**: title, tabs, and ID counters. Tabs other than the active
//!   one are only touched on tab switch, save, and load.
//! - **Scene**: the active tab's canvas as it is being edited. Every object
//!   and connection operation works on the scene; `commit_scene` writes it
//!   back into the active tab (the "snapshot" step of switch and save).
//!
//! Each mutating operation queues a `RenderSignal`; the UI drains them with
//! `drain_signals` and repaints from `display_list`.

use crate::connect::Drawing;
use crate::dispatch::Gesture;
use crate::input::Viewport;
use sb_core::config::BoardConfig;
use sb_core::error::{BoardError, Result};
use sb_core::geometry::clamp_size;
use sb_core::id::{LineId, ObjectId, TabId};
use sb_core::model::*;
use sb_core::routing::{Route, Router};
use sb_render::hit::HitTarget;
use sb_render::paint::{DisplayList, build_display_list};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Notification that the UI must repaint something.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderSignal {
    ObjectCreated(ObjectId),
    ObjectMoved(ObjectId),
    ObjectResized(ObjectId),
    ObjectUpdated(ObjectId),
    ObjectRemoved(ObjectId),
    ConnectionCreated(LineId),
    ConnectionRemoved(LineId),
    ConnectionRestyled(LineId),
    /// The in-progress preview line appeared, moved, or went away.
    PreviewChanged,
    RoutesRecomputed,
    CanvasResized(CanvasSize),
    TabSwitched(TabId),
    /// A tab was added or renamed.
    TabsChanged,
    TitleChanged,
    ScenarioLoaded,
}

/// The editor engine. One per open board.
pub struct BoardEngine {
    pub(crate) scenario: Scenario,
    /// Live canvas of the active tab.
    pub(crate) scene: Canvas,
    pub(crate) config: BoardConfig,
    pub(crate) router: Router,
    /// Routes of the scene's connections, rebuilt by `recompute_all`.
    pub(crate) routes: HashMap<LineId, Route>,
    pub(crate) drawing: Option<Drawing>,
    pub(crate) gesture: Gesture,
    /// Last object or connection under the pointer; the delete target.
    pub(crate) hovered: Option<HitTarget>,
    pub(crate) viewport: Viewport,
    pub(crate) load_seq: u64,
    pub(crate) image_seq: u64,
    pub(crate) image_tickets: HashMap<ObjectId, u64>,
    signals: Vec<RenderSignal>,
}

impl BoardEngine {
    /// Create an engine holding a fresh scenario with one default tab.
    pub fn new(config: BoardConfig) -> Self {
        let scenario = Scenario::with_first_tab(
            config.default_title.clone(),
            format!("{} 1", config.default_tab_name),
            config.canvas_size(),
        );

        let mut engine = Self {
            scene: Canvas::new(config.canvas_size()),
            router: config.router(),
            scenario,
            config,
            routes: HashMap::new(),
            drawing: None,
            gesture: Gesture::Idle,
            hovered: None,
            viewport: Viewport::default(),
            load_seq: 0,
            image_seq: 0,
            image_tickets: HashMap::new(),
            signals: Vec::new(),
        };
        engine.replay_active();
        engine.signals.clear();
        engine
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// The live canvas of the active tab.
    pub fn scene(&self) -> &Canvas {
        &self.scene
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn active_tab(&self) -> Option<TabId> {
        self.scenario.active
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.scene.object(id)
    }

    pub fn connection(&self, id: LineId) -> Option<&Connection> {
        self.scene.connection(id)
    }

    /// Route computed by the last `recompute_all`, if the connection resolved.
    pub fn route(&self, id: LineId) -> Option<&Route> {
        self.routes.get(&id)
    }

    pub fn hovered(&self) -> Option<HitTarget> {
        self.hovered
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Everything the UI needs to paint the active tab.
    pub fn display_list(&self) -> DisplayList {
        build_display_list(&self.scene, &self.router, self.preview())
    }

    /// Take all pending render signals.
    pub fn drain_signals(&mut self) -> Vec<RenderSignal> {
        std::mem::take(&mut self.signals)
    }

    pub(crate) fn pending_signals(&self) -> usize {
        self.signals.len()
    }

    pub(crate) fn signal(&mut self, signal: RenderSignal) {
        self.signals.push(signal);
    }

    // ─── Object store ────────────────────────────────────────────────────

    /// Place a new object with type defaults, then apply `attributes`.
    ///
    /// Attributes are checked before an ID is minted, so a rejected call
    /// consumes no ID.
    pub fn create_object(
        &mut self,
        object_type: ObjectType,
        position: Point,
        attributes: impl IntoIterator<Item = Attribute>,
    ) -> Result<ObjectId> {
        let mut kind = ObjectKind::defaults(object_type);
        for attribute in attributes {
            kind.apply(attribute)?;
        }
        let id = self.scenario.mint_object_id()?;
        self.scene.objects.push(SceneObject {
            id,
            position,
            size: None,
            kind,
        });
        log::debug!("create {object_type} {id} at ({}, {})", position.x, position.y);
        self.signal(RenderSignal::ObjectCreated(id));
        Ok(id)
    }

    /// Move an object. Does not recompute routes; call `recompute_all`.
    pub fn move_object(&mut self, id: ObjectId, position: Point) -> Result<()> {
        let object = self
            .scene
            .object_mut(id)
            .ok_or(BoardError::DanglingReference(id))?;
        object.position = position;
        log::trace!("move {id} to ({}, {})", position.x, position.y);
        self.signal(RenderSignal::ObjectMoved(id));
        Ok(())
    }

    /// Give an object an explicit size, clamped to the minimum object size.
    /// Does not recompute routes; call `recompute_all`.
    pub fn resize_object(&mut self, id: ObjectId, size: Size) -> Result<Size> {
        let object = self
            .scene
            .object_mut(id)
            .ok_or(BoardError::DanglingReference(id))?;
        let size = clamp_size(size);
        object.size = Some(size);
        log::trace!("resize {id} to {}x{}", size.width, size.height);
        self.signal(RenderSignal::ObjectResized(id));
        Ok(size)
    }

    /// Assign one attribute. Attributes the object's type does not carry
    /// are rejected with `AttributeMismatch`.
    pub fn set_attribute(&mut self, id: ObjectId, attribute: Attribute) -> Result<()> {
        let object = self
            .scene
            .object_mut(id)
            .ok_or(BoardError::DanglingReference(id))?;
        let name = attribute.name();
        object.kind.apply(attribute)?;
        log::debug!("set {name} on {id}");
        self.signal(RenderSignal::ObjectUpdated(id));
        Ok(())
    }

    /// Delete an object and every connection that touches it.
    ///
    /// Returns the IDs of the removed connections.
    pub fn remove_object(&mut self, id: ObjectId) -> Result<SmallVec<[LineId; 4]>> {
        let (_, removed) = self
            .scene
            .remove_object(id)
            .ok_or(BoardError::DanglingReference(id))?;

        // Stored tabs cannot normally reference a live-scene object, but a
        // hand-edited file can; leave no connection pointing at a deleted id.
        for tab in &mut self.scenario.tabs {
            if Some(tab.id) != self.scenario.active {
                tab.canvas.connections.retain(|c| !c.touches(id));
            }
        }

        if self.drawing.as_ref().is_some_and(|d| d.start == id) {
            self.cancel();
        }
        if self.hovered.and_then(|h| h.object()) == Some(id) {
            self.hovered = None;
        }
        self.gesture.forget(id);
        self.image_tickets.remove(&id);

        let lines: SmallVec<[LineId; 4]> = removed.iter().map(|c| c.id).collect();
        for line in &lines {
            self.routes.remove(line);
            if self.hovered == Some(HitTarget::Connection(*line)) {
                self.hovered = None;
            }
            self.signal(RenderSignal::ConnectionRemoved(*line));
        }
        log::debug!("remove {id} and {} connection(s)", lines.len());
        self.signal(RenderSignal::ObjectRemoved(id));
        Ok(lines)
    }

    /// Current attributes of every live object, in paint order.
    pub fn snapshot(&self) -> Vec<SceneObject> {
        self.scene.objects.clone()
    }

    // ─── Canvas & title ──────────────────────────────────────────────────

    /// Grow the active canvas. Never shrinks.
    pub fn extend_canvas(&mut self, dw: u32, dh: u32) -> CanvasSize {
        let size = CanvasSize::new(
            self.scene.size.width.saturating_add(dw),
            self.scene.size.height.saturating_add(dh),
        );
        self.scene.size = size;
        log::debug!("canvas extended to {}x{}", size.width, size.height);
        self.signal(RenderSignal::CanvasResized(size));
        self.recompute_all();
        size
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.scenario.title = title.into();
        self.signal(RenderSignal::TitleChanged);
    }

    // ─── Scene sync ──────────────────────────────────────────────────────

    /// Write the live scene into the active tab's stored canvas.
    pub fn commit_scene(&mut self) {
        if let Some(active) = self.scenario.active
            && let Some(tab) = self.scenario.tab_mut(active)
        {
            tab.canvas = self.scene.clone();
        }
    }

    /// Rebuild the live scene from the active tab's stored canvas.
    pub(crate) fn replay_active(&mut self) {
        self.drawing = None;
        self.gesture = Gesture::Idle;
        self.hovered = None;
        self.routes.clear();

        let Some(stored) = self.scenario.active.and_then(|id| self.scenario.tab(id)) else {
            self.scene = Canvas::new(self.config.canvas_size());
            return;
        };
        let mut scene = Canvas::new(stored.canvas.size);
        scene.objects = stored.canvas.objects.clone();
        scene.connections = stored.canvas.connections.clone();
        self.scene = scene;
        self.recompute_all();
    }
}

impl Default for BoardEngine {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}
