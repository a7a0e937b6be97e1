//! Connection graph: drawing state and connection operations.
//!
//! Drawing a connection is a small state machine: `begin` on an anchor
//! starts a straight preview line, `update` moves its free end, and
//! `complete` on another object's anchor commits it. Releasing anywhere
//! else calls `cancel`.

use crate::engine::{BoardEngine, RenderSignal};
use sb_core::error::{BoardError, Result};
use sb_core::geometry::anchor_position;
use sb_core::id::{LineId, ObjectId};
use sb_core::model::{Connection, LineStyle, Point, Side};
use sb_render::hit::HitTarget;

/// An in-progress connection draw. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drawing {
    pub start: ObjectId,
    pub side: Side,
    /// Anchor coordinate at `begin`.
    pub origin: Point,
    /// Free end of the preview, in canvas space.
    pub pointer: Point,
}

impl BoardEngine {
    /// Whether a connection is being drawn.
    pub fn is_drawing(&self) -> bool {
        self.drawing.is_some()
    }

    /// Endpoints of the preview line, if drawing.
    pub fn preview(&self) -> Option<(Point, Point)> {
        self.drawing.map(|d| (d.origin, d.pointer))
    }

    /// Start drawing from `object`'s `side` anchor.
    pub fn begin_connection(&mut self, object: ObjectId, side: Side) -> Result<()> {
        if self.drawing.is_some() {
            return Err(BoardError::InvalidTransition("a connection is already being drawn"));
        }
        let origin = anchor_position(&self.scene, object, side)
            .ok_or(BoardError::DanglingReference(object))?;
        self.drawing = Some(Drawing {
            start: object,
            side,
            origin,
            pointer: origin,
        });
        log::debug!("begin connection at {object}:{side}");
        self.signal(RenderSignal::PreviewChanged);
        Ok(())
    }

    /// Move the preview's free end to `pointer` (canvas space).
    pub fn update_connection(&mut self, pointer: Point) -> Result<()> {
        let drawing = self
            .drawing
            .as_mut()
            .ok_or(BoardError::InvalidTransition("no connection is being drawn"))?;
        drawing.pointer = pointer;
        self.signal(RenderSignal::PreviewChanged);
        Ok(())
    }

    /// Finish the draw on `object`'s `side` anchor.
    ///
    /// Returns `Ok(None)` when the target is the start object: the attempt
    /// is discarded and nothing is added.
    pub fn complete_connection(&mut self, object: ObjectId, side: Side) -> Result<Option<LineId>> {
        let drawing = self
            .drawing
            .take()
            .ok_or(BoardError::InvalidTransition("no connection is being drawn"))?;
        self.signal(RenderSignal::PreviewChanged);

        match self.commit_connection(drawing.start, drawing.side, object, side) {
            Ok(id) => Ok(Some(id)),
            Err(BoardError::SelfConnection(id)) => {
                log::debug!("discard connection from {id} to itself");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Discard the preview. Safe to call at any time.
    pub fn cancel(&mut self) {
        if self.drawing.take().is_some() {
            log::debug!("cancel connection draw");
            self.signal(RenderSignal::PreviewChanged);
        }
    }

    /// `begin` followed by `complete`.
    pub fn connect(
        &mut self,
        start: ObjectId,
        start_side: Side,
        end: ObjectId,
        end_side: Side,
    ) -> Result<Option<LineId>> {
        self.cancel();
        self.begin_connection(start, start_side)?;
        self.complete_connection(end, end_side)
    }

    fn commit_connection(
        &mut self,
        start: ObjectId,
        start_side: Side,
        end: ObjectId,
        end_side: Side,
    ) -> Result<LineId> {
        if start == end {
            return Err(BoardError::SelfConnection(start));
        }
        for id in [start, end] {
            if self.scene.object(id).is_none() {
                return Err(BoardError::DanglingReference(id));
            }
        }

        let id = self.scenario.mint_line_id()?;
        let connection = Connection {
            id,
            start,
            start_side,
            end,
            end_side,
            style: LineStyle::Solid,
            label: None,
        };
        if let Some(route) = self.router.route_connection(&self.scene, &connection) {
            self.routes.insert(id, route);
        }
        self.scene.connections.push(connection);
        log::debug!("connect {start}:{start_side} -> {end}:{end_side} as {id}");
        self.signal(RenderSignal::ConnectionCreated(id));
        Ok(id)
    }

    /// Flip a connection between solid and dashed.
    pub fn toggle_style(&mut self, id: LineId) -> Result<LineStyle> {
        let connection = self
            .scene
            .connection_mut(id)
            .ok_or(BoardError::UnknownConnection(id))?;
        connection.style = connection.style.toggled();
        let style = connection.style;
        log::debug!("restyle {id} as {style:?}");
        self.signal(RenderSignal::ConnectionRestyled(id));
        Ok(style)
    }

    /// Set or clear a connection's label.
    pub fn set_label(&mut self, id: LineId, label: Option<String>) -> Result<()> {
        let connection = self
            .scene
            .connection_mut(id)
            .ok_or(BoardError::UnknownConnection(id))?;
        connection.label = label.filter(|l| !l.is_empty());
        self.signal(RenderSignal::ConnectionRestyled(id));
        Ok(())
    }

    /// Delete a connection. Confirmation is the caller's concern.
    pub fn remove_connection(&mut self, id: LineId) -> Result<Connection> {
        let removed = self
            .scene
            .remove_connection(id)
            .ok_or(BoardError::UnknownConnection(id))?;
        self.routes.remove(&id);
        if self.hovered == Some(HitTarget::Connection(id)) {
            self.hovered = None;
        }
        log::debug!("remove connection {id}");
        self.signal(RenderSignal::ConnectionRemoved(id));
        Ok(removed)
    }

    /// Re-route every connection of the active tab from current anchors.
    ///
    /// Connections with a missing endpoint are skipped, not deleted.
    pub fn recompute_all(&mut self) {
        self.routes.clear();
        for connection in &self.scene.connections {
            match self.router.route_connection(&self.scene, connection) {
                Some(route) => {
                    self.routes.insert(connection.id, route);
                }
                None => log::trace!("skip dangling connection {}", connection.id),
            }
        }
        self.signal(RenderSignal::RoutesRecomputed);
    }
}
