//! Input dispatch.
//!
//! Every UI event goes through `BoardEngine::dispatch`, which converts the
//! pointer to canvas space, resolves the hit target, and matches on
//! (interaction, target):
//!
//! | Event | Anchor | Resize handle | Body | Connection | Empty |
//! |-------|--------|---------------|------|------------|-------|
//! | down  | begin draw | start resize | start drag | select (Shift: restyle) | clear hover |
//! | move  | preview / drag / resize, or hover tracking when idle |||||
//! | up    | complete draw | - | - | - | cancel draw |
//!
//! Errors from the underlying operations are recovered here: they are
//! logged and the event becomes a no-op.

use crate::engine::BoardEngine;
use crate::input::{InputEvent, Modifiers};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use sb_core::error::{BoardError, Result};
use sb_core::geometry::object_bounds;
use sb_core::id::ObjectId;
use sb_core::model::{ObjectType, Point, Size};
use sb_render::hit::{HitTarget, hit_test};

/// Pointer gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Moving an object; `grab` is the pointer offset from its top-left.
    Dragging { object: ObjectId, grab: Point },
    /// Resizing an object from its bottom-right handle; `grab` is the
    /// bottom-right corner's offset from the pointer.
    Resizing { object: ObjectId, grab: Point },
}

impl Gesture {
    /// Drop the gesture if it targets a deleted object.
    pub(crate) fn forget(&mut self, id: ObjectId) {
        match *self {
            Gesture::Dragging { object, .. } | Gesture::Resizing { object, .. }
                if object == id =>
            {
                *self = Gesture::Idle;
            }
            _ => {}
        }
    }
}

impl BoardEngine {
    /// Handle one UI event. Returns `true` if any render signal was queued.
    pub fn dispatch(&mut self, event: &InputEvent) -> bool {
        let before = self.pending_signals();
        let result = match event {
            InputEvent::PointerDown { x, y, modifiers } => {
                let p = self.viewport.to_canvas(*x, *y);
                self.pointer_down(p, *modifiers)
            }
            InputEvent::PointerMove { x, y, .. } => {
                let p = self.viewport.to_canvas(*x, *y);
                self.pointer_move(p)
            }
            InputEvent::PointerUp { x, y, .. } => {
                let p = self.viewport.to_canvas(*x, *y);
                self.pointer_up(p)
            }
            InputEvent::Key {
                key,
                modifiers,
                editing,
            } => self.key(key, *modifiers, *editing),
            InputEvent::Drop { token, x, y } => {
                let p = self.viewport.to_canvas(*x, *y);
                self.drop_object(token, p)
            }
            InputEvent::Scroll { x, y } => {
                self.viewport.scroll_x = *x;
                self.viewport.scroll_y = *y;
                Ok(())
            }
        };
        if let Err(err) = result {
            log::debug!("ignored {event:?}: {err}");
        }
        self.pending_signals() > before
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    fn hit(&self, p: Point) -> Option<HitTarget> {
        hit_test(&self.scene, &self.router, &self.config, p)
    }

    fn pointer_down(&mut self, p: Point, modifiers: Modifiers) -> Result<()> {
        self.gesture = Gesture::Idle;
        match self.hit(p) {
            Some(HitTarget::Anchor { object, side }) => {
                self.cancel();
                self.begin_connection(object, side)?;
            }
            Some(HitTarget::ResizeHandle(object)) => {
                self.hovered = Some(HitTarget::Body(object));
                if let Some(o) = self.scene.object(object) {
                    let b = object_bounds(o);
                    let grab = Point::new(b.right() - p.x, b.bottom() - p.y);
                    self.gesture = Gesture::Resizing { object, grab };
                }
            }
            Some(HitTarget::Body(object)) => {
                self.hovered = Some(HitTarget::Body(object));
                if let Some(o) = self.scene.object(object) {
                    let grab = Point::new(p.x - o.position.x, p.y - o.position.y);
                    self.gesture = Gesture::Dragging { object, grab };
                }
            }
            Some(target @ HitTarget::Connection(line)) => {
                self.hovered = Some(target);
                if modifiers.shift {
                    self.toggle_style(line)?;
                }
            }
            None => self.hovered = None,
        }
        Ok(())
    }

    fn pointer_move(&mut self, p: Point) -> Result<()> {
        if self.is_drawing() {
            return self.update_connection(p);
        }
        match self.gesture {
            Gesture::Dragging { object, grab } => {
                self.move_object(object, Point::new(p.x - grab.x, p.y - grab.y))?;
                self.recompute_all();
            }
            Gesture::Resizing { object, grab } => {
                let origin = self
                    .scene
                    .object(object)
                    .map(|o| o.position)
                    .ok_or(BoardError::DanglingReference(object))?;
                let size = Size::new(p.x + grab.x - origin.x, p.y + grab.y - origin.y);
                self.resize_object(object, size)?;
                self.recompute_all();
            }
            Gesture::Idle => {
                self.hovered = match self.hit(p) {
                    Some(target @ HitTarget::Connection(_)) => Some(target),
                    Some(target) => target.object().map(HitTarget::Body),
                    None => None,
                };
            }
        }
        Ok(())
    }

    fn pointer_up(&mut self, p: Point) -> Result<()> {
        self.gesture = Gesture::Idle;
        if !self.is_drawing() {
            return Ok(());
        }
        match self.hit(p) {
            Some(HitTarget::Anchor { object, side }) => {
                self.complete_connection(object, side)?;
            }
            _ => self.cancel(),
        }
        Ok(())
    }

    fn key(&mut self, key: &str, modifiers: Modifiers, editing: bool) -> Result<()> {
        let Some(action) = ShortcutMap::resolve(key, modifiers) else {
            return Ok(());
        };
        if editing && !action.allowed_while_editing() {
            return Ok(());
        }
        match action {
            ShortcutAction::DeleteHovered => match self.hovered {
                Some(HitTarget::Connection(line)) => {
                    self.remove_connection(line)?;
                }
                Some(target) => {
                    if let Some(object) = target.object() {
                        self.remove_object(object)?;
                    }
                }
                None => {}
            },
            ShortcutAction::ToggleLineStyle => {
                if let Some(HitTarget::Connection(line)) = self.hovered {
                    self.toggle_style(line)?;
                }
            }
            ShortcutAction::ExtendCanvasRight => {
                self.extend_canvas(self.config.canvas_extend_step, 0);
            }
            ShortcutAction::ExtendCanvasDown => {
                self.extend_canvas(0, self.config.canvas_extend_step);
            }
            ShortcutAction::CancelDraw => self.cancel(),
        }
        Ok(())
    }

    fn drop_object(&mut self, token: &str, p: Point) -> Result<()> {
        match ObjectType::from_token(token) {
            Some(object_type) => {
                self.create_object(object_type, p, [])?;
            }
            None => log::debug!("ignored drop of unknown type `{token}`"),
        }
        Ok(())
    }
}
