//! Save, load, and the asynchronous completion tickets.
//!
//! File reads happen outside the engine. The UI asks for a ticket before
//! starting a read and hands it back with the result; only the most
//! recently issued ticket is honored, so a slow stale read can never
//! overwrite a newer one.

use crate::engine::{BoardEngine, RenderSignal};
use sb_core::codec;
use sb_core::error::{BoardError, Result};
use sb_core::id::ObjectId;
use sb_core::lint::{LintSeverity, lint_scenario};
use sb_core::model::{Attribute, DataUri, ObjectType};

/// Handle for a pending scenario load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Handle for a pending image read targeting one character object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTicket {
    pub object: ObjectId,
    seq: u64,
}

/// What happened to a completed asynchronous operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer request was issued since; the result was dropped.
    Superseded,
}

impl BoardEngine {
    // ─── Save / load ─────────────────────────────────────────────────────

    /// Snapshot the live scene and serialize the whole scenario.
    pub fn save(&mut self) -> Result<String> {
        self.commit_scene();
        let text = codec::to_json(&self.scenario)?;
        log::debug!("saved scenario `{}` ({} bytes)", self.scenario.title, text.len());
        Ok(text)
    }

    /// Replace the scenario with a saved document.
    ///
    /// All-or-nothing: on error the current scenario and scene are untouched.
    /// On success the first tab becomes active.
    pub fn load(&mut self, text: &str) -> Result<()> {
        let mut scenario = codec::from_json(text).inspect_err(|err| {
            log::warn!("load rejected: {err}");
        })?;

        for diag in lint_scenario(&scenario) {
            match diag.severity {
                LintSeverity::Warning => log::warn!("[{}] {}", diag.rule, diag.message),
                LintSeverity::Info => log::info!("[{}] {}", diag.rule, diag.message),
            }
        }
        if scenario.repair_counters() {
            log::warn!(
                "raised id counters to tab={} obj={} line={}",
                scenario.next_tab_id,
                scenario.next_obj_id,
                scenario.next_line_id
            );
        }
        if scenario.tabs.is_empty() {
            let name = format!("{} {}", self.config.default_tab_name, scenario.next_tab_id);
            scenario.push_tab(name, self.config.canvas_size())?;
        }

        let first = scenario.tabs.first().map(|t| t.id);
        scenario.active = None;
        self.scenario = scenario;
        self.image_tickets.clear();
        self.replay_active();

        if let Some(first) = first {
            self.switch_to(first)?;
        }
        log::debug!(
            "loaded scenario `{}` with {} tab(s)",
            self.scenario.title,
            self.scenario.tabs.len()
        );
        self.signal(RenderSignal::ScenarioLoaded);
        Ok(())
    }

    /// Issue a ticket for a scenario load about to start.
    /// Any earlier outstanding ticket is superseded.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_seq += 1;
        LoadTicket(self.load_seq)
    }

    /// Apply a load result if `ticket` is still the latest.
    pub fn finish_load(&mut self, ticket: LoadTicket, text: &str) -> Result<LoadOutcome> {
        if ticket.0 != self.load_seq {
            log::debug!("drop stale load #{} (latest #{})", ticket.0, self.load_seq);
            return Ok(LoadOutcome::Superseded);
        }
        self.load(text)?;
        Ok(LoadOutcome::Applied)
    }

    // ─── Images ──────────────────────────────────────────────────────────

    /// Issue a ticket for an image read targeting a character object.
    pub fn begin_image(&mut self, object: ObjectId) -> Result<ImageTicket> {
        let target = self
            .scene
            .object(object)
            .ok_or(BoardError::DanglingReference(object))?;
        if target.object_type() != ObjectType::Character {
            return Err(BoardError::AttributeMismatch {
                attribute: "image",
                object_type: target.object_type(),
            });
        }
        self.image_seq += 1;
        self.image_tickets.insert(object, self.image_seq);
        Ok(ImageTicket {
            object,
            seq: self.image_seq,
        })
    }

    /// Embed image bytes if `ticket` is still the latest for its object.
    pub fn finish_image(
        &mut self,
        ticket: ImageTicket,
        mime: &str,
        bytes: &[u8],
    ) -> Result<LoadOutcome> {
        if self.image_tickets.get(&ticket.object) != Some(&ticket.seq) {
            log::debug!("drop stale image for {}", ticket.object);
            return Ok(LoadOutcome::Superseded);
        }
        self.image_tickets.remove(&ticket.object);
        self.attach_image(ticket.object, mime, bytes)?;
        Ok(LoadOutcome::Applied)
    }

    /// Embed image bytes as a data URI on a character object.
    pub fn attach_image(&mut self, object: ObjectId, mime: &str, bytes: &[u8]) -> Result<()> {
        let uri = DataUri::encode(mime, bytes);
        self.set_attribute(object, Attribute::Image(Some(uri)))
    }
}
