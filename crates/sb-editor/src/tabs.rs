//! Tab manager: exactly one tab is active; switching snapshots the live
//! scene into the outgoing tab and replays the incoming one.

use crate::engine::{BoardEngine, RenderSignal};
use sb_core::error::{BoardError, Result};
use sb_core::id::TabId;
use serde::Serialize;

/// Summary of one tab, for tab bars and `sbctl info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSummary {
    pub id: TabId,
    pub name: String,
    pub active: bool,
    pub objects: usize,
    pub lines: usize,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl BoardEngine {
    /// Make `id` the active tab.
    ///
    /// The live scene is committed to the outgoing tab first, then the scene
    /// is cleared and rebuilt from the incoming tab's stored objects,
    /// connections, and canvas size.
    pub fn switch_to(&mut self, id: TabId) -> Result<()> {
        if self.scenario.tab(id).is_none() {
            return Err(BoardError::UnknownTab(id));
        }
        self.commit_scene();
        self.scenario.active = Some(id);
        self.replay_active();
        log::debug!(
            "switched to {id}: {} object(s), {} connection(s)",
            self.scene.objects.len(),
            self.scene.connections.len()
        );
        self.signal(RenderSignal::TabSwitched(id));
        Ok(())
    }

    /// Append an empty tab with the default canvas size and switch to it.
    pub fn add_tab(&mut self, name: Option<&str>) -> Result<TabId> {
        let name = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => format!("{} {}", self.config.default_tab_name, self.scenario.next_tab_id),
        };
        let id = self.scenario.push_tab(name, self.config.canvas_size())?;
        self.signal(RenderSignal::TabsChanged);
        self.switch_to(id)?;
        Ok(id)
    }

    /// Change a tab's display name. Its id is unchanged.
    pub fn rename_tab(&mut self, id: TabId, name: impl Into<String>) -> Result<()> {
        let tab = self.scenario.tab_mut(id).ok_or(BoardError::UnknownTab(id))?;
        tab.name = name.into();
        self.signal(RenderSignal::TabsChanged);
        Ok(())
    }

    /// All tabs in order. The active tab reports live counts.
    pub fn tabs(&self) -> Vec<TabSummary> {
        self.scenario
            .tabs
            .iter()
            .map(|tab| {
                let active = Some(tab.id) == self.scenario.active;
                let canvas = if active { &self.scene } else { &tab.canvas };
                TabSummary {
                    id: tab.id,
                    name: tab.name.clone(),
                    active,
                    objects: canvas.objects.len(),
                    lines: canvas.connections.len(),
                    canvas_width: canvas.size.width,
                    canvas_height: canvas.size.height,
                }
            })
            .collect()
    }
}
