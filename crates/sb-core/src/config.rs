//! Board configuration.

use crate::error::Result;
use crate::model::CanvasSize;
use crate::routing::{DEFAULT_STANDOFF, RoutePolicy, Router};
use serde::{Deserialize, Serialize};

/// Tunables for a board. Every field has a default, so a config file only
/// needs to name the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// Initial width of a new tab's canvas. Default: **2000**.
    pub canvas_width: u32,
    /// Initial height of a new tab's canvas. Default: **1000**.
    pub canvas_height: u32,
    /// Pixels added per canvas-extension key press. Default: **500**.
    pub canvas_extend_step: u32,
    /// Policy for committed connections. The drag preview is always straight.
    pub route_policy: RoutePolicy,
    /// Elbow standoff distance from the start anchor. Default: **20**.
    pub elbow_standoff: f32,
    pub default_tab_name: String,
    pub default_title: String,
    /// Pointer distance within which an anchor is hit. Default: **8**.
    pub anchor_hit_radius: f32,
    /// Edge length of the square resize handle at the bottom-right corner.
    pub resize_handle_size: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            canvas_width: 2000,
            canvas_height: 1000,
            canvas_extend_step: 500,
            route_policy: RoutePolicy::Elbow,
            elbow_standoff: DEFAULT_STANDOFF,
            default_tab_name: "Tab".into(),
            default_title: "Untitled Scenario".into(),
            anchor_hit_radius: 8.0,
            resize_handle_size: 12.0,
        }
    }
}

impl BoardConfig {
    /// Parse a JSON config; missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns `MalformedDocument` if the text is not a JSON object of the
    /// expected shape.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn canvas_size(&self) -> CanvasSize {
        CanvasSize::new(self.canvas_width, self.canvas_height)
    }

    pub fn router(&self) -> Router {
        Router::new(self.route_policy, self.elbow_standoff)
    }
}
