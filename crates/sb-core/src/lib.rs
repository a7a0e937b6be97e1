pub mod codec;
pub mod config;
pub mod error;
pub mod geometry;
pub mod id;
pub mod lint;
pub mod model;
pub mod routing;
pub mod units;

pub use codec::{from_json, to_json};
pub use config::BoardConfig;
pub use error::{BoardError, Result};
pub use geometry::{Bounds, anchor_position, object_bounds};
pub use id::{LineId, ObjectId, TabId};
pub use lint::{LintDiagnostic, LintSeverity, lint_scenario};
pub use model::*;
pub use routing::{PathCmd, Route, RoutePolicy, Router};
