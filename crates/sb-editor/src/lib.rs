pub mod connect;
pub mod dispatch;
pub mod engine;
pub mod input;
pub mod persist;
pub mod shortcuts;
pub mod tabs;

pub use engine::{BoardEngine, RenderSignal};
pub use input::{InputEvent, Modifiers, Viewport};
pub use persist::{ImageTicket, LoadOutcome, LoadTicket};
