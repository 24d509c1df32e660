pub mod dispatcher;
pub mod events;
pub mod planner;

pub use dispatcher::MirrorAgent;
pub use events::{Event, EventKind};
pub use planner::{Plan, plan};
