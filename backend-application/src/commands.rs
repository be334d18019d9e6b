pub mod event_commands;
pub mod lifecycle_commands;
pub mod prezo_commands;
pub mod suggestion_commands;

pub use lifecycle_commands::{LifecycleJob, WeeklySlot};
