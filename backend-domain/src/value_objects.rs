// Domain value objects
pub mod attendance;
pub mod event_status;
pub mod identifiers;

pub use attendance::*;
pub use event_status::*;
pub use identifiers::*;
