// Domain entities
pub mod audit;
pub mod config;
pub mod event;
pub mod event_type;
pub mod presence;

pub use audit::*;
pub use config::*;
pub use event::*;
pub use event_type::*;
pub use presence::*;
