pub mod event_handlers;
pub mod ops_handlers;

pub use event_handlers::*;
pub use ops_handlers::*;

use backend_application::AppError;
use backend_domain::EventId;

fn parse_event_id(raw: &str) -> Result<EventId, AppError> {
    raw.parse()
        .map_err(|err| AppError::InvalidInput(format!("invalid event id '{}': {}", raw, err)))
}
