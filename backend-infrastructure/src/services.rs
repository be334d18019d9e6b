pub mod health_service;
pub mod scheduler_service;

pub use health_service::*;
pub use scheduler_service::*;
