pub mod audit_queries;
pub mod event_queries;
