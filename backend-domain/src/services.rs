// Pure domain services
pub mod ranker;
pub mod rotation;

pub use ranker::*;
pub use rotation::*;
