// Analysis pipeline: orchestration plus the response boundary.

pub mod analyze;
pub mod response;
