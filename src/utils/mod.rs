pub mod jwt;
pub mod tracing;
pub mod upload;
pub mod validators;
