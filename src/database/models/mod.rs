pub mod attendance;
pub(crate) mod macros;
pub mod report;
pub mod user;

// Re-export all models for easy importing
pub use attendance::*;
pub use report::*;
pub use user::*;
