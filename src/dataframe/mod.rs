// DataFrame implementations module
pub mod base;
pub mod concat;
mod display;
pub mod ops;

// Re-exports for convenience
pub use base::DataFrame;
pub use concat::{concat, Axis, JoinType};
pub use ops::Operand;
