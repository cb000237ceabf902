//! Foundation types shared across the expression pipeline.

pub mod span;
pub mod value;

pub use span::Span;
pub use value::Value;
