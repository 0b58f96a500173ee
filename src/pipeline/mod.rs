//! Pipeline entry points.
//!
//! - `LocationResolver`: position → neighborhood → persisted selection

pub mod resolve;

pub use resolve::LocationResolver;
