// src/lib.rs

//! dongne: marketplace neighborhood resolution
//!
//! Resolves the device position into a neighborhood ("dong") through a
//! fallback chain of reverse geocoders, suggests nearby neighborhoods from a
//! static adjacency table and persists the selection.

pub mod error;
pub mod models;
pub mod neighborhoods;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

pub use error::{AppError, Result};
pub use models::{Config, Coordinates, ResolvedAddress, SelectedLocation};
pub use neighborhoods::nearby_neighborhoods;
pub use pipeline::LocationResolver;
pub use storage::SelectionStore;
