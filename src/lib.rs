//! Lazily populated, row/column addressable tree model over a filesystem.
//!
//! [`model::LazyTreeModel`] lists a directory only when a consumer expands
//! it, and asks an injected [`fs::PathProvider`] for every filesystem fact.
//! [`fs::NativeProvider`] reads the local disk; [`fs::MemoryProvider`] is an
//! in-memory store for deterministic use.

pub mod config;
pub mod error;
pub mod fs;
pub mod listing;
pub mod logging;
pub mod model;

pub use fs::{MemoryProvider, NativeProvider, PathProvider};
pub use model::{LazyTreeModel, ModelIndex, ModelOptions, Role};
