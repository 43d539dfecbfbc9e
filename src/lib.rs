//! Workspace placeholder crate.
//!
//! This crate exposes feature flags that map to the individual workspace
//! crates (`core-service`, `core-api`). Hosts can depend on `folio-workspace`
//! and enable the documented features without wiring each crate individually.

#[cfg(feature = "desktop-shims")]
pub use core_service;

#[cfg(feature = "server")]
pub use core_api;
