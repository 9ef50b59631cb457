//! Marsgrid - an asynchronous fetch-and-cache pipeline for a Mars rover
//! photo gallery.
//!
//! This crate provides the core that backs a scrolling photo grid: it fetches
//! each remote image exactly once, stores the bytes in a shared cache keyed
//! by the NASA photo id, delivers them to the requesting slot only while that
//! slot is still showing the same photo, and cancels in-flight work for slots
//! that scrolled away.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the gallery service.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = "marsgrid";
