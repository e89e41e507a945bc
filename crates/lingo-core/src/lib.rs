//! # lingo-core
//!
//! The translation cache engine: catalog store, bulk load, lookup with
//! fallback and placeholder substitution, and live-update synchronization.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod message;
pub mod miss;
pub mod observers;
pub mod traits;
