//! # lingo-sources
//!
//! Translation source backends for lingo.

pub mod forge;
pub mod json;

pub use forge::ForgeSource;
pub use json::JsonSource;
