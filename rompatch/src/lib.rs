//! rompatch - IPS patching for Pokémon Emerald ROM hacks
//!
//! This library resolves a set of user options against a versioned patch
//! catalog and applies the matching IPS patches to a ROM, in priority
//! order, with cooperative cancellation.
//!
//! ```text
//! TreeListing ──► Catalog ──► resolve(options) ──► Orchestrator ──► patched ROM
//!                                                      │
//!                                          PatchFetcher + IPS codec
//! ```

pub mod buffer;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod format;
pub mod integrity;
pub mod ips;
pub mod logging;
pub mod orchestrator;
pub mod version;

pub use error::{PatcherError, PatcherResult};
