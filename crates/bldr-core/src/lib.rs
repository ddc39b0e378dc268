//! Shared text/naming helpers used across bldr crates.
//!
//! Generated method names are assembled from Java property names
//! (`with` + `Items`, `addTo` + `Items`, `buildFirst` + `Item`, ...), so
//! everything here is deterministic string manipulation. Nothing in this
//! crate affects generation semantics, only the names in the emitted model.

mod naming;

pub use naming::{capitalize_first, decapitalize, singularize};
