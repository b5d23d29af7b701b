//! License feature composition.
//!
//! The module is wired explicitly: callers hand the builder a persistence
//! handle and one exported service per sibling feature, and `build()` either
//! yields a [`LicenseModule`] exporting [`LicenseService`] or fails naming the
//! first missing piece.

pub mod manifest;
pub mod module;
pub mod service;
pub mod store;

pub use manifest::{ModuleManifest, LICENSE_MANIFEST};
pub use module::{CompositionError, LicenseModule, LicenseModuleBuilder};
pub use service::{LicenseDependencies, LicenseService};
pub use store::EntityStore;
