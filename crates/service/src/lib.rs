//! Service layer contracts for the licensing backend.
//! - `device`: the delegate contract behind the device routes, plus adapters.
//! - `license`: explicit composition of the license feature and its imports.
//! - `auth`: caller identity, roles and bearer-token handling.

pub mod auth;
pub mod device;
pub mod errors;
pub mod feature;
pub mod license;
pub mod upstream;
