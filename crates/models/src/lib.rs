//! Persistence-side vocabulary: the database handle and the names of the
//! entity kinds feature modules register for.

pub mod db;
pub mod entities;

pub use entities::EntityKind;
