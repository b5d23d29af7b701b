use models::EntityKind;
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;

/// Database access scoped to the entity kinds a module registered.
#[derive(Clone, Debug)]
pub struct EntityStore {
    db: DatabaseConnection,
    registered: &'static [EntityKind],
}

impl EntityStore {
    pub fn for_feature(db: DatabaseConnection, registered: &'static [EntityKind]) -> Self {
        Self { db, registered }
    }

    pub fn registered(&self) -> &'static [EntityKind] { self.registered }

    /// The connection, if `kind` is one of the registered entities.
    pub fn connection(&self, kind: EntityKind) -> Result<&DatabaseConnection, ServiceError> {
        if self.registered.contains(&kind) {
            Ok(&self.db)
        } else {
            Err(ServiceError::Persistence(format!("entity {kind} is not registered for this module")))
        }
    }
}
