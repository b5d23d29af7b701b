use std::collections::HashMap;
use std::sync::Arc;

use sea_orm::DatabaseConnection;
use thiserror::Error;
use tracing::{debug, info};

use crate::feature::{Feature, FeatureService};

use super::manifest::{ModuleManifest, LICENSE_MANIFEST};
use super::service::{LicenseDependencies, LicenseService};
use super::store::EntityStore;

/// Wiring failures. All of them are fatal at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompositionError {
    #[error("module {module} requires feature {feature}, which was not provided")]
    MissingDependency { module: &'static str, feature: Feature },
    #[error("module {module} received feature {feature} more than once")]
    DuplicateImport { module: &'static str, feature: Feature },
    #[error("module {module} does not import feature {feature}")]
    UnexpectedImport { module: &'static str, feature: Feature },
    #[error("module {module} needs a database connection")]
    MissingPersistence { module: &'static str },
}

/// Explicit wiring for the license feature.
#[derive(Default)]
pub struct LicenseModuleBuilder {
    db: Option<DatabaseConnection>,
    imports: HashMap<Feature, Arc<dyn FeatureService>>,
    rejected: Option<CompositionError>,
}

impl LicenseModuleBuilder {
    pub fn persistence(mut self, db: DatabaseConnection) -> Self {
        self.db = Some(db);
        self
    }

    /// Provide a sibling service; it is slotted by the feature it reports.
    pub fn import(mut self, service: Arc<dyn FeatureService>) -> Self {
        let feature = service.feature();
        if self.rejected.is_some() {
            return self;
        }
        if !LICENSE_MANIFEST.imports_feature(feature) {
            self.rejected = Some(CompositionError::UnexpectedImport { module: LICENSE_MANIFEST.name, feature });
        } else if self.imports.insert(feature, service).is_some() {
            self.rejected = Some(CompositionError::DuplicateImport { module: LICENSE_MANIFEST.name, feature });
        }
        self
    }

    pub fn import_all<I>(self, services: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn FeatureService>>,
    {
        services.into_iter().fold(self, |b, s| b.import(s))
    }

    pub fn build(mut self) -> Result<LicenseModule, CompositionError> {
        let module = LICENSE_MANIFEST.name;
        if let Some(err) = self.rejected.take() {
            return Err(err);
        }
        let db = self.db.take().ok_or(CompositionError::MissingPersistence { module })?;
        // Manifest order decides which missing import is reported first.
        for feature in LICENSE_MANIFEST.imports {
            match self.imports.get(feature) {
                Some(service) => {
                    debug!(module, feature = %feature, location = service.location().unwrap_or("in-process"), "import resolved");
                }
                None => return Err(CompositionError::MissingDependency { module, feature: *feature }),
            }
        }
        let mut take = |feature: Feature| {
            self.imports
                .remove(&feature)
                .ok_or(CompositionError::MissingDependency { module, feature })
        };
        let deps = LicenseDependencies {
            exam: take(Feature::Exam)?,
            driving_test: take(Feature::DrivingTest)?,
            driving_school: take(Feature::DrivingSchool)?,
            payment: take(Feature::Payment)?,
            users: take(Feature::Users)?,
            auth: take(Feature::Auth)?,
        };
        let store = EntityStore::for_feature(db, LICENSE_MANIFEST.entities);
        let service = Arc::new(LicenseService::new(deps, store));
        info!(
            module,
            entities = LICENSE_MANIFEST.entities.len(),
            imports = LICENSE_MANIFEST.imports.len(),
            "module composed"
        );
        Ok(LicenseModule { manifest: &LICENSE_MANIFEST, service })
    }
}

/// A composed license feature. Exports exactly one service.
pub struct LicenseModule {
    manifest: &'static ModuleManifest,
    service: Arc<LicenseService>,
}

impl LicenseModule {
    pub fn builder() -> LicenseModuleBuilder {
        LicenseModuleBuilder::default()
    }

    pub fn manifest(&self) -> &'static ModuleManifest { self.manifest }

    /// The exported [`LicenseService`], shareable with importing modules.
    pub fn exports(&self) -> Arc<LicenseService> {
        Arc::clone(&self.service)
    }
}
