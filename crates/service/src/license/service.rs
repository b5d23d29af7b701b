use std::sync::Arc;

use crate::feature::{Feature, FeatureService};

use super::store::EntityStore;

/// Services the license feature imports from its siblings.
#[derive(Clone)]
pub struct LicenseDependencies {
    pub exam: Arc<dyn FeatureService>,
    pub driving_test: Arc<dyn FeatureService>,
    pub driving_school: Arc<dyn FeatureService>,
    pub payment: Arc<dyn FeatureService>,
    pub users: Arc<dyn FeatureService>,
    pub auth: Arc<dyn FeatureService>,
}

/// The service the license module exports.
pub struct LicenseService {
    deps: LicenseDependencies,
    store: EntityStore,
}

impl LicenseService {
    pub fn new(deps: LicenseDependencies, store: EntityStore) -> Self {
        Self { deps, store }
    }

    pub fn dependencies(&self) -> &LicenseDependencies { &self.deps }

    pub fn store(&self) -> &EntityStore { &self.store }
}

impl FeatureService for LicenseService {
    fn feature(&self) -> Feature { Feature::License }
}
