//! Feature identities and the handle a feature exports to its importers.

use std::fmt;

use crate::upstream::Upstream;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Exam,
    DrivingTest,
    DrivingSchool,
    Payment,
    Users,
    Auth,
    License,
}

impl Feature {
    pub fn name(&self) -> &'static str {
        match self {
            Feature::Exam => "exam",
            Feature::DrivingTest => "driving-test",
            Feature::DrivingSchool => "driving-school",
            Feature::Payment => "payment",
            Feature::Users => "users",
            Feature::Auth => "auth",
            Feature::License => "license",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A service exported by a feature module. Importers receive it as
/// `Arc<dyn FeatureService>` and slot it by [`FeatureService::feature`].
pub trait FeatureService: Send + Sync {
    fn feature(&self) -> Feature;

    /// Where the service is reached, if it lives outside this process.
    fn location(&self) -> Option<&str> {
        None
    }
}

/// A sibling feature service living behind an HTTP upstream.
#[derive(Clone, Debug)]
pub struct RemoteFeature {
    feature: Feature,
    upstream: Upstream,
}

impl RemoteFeature {
    pub fn new(feature: Feature, upstream: Upstream) -> Self { Self { feature, upstream } }
}

impl FeatureService for RemoteFeature {
    fn feature(&self) -> Feature { self.feature }

    fn location(&self) -> Option<&str> {
        Some(self.upstream.base_url())
    }
}
