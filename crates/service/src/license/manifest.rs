use models::EntityKind;

use crate::feature::Feature;

/// Static description of a feature module: what it persists, what it needs,
/// what it hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleManifest {
    pub name: &'static str,
    pub entities: &'static [EntityKind],
    pub imports: &'static [Feature],
    pub exports: &'static [Feature],
}

impl ModuleManifest {
    pub fn registers(&self, kind: EntityKind) -> bool {
        self.entities.contains(&kind)
    }

    pub fn imports_feature(&self, feature: Feature) -> bool {
        self.imports.contains(&feature)
    }
}

pub const LICENSE_MANIFEST: ModuleManifest = ModuleManifest {
    name: "license",
    entities: &[
        EntityKind::Student,
        EntityKind::PreRegistration,
        EntityKind::LicenseFile,
        EntityKind::ApplicantFile,
        EntityKind::License,
    ],
    imports: &[
        Feature::Exam,
        Feature::DrivingTest,
        Feature::DrivingSchool,
        Feature::Payment,
        Feature::Users,
        Feature::Auth,
    ],
    exports: &[Feature::License],
};
