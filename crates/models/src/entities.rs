use std::fmt;

use serde::{Deserialize, Serialize};

/// Persisted entity kinds known to the licensing backend.
///
/// Only the names are modelled here; each feature module declares the subset
/// it is allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Student,
    PreRegistration,
    LicenseFile,
    ApplicantFile,
    License,
    Device,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Student,
        EntityKind::PreRegistration,
        EntityKind::LicenseFile,
        EntityKind::ApplicantFile,
        EntityKind::License,
        EntityKind::Device,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Student => "Student",
            EntityKind::PreRegistration => "PreRegistration",
            EntityKind::LicenseFile => "LicenseFile",
            EntityKind::ApplicantFile => "ApplicantFile",
            EntityKind::License => "License",
            EntityKind::Device => "Device",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
