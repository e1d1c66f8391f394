//! Facility identity: the fixed set of loadable facilities, their
//! allow-listed operations, and their wrapping policies.

use std::fmt;
use std::sync::Arc;

use super::policy::WrapPolicy;

/// The facilities the registry knows how to load.
///
/// The string form is the facility name as written in an import directive
/// (`redexternal time;`). Facilities outside this enum cannot be loaded.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum FacilityKind {
    Requests,
    Json,
    Time,
    Datetime,
    Random,
    Urllib,
    Base64,
    Hashlib,
    // loadable but not in the wrapper table: raw handle only
    Os,
    Math,
}

impl FacilityKind {
    /// The error-normalization policy applied to this facility's wrappers.
    pub fn policy(self) -> WrapPolicy {
        match self {
            FacilityKind::Requests => WrapPolicy::Network,
            FacilityKind::Json => WrapPolicy::StructuredData,
            FacilityKind::Time | FacilityKind::Random => WrapPolicy::Passthrough,
            _ => WrapPolicy::Generic,
        }
    }

    /// Allow-listed bare function names, in publication order. Facilities
    /// absent from the wrapper table expose no generated wrappers.
    pub fn function_names(self) -> &'static [&'static str] {
        match self {
            FacilityKind::Requests => {
                &["get", "post", "put", "delete", "patch", "head", "options"]
            }
            FacilityKind::Json => &["loads", "dumps", "load", "dump"],
            FacilityKind::Time => &["sleep", "time", "strftime", "strptime"],
            FacilityKind::Datetime => &["now", "today", "strftime", "strptime"],
            FacilityKind::Random => &["randint", "choice", "shuffle", "random"],
            FacilityKind::Urllib => &["urlopen", "urlretrieve"],
            FacilityKind::Base64 => &["b64encode", "b64decode"],
            FacilityKind::Hashlib => &["md5", "sha1", "sha256"],
            FacilityKind::Os | FacilityKind::Math => &[],
        }
    }
}

/// Opaque, shared reference to a loaded facility.
///
/// The registry creates exactly one handle per facility per run; repeated
/// imports observe the same instance.
#[derive(Clone)]
pub struct FacilityHandle(Arc<FacilityKind>);

impl FacilityHandle {
    pub(crate) fn new(kind: FacilityKind) -> Self {
        Self(Arc::new(kind))
    }

    pub fn kind(&self) -> FacilityKind {
        *self.0
    }

    pub fn name(&self) -> &'static str {
        self.kind().into()
    }

    /// True when both handles refer to the same loaded instance.
    pub fn same_instance(&self, other: &FacilityHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for FacilityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<facility {}>", self.name())
    }
}

impl PartialEq for FacilityHandle {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
    }
}
