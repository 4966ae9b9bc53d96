//! Classification — description → preparation zone → canonical occupation.

pub mod classifier;
pub mod handlers;
pub mod selector;

use serde::Serialize;

pub use classifier::{parse_zone_reply, ZoneClassifier, ZoneDecision, ZoneSource};
pub use selector::{resolve_reply, TitleResolution, TitleSelection, TitleSelector};

use crate::taxonomy::occupations::ZoneProfile;

/// Zone decision, its profile and the occupation picked within the zone.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub zone: ZoneDecision,
    pub profile: ZoneProfile,
    /// `None` when the zone has no candidate occupations.
    pub selection: Option<TitleSelection>,
}

impl Classification {
    pub fn occupation_code(&self) -> Option<&str> {
        self.selection
            .as_ref()
            .map(|s| s.occupation.code.as_str())
    }
}
