//! Occupation catalog — canonical occupations grouped by preparation zone, plus the zone
//! profiles shown alongside a classification.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::taxonomy::{expect_object, json_kind, read_json_file, DataError};

/// Preparation zone (tier) 1–5: 1 = minimal preparation, 5 = extensive preparation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct JobZone(u8);

impl JobZone {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Used whenever the classification oracle cannot produce a zone.
    pub const FALLBACK: JobZone = JobZone(3);

    pub const ALL: [JobZone; 5] = [JobZone(1), JobZone(2), JobZone(3), JobZone(4), JobZone(5)];

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    fn index(self) -> usize {
        usize::from(self.0 - Self::MIN)
    }
}

impl TryFrom<u8> for JobZone {
    type Error = DataError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| DataError::InvalidZone(value.to_string()))
    }
}

impl From<JobZone> for u8 {
    fn from(zone: JobZone) -> Self {
        zone.0
    }
}

impl fmt::Display for JobZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-readable description of a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneProfile {
    pub zone: JobZone,
    pub name: String,
    pub education: String,
    pub experience: String,
    pub training: String,
    pub examples: String,
}

impl ZoneProfile {
    fn new(
        zone: u8,
        name: &str,
        education: &str,
        experience: &str,
        training: &str,
        examples: &str,
    ) -> Self {
        Self {
            zone: JobZone(zone),
            name: name.to_string(),
            education: education.to_string(),
            experience: experience.to_string(),
            training: training.to_string(),
            examples: examples.to_string(),
        }
    }

    /// The five built-in profiles, in zone order.
    pub fn defaults() -> Vec<ZoneProfile> {
        vec![
            Self::new(
                1,
                "Zone 1: Little or no preparation needed",
                "Secondary education or less",
                "Little or none",
                "A few days to a few months on the job",
                "Waiters, cleaners, loaders, cashiers, security guards, couriers, packers",
            ),
            Self::new(
                2,
                "Zone 2: Some preparation needed",
                "Secondary education required",
                "A few months to one year",
                "3-12 months of training or apprenticeship",
                "Sales clerks, operators, assistants, lab technicians, secretaries, call-centre operators",
            ),
            Self::new(
                3,
                "Zone 3: Medium preparation needed",
                "Vocational school, certificates or an associate degree",
                "1-3 years",
                "1-2 years of vocational training",
                "Electricians, nurses, repair technicians, IT specialists, inspectors, coordinators",
            ),
            Self::new(
                4,
                "Zone 4: Considerable preparation needed",
                "Bachelor's degree required",
                "3-5 years",
                "4+ years of higher education plus ongoing learning",
                "Software developers, data scientists, system administrators, engineers, analysts, accountants",
            ),
            Self::new(
                5,
                "Zone 5: Extensive preparation needed",
                "Graduate or professional degree (MD, JD, PhD)",
                "5+ years",
                "6-12+ years of education plus continuous professional development",
                "Physicians, lawyers, professors, research scientists, architects, psychologists",
            ),
        ]
    }
}

/// A canonical occupation of the external data set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupation {
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Occupations grouped by zone; candidate order within a zone follows the data file.
/// Carries exactly one profile per zone, in zone order.
#[derive(Debug, Clone)]
pub struct OccupationCatalog {
    zones: BTreeMap<JobZone, Vec<Occupation>>,
    profiles: Vec<ZoneProfile>,
}

impl Default for OccupationCatalog {
    fn default() -> Self {
        Self::from_zones(BTreeMap::new())
    }
}

impl OccupationCatalog {
    /// Loads `{"1": [{"code", "title", "description"}], ..., "5": [...]}`.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let value = read_json_file(path)?;
        let catalog = Self::from_value(&value)?;
        info!(
            "Loaded {} occupations across {} zones from {}",
            catalog.len(),
            catalog.zones.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn from_value(value: &Value) -> Result<Self, DataError> {
        let root = expect_object(value, "occupation catalog")?;
        let mut zones = BTreeMap::new();

        for (key, occupations) in root {
            let zone = key
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(JobZone::new)
                .ok_or_else(|| DataError::InvalidZone(key.clone()))?;

            let Value::Array(items) = occupations else {
                return Err(DataError::NotAnObject {
                    context: format!("zone {key} occupations (array)"),
                    found: json_kind(occupations),
                });
            };

            let list: Vec<Occupation> = items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect();
            zones.insert(zone, list);
        }

        Ok(Self::from_zones(zones))
    }

    pub fn from_zones(zones: BTreeMap<JobZone, Vec<Occupation>>) -> Self {
        Self {
            zones,
            profiles: ZoneProfile::defaults(),
        }
    }

    /// Loads a JSON array of zone profiles.
    pub fn load_profiles(path: &Path) -> Result<Vec<ZoneProfile>, DataError> {
        let value = read_json_file(path)?;
        let profiles: Vec<ZoneProfile> =
            serde_json::from_value(value).map_err(|source| DataError::Json {
                path: path.display().to_string(),
                source,
            })?;
        info!("Loaded {} zone profiles from {}", profiles.len(), path.display());
        Ok(profiles)
    }

    /// Replaces the built-in zone profiles. Needs one profile for every zone.
    pub fn with_profiles(mut self, mut profiles: Vec<ZoneProfile>) -> Result<Self, DataError> {
        profiles.sort_by_key(|p| p.zone);
        let zones: Vec<JobZone> = profiles.iter().map(|p| p.zone).collect();
        if zones != JobZone::ALL {
            return Err(DataError::IncompleteZoneProfiles(
                zones.iter().map(ToString::to_string).collect::<Vec<_>>().join(","),
            ));
        }
        self.profiles = profiles;
        Ok(self)
    }

    pub fn profile(&self, zone: JobZone) -> &ZoneProfile {
        &self.profiles[zone.index()]
    }

    pub fn profiles(&self) -> &[ZoneProfile] {
        &self.profiles
    }

    /// Candidate occupations for a zone; empty when the zone has none.
    pub fn candidates(&self, zone: JobZone) -> &[Occupation] {
        self.zones.get(&zone).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find_by_code(&self, code: &str) -> Option<(JobZone, &Occupation)> {
        self.zones.iter().find_map(|(zone, list)| {
            list.iter()
                .find(|o| o.code == code)
                .map(|occupation| (*zone, occupation))
        })
    }

    pub fn len(&self) -> usize {
        self.zones.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_zone_bounds() {
        assert!(JobZone::new(0).is_none());
        assert!(JobZone::new(6).is_none());
        assert_eq!(JobZone::new(4).unwrap().get(), 4);
        assert_eq!(JobZone::FALLBACK.get(), 3);
    }

    #[test]
    fn test_job_zone_serde_rejects_out_of_range() {
        assert_eq!(serde_json::from_str::<JobZone>("2").unwrap().get(), 2);
        assert!(serde_json::from_str::<JobZone>("9").is_err());
        assert_eq!(serde_json::to_string(&JobZone::new(5).unwrap()).unwrap(), "5");
    }

    #[test]
    fn test_every_zone_has_a_profile() {
        let catalog = OccupationCatalog::default();
        for zone in JobZone::ALL {
            assert_eq!(catalog.profile(zone).zone, zone);
        }
        assert_eq!(catalog.profiles().len(), 5);
    }

    #[test]
    fn test_injected_profiles_replace_the_defaults() {
        let mut profiles = ZoneProfile::defaults();
        profiles.reverse();
        profiles[0].name = "Zone 5: Doctorate".to_string();

        let catalog = OccupationCatalog::default().with_profiles(profiles).unwrap();
        assert_eq!(catalog.profile(JobZone::new(5).unwrap()).name, "Zone 5: Doctorate");
        assert_eq!(catalog.profiles()[0].zone.get(), 1);
    }

    #[test]
    fn test_load_profiles_from_file() {
        use std::io::Write;

        let mut profiles = ZoneProfile::defaults();
        profiles[2].examples = "Welders".to_string();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&profiles).unwrap()).unwrap();

        let loaded = OccupationCatalog::load_profiles(file.path()).unwrap();
        let catalog = OccupationCatalog::default().with_profiles(loaded).unwrap();
        assert_eq!(catalog.profile(JobZone::FALLBACK).examples, "Welders");
    }

    #[test]
    fn test_profiles_must_cover_every_zone() {
        let mut profiles = ZoneProfile::defaults();
        profiles.pop();
        let err = OccupationCatalog::default().with_profiles(profiles).unwrap_err();
        assert!(matches!(err, DataError::IncompleteZoneProfiles(z) if z == "1,2,3,4"));
    }

    #[test]
    fn test_catalog_from_value_keeps_candidate_order() {
        let catalog = OccupationCatalog::from_value(&json!({
            "4": [
                {"code": "15-1252.00", "title": "Software Developers", "description": "Research, design, and develop software."},
                {"code": "15-1211.00", "title": "Computer Systems Analysts"}
            ],
            "1": [{"code": "35-3031.00", "title": "Waiters and Waitresses", "description": ""}]
        }))
        .unwrap();

        let zone4 = catalog.candidates(JobZone::new(4).unwrap());
        assert_eq!(zone4.len(), 2);
        assert_eq!(zone4[0].title, "Software Developers");
        assert!(catalog.candidates(JobZone::new(5).unwrap()).is_empty());
        assert_eq!(catalog.len(), 3);

        let (zone, occupation) = catalog.find_by_code("35-3031.00").unwrap();
        assert_eq!(zone.get(), 1);
        assert_eq!(occupation.title, "Waiters and Waitresses");
    }

    #[test]
    fn test_catalog_rejects_bad_zone_key() {
        let err = OccupationCatalog::from_value(&json!({"7": []})).unwrap_err();
        assert!(matches!(err, DataError::InvalidZone(k) if k == "7"));
    }
}
