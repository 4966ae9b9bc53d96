//! Title selector — picks one canonical occupation from a zone's candidates.
//!
//! Resolution order for the oracle's reply:
//! 1. exact title match on the trimmed reply
//! 2. case-insensitive containment in either direction (first candidate in list order)
//! 3. the first candidate
//!
//! Only when the oracle call itself fails or times out is a candidate drawn at random,
//! from an injected seedable RNG.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::oracle::{bounded, ClassificationOracle};
use crate::taxonomy::occupations::{JobZone, Occupation};

/// Which resolution step produced the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleResolution {
    Exact,
    Substring,
    FirstCandidate,
    Random,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleSelection {
    pub occupation: Occupation,
    pub resolution: TitleResolution,
    /// Raw oracle reply; `None` when the oracle failed.
    pub reply: Option<String>,
}

/// Index of the candidate a reply resolves to. `candidates` must not be empty.
pub fn resolve_reply(reply: &str, candidates: &[Occupation]) -> (usize, TitleResolution) {
    let reply = reply.trim();

    if let Some(idx) = candidates.iter().position(|c| c.title == reply) {
        return (idx, TitleResolution::Exact);
    }

    if !reply.is_empty() {
        let reply_lower = reply.to_lowercase();
        let hit = candidates.iter().position(|c| {
            let title_lower = c.title.to_lowercase();
            title_lower.contains(&reply_lower) || reply_lower.contains(&title_lower)
        });
        if let Some(idx) = hit {
            return (idx, TitleResolution::Substring);
        }
    }

    (0, TitleResolution::FirstCandidate)
}

pub struct TitleSelector {
    oracle: Arc<dyn ClassificationOracle>,
    timeout: Duration,
    rng: Mutex<StdRng>,
}

impl TitleSelector {
    /// `seed` fixes the random fallback; `None` seeds from OS entropy.
    pub fn new(oracle: Arc<dyn ClassificationOracle>, timeout: Duration, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            oracle,
            timeout,
            rng: Mutex::new(rng),
        }
    }

    /// `None` only when the zone has no candidates.
    pub async fn select(
        &self,
        zone: JobZone,
        description: &str,
        candidates: &[Occupation],
    ) -> Option<TitleSelection> {
        if candidates.is_empty() {
            warn!("No candidate occupations in zone {zone}");
            return None;
        }

        let titles: Vec<String> = candidates.iter().map(|c| c.title.clone()).collect();

        let selection = match bounded(
            self.timeout,
            self.oracle.select_title(zone, description, &titles),
        )
        .await
        {
            Ok(reply) => {
                let (idx, resolution) = resolve_reply(&reply, candidates);
                TitleSelection {
                    occupation: candidates[idx].clone(),
                    resolution,
                    reply: Some(reply),
                }
            }
            Err(e) => {
                warn!("Title oracle failed, picking a random candidate: {e}");
                let idx = self.random_index(candidates.len());
                TitleSelection {
                    occupation: candidates[idx].clone(),
                    resolution: TitleResolution::Random,
                    reply: None,
                }
            }
        };

        info!(
            "Selected '{}' ({}) in zone {zone} via {:?}",
            selection.occupation.title, selection.occupation.code, selection.resolution
        );
        Some(selection)
    }

    fn random_index(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(0..len)
    }
}
