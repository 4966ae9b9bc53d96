//! Zone classifier — maps a free-text role description to a preparation zone 1–5.
//!
//! The oracle's reply is interpreted here: the first standalone digit 1–5 wins. A reply
//! without one, an oracle error or a timeout all resolve to [`JobZone::FALLBACK`].

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::oracle::{bounded, ClassificationOracle};
use crate::taxonomy::occupations::JobZone;

static ZONE_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([1-5])\b").expect("zone pattern is valid"));

/// How a zone was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneSource {
    Oracle,
    /// Unparsable reply, oracle error or timeout.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneDecision {
    pub zone: JobZone,
    pub source: ZoneSource,
}

/// First standalone digit 1–5 in an oracle reply.
pub fn parse_zone_reply(reply: &str) -> Option<JobZone> {
    ZONE_DIGIT
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u8>().ok())
        .and_then(JobZone::new)
}

#[derive(Clone)]
pub struct ZoneClassifier {
    oracle: Arc<dyn ClassificationOracle>,
    timeout: Duration,
}

impl ZoneClassifier {
    pub fn new(oracle: Arc<dyn ClassificationOracle>, timeout: Duration) -> Self {
        Self { oracle, timeout }
    }

    /// Never fails: every oracle problem becomes the fallback zone.
    pub async fn classify(&self, description: &str) -> ZoneDecision {
        let fallback = ZoneDecision {
            zone: JobZone::FALLBACK,
            source: ZoneSource::Fallback,
        };

        match bounded(self.timeout, self.oracle.classify_zone(description)).await {
            Ok(reply) => match parse_zone_reply(&reply) {
                Some(zone) => {
                    info!("Classified description into zone {zone}");
                    ZoneDecision {
                        zone,
                        source: ZoneSource::Oracle,
                    }
                }
                None => {
                    warn!("Zone reply '{reply}' has no zone digit, using zone {}", fallback.zone);
                    fallback
                }
            },
            Err(e) => {
                warn!("Zone oracle failed, using zone {}: {e}", fallback.zone);
                fallback
            }
        }
    }
}
