//! The Domain Adapter contract.
//!
//! The policy talks to the entity backend exclusively through
//! [`DomainAdapter`]. The contract is deliberately infallible: an adapter
//! that fails internally must report zero matches, indistinguishable from a
//! legitimately empty result set, so the dialog always continues.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use reel_core::types::{Informs, Slot, SlotConfidences, DONTCARE};

use crate::metadata::SYSTEM_REQUESTABLE;

// =============================================================================
// Entity record
// =============================================================================

/// One movie as returned by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_year: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub rating: Option<String>,
}

impl MovieRecord {
    /// The record's values for a slot, empty if the field is absent or the
    /// slot is not an entity field.
    pub fn field(&self, slot: Slot) -> Vec<String> {
        match slot {
            Slot::Id => vec![self.id.clone()],
            Slot::Title => vec![self.title.clone()],
            Slot::Overview => {
                if self.overview.is_empty() {
                    vec![]
                } else {
                    vec![self.overview.clone()]
                }
            }
            Slot::ReleaseYear => self.release_year.clone().into_iter().collect(),
            Slot::Genres => self.genres.clone(),
            Slot::Cast => self.cast.clone(),
            Slot::Rating => self.rating.clone().into_iter().collect(),
            Slot::LookingForSpecific | Slot::MatchCount => vec![],
        }
    }
}

// =============================================================================
// Constraint set
// =============================================================================

/// The derived, non-persistent view of the informs handed to adapters:
/// `dontcare` values and dialog-control slots are stripped at construction,
/// so adapters never special-case them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Constraints(BTreeMap<Slot, SlotConfidences>);

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the constraint set from accumulated informs.
    pub fn from_informs(informs: &Informs) -> Self {
        let mut map = BTreeMap::new();
        for (&slot, values) in informs {
            if matches!(slot, Slot::LookingForSpecific | Slot::MatchCount) {
                continue;
            }
            let kept: SlotConfidences = values
                .iter()
                .filter(|(value, _)| value.as_str() != DONTCARE)
                .map(|(value, &confidence)| (value.clone(), confidence))
                .collect();
            if !kept.is_empty() {
                map.insert(slot, kept);
            }
        }
        Self(map)
    }

    pub fn insert(&mut self, slot: Slot, value: impl Into<String>, confidence: f32) {
        self.0.entry(slot).or_default().insert(value.into(), confidence);
    }

    pub fn remove(&mut self, slot: Slot) {
        self.0.remove(&slot);
    }

    pub fn contains(&self, slot: Slot) -> bool {
        self.0.contains_key(&slot)
    }

    /// Candidate values for a slot, empty if unconstrained.
    pub fn values(&self, slot: Slot) -> Vec<&str> {
        self.0
            .get(&slot)
            .map(|v| v.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Number of constrained slots.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, &SlotConfidences)> {
        self.0.iter().map(|(&slot, values)| (slot, values))
    }
}

// =============================================================================
// Adapter contract
// =============================================================================

/// Ranked query results plus the total match count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryResult {
    /// Matching records in the backend's ranking order.
    pub results: Vec<MovieRecord>,
    /// Total number of matches (equals `results.len()` unless the backend
    /// truncates).
    pub total: usize,
}

impl QueryResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Cheap count-only summary for belief-state bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchSummary {
    pub num_matches: usize,
    /// Whether the current matches can still be narrowed by asking about
    /// some unconstrained system-requestable slot.
    pub discriminable: bool,
}

/// The entity backend as seen by the dialog core.
///
/// Implementations must never panic or error: internal failures are reported
/// as an empty result set. Constraint sets arrive with `dontcare` already
/// stripped.
pub trait DomainAdapter: Send + Sync {
    /// Ranked entities matching the constraint set, plus the total count.
    fn query(&self, constraints: &Constraints) -> QueryResult;

    /// Count-only consultation used once per turn by the tracker.
    fn summarize(&self, constraints: &Constraints) -> MatchSummary {
        let result = self.query(constraints);
        MatchSummary {
            num_matches: result.total,
            discriminable: discriminable(&result.results, constraints),
        }
    }
}

/// Whether a result set can still be narrowed: true when zero or one match
/// remains, or when some unconstrained system-requestable slot takes at
/// least two distinct values across the matches.
pub fn discriminable(results: &[MovieRecord], constraints: &Constraints) -> bool {
    if results.len() <= 1 {
        return true;
    }
    SYSTEM_REQUESTABLE
        .iter()
        .filter(|&&slot| !constraints.contains(slot))
        .any(|&slot| {
            let mut seen: Vec<String> = Vec::new();
            for record in results {
                for value in record.field(slot) {
                    let lowered = value.to_lowercase();
                    if !seen.contains(&lowered) {
                        seen.push(lowered);
                        if seen.len() > 1 {
                            return true;
                        }
                    }
                }
            }
            false
        })
}
