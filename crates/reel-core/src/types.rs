use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel value meaning "no preference for this slot".
///
/// Stripped from the constraint set before any adapter query.
pub const DONTCARE: &str = "dontcare";

// =============================================================================
// Slots
// =============================================================================

/// The slots of the movie domain.
///
/// `Id` is the primary key: once it holds a value, exactly one entity is
/// pinned. `LookingForSpecific` is a dialog-control slot (never sent to the
/// adapter) and `MatchCount` only ever appears in decisions, carrying the
/// total alongside a capped candidate list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Id,
    Title,
    Overview,
    Genres,
    Cast,
    ReleaseYear,
    Rating,
    LookingForSpecific,
    MatchCount,
}

impl Slot {
    /// The slot used to pin exactly one selected entity.
    pub const PRIMARY_KEY: Slot = Slot::Id;

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Id => "id",
            Slot::Title => "title",
            Slot::Overview => "overview",
            Slot::Genres => "genres",
            Slot::Cast => "cast",
            Slot::ReleaseYear => "release_year",
            Slot::Rating => "rating",
            Slot::LookingForSpecific => "looking_for_specific",
            Slot::MatchCount => "match_count",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-slot candidate values with confidences.
pub type SlotConfidences = BTreeMap<String, f32>;

/// Accumulated user constraints: slot -> value -> confidence.
pub type Informs = BTreeMap<Slot, SlotConfidences>;

// =============================================================================
// User signals
// =============================================================================

/// The kind of a structured per-turn user signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Inform,
    NegativeInform,
    Request,
    RequestAlternatives,
    Affirm,
    Deny,
    Bye,
    Thanks,
    Hello,
    Help,
    Bad,
    DomainSwitch,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalKind::Inform => "inform",
            SignalKind::NegativeInform => "negative_inform",
            SignalKind::Request => "request",
            SignalKind::RequestAlternatives => "request_alternatives",
            SignalKind::Affirm => "affirm",
            SignalKind::Deny => "deny",
            SignalKind::Bye => "bye",
            SignalKind::Thanks => "thanks",
            SignalKind::Hello => "hello",
            SignalKind::Help => "help",
            SignalKind::Bad => "bad",
            SignalKind::DomainSwitch => "domain_switch",
        };
        f.write_str(s)
    }
}

/// One structured user signal, produced by an external NLU and consumed
/// read-only by the tracker and policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserSignal {
    pub kind: SignalKind,
    pub slot: Option<Slot>,
    pub value: Option<String>,
    pub confidence: f32,
}

impl UserSignal {
    fn bare(kind: SignalKind) -> Self {
        Self {
            kind,
            slot: None,
            value: None,
            confidence: 1.0,
        }
    }

    /// The user states `slot = value`.
    pub fn inform(slot: Slot, value: impl Into<String>) -> Self {
        Self {
            kind: SignalKind::Inform,
            slot: Some(slot),
            value: Some(value.into()),
            confidence: 1.0,
        }
    }

    /// The user rules out `slot = value`.
    pub fn negative_inform(slot: Slot, value: impl Into<String>) -> Self {
        Self {
            kind: SignalKind::NegativeInform,
            slot: Some(slot),
            value: Some(value.into()),
            confidence: 1.0,
        }
    }

    /// The user asks about a field of the entity under discussion.
    pub fn request(slot: Slot) -> Self {
        Self {
            kind: SignalKind::Request,
            slot: Some(slot),
            value: None,
            confidence: 1.0,
        }
    }

    /// The user signals indifference toward a slot (or the slot the system
    /// just asked about, when `slot` is `None`).
    pub fn dontcare(slot: Option<Slot>) -> Self {
        Self {
            kind: SignalKind::Inform,
            slot,
            value: Some(DONTCARE.to_string()),
            confidence: 1.0,
        }
    }

    pub fn request_alternatives() -> Self {
        Self::bare(SignalKind::RequestAlternatives)
    }

    pub fn affirm() -> Self {
        Self::bare(SignalKind::Affirm)
    }

    pub fn deny() -> Self {
        Self::bare(SignalKind::Deny)
    }

    pub fn bye() -> Self {
        Self::bare(SignalKind::Bye)
    }

    pub fn thanks() -> Self {
        Self::bare(SignalKind::Thanks)
    }

    pub fn hello() -> Self {
        Self::bare(SignalKind::Hello)
    }

    pub fn help() -> Self {
        Self::bare(SignalKind::Help)
    }

    pub fn bad() -> Self {
        Self::bare(SignalKind::Bad)
    }

    pub fn domain_switch() -> Self {
        Self::bare(SignalKind::DomainSwitch)
    }

    /// Replace the default confidence of 1.0.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }
}

// =============================================================================
// System decisions
// =============================================================================

/// The kind of a per-turn system decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Welcome,
    Bad,
    Bye,
    Help,
    RequestMore,
    Request,
    Confirm,
    InformByName,
    InformByAlternatives,
    ShowRecommendation,
    NothingFound,
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DecisionKind::Welcome => "welcome",
            DecisionKind::Bad => "bad",
            DecisionKind::Bye => "bye",
            DecisionKind::Help => "help",
            DecisionKind::RequestMore => "request_more",
            DecisionKind::Request => "request",
            DecisionKind::Confirm => "confirm",
            DecisionKind::InformByName => "inform_by_name",
            DecisionKind::InformByAlternatives => "inform_by_alternatives",
            DecisionKind::ShowRecommendation => "show_recommendation",
            DecisionKind::NothingFound => "nothing_found",
        };
        f.write_str(s)
    }
}

/// Exactly one system decision is produced per turn; the external renderer
/// turns it into text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemDecision {
    pub kind: DecisionKind,
    /// Slot -> ordered list of values. Order is meaningful for candidate
    /// lists: titles and ids are kept aligned by position.
    pub slot_values: BTreeMap<Slot, Vec<String>>,
}

impl SystemDecision {
    pub fn new(kind: DecisionKind) -> Self {
        Self {
            kind,
            slot_values: BTreeMap::new(),
        }
    }

    /// Append a value to a slot, preserving insertion order.
    pub fn add_value(&mut self, slot: Slot, value: impl Into<String>) {
        self.slot_values.entry(slot).or_default().push(value.into());
    }

    /// Mention a slot without a value (e.g. a `Request` for that slot, or a
    /// field-scoped `NothingFound`).
    pub fn add_slot(&mut self, slot: Slot) {
        self.slot_values.entry(slot).or_default();
    }

    /// Builder-style variant of [`add_value`](Self::add_value).
    pub fn with_value(mut self, slot: Slot, value: impl Into<String>) -> Self {
        self.add_value(slot, value);
        self
    }

    /// Builder-style variant of [`add_slot`](Self::add_slot).
    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.add_slot(slot);
        self
    }

    /// The values stored for a slot, empty if the slot is absent.
    pub fn values(&self, slot: Slot) -> &[String] {
        self.slot_values.get(&slot).map_or(&[], Vec::as_slice)
    }

    pub fn first_value(&self, slot: Slot) -> Option<&str> {
        self.values(slot).first().map(String::as_str)
    }

    /// Whether this decision puts a question to the user that the next turn
    /// may answer.
    pub fn is_question(&self) -> bool {
        matches!(
            self.kind,
            DecisionKind::Request | DecisionKind::Confirm | DecisionKind::RequestMore
        )
    }
}
