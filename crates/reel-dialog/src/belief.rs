use std::collections::{BTreeMap, BTreeSet};

use reel_core::{DecisionKind, Informs, SignalKind, Slot, SystemDecision, DONTCARE};
use reel_domain::Constraints;

/// One completed turn: the decision the system made and a snapshot of
/// the informs that were active when it was made.
#[derive(Debug, Clone)]
pub struct DialogTurn {
    pub decision: SystemDecision,
    pub informs: Informs,
}

/// Accumulated belief about what the user wants.
///
/// Informs and requests carry confidence scores keyed by slot; the
/// history records completed turns and is append-only. The decision of
/// the turn in flight sits in `pending_decision` until the next turn
/// begins, so `history.last()` is always the question the user is
/// currently answering.
#[derive(Debug, Clone)]
pub struct BeliefState {
    /// Active constraints: slot -> candidate value -> confidence.
    pub informs: Informs,
    /// Slots the user asked about this turn, with confidence.
    pub requests: BTreeMap<Slot, f32>,
    /// Kinds of signal observed this turn.
    pub signal_kinds: BTreeSet<SignalKind>,
    /// Match count under the current constraints.
    pub num_matches: usize,
    /// Whether an open system-requestable slot can still split the matches.
    pub discriminable: bool,
    history: Vec<DialogTurn>,
    pending_decision: Option<SystemDecision>,
}

impl BeliefState {
    pub fn new() -> Self {
        BeliefState {
            informs: Informs::new(),
            requests: BTreeMap::new(),
            signal_kinds: BTreeSet::new(),
            num_matches: 0,
            discriminable: true,
            history: Vec::new(),
            pending_decision: None,
        }
    }

    // ---- turn lifecycle ----

    /// Archives the previous turn's decision into the history. Called at
    /// the top of every tracker update.
    pub fn begin_turn(&mut self) {
        if let Some(decision) = self.pending_decision.take() {
            self.history.push(DialogTurn {
                decision,
                informs: self.informs.clone(),
            });
        }
    }

    /// Stores the decision just made; it is archived when the next turn
    /// begins.
    pub fn record_decision(&mut self, decision: SystemDecision) {
        self.pending_decision = Some(decision);
    }

    // ---- projections ----

    pub fn history(&self) -> &[DialogTurn] {
        &self.history
    }

    pub fn turn_count(&self) -> usize {
        self.history.len() + usize::from(self.pending_decision.is_some())
    }

    /// True before the system has said anything at all.
    pub fn is_first_turn(&self) -> bool {
        self.history.is_empty() && self.pending_decision.is_none()
    }

    /// The decision of the most recently completed turn.
    pub fn last_decision(&self) -> Option<&SystemDecision> {
        self.history.last().map(|turn| &turn.decision)
    }

    /// The question the user is currently answering, if the last
    /// decision was one.
    pub fn last_question(&self) -> Option<&SystemDecision> {
        self.last_decision().filter(|d| d.is_question())
    }

    /// Primary keys of every record offered singly so far. Candidate
    /// lists do not count: listing three titles is not the same as
    /// putting one in front of the user.
    pub fn shown_ids(&self) -> BTreeSet<String> {
        self.history
            .iter()
            .filter_map(|turn| single_offer_id(&turn.decision))
            .map(str::to_owned)
            .collect()
    }

    /// Primary key of the most recently offered record.
    pub fn last_shown_id(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find_map(|turn| single_offer_id(&turn.decision))
    }

    /// The informs projected down to adapter constraints.
    pub fn constraints(&self) -> Constraints {
        Constraints::from_informs(&self.informs)
    }

    /// Reads the specific-movie control slot: `Some(true)` after an
    /// affirm, `Some(false)` after a deny or dontcare, `None` while the
    /// question is open.
    pub fn looking_for_specific(&self) -> Option<bool> {
        self.informs
            .get(&Slot::LookingForSpecific)
            .and_then(|values| values.keys().next())
            .map(|value| value == "true")
    }

    pub fn set_looking_for_specific(&mut self, value: bool) {
        self.set_inform(Slot::LookingForSpecific, if value { "true" } else { "false" }, 1.0);
    }

    /// Overwrites a slot with a single value, discarding prior candidates.
    pub fn set_inform(&mut self, slot: Slot, value: &str, confidence: f32) {
        let mut values = BTreeMap::new();
        values.insert(value.to_owned(), confidence);
        self.informs.insert(slot, values);
    }

    pub fn has_signal(&self, kind: SignalKind) -> bool {
        self.signal_kinds.contains(&kind)
    }

    /// True when the turn carried exactly this one kind of signal.
    pub fn only_signal(&self, kind: SignalKind) -> bool {
        self.signal_kinds.len() == 1 && self.signal_kinds.contains(&kind)
    }

    /// True when the slot holds only the indifference sentinel.
    pub fn is_dontcare(&self, slot: Slot) -> bool {
        self.informs
            .get(&slot)
            .is_some_and(|values| values.len() == 1 && values.contains_key(DONTCARE))
    }
}

impl Default for BeliefState {
    fn default() -> Self {
        BeliefState::new()
    }
}

/// Decision kinds that put a concrete record in front of the user.
pub fn is_offer(kind: DecisionKind) -> bool {
    matches!(
        kind,
        DecisionKind::InformByName
            | DecisionKind::InformByAlternatives
            | DecisionKind::ShowRecommendation
    )
}

/// The id of an offer decision presenting exactly one record.
fn single_offer_id(decision: &SystemDecision) -> Option<&str> {
    if !is_offer(decision.kind) {
        return None;
    }
    match decision.values(Slot::PRIMARY_KEY) {
        [id] => Some(id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(id: &str) -> SystemDecision {
        SystemDecision::new(DecisionKind::InformByName)
            .with_value(Slot::Id, id)
            .with_value(Slot::Title, "A Movie")
    }

    #[test]
    fn test_first_turn_until_a_decision_lands() {
        let mut state = BeliefState::new();
        assert!(state.is_first_turn());

        state.record_decision(SystemDecision::new(DecisionKind::Welcome));
        assert!(!state.is_first_turn());
        assert_eq!(state.turn_count(), 1);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_begin_turn_archives_pending_decision() {
        let mut state = BeliefState::new();
        state.record_decision(SystemDecision::new(DecisionKind::Welcome));
        state.begin_turn();

        assert_eq!(state.history().len(), 1);
        assert_eq!(
            state.last_decision().unwrap().kind,
            DecisionKind::Welcome
        );
    }

    #[test]
    fn test_last_question_ignores_statements() {
        let mut state = BeliefState::new();
        state.record_decision(offer("744"));
        state.begin_turn();
        assert!(state.last_question().is_none());

        state.record_decision(
            SystemDecision::new(DecisionKind::Request).with_slot(Slot::Genres),
        );
        state.begin_turn();
        assert_eq!(
            state.last_question().unwrap().kind,
            DecisionKind::Request
        );
    }

    #[test]
    fn test_shown_ids_collects_offers_across_turns() {
        let mut state = BeliefState::new();
        state.record_decision(offer("95"));
        state.begin_turn();
        state.record_decision(
            SystemDecision::new(DecisionKind::Request).with_slot(Slot::Cast),
        );
        state.begin_turn();
        state.record_decision(offer("8838"));
        state.begin_turn();

        let shown = state.shown_ids();
        assert!(shown.contains("95"));
        assert!(shown.contains("8838"));
        assert_eq!(shown.len(), 2);
        assert_eq!(state.last_shown_id(), Some("8838"));
    }

    #[test]
    fn test_looking_for_specific_round_trip() {
        let mut state = BeliefState::new();
        assert_eq!(state.looking_for_specific(), None);

        state.set_looking_for_specific(true);
        assert_eq!(state.looking_for_specific(), Some(true));

        state.set_looking_for_specific(false);
        assert_eq!(state.looking_for_specific(), Some(false));
    }

    #[test]
    fn test_constraints_strip_control_slots() {
        let mut state = BeliefState::new();
        state.set_inform(Slot::Genres, "action", 1.0);
        state.set_looking_for_specific(true);
        state.set_inform(Slot::Cast, DONTCARE, 1.0);

        let constraints = state.constraints();
        assert!(constraints.contains(Slot::Genres));
        assert!(!constraints.contains(Slot::LookingForSpecific));
        assert!(!constraints.contains(Slot::Cast));
    }

    #[test]
    fn test_is_dontcare() {
        let mut state = BeliefState::new();
        state.set_inform(Slot::Genres, "action", 1.0);
        assert!(!state.is_dontcare(Slot::Genres));

        state.set_inform(Slot::Genres, DONTCARE, 1.0);
        assert!(state.is_dontcare(Slot::Genres));
    }
}
