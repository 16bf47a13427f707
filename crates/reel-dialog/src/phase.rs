use std::fmt;

use reel_core::{DecisionKind, SignalKind};

use crate::belief::BeliefState;

/// Where the conversation currently stands.
///
/// The phase is derived from the belief state at the start of every
/// policy run rather than stored, so it can never drift out of sync
/// with the informs and history that define it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogPhase {
    /// Nothing has happened yet.
    Start,
    /// Gathering constraints toward a small candidate set.
    Collecting,
    /// Several candidates match and an open slot could split them.
    Disambiguating,
    /// A yes/no question from the system is being answered.
    Confirming,
    /// The user wants a suggestion rather than a specific title.
    Offering,
    /// The user rejected an offer and wants something else.
    BrowsingAlternatives,
    /// The user asked about a field of the entity under discussion.
    Answering,
    /// The user said goodbye.
    Ended,
}

impl DialogPhase {
    /// Derives the phase for the turn in flight. Precedence runs from
    /// terminal signals down to the collecting/disambiguating default.
    pub fn derive(state: &BeliefState) -> DialogPhase {
        if state.has_signal(SignalKind::Bye) {
            return DialogPhase::Ended;
        }
        if state.is_first_turn() && state.signal_kinds.is_empty() {
            return DialogPhase::Start;
        }
        let answering_question = state
            .last_question()
            .is_some_and(|q| matches!(q.kind, DecisionKind::Confirm | DecisionKind::RequestMore));
        if answering_question
            && (state.has_signal(SignalKind::Affirm) || state.has_signal(SignalKind::Deny))
        {
            return DialogPhase::Confirming;
        }
        if state.has_signal(SignalKind::Request) {
            return DialogPhase::Answering;
        }
        if state.has_signal(SignalKind::RequestAlternatives) {
            return DialogPhase::BrowsingAlternatives;
        }
        if state.looking_for_specific() == Some(false) {
            return DialogPhase::Offering;
        }
        if state.num_matches > 1 {
            DialogPhase::Disambiguating
        } else {
            DialogPhase::Collecting
        }
    }
}

impl fmt::Display for DialogPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DialogPhase::Start => "start",
            DialogPhase::Collecting => "collecting",
            DialogPhase::Disambiguating => "disambiguating",
            DialogPhase::Confirming => "confirming",
            DialogPhase::Offering => "offering",
            DialogPhase::BrowsingAlternatives => "browsing_alternatives",
            DialogPhase::Answering => "answering",
            DialogPhase::Ended => "ended",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_core::{Slot, SystemDecision};

    fn state_with_signals(kinds: &[SignalKind]) -> BeliefState {
        let mut state = BeliefState::new();
        state.signal_kinds = kinds.iter().copied().collect();
        state
    }

    #[test]
    fn test_empty_first_turn_is_start() {
        let state = BeliefState::new();
        assert_eq!(DialogPhase::derive(&state), DialogPhase::Start);
    }

    #[test]
    fn test_bye_wins_over_everything() {
        let state = state_with_signals(&[SignalKind::Bye, SignalKind::Request]);
        assert_eq!(DialogPhase::derive(&state), DialogPhase::Ended);
    }

    #[test]
    fn test_request_means_answering() {
        let mut state = state_with_signals(&[SignalKind::Request]);
        state.record_decision(SystemDecision::new(DecisionKind::Welcome));
        state.begin_turn();
        assert_eq!(DialogPhase::derive(&state), DialogPhase::Answering);
    }

    #[test]
    fn test_affirm_on_pending_confirm_is_confirming() {
        let mut state = BeliefState::new();
        state.record_decision(
            SystemDecision::new(DecisionKind::Confirm).with_slot(Slot::LookingForSpecific),
        );
        state.begin_turn();
        state.signal_kinds.insert(SignalKind::Affirm);
        assert_eq!(DialogPhase::derive(&state), DialogPhase::Confirming);
    }

    #[test]
    fn test_affirm_without_pending_question_falls_through() {
        let mut state = BeliefState::new();
        state.record_decision(SystemDecision::new(DecisionKind::Welcome));
        state.begin_turn();
        state.signal_kinds.insert(SignalKind::Affirm);
        assert_eq!(DialogPhase::derive(&state), DialogPhase::Collecting);
    }

    #[test]
    fn test_request_alternatives_is_browsing() {
        let mut state = state_with_signals(&[SignalKind::RequestAlternatives]);
        state.record_decision(SystemDecision::new(DecisionKind::InformByName));
        state.begin_turn();
        assert_eq!(DialogPhase::derive(&state), DialogPhase::BrowsingAlternatives);
    }

    #[test]
    fn test_not_looking_for_specific_is_offering() {
        let mut state = state_with_signals(&[SignalKind::Inform]);
        state.record_decision(SystemDecision::new(DecisionKind::Welcome));
        state.begin_turn();
        state.set_looking_for_specific(false);
        assert_eq!(DialogPhase::derive(&state), DialogPhase::Offering);
    }

    #[test]
    fn test_many_matches_is_disambiguating() {
        let mut state = state_with_signals(&[SignalKind::Inform]);
        state.record_decision(SystemDecision::new(DecisionKind::Welcome));
        state.begin_turn();
        state.num_matches = 5;
        assert_eq!(DialogPhase::derive(&state), DialogPhase::Disambiguating);

        state.num_matches = 1;
        assert_eq!(DialogPhase::derive(&state), DialogPhase::Collecting);
    }
}
