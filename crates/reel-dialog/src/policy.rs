use tracing::debug;

use reel_core::config::PolicyConfig;
use reel_core::{DecisionKind, SignalKind, Slot, SystemDecision, DONTCARE};
use reel_domain::{
    first_unfilled_system_slot, Constraints, DomainAdapter, MovieRecord, QueryResult,
    RECORD_SLOTS,
};

use crate::belief::BeliefState;
use crate::phase::DialogPhase;

/// Chooses one system decision per turn from the belief state.
///
/// The decision procedure is ordered: generic signals short-circuit,
/// then a pending yes/no question is resolved, then indifference to the
/// slot just asked about is folded in, and only then does the phase
/// route to a handler. Handlers may write back to the belief state
/// (resolving the specific/suggestion question, un-pinning a rejected
/// entity) but every turn still ends in exactly one decision.
pub struct DialogPolicy {
    config: PolicyConfig,
}

impl DialogPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        DialogPolicy { config }
    }

    pub fn choose(&self, state: &mut BeliefState, adapter: &dyn DomainAdapter) -> SystemDecision {
        if let Some(decision) = self.generic_guard(state) {
            return decision;
        }
        if let Some(decision) = self.resolve_pending_question(state) {
            return decision;
        }
        self.apply_indifference(state);

        let phase = DialogPhase::derive(state);
        debug!(%phase, num_matches = state.num_matches, "phase derived");

        match phase {
            DialogPhase::Start => SystemDecision::new(DecisionKind::Welcome),
            DialogPhase::Ended => SystemDecision::new(DecisionKind::Bye),
            DialogPhase::Answering => self.answer_request(state, adapter),
            DialogPhase::BrowsingAlternatives => self.browse_alternatives(state, adapter),
            DialogPhase::Confirming => {
                // The yes/no question was folded into the control slot
                // above; route on the answer.
                if state.looking_for_specific() == Some(false) {
                    self.recommend(state, adapter)
                } else {
                    self.find_specific(state, adapter)
                }
            }
            DialogPhase::Offering => self.recommend(state, adapter),
            DialogPhase::Collecting | DialogPhase::Disambiguating => {
                self.find_specific(state, adapter)
            }
        }
    }

    // ---- step 1: generic signals ----

    fn generic_guard(&self, state: &BeliefState) -> Option<SystemDecision> {
        if state.is_first_turn() && state.signal_kinds.is_empty() {
            return Some(SystemDecision::new(DecisionKind::Welcome));
        }
        if state.has_signal(SignalKind::Bad) {
            return Some(SystemDecision::new(DecisionKind::Bad));
        }
        if state.has_signal(SignalKind::Bye) {
            return Some(SystemDecision::new(DecisionKind::Bye));
        }
        if state.only_signal(SignalKind::Thanks) {
            return Some(SystemDecision::new(DecisionKind::RequestMore));
        }
        if state.only_signal(SignalKind::Hello) || state.only_signal(SignalKind::Help) {
            return Some(SystemDecision::new(DecisionKind::Help));
        }
        None
    }

    // ---- step 2: pending yes/no question ----

    fn resolve_pending_question(&self, state: &mut BeliefState) -> Option<SystemDecision> {
        let pending = state.last_question()?.clone();
        match pending.kind {
            DecisionKind::RequestMore => {
                if state.has_signal(SignalKind::Deny) {
                    return Some(SystemDecision::new(DecisionKind::Bye));
                }
                if state.only_signal(SignalKind::Affirm) {
                    // "Yes, something else" with no content yet: start over.
                    return Some(SystemDecision::new(DecisionKind::Welcome));
                }
                None
            }
            DecisionKind::Confirm
                if pending.slot_values.contains_key(&Slot::LookingForSpecific) =>
            {
                if state.has_signal(SignalKind::Deny) {
                    state.set_looking_for_specific(false);
                    None
                } else if state.has_signal(SignalKind::Affirm) {
                    state.set_looking_for_specific(true);
                    None
                } else if self.has_content_signal(state) {
                    // The user ignored the question and kept constraining;
                    // leave it open and handle the new content.
                    None
                } else {
                    Some(SystemDecision::new(DecisionKind::Bad))
                }
            }
            _ => None,
        }
    }

    fn has_content_signal(&self, state: &BeliefState) -> bool {
        [
            SignalKind::Inform,
            SignalKind::NegativeInform,
            SignalKind::Request,
            SignalKind::RequestAlternatives,
        ]
        .iter()
        .any(|&kind| state.has_signal(kind))
    }

    // ---- step 3: indifference toward the slot just asked about ----

    fn apply_indifference(&self, state: &mut BeliefState) {
        let requested = state
            .last_question()
            .filter(|q| q.kind == DecisionKind::Request)
            .and_then(|q| q.slot_values.keys().next().copied());
        if let Some(slot) = requested {
            let indifferent = state
                .informs
                .get(&slot)
                .is_some_and(|values| values.contains_key(DONTCARE));
            if indifferent {
                // Collapse the slot to the sentinel and stop treating the
                // dialog as a hunt for one specific title.
                state.set_inform(slot, DONTCARE, 1.0);
                state.set_looking_for_specific(false);
                debug!(%slot, "user is indifferent to requested slot");
            }
        }
    }

    // ---- step 4a: answer a field request ----

    fn answer_request(&self, state: &BeliefState, adapter: &dyn DomainAdapter) -> SystemDecision {
        let mut constraints = state.constraints();
        if !constraints.contains(Slot::PRIMARY_KEY) {
            if let Some(id) = state.last_shown_id() {
                constraints.insert(Slot::PRIMARY_KEY, id, 1.0);
            }
        }

        let result = adapter.query(&constraints);
        match result.total {
            0 => SystemDecision::new(DecisionKind::NothingFound),
            1 => self.answer_from_record(state, &result.results[0]),
            n if n <= self.config.max_list_size => self.short_list(&result),
            _ => self.narrow_or_list(state, &result),
        }
    }

    fn answer_from_record(&self, state: &BeliefState, record: &MovieRecord) -> SystemDecision {
        let mut decision = SystemDecision::new(DecisionKind::InformByName);
        let mut answered = false;
        for &slot in state.requests.keys() {
            let values = record.field(slot);
            if values.is_empty() {
                continue;
            }
            answered = true;
            for value in values {
                decision.add_value(slot, value);
            }
        }
        if !answered {
            // The record exists but carries nothing for the requested
            // fields.
            let mut decision = SystemDecision::new(DecisionKind::NothingFound);
            for &slot in state.requests.keys() {
                decision.add_slot(slot);
            }
            return decision;
        }
        if !decision.slot_values.contains_key(&Slot::PRIMARY_KEY) {
            decision.add_value(Slot::PRIMARY_KEY, &record.id);
        }
        decision
    }

    // ---- step 4b: the user rejected an offer ----

    fn browse_alternatives(
        &self,
        state: &mut BeliefState,
        adapter: &dyn DomainAdapter,
    ) -> SystemDecision {
        state.informs.remove(&Slot::PRIMARY_KEY);
        state.set_looking_for_specific(false);

        let constraints = state.constraints();
        if constraints.len() < self.config.min_constraints {
            // Too little to go on for a meaningful "something else".
            return SystemDecision::new(DecisionKind::Bad);
        }

        let shown = state.shown_ids();
        let result = adapter.query(&constraints);
        for record in &result.results {
            if !shown.contains(&record.id) {
                return self.full_record(DecisionKind::InformByAlternatives, record);
            }
        }
        SystemDecision::new(DecisionKind::NothingFound)
    }

    // ---- step 4c: suggest something ----

    fn recommend(&self, state: &BeliefState, adapter: &dyn DomainAdapter) -> SystemDecision {
        let result = adapter.query(&state.constraints());
        match result.results.first() {
            Some(record) => self.full_record(DecisionKind::ShowRecommendation, record),
            None => SystemDecision::new(DecisionKind::NothingFound),
        }
    }

    // ---- step 4d: hunt for one specific title ----

    fn find_specific(&self, state: &BeliefState, adapter: &dyn DomainAdapter) -> SystemDecision {
        let constraints = state.constraints();
        let result = adapter.query(&constraints);
        match result.total {
            0 => SystemDecision::new(DecisionKind::NothingFound),
            1 => self.full_record(DecisionKind::InformByName, &result.results[0]),
            n if n <= self.config.max_list_size => self.short_list(&result),
            _ => {
                let sparse = constraints.len() < self.config.min_constraints;
                if sparse && state.looking_for_specific().is_none() {
                    self.confirm_specific(&constraints)
                } else {
                    self.narrow_or_list(state, &result)
                }
            }
        }
    }

    /// Asks whether the user wants one particular title or just a
    /// suggestion, echoing the constraints gathered so far.
    fn confirm_specific(&self, constraints: &Constraints) -> SystemDecision {
        let mut decision =
            SystemDecision::new(DecisionKind::Confirm).with_slot(Slot::LookingForSpecific);
        for (slot, values) in constraints.iter() {
            for value in values.keys() {
                decision.add_value(slot, value);
            }
        }
        decision
    }

    /// Too many matches: ask for the first open system-requestable slot
    /// if that can still split the set, otherwise show a capped list.
    fn narrow_or_list(&self, state: &BeliefState, result: &QueryResult) -> SystemDecision {
        if state.discriminable {
            if let Some(slot) = first_unfilled_system_slot(&state.informs) {
                return SystemDecision::new(DecisionKind::Request).with_slot(slot);
            }
        }
        self.capped_list(result)
    }

    // ---- decision builders ----

    fn full_record(&self, kind: DecisionKind, record: &MovieRecord) -> SystemDecision {
        let mut decision = SystemDecision::new(kind);
        for &slot in RECORD_SLOTS {
            for value in record.field(slot) {
                decision.add_value(slot, value);
            }
        }
        decision
    }

    fn short_list(&self, result: &QueryResult) -> SystemDecision {
        let mut decision = SystemDecision::new(DecisionKind::InformByAlternatives);
        for record in &result.results {
            decision.add_value(Slot::Title, &record.title);
            decision.add_value(Slot::PRIMARY_KEY, &record.id);
        }
        decision
    }

    fn capped_list(&self, result: &QueryResult) -> SystemDecision {
        let mut decision = SystemDecision::new(DecisionKind::InformByAlternatives);
        for record in result.results.iter().take(self.config.max_list_size) {
            decision.add_value(Slot::Title, &record.title);
            decision.add_value(Slot::PRIMARY_KEY, &record.id);
        }
        decision.add_value(Slot::MatchCount, result.total.to_string());
        decision
    }
}
