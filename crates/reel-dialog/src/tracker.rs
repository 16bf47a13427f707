use std::collections::BTreeSet;

use tracing::debug;

use reel_core::{DecisionKind, SignalKind, Slot, UserSignal, DONTCARE};
use reel_domain::{DomainAdapter, USER_REQUESTABLE};

use crate::belief::BeliefState;

/// Folds the structured signals of one user turn into the belief state.
///
/// The tracker is stateless; everything it needs lives in the
/// [`BeliefState`] it is handed. Update order matters and is fixed:
/// archive the previous turn, reset the per-turn fields, apply the
/// wipe rules, fold the signals one by one, then refresh the match
/// summary from the adapter.
#[derive(Debug, Default)]
pub struct BeliefTracker;

impl BeliefTracker {
    pub fn new() -> Self {
        BeliefTracker
    }

    pub fn update(
        &self,
        state: &mut BeliefState,
        signals: &[UserSignal],
        adapter: &dyn DomainAdapter,
    ) {
        state.begin_turn();

        state.requests.clear();
        state.signal_kinds = signals.iter().map(|s| s.kind).collect();

        // A lone "thanks" closes the request: wipe everything and skip
        // the adapter round-trip.
        if state.only_signal(SignalKind::Thanks) {
            state.informs.clear();
            state.num_matches = 0;
            state.discriminable = true;
            debug!("belief reset after thanks");
            return;
        }

        // Re-informed slots drop their old candidates before the new
        // values land.
        let reinformed: BTreeSet<Slot> = signals
            .iter()
            .filter(|s| s.kind == SignalKind::Inform)
            .filter_map(|s| s.slot)
            .collect();
        for slot in &reinformed {
            state.informs.remove(slot);
        }

        // Any new constraint un-pins a previously selected entity,
        // unless the turn itself re-targets the primary key.
        let has_inform = state.has_signal(SignalKind::Inform);
        if has_inform && !reinformed.contains(&Slot::PRIMARY_KEY) {
            if state.informs.remove(&Slot::PRIMARY_KEY).is_some() {
                debug!("primary key cleared by new inform");
            }
        }

        if state.has_signal(SignalKind::DomainSwitch) {
            state.informs.clear();
            state.requests.clear();
            debug!("belief wiped on domain switch");
        }

        for signal in signals {
            self.apply(state, signal);
        }

        let summary = adapter.summarize(&state.constraints());
        state.num_matches = summary.num_matches;
        state.discriminable = summary.discriminable;
        debug!(
            num_matches = state.num_matches,
            discriminable = state.discriminable,
            "belief updated"
        );
    }

    fn apply(&self, state: &mut BeliefState, signal: &UserSignal) {
        match signal.kind {
            SignalKind::Inform => {
                // A slotless dontcare answers whatever the system just
                // asked for.
                let slot = signal.slot.or_else(|| {
                    if signal.value.as_deref() == Some(DONTCARE) {
                        self.last_requested_slot(state)
                    } else {
                        None
                    }
                });
                if let (Some(slot), Some(value)) = (slot, &signal.value) {
                    state
                        .informs
                        .entry(slot)
                        .or_default()
                        .insert(value.clone(), signal.confidence);
                }
            }
            SignalKind::NegativeInform => {
                if let (Some(slot), Some(value)) = (signal.slot, &signal.value) {
                    if let Some(values) = state.informs.get_mut(&slot) {
                        values.remove(value);
                        if values.is_empty() {
                            state.informs.remove(&slot);
                        }
                    }
                }
            }
            SignalKind::Request => {
                // Only fields a user may actually ask about are tracked.
                if let Some(slot) = signal.slot.filter(|s| USER_REQUESTABLE.contains(s)) {
                    state.requests.insert(slot, signal.confidence);
                }
            }
            SignalKind::RequestAlternatives => {
                // The offered entity is no longer wanted.
                state.informs.remove(&Slot::PRIMARY_KEY);
            }
            _ => {}
        }
    }

    fn last_requested_slot(&self, state: &BeliefState) -> Option<Slot> {
        state
            .last_question()
            .filter(|q| q.kind == DecisionKind::Request)
            .and_then(|q| q.slot_values.keys().next().copied())
    }
}
