use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use reel_core::config::ReelConfig;
use reel_core::{DecisionKind, SystemDecision, UserSignal};
use reel_domain::DomainAdapter;

use crate::belief::BeliefState;
use crate::error::DialogError;
use crate::policy::DialogPolicy;
use crate::tracker::BeliefTracker;

/// One live conversation.
#[derive(Debug)]
pub struct DialogSession {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub last_turn_at: DateTime<Utc>,
    pub ended: bool,
    state: BeliefState,
}

impl DialogSession {
    fn new(id: Uuid) -> Self {
        let now = Utc::now();
        DialogSession {
            id,
            started_at: now,
            last_turn_at: now,
            ended: false,
            state: BeliefState::new(),
        }
    }

    pub fn state(&self) -> &BeliefState {
        &self.state
    }
}

/// Owns the sessions and runs the track-then-decide pipeline for each
/// turn. Thread-safe; the adapter is shared and queried read-only.
pub struct DialogManager {
    adapter: Arc<dyn DomainAdapter>,
    tracker: BeliefTracker,
    policy: DialogPolicy,
    sessions: Mutex<HashMap<Uuid, DialogSession>>,
    config: ReelConfig,
}

impl DialogManager {
    pub fn new(config: ReelConfig, adapter: Arc<dyn DomainAdapter>) -> Self {
        DialogManager {
            adapter,
            tracker: BeliefTracker::new(),
            policy: DialogPolicy::new(config.policy.clone()),
            sessions: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn start_session(&self) -> Result<Uuid, DialogError> {
        let id = Uuid::new_v4();
        let mut sessions = self.lock_sessions()?;
        sessions.insert(id, DialogSession::new(id));
        info!(session_id = %id, "session started");
        Ok(id)
    }

    /// Runs one turn: tracker update, policy decision, bookkeeping.
    pub fn handle_turn(
        &self,
        session_id: Uuid,
        signals: &[UserSignal],
    ) -> Result<SystemDecision, DialogError> {
        let mut sessions = self.lock_sessions()?;
        let session = sessions
            .get_mut(&session_id)
            .ok_or(DialogError::SessionNotFound(session_id))?;
        if session.ended {
            return Err(DialogError::SessionEnded(session_id));
        }

        self.tracker
            .update(&mut session.state, signals, self.adapter.as_ref());
        let decision = self.policy.choose(&mut session.state, self.adapter.as_ref());
        session.state.record_decision(decision.clone());
        session.last_turn_at = Utc::now();

        if decision.kind == DecisionKind::Bye {
            session.ended = true;
            info!(session_id = %session_id, "session ended");
        }
        debug!(
            session_id = %session_id,
            decision = %decision.kind,
            turn = session.state.turn_count(),
            "turn handled"
        );
        Ok(decision)
    }

    /// Forgets a session regardless of whether it ended cleanly.
    pub fn end_session(&self, session_id: Uuid) -> Result<(), DialogError> {
        let mut sessions = self.lock_sessions()?;
        sessions
            .remove(&session_id)
            .map(|_| info!(session_id = %session_id, "session removed"))
            .ok_or(DialogError::SessionNotFound(session_id))
    }

    pub fn session_count(&self) -> usize {
        self.lock_sessions().map(|s| s.len()).unwrap_or(0)
    }

    /// Drops sessions idle past the configured timeout. Returns how many
    /// were removed.
    pub fn prune_expired(&self) -> Result<usize, DialogError> {
        let cutoff = Utc::now() - Duration::minutes(self.config.session.timeout_minutes as i64);
        let mut sessions = self.lock_sessions()?;
        let before = sessions.len();
        sessions.retain(|_, session| session.last_turn_at >= cutoff);
        let pruned = before - sessions.len();
        if pruned > 0 {
            warn!(pruned, "expired sessions pruned");
        }
        Ok(pruned)
    }

    fn lock_sessions(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, DialogSession>>, DialogError> {
        self.sessions
            .lock()
            .map_err(|e| DialogError::Internal(format!("session lock poisoned: {e}")))
    }
}
