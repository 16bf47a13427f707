//! Dialog management: belief tracking, phase derivation, and the
//! decision policy that drives a slot-filling movie conversation.
//!
//! A turn flows through three stages. The [`BeliefTracker`] folds the
//! user's signals into the session's [`BeliefState`], the policy derives
//! a [`DialogPhase`] from that state, and [`DialogPolicy`] picks the
//! single [`SystemDecision`](reel_core::SystemDecision) for the turn.
//! [`DialogManager`] owns the sessions and runs the pipeline.

pub mod belief;
pub mod error;
pub mod phase;
pub mod policy;
pub mod session;
pub mod tracker;

pub use belief::{BeliefState, DialogTurn};
pub use error::DialogError;
pub use phase::DialogPhase;
pub use policy::DialogPolicy;
pub use session::{DialogManager, DialogSession};
pub use tracker::BeliefTracker;
