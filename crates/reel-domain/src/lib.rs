//! Movie domain adapter seam for the Reel dialog manager.
//!
//! Defines the entity record, the derived constraint set, the
//! [`DomainAdapter`] trait the policy queries through, and an in-memory
//! [`MovieCatalog`] implementation used by tests and the demo binary.

pub mod adapter;
pub mod catalog;
pub mod metadata;

pub use adapter::{discriminable, Constraints, DomainAdapter, MatchSummary, MovieRecord, QueryResult};
pub use catalog::MovieCatalog;
pub use metadata::{first_unfilled_system_slot, RECORD_SLOTS, SYSTEM_REQUESTABLE, USER_REQUESTABLE};
