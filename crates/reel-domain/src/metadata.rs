//! Static slot metadata for the movie domain.

use reel_core::types::{Informs, Slot};

/// Slots the system may proactively ask the user to fill, in asking order.
pub const SYSTEM_REQUESTABLE: &[Slot] = &[Slot::Genres, Slot::Cast, Slot::ReleaseYear];

/// Slots the user may ask the system about.
pub const USER_REQUESTABLE: &[Slot] = &[
    Slot::Title,
    Slot::Overview,
    Slot::ReleaseYear,
    Slot::Genres,
    Slot::Cast,
    Slot::Rating,
];

/// Entity-record slots included in full-record decisions, in render order.
pub const RECORD_SLOTS: &[Slot] = &[
    Slot::Id,
    Slot::Title,
    Slot::Overview,
    Slot::ReleaseYear,
    Slot::Genres,
    Slot::Cast,
    Slot::Rating,
];

/// The first system-requestable slot the user has said nothing about.
///
/// A slot answered with `dontcare` counts as filled: it is stripped from the
/// constraint set but still present in the informs, so the system does not
/// ask about it again.
pub fn first_unfilled_system_slot(informs: &Informs) -> Option<Slot> {
    SYSTEM_REQUESTABLE
        .iter()
        .copied()
        .find(|slot| !informs.contains_key(slot))
}
