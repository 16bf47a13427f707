//! End-to-end dialog flows through the session manager.

use std::sync::Arc;

use reel_core::config::ReelConfig;
use reel_core::{DecisionKind, Slot, UserSignal};
use reel_dialog::DialogManager;
use reel_domain::MovieCatalog;
use uuid::Uuid;

fn manager() -> DialogManager {
    DialogManager::new(ReelConfig::default(), Arc::new(MovieCatalog::sample()))
}

fn turn(
    manager: &DialogManager,
    session: Uuid,
    signals: Vec<UserSignal>,
) -> reel_core::SystemDecision {
    manager.handle_turn(session, &signals).unwrap()
}

#[test]
fn test_pinpointing_a_movie_by_constraints() {
    let manager = manager();
    let session = manager.start_session().unwrap();

    let welcome = turn(&manager, session, vec![]);
    assert_eq!(welcome.kind, DecisionKind::Welcome);

    let decision = turn(
        &manager,
        session,
        vec![
            UserSignal::inform(Slot::Genres, "action"),
            UserSignal::inform(Slot::Cast, "Tom Cruise"),
            UserSignal::inform(Slot::ReleaseYear, "1986"),
        ],
    );
    assert_eq!(decision.kind, DecisionKind::InformByName);
    assert_eq!(decision.values(Slot::Title), &["Top Gun"]);
    assert_eq!(decision.first_value(Slot::Id), Some("744"));

    let bye = turn(&manager, session, vec![UserSignal::bye()]);
    assert_eq!(bye.kind, DecisionKind::Bye);
}

#[test]
fn test_disambiguation_then_field_question() {
    let manager = manager();
    let session = manager.start_session().unwrap();

    // Three Bruce Willis action movies from 1998.
    let list = turn(
        &manager,
        session,
        vec![
            UserSignal::inform(Slot::Cast, "Bruce Willis"),
            UserSignal::inform(Slot::ReleaseYear, "1998"),
        ],
    );
    assert_eq!(list.kind, DecisionKind::InformByAlternatives);
    assert_eq!(list.values(Slot::Id).len(), 3);

    // Picking one by id pins it.
    let picked = turn(&manager, session, vec![UserSignal::inform(Slot::Id, "95")]);
    assert_eq!(picked.kind, DecisionKind::InformByName);
    assert_eq!(picked.values(Slot::Title), &["Armageddon"]);

    // A field question is answered from the pinned record.
    let answer = turn(&manager, session, vec![UserSignal::request(Slot::Overview)]);
    assert_eq!(answer.kind, DecisionKind::InformByName);
    assert!(answer.values(Slot::Overview)[0].contains("asteroid"));
    assert_eq!(answer.first_value(Slot::Id), Some("95"));
}

#[test]
fn test_alternatives_walk_the_match_set_without_repeats() {
    let manager = manager();
    let session = manager.start_session().unwrap();

    turn(
        &manager,
        session,
        vec![
            UserSignal::inform(Slot::Cast, "Bruce Willis"),
            UserSignal::inform(Slot::ReleaseYear, "1998"),
        ],
    );
    let first = turn(&manager, session, vec![UserSignal::inform(Slot::Id, "95")]);
    assert_eq!(first.first_value(Slot::Id), Some("95"));

    let second = turn(&manager, session, vec![UserSignal::request_alternatives()]);
    let third = turn(&manager, session, vec![UserSignal::request_alternatives()]);
    assert_eq!(second.kind, DecisionKind::InformByAlternatives);
    assert_eq!(third.kind, DecisionKind::InformByAlternatives);

    let mut offered = vec![
        first.first_value(Slot::Id).unwrap().to_string(),
        second.first_value(Slot::Id).unwrap().to_string(),
        third.first_value(Slot::Id).unwrap().to_string(),
    ];
    offered.sort();
    offered.dedup();
    assert_eq!(offered.len(), 3, "every offer must be a fresh record");

    // All three 1998 Bruce Willis movies have been offered.
    let exhausted = turn(&manager, session, vec![UserSignal::request_alternatives()]);
    assert_eq!(exhausted.kind, DecisionKind::NothingFound);
}

#[test]
fn test_alternatives_need_enough_constraints() {
    let manager = manager();
    let session = manager.start_session().unwrap();

    turn(
        &manager,
        session,
        vec![UserSignal::inform(Slot::Genres, "action")],
    );
    let decision = turn(&manager, session, vec![UserSignal::request_alternatives()]);
    assert_eq!(decision.kind, DecisionKind::Bad);
}

#[test]
fn test_specific_or_suggestion_fork() {
    // Affirming the confirmation keeps the slot-filling hunt going.
    let manager = manager();
    let session = manager.start_session().unwrap();

    let confirm = turn(
        &manager,
        session,
        vec![UserSignal::inform(Slot::Genres, "comedy")],
    );
    assert_eq!(confirm.kind, DecisionKind::Confirm);
    assert!(confirm.slot_values.contains_key(&Slot::LookingForSpecific));

    let narrow = turn(&manager, session, vec![UserSignal::affirm()]);
    assert_eq!(narrow.kind, DecisionKind::Request);
    assert!(narrow.slot_values.contains_key(&Slot::Cast));

    let found = turn(
        &manager,
        session,
        vec![UserSignal::inform(Slot::Cast, "Jim Carrey")],
    );
    assert_eq!(found.kind, DecisionKind::InformByName);
    assert_eq!(found.values(Slot::Title), &["The Mask"]);

    // Denying it flips straight to a recommendation instead.
    let session = manager.start_session().unwrap();
    turn(
        &manager,
        session,
        vec![UserSignal::inform(Slot::Genres, "comedy")],
    );
    let suggestion = turn(&manager, session, vec![UserSignal::deny()]);
    assert_eq!(suggestion.kind, DecisionKind::ShowRecommendation);
    assert!(suggestion.first_value(Slot::Id).is_some());
}

#[test]
fn test_indifference_to_a_requested_slot() {
    let manager = manager();
    let session = manager.start_session().unwrap();

    let request = turn(
        &manager,
        session,
        vec![
            UserSignal::inform(Slot::Genres, "action"),
            UserSignal::inform(Slot::ReleaseYear, "1990"),
        ],
    );
    assert_eq!(request.kind, DecisionKind::Request);
    assert!(request.slot_values.contains_key(&Slot::Cast));

    // "I don't care" stops the hunt and turns into a suggestion.
    let suggestion = turn(&manager, session, vec![UserSignal::dontcare(None)]);
    assert_eq!(suggestion.kind, DecisionKind::ShowRecommendation);
    assert_eq!(suggestion.values(Slot::ReleaseYear), &["1990"]);
}

#[test]
fn test_changing_your_mind_replaces_the_constraint() {
    let manager = manager();
    let session = manager.start_session().unwrap();

    turn(
        &manager,
        session,
        vec![
            UserSignal::inform(Slot::Cast, "Bruce Willis"),
            UserSignal::inform(Slot::ReleaseYear, "1998"),
        ],
    );
    // Re-inform the year: the old value must not linger.
    let decision = turn(
        &manager,
        session,
        vec![UserSignal::inform(Slot::ReleaseYear, "1990")],
    );
    assert_eq!(decision.kind, DecisionKind::InformByName);
    assert_eq!(decision.values(Slot::Title), &["Die Hard 2"]);
}

#[test]
fn test_year_range_constraints() {
    let manager = manager();
    let session = manager.start_session().unwrap();

    // Eighties action with Tom Cruise: only Top Gun qualifies.
    let decision = turn(
        &manager,
        session,
        vec![
            UserSignal::inform(Slot::Cast, "Tom Cruise"),
            UserSignal::inform(Slot::ReleaseYear, ">=1980"),
            UserSignal::inform(Slot::ReleaseYear, "<=1989"),
        ],
    );
    assert_eq!(decision.kind, DecisionKind::InformByName);
    assert_eq!(decision.values(Slot::Title), &["Top Gun"]);
}

#[test]
fn test_thanks_starts_a_fresh_request() {
    let manager = manager();
    let session = manager.start_session().unwrap();

    turn(
        &manager,
        session,
        vec![
            UserSignal::inform(Slot::Genres, "action"),
            UserSignal::inform(Slot::Cast, "Tom Cruise"),
            UserSignal::inform(Slot::ReleaseYear, "1986"),
        ],
    );
    let more = turn(&manager, session, vec![UserSignal::thanks()]);
    assert_eq!(more.kind, DecisionKind::RequestMore);

    // The old constraints are gone; a new search starts clean.
    let decision = turn(
        &manager,
        session,
        vec![
            UserSignal::inform(Slot::Genres, "comedy"),
            UserSignal::inform(Slot::Cast, "Bill Murray"),
        ],
    );
    assert_eq!(decision.kind, DecisionKind::InformByName);
    assert_eq!(decision.values(Slot::Title), &["Groundhog Day"]);
}

#[test]
fn test_declining_anything_else_says_goodbye() {
    let manager = manager();
    let session = manager.start_session().unwrap();

    turn(
        &manager,
        session,
        vec![UserSignal::inform(Slot::Genres, "action")],
    );
    turn(&manager, session, vec![UserSignal::thanks()]);
    let bye = turn(&manager, session, vec![UserSignal::deny()]);
    assert_eq!(bye.kind, DecisionKind::Bye);

    // The session is over for good.
    assert!(manager.handle_turn(session, &[]).is_err());
}

#[test]
fn test_domain_switch_wipes_the_conversation() {
    let manager = manager();
    let session = manager.start_session().unwrap();

    turn(
        &manager,
        session,
        vec![
            UserSignal::inform(Slot::Cast, "Bruce Willis"),
            UserSignal::inform(Slot::ReleaseYear, "1998"),
        ],
    );
    let decision = turn(
        &manager,
        session,
        vec![
            UserSignal::domain_switch(),
            UserSignal::inform(Slot::Genres, "comedy"),
        ],
    );
    // Only the new constraint applies: broad comedy match, so the
    // specific-or-suggestion question comes back.
    assert_eq!(decision.kind, DecisionKind::Confirm);
    assert_eq!(decision.values(Slot::Genres), &["comedy"]);
    assert!(decision.values(Slot::Cast).is_empty());
}

#[test]
fn test_new_constraint_unpins_the_selected_movie() {
    let manager = manager();
    let session = manager.start_session().unwrap();

    let pinned = turn(&manager, session, vec![UserSignal::inform(Slot::Id, "744")]);
    assert_eq!(pinned.values(Slot::Title), &["Top Gun"]);

    let decision = turn(
        &manager,
        session,
        vec![
            UserSignal::inform(Slot::Genres, "comedy"),
            UserSignal::inform(Slot::Cast, "Tom Hanks"),
        ],
    );
    // Top Gun is no longer pinned; the comedy constraints stand alone.
    assert_eq!(decision.kind, DecisionKind::InformByAlternatives);
    assert_eq!(decision.values(Slot::Id).len(), 2);
}

#[test]
fn test_unparseable_turn_yields_bad() {
    let manager = manager();
    let session = manager.start_session().unwrap();
    let decision = turn(&manager, session, vec![UserSignal::bad()]);
    assert_eq!(decision.kind, DecisionKind::Bad);
}
