use bulls_cows::{Phase, SessionError, SessionState, REFERENCE_DEFAULTS};
use proptest::prelude::*;

fn session() -> SessionState {
    SessionState::new(REFERENCE_DEFAULTS)
}

#[test]
fn test_full_game_cycle() {
    let mut s = session();
    assert_eq!(s.phase(), Phase::Anonymous);

    s.authenticate("alice").unwrap();
    assert_eq!(s.username(), Some("alice"));

    s.select_game(3).unwrap();
    assert_eq!(s.phase(), Phase::GameSelected);
    assert_eq!(s.game_id(), Some(3));

    s.begin_play(4).unwrap();
    assert_eq!(s.phase(), Phase::InProgress);
    assert_eq!(s.sequence_length(), Some(4));

    s.record_win().unwrap();
    assert_eq!(s.phase(), Phase::GameWon);

    s.leave_game().unwrap();
    assert_eq!(s.phase(), Phase::Authenticated);
    assert_eq!(s.game_id(), None);
    assert_eq!(s.sequence_length(), None);
    assert_eq!(s.username(), Some("alice"));

    s.logout().unwrap();
    assert_eq!(s.phase(), Phase::Anonymous);
    assert_eq!(s.username(), None);
}

#[test]
fn test_reselecting_a_game_replaces_it() {
    let mut s = session();
    s.authenticate("bob").unwrap();
    s.select_game(1).unwrap();
    s.select_game(2).unwrap();
    assert_eq!(s.game_id(), Some(2));
}

#[test]
fn test_cannot_play_without_selection() {
    let mut s = session();
    s.authenticate("carol").unwrap();
    assert_eq!(
        s.begin_play(4),
        Err(SessionError::InvalidTransition {
            from: Phase::Authenticated,
            to: Phase::InProgress,
        })
    );
}

#[test]
fn test_cannot_win_outside_a_game() {
    let mut s = session();
    assert!(s.record_win().is_err());
    s.authenticate("dave").unwrap();
    s.select_game(1).unwrap();
    assert!(s.record_win().is_err());
}

#[test]
fn test_logout_not_allowed_mid_game() {
    let mut s = session();
    s.authenticate("erin").unwrap();
    s.select_game(1).unwrap();
    s.begin_play(4).unwrap();
    assert!(s.logout().is_err());
    assert!(s.select_game(2).is_err());
    assert_eq!(s.phase(), Phase::InProgress);
    assert_eq!(s.game_id(), Some(1));
}

#[test]
fn test_double_login_rejected() {
    let mut s = session();
    s.authenticate("frank").unwrap();
    let err = s.authenticate("gina").unwrap_err();
    assert_eq!(err.to_string(), "cannot go from Authenticated to Authenticated");
    assert_eq!(s.username(), Some("frank"));
}

#[derive(Debug, Clone)]
enum Step {
    Authenticate,
    Select(u64),
    Begin(u32),
    Win,
    Leave,
    Logout,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Authenticate),
        (1u64..5).prop_map(Step::Select),
        (4u32..=10).prop_map(Step::Begin),
        Just(Step::Win),
        Just(Step::Leave),
        Just(Step::Logout),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A refused transition never changes the state, and the phase always
    /// agrees with which values are set.
    #[test]
    fn transitions_keep_state_consistent(steps in prop::collection::vec(step(), 0..30)) {
        let mut s = session();
        for step in steps {
            let before = (
                s.phase(),
                s.username().map(str::to_string),
                s.game_id(),
                s.sequence_length(),
            );
            let result = match step {
                Step::Authenticate => s.authenticate("gamer"),
                Step::Select(id) => s.select_game(id),
                Step::Begin(len) => s.begin_play(len),
                Step::Win => s.record_win(),
                Step::Leave => s.leave_game(),
                Step::Logout => s.logout(),
            };
            if result.is_err() {
                let after = (
                s.phase(),
                s.username().map(str::to_string),
                s.game_id(),
                s.sequence_length(),
            );
                prop_assert_eq!(before, after);
            }
            prop_assert_eq!(s.username().is_some(), s.phase() != Phase::Anonymous);
            prop_assert_eq!(
                s.game_id().is_some(),
                matches!(s.phase(), Phase::GameSelected | Phase::InProgress | Phase::GameWon)
            );
            prop_assert_eq!(
                s.sequence_length().is_some(),
                matches!(s.phase(), Phase::InProgress | Phase::GameWon)
            );
        }
    }
}
