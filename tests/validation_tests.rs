use bulls_cows::validation::{
    is_old_enough, parse_birth_date, parse_game_pick, parse_guess, parse_menu_choice,
    parse_sequence_length, parse_username,
};
use bulls_cows::{InputError, InputOutput, ScriptedIo, REFERENCE_DEFAULTS};
use chrono::NaiveDate;
use proptest::prelude::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_username_is_trimmed_and_required() {
    assert_eq!(parse_username("  alice ").unwrap(), "alice");
    assert!(parse_username("   ").is_err());
}

#[test]
fn test_username_rejects_list_delimiter() {
    let reason = parse_username("a;b").unwrap_err();
    assert!(reason.contains(';'));
    assert!(parse_username(";").is_err());
    assert_eq!(parse_username("a-b").unwrap(), "a-b");
}

#[test]
fn test_age_boundary_is_inclusive() {
    let today = date(2024, 6, 15);
    assert!(is_old_enough(date(2008, 6, 15), today, 16));
    assert!(!is_old_enough(date(2008, 6, 16), today, 16));
    assert!(is_old_enough(date(2004, 2, 29), date(2020, 2, 29), 16));
    // Leap day birthdays come of age on March 1 in non-leap years.
    assert!(!is_old_enough(date(2000, 2, 29), date(2017, 2, 27), 17));
    assert!(is_old_enough(date(2000, 2, 29), date(2017, 3, 1), 17));
}

#[test]
fn test_birth_date_parsing() {
    let today = date(2024, 6, 15);
    assert_eq!(parse_birth_date("1990-01-31", today, 16).unwrap(), date(1990, 1, 31));
    assert!(parse_birth_date("31-01-1990", today, 16).is_err());
    assert!(parse_birth_date("1990-02-30", today, 16).is_err());
    assert!(parse_birth_date("2030-01-01", today, 0).is_err());
    assert!(parse_birth_date("2015-01-01", today, 16).is_err());
}

#[test]
fn test_sequence_length_bounds() {
    let d = REFERENCE_DEFAULTS;
    assert_eq!(parse_sequence_length("0", &d).unwrap(), 0);
    assert_eq!(parse_sequence_length(" 4", &d).unwrap(), 4);
    assert_eq!(parse_sequence_length("10", &d).unwrap(), 10);
    assert!(parse_sequence_length("3", &d).is_err());
    assert!(parse_sequence_length("11", &d).is_err());
    assert!(parse_sequence_length("-4", &d).is_err());
}

#[test]
fn test_guess_rules() {
    assert_eq!(parse_guess("0123", 4).unwrap(), "0123");
    assert!(parse_guess("012", 4).is_err());
    assert!(parse_guess("01a3", 4).is_err());
    assert!(parse_guess("0113", 4).is_err());
    assert!(parse_guess("٠١٢٣", 4).is_err());
}

#[test]
fn test_game_pick_must_be_listed() {
    assert_eq!(parse_game_pick("7", &[3, 7]).unwrap(), 7);
    assert!(parse_game_pick("8", &[3, 7]).is_err());
    assert!(parse_game_pick("", &[3, 7]).is_err());
}

#[test]
fn test_menu_choice_is_one_based() {
    assert_eq!(parse_menu_choice("1", 3).unwrap(), 0);
    assert_eq!(parse_menu_choice("3", 3).unwrap(), 2);
    assert!(parse_menu_choice("0", 3).is_err());
    assert!(parse_menu_choice("4", 3).is_err());
}

#[test]
fn test_read_object_retries_then_gives_up() {
    let mut io = ScriptedIo::new(["x", "y", "12"]);
    let value = io.read_int("Number:", "Not a number.").unwrap();
    assert_eq!(value, 12);
    assert_eq!(
        io.output().iter().filter(|l| l.starts_with("Not a number.")).count(),
        2
    );

    let mut io = ScriptedIo::new(["a"; 6]);
    assert_eq!(
        io.read_int("Number:", "Not a number."),
        Err(InputError::AttemptsExhausted(5))
    );
    assert_eq!(io.remaining(), 1);
}

#[test]
fn test_read_closed_input() {
    let mut io = ScriptedIo::new(["no"]);
    assert_eq!(
        io.read_string_predicate("Yes?", "Say yes.", |l| l == "yes"),
        Err(InputError::Closed)
    );
    assert_eq!(io.read_string("Again:"), Err(InputError::Closed));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any arrangement of distinct digits of the right length is a valid guess.
    #[test]
    fn distinct_digits_are_valid_guesses(
        digits in Just((0..10u8).collect::<Vec<_>>()).prop_shuffle(),
        len in 4usize..=10,
    ) {
        let guess: String = digits.iter().take(len).map(|d| char::from(b'0' + d)).collect();
        prop_assert_eq!(parse_guess(&guess, len as u32).unwrap(), guess);
    }
}
