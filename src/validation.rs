//! Checks applied to user-entered values before they are sent anywhere.
//!
//! Each parser returns the accepted value or a short reason suitable for
//! showing next to the retry prompt.

use std::collections::HashSet;

use chrono::{Months, NaiveDate};

use crate::codec::LIST_DELIMITER;
use crate::domain::{GameDefaultData, GameId};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accept a non-empty username. The list delimiter is refused because
/// usernames travel inside delimiter-joined list replies.
pub fn parse_username(input: &str) -> Result<String, String> {
    let username = input.trim();
    if username.is_empty() {
        return Err("username can't be empty".to_string());
    }
    if username.contains(LIST_DELIMITER) {
        return Err(format!("username can't contain '{}'", LIST_DELIMITER));
    }
    Ok(username.to_string())
}

/// True if someone born on `birth_date` is at least `min_age` years old on `today`.
/// A birthday falling exactly on the boundary counts as old enough.
pub fn is_old_enough(birth_date: NaiveDate, today: NaiveDate, min_age: u32) -> bool {
    match today.checked_sub_months(Months::new(min_age.saturating_mul(12))) {
        Some(latest_allowed) => birth_date <= latest_allowed,
        None => false,
    }
}

pub fn parse_birth_date(input: &str, today: NaiveDate, min_age: u32) -> Result<NaiveDate, String> {
    let date = NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|e| format!("expected yyyy-MM-dd: {}", e))?;
    if date > today {
        return Err("birth date is in the future".to_string());
    }
    if !is_old_enough(date, today, min_age) {
        return Err(format!("gamer must be at least {} years old", min_age));
    }
    Ok(date)
}

/// Accept 0 (server default) or a length within the declared bounds.
pub fn parse_sequence_length(input: &str, defaults: &GameDefaultData) -> Result<u32, String> {
    let length: u32 = input
        .trim()
        .parse()
        .map_err(|_| "not a number".to_string())?;
    if length == 0 || (defaults.min_seq_len..=defaults.max_seq_len).contains(&length) {
        Ok(length)
    } else {
        Err(format!(
            "length must be between {} and {}, or 0",
            defaults.min_seq_len, defaults.max_seq_len
        ))
    }
}

/// Accept exactly `length` decimal digits with no repeats.
pub fn parse_guess(input: &str, length: u32) -> Result<String, String> {
    let guess = input.trim();
    if guess.chars().count() != length as usize {
        return Err(format!("expected {} digits", length));
    }
    if !guess.chars().all(|c| c.is_ascii_digit()) {
        return Err("only digits are allowed".to_string());
    }
    let distinct: HashSet<char> = guess.chars().collect();
    if distinct.len() != guess.len() {
        return Err("digits must not repeat".to_string());
    }
    Ok(guess.to_string())
}

/// Accept a game id only if it is one of `candidates`.
pub fn parse_game_pick(input: &str, candidates: &[GameId]) -> Result<GameId, String> {
    let id: GameId = input
        .trim()
        .parse()
        .map_err(|_| "not a game id".to_string())?;
    if candidates.contains(&id) {
        Ok(id)
    } else {
        Err(format!("game {} is not in the list", id))
    }
}

/// Accept a 1-based menu item number.
pub fn parse_menu_choice(input: &str, items: usize) -> Result<usize, String> {
    let choice: usize = input
        .trim()
        .parse()
        .map_err(|_| "not a number".to_string())?;
    if (1..=items).contains(&choice) {
        Ok(choice - 1)
    } else {
        Err(format!("choose 1 to {}", items))
    }
}
