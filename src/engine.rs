//! In-memory reference implementation of the game server.
//!
//! Honours the client-visible contract of every operation and nothing more:
//! no persistence, one process. Used by `local`/`serve` and by the tests.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use log::info;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::REFERENCE_DEFAULTS;
use crate::domain::{GameDefaultData, GameId, MoveData};
use crate::service::{BullsCowsService, ServiceError};
use crate::validation;

struct Game {
    sequence: String,
    gamers: Vec<String>,
    started: bool,
    finished: bool,
    /// (username, move) in turn order across all gamers.
    moves: Vec<(String, MoveData)>,
}

pub struct BullsCowsEngine {
    defaults: GameDefaultData,
    gamers: BTreeMap<String, NaiveDate>,
    games: BTreeMap<GameId, Game>,
    next_id: GameId,
    rng: SmallRng,
    today: Option<NaiveDate>,
}

/// Count bulls (right digit, right place) and cows (right digit, wrong place).
pub fn score(guess: &str, secret: &str) -> (u32, u32) {
    let mut bulls = 0;
    let mut cows = 0;
    for (i, g) in guess.chars().enumerate() {
        match secret.chars().position(|s| s == g) {
            Some(j) if j == i => bulls += 1,
            Some(_) => cows += 1,
            None => {}
        }
    }
    (bulls, cows)
}

impl BullsCowsEngine {
    /// Create an engine; a fixed seed makes hidden sequences reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => SmallRng::seed_from_u64(s),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        Self {
            defaults: REFERENCE_DEFAULTS,
            gamers: BTreeMap::new(),
            games: BTreeMap::new(),
            next_id: 1,
            rng,
            today: None,
        }
    }

    pub fn with_defaults(mut self, defaults: GameDefaultData) -> Self {
        self.defaults = defaults;
        self
    }

    /// Pin the date used for age checks.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// The hidden sequence of a game, for local inspection.
    pub fn hidden_sequence(&self, game_id: GameId) -> Option<&str> {
        self.games.get(&game_id).map(|g| g.sequence.as_str())
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn game(&self, game_id: GameId) -> Result<&Game, ServiceError> {
        self.games
            .get(&game_id)
            .ok_or_else(|| ServiceError::rejected(format!("Game {} not found", game_id)))
    }

    fn game_mut(&mut self, game_id: GameId) -> Result<&mut Game, ServiceError> {
        self.games
            .get_mut(&game_id)
            .ok_or_else(|| ServiceError::rejected(format!("Game {} not found", game_id)))
    }

    fn require_gamer(&self, username: &str) -> Result<(), ServiceError> {
        if self.gamers.contains_key(username) {
            Ok(())
        } else {
            Err(ServiceError::rejected(format!("Gamer {} not found", username)))
        }
    }

    fn hidden(&mut self, length: u32) -> String {
        let mut digits: Vec<char> = ('0'..='9').collect();
        digits.shuffle(&mut self.rng);
        digits.into_iter().take(length as usize).collect()
    }

    fn select_games<F>(&self, keep: F) -> Vec<GameId>
    where
        F: Fn(&Game) -> bool,
    {
        self.games
            .iter()
            .filter(|(_, game)| keep(game))
            .map(|(id, _)| *id)
            .collect()
    }
}

#[async_trait::async_trait]
impl BullsCowsService for BullsCowsEngine {
    async fn create_game(&mut self, sequence_length: u32) -> Result<GameId, ServiceError> {
        let length = if sequence_length == 0 {
            self.defaults.def_seq_len
        } else {
            sequence_length
        };
        if !(self.defaults.min_seq_len..=self.defaults.max_seq_len).contains(&length) {
            return Err(ServiceError::rejected(format!(
                "Sequence length must be between {} and {}",
                self.defaults.min_seq_len, self.defaults.max_seq_len
            )));
        }
        let id = self.next_id;
        self.next_id += 1;
        let sequence = self.hidden(length);
        self.games.insert(
            id,
            Game {
                sequence,
                gamers: Vec::new(),
                started: false,
                finished: false,
                moves: Vec::new(),
            },
        );
        info!("created game {} with {} digits", id, length);
        Ok(id)
    }

    async fn start_game(&mut self, game_id: GameId) -> Result<Vec<String>, ServiceError> {
        let game = self.game_mut(game_id)?;
        if game.started {
            return Err(ServiceError::rejected(format!("Game {} already started", game_id)));
        }
        if game.gamers.is_empty() {
            return Err(ServiceError::rejected(format!("Game {} has no gamers", game_id)));
        }
        game.started = true;
        info!("started game {}", game_id);
        Ok(game.gamers.clone())
    }

    async fn register_gamer(
        &mut self,
        username: &str,
        birth_date: NaiveDate,
    ) -> Result<(), ServiceError> {
        let username = validation::parse_username(username).map_err(ServiceError::rejected)?;
        if self.gamers.contains_key(&username) {
            return Err(ServiceError::rejected(format!("Gamer {} already exists", username)));
        }
        if !validation::is_old_enough(birth_date, self.today(), self.defaults.min_age) {
            return Err(ServiceError::rejected(format!(
                "Gamer must be at least {} years old",
                self.defaults.min_age
            )));
        }
        info!("registered gamer {}", username);
        self.gamers.insert(username, birth_date);
        Ok(())
    }

    async fn gamer_join_game(
        &mut self,
        game_id: GameId,
        username: &str,
    ) -> Result<(), ServiceError> {
        self.require_gamer(username)?;
        let game = self.game_mut(game_id)?;
        if game.started {
            return Err(ServiceError::rejected(format!("Game {} already started", game_id)));
        }
        if game.gamers.iter().any(|g| g == username) {
            return Err(ServiceError::rejected(format!(
                "Gamer {} already joined game {}",
                username, game_id
            )));
        }
        game.gamers.push(username.to_string());
        Ok(())
    }

    async fn get_not_started_games(&mut self) -> Result<Vec<GameId>, ServiceError> {
        Ok(self.select_games(|game| !game.started))
    }

    async fn move_processing(
        &mut self,
        sequence: &str,
        game_id: GameId,
        username: &str,
    ) -> Result<Vec<MoveData>, ServiceError> {
        let game = self.game_mut(game_id)?;
        if !game.started {
            return Err(ServiceError::rejected(format!("Game {} not started", game_id)));
        }
        if game.finished {
            return Err(ServiceError::rejected(format!("Game {} is over", game_id)));
        }
        if !game.gamers.iter().any(|g| g == username) {
            return Err(ServiceError::rejected(format!(
                "Gamer {} is not in game {}",
                username, game_id
            )));
        }
        let length = game.sequence.len() as u32;
        let guess = validation::parse_guess(sequence, length).map_err(ServiceError::rejected)?;
        let (bulls, cows) = score(&guess, &game.sequence);
        if bulls == length {
            game.finished = true;
            info!("game {} won by {}", game_id, username);
        }
        game.moves.push((
            username.to_string(),
            MoveData {
                sequence: guess,
                bulls,
                cows,
            },
        ));
        Ok(game
            .moves
            .iter()
            .filter(|(gamer, _)| gamer == username)
            .map(|(_, mv)| mv.clone())
            .collect())
    }

    async fn game_over(&mut self, game_id: GameId) -> Result<bool, ServiceError> {
        Ok(self.game(game_id)?.finished)
    }

    async fn get_game_gamers(&mut self, game_id: GameId) -> Result<Vec<String>, ServiceError> {
        Ok(self.game(game_id)?.gamers.clone())
    }

    async fn get_not_started_games_with_gamer(
        &mut self,
        username: &str,
    ) -> Result<Vec<GameId>, ServiceError> {
        Ok(self.select_games(|game| !game.started && game.gamers.iter().any(|g| g == username)))
    }

    async fn get_not_started_games_with_no_gamer(
        &mut self,
        username: &str,
    ) -> Result<Vec<GameId>, ServiceError> {
        Ok(self.select_games(|game| !game.started && !game.gamers.iter().any(|g| g == username)))
    }

    async fn get_started_games_with_gamer(
        &mut self,
        username: &str,
    ) -> Result<Vec<GameId>, ServiceError> {
        Ok(self.select_games(|game| {
            game.started && !game.finished && game.gamers.iter().any(|g| g == username)
        }))
    }

    async fn login_gamer(&mut self, username: &str) -> Result<(), ServiceError> {
        self.require_gamer(username)
    }

    async fn get_all_gamers(&mut self) -> Result<Vec<String>, ServiceError> {
        Ok(self.gamers.keys().cloned().collect())
    }

    async fn get_game_sequence_length(&mut self, game_id: GameId) -> Result<u32, ServiceError> {
        Ok(self.game(game_id)?.sequence.len() as u32)
    }

    async fn get_game_defaults(&mut self) -> Result<GameDefaultData, ServiceError> {
        Ok(self.defaults)
    }
}
