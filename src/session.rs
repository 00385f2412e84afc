use std::fmt;

use log::info;

use crate::domain::{GameDefaultData, GameId};

/// Where the gamer is in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Anonymous,
    Authenticated,
    GameSelected,
    InProgress,
    /// Terminal for the current game only; leaving it returns to `Authenticated`.
    GameWon,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("cannot go from {from} to {to}")]
    InvalidTransition { from: Phase, to: Phase },
    #[error("no gamer is logged in")]
    NotAuthenticated,
    #[error("no game in progress")]
    NoGameInProgress,
}

/// Session values owned by the controller: identity, selected game, server defaults.
///
/// Every mutation goes through a guarded transition; a rejected transition
/// leaves the state untouched.
#[derive(Debug, Clone)]
pub struct SessionState {
    defaults: GameDefaultData,
    phase: Phase,
    username: Option<String>,
    game_id: Option<GameId>,
    sequence_length: Option<u32>,
}

impl SessionState {
    pub fn new(defaults: GameDefaultData) -> Self {
        Self {
            defaults,
            phase: Phase::Anonymous,
            username: None,
            game_id: None,
            sequence_length: None,
        }
    }

    pub fn defaults(&self) -> &GameDefaultData {
        &self.defaults
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn game_id(&self) -> Option<GameId> {
        self.game_id
    }

    pub fn sequence_length(&self) -> Option<u32> {
        self.sequence_length
    }

    fn guard(&self, to: Phase, allowed: &[Phase]) -> Result<(), SessionError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition { from: self.phase, to })
        }
    }

    fn enter(&mut self, to: Phase) {
        info!("session {} -> {}", self.phase, to);
        self.phase = to;
    }

    pub fn authenticate(&mut self, username: &str) -> Result<(), SessionError> {
        self.guard(Phase::Authenticated, &[Phase::Anonymous])?;
        self.username = Some(username.to_string());
        self.enter(Phase::Authenticated);
        Ok(())
    }

    pub fn select_game(&mut self, game_id: GameId) -> Result<(), SessionError> {
        self.guard(Phase::GameSelected, &[Phase::Authenticated, Phase::GameSelected])?;
        self.game_id = Some(game_id);
        self.sequence_length = None;
        self.enter(Phase::GameSelected);
        Ok(())
    }

    pub fn begin_play(&mut self, sequence_length: u32) -> Result<(), SessionError> {
        self.guard(Phase::InProgress, &[Phase::GameSelected])?;
        self.sequence_length = Some(sequence_length);
        self.enter(Phase::InProgress);
        Ok(())
    }

    pub fn record_win(&mut self) -> Result<(), SessionError> {
        self.guard(Phase::GameWon, &[Phase::InProgress])?;
        self.enter(Phase::GameWon);
        Ok(())
    }

    /// Drop the current game selection and return to the game menu.
    pub fn leave_game(&mut self) -> Result<(), SessionError> {
        self.guard(
            Phase::Authenticated,
            &[Phase::GameSelected, Phase::InProgress, Phase::GameWon],
        )?;
        self.game_id = None;
        self.sequence_length = None;
        self.enter(Phase::Authenticated);
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.guard(Phase::Anonymous, &[Phase::Authenticated, Phase::GameSelected])?;
        self.username = None;
        self.game_id = None;
        self.sequence_length = None;
        self.enter(Phase::Anonymous);
        Ok(())
    }
}
