use chrono::NaiveDate;

use crate::codec::CodecError;
use crate::domain::{GameDefaultData, GameId, MoveData};
use crate::protocol::{ProtocolError, ResponseCode};
use crate::transport::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// The server understood the call and refused it.
    #[error("{message}")]
    Rejected { code: ResponseCode, message: String },
}

impl ServiceError {
    pub fn rejected(message: impl Into<String>) -> Self {
        ServiceError::Rejected {
            code: ResponseCode::WrongData,
            message: message.into(),
        }
    }

    /// True when the connection can no longer carry requests.
    ///
    /// Any transport failure qualifies. After a timeout or an oversized line the
    /// stream is out of step with the request sequence.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ServiceError::Transport(_))
    }
}

/// The remote game service, one method per operation.
///
/// Implemented by [`BullsCowsStub`](crate::stub::BullsCowsStub) on the client
/// and by [`BullsCowsEngine`](crate::engine::BullsCowsEngine) in process.
#[async_trait::async_trait]
pub trait BullsCowsService: Send {
    /// Create a game; a length of 0 asks for the server default.
    async fn create_game(&mut self, sequence_length: u32) -> Result<GameId, ServiceError>;
    /// Start a game and return its participants in join order.
    async fn start_game(&mut self, game_id: GameId) -> Result<Vec<String>, ServiceError>;
    async fn register_gamer(
        &mut self,
        username: &str,
        birth_date: NaiveDate,
    ) -> Result<(), ServiceError>;
    async fn gamer_join_game(
        &mut self,
        game_id: GameId,
        username: &str,
    ) -> Result<(), ServiceError>;
    async fn get_not_started_games(&mut self) -> Result<Vec<GameId>, ServiceError>;
    /// Submit a guess and return the gamer's move history through this guess.
    async fn move_processing(
        &mut self,
        sequence: &str,
        game_id: GameId,
        username: &str,
    ) -> Result<Vec<MoveData>, ServiceError>;
    async fn game_over(&mut self, game_id: GameId) -> Result<bool, ServiceError>;
    async fn get_game_gamers(&mut self, game_id: GameId) -> Result<Vec<String>, ServiceError>;
    async fn get_not_started_games_with_gamer(
        &mut self,
        username: &str,
    ) -> Result<Vec<GameId>, ServiceError>;
    async fn get_not_started_games_with_no_gamer(
        &mut self,
        username: &str,
    ) -> Result<Vec<GameId>, ServiceError>;
    async fn get_started_games_with_gamer(
        &mut self,
        username: &str,
    ) -> Result<Vec<GameId>, ServiceError>;
    async fn login_gamer(&mut self, username: &str) -> Result<(), ServiceError>;
    async fn get_all_gamers(&mut self) -> Result<Vec<String>, ServiceError>;
    async fn get_game_sequence_length(&mut self, game_id: GameId) -> Result<u32, ServiceError>;
    async fn get_game_defaults(&mut self) -> Result<GameDefaultData, ServiceError>;
}
