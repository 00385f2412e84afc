use chrono::NaiveDate;
use log::{debug, warn};

use crate::codec::{self, Payload};
use crate::domain::{GameDefaultData, GameId, GamerData, MoveData, SequenceGameGamer};
use crate::protocol::{Operation, Request, Response, ResponseCode};
use crate::service::{BullsCowsService, ServiceError};
use crate::transport::{Transport, TransportError};

/// Client-side proxy: every call is one blocking request/response exchange.
///
/// A transport failure closes the connection, so a late or partial reply is
/// never read as the answer to a later request.
pub struct BullsCowsStub<T: Transport> {
    transport: T,
}

impl<T: Transport> BullsCowsStub<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Release the connection.
    pub async fn close(&mut self) -> Result<(), TransportError> {
        self.transport.close().await
    }

    async fn call(
        &mut self,
        operation: Operation,
        payload: Payload,
    ) -> Result<String, ServiceError> {
        let request = codec::encode(operation, payload)?;
        self.exchange(request).await
    }

    async fn exchange(&mut self, request: Request) -> Result<String, ServiceError> {
        let line = request.to_line()?;
        debug!("-> {}", line);
        let raw = match self.round_trip(line).await {
            Ok(raw) => raw,
            Err(e) => {
                if let Err(close_err) = self.transport.close().await {
                    warn!("closing connection after {}: {}", e, close_err);
                }
                return Err(e.into());
            }
        };
        debug!("<- {}", raw);
        let response = Response::from_line(&raw)?;
        match response.response_code {
            ResponseCode::Ok => Ok(response.response_data),
            code => Err(ServiceError::Rejected {
                code,
                message: response.response_data,
            }),
        }
    }

    async fn round_trip(&mut self, line: String) -> Result<String, TransportError> {
        self.transport.send(line).await?;
        self.transport.recv().await
    }

    async fn call_ids(
        &mut self,
        operation: Operation,
        payload: Payload,
    ) -> Result<Vec<GameId>, ServiceError> {
        let raw = self.call(operation, payload).await?;
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        Ok(codec::decode_list(&raw, codec::decode_scalar)?)
    }

    async fn call_names(
        &mut self,
        operation: Operation,
        payload: Payload,
    ) -> Result<Vec<String>, ServiceError> {
        let raw = self.call(operation, payload).await?;
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        Ok(codec::decode_list(&raw, |token| Ok(token.to_string()))?)
    }
}

#[async_trait::async_trait]
impl<T: Transport> BullsCowsService for BullsCowsStub<T> {
    async fn create_game(&mut self, sequence_length: u32) -> Result<GameId, ServiceError> {
        let raw = self.call(Operation::CreateGame, Payload::scalar(sequence_length)).await?;
        Ok(codec::decode_scalar(&raw)?)
    }

    async fn start_game(&mut self, game_id: GameId) -> Result<Vec<String>, ServiceError> {
        self.call_names(Operation::StartGame, Payload::scalar(game_id)).await
    }

    async fn register_gamer(
        &mut self,
        username: &str,
        birth_date: NaiveDate,
    ) -> Result<(), ServiceError> {
        let gamer = GamerData {
            username: username.to_string(),
            birth_date,
        };
        self.call(Operation::RegisterGamer, Payload::record(&gamer)?).await?;
        Ok(())
    }

    async fn gamer_join_game(
        &mut self,
        game_id: GameId,
        username: &str,
    ) -> Result<(), ServiceError> {
        let key = Payload::compound(&[&game_id, &username]);
        self.call(Operation::GamerJoinGame, key).await?;
        Ok(())
    }

    async fn get_not_started_games(&mut self) -> Result<Vec<GameId>, ServiceError> {
        self.call_ids(Operation::GetNotStartedGames, Payload::Empty).await
    }

    async fn move_processing(
        &mut self,
        sequence: &str,
        game_id: GameId,
        username: &str,
    ) -> Result<Vec<MoveData>, ServiceError> {
        let guess = SequenceGameGamer {
            sequence: sequence.to_string(),
            game_id,
            username: username.to_string(),
        };
        let raw = self.call(Operation::MoveProcessing, Payload::record(&guess)?).await?;
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        Ok(codec::decode_list(&raw, codec::decode_record)?)
    }

    async fn game_over(&mut self, game_id: GameId) -> Result<bool, ServiceError> {
        let raw = self.call(Operation::GameOver, Payload::scalar(game_id)).await?;
        Ok(codec::decode_scalar(&raw)?)
    }

    async fn get_game_gamers(&mut self, game_id: GameId) -> Result<Vec<String>, ServiceError> {
        self.call_names(Operation::GetGameGamers, Payload::scalar(game_id)).await
    }

    async fn get_not_started_games_with_gamer(
        &mut self,
        username: &str,
    ) -> Result<Vec<GameId>, ServiceError> {
        self.call_ids(Operation::GetNotStartedGamesWithGamer, Payload::scalar(username)).await
    }

    async fn get_not_started_games_with_no_gamer(
        &mut self,
        username: &str,
    ) -> Result<Vec<GameId>, ServiceError> {
        self.call_ids(Operation::GetNotStartedGamesWithNoGamer, Payload::scalar(username)).await
    }

    async fn get_started_games_with_gamer(
        &mut self,
        username: &str,
    ) -> Result<Vec<GameId>, ServiceError> {
        self.call_ids(Operation::GetStartedGamesWithGamer, Payload::scalar(username)).await
    }

    async fn login_gamer(&mut self, username: &str) -> Result<(), ServiceError> {
        self.call(Operation::LoginGamer, Payload::scalar(username)).await?;
        Ok(())
    }

    async fn get_all_gamers(&mut self) -> Result<Vec<String>, ServiceError> {
        self.call_names(Operation::GetAllGamers, Payload::Empty).await
    }

    async fn get_game_sequence_length(&mut self, game_id: GameId) -> Result<u32, ServiceError> {
        let raw = self.call(Operation::GetGameSequenceLength, Payload::scalar(game_id)).await?;
        Ok(codec::decode_scalar(&raw)?)
    }

    async fn get_game_defaults(&mut self) -> Result<GameDefaultData, ServiceError> {
        let raw = self.call(Operation::GetGameDefaults, Payload::Empty).await?;
        Ok(codec::decode_record(&raw)?)
    }
}
