use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::Mutex;

use crate::codec::{self, CodecError};
use crate::domain::{GameId, GamerData, SequenceGameGamer};
use crate::protocol::{Operation, Request, Response, ResponseCode};
use crate::service::{BullsCowsService, ServiceError};
use crate::transport::{Transport, TransportError};

/// Server side of the protocol: decodes each request line, calls the
/// service, and writes back one response line.
///
/// The service sits behind a shared lock so that several connections can
/// drive the same game state.
pub struct Skeleton<S: BullsCowsService, T: Transport> {
    service: Arc<Mutex<S>>,
    transport: T,
}

impl<S: BullsCowsService, T: Transport> Skeleton<S, T> {
    pub fn new(service: S, transport: T) -> Self {
        Self::shared(Arc::new(Mutex::new(service)), transport)
    }

    pub fn shared(service: Arc<Mutex<S>>, transport: T) -> Self {
        Self { service, transport }
    }

    pub fn service(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.service)
    }

    /// Serve requests until the peer disconnects.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let line = match self.transport.recv().await {
                Ok(line) => line,
                Err(TransportError::Closed) => return Ok(()),
                Err(e) => return Err(e.into()),
            };
            let response = self.handle_line(&line).await;
            self.transport.send(response.to_line()?).await?;
        }
    }

    /// Answer one raw request line. Never fails: errors become error responses.
    pub async fn handle_line(&mut self, line: &str) -> Response {
        match Request::from_line(line) {
            Ok(request) => self.handle(&request).await,
            Err(e) => Response::error(ResponseCode::WrongType, e.to_string()),
        }
    }

    pub async fn handle(&mut self, request: &Request) -> Response {
        let operation = match request.operation() {
            Ok(op) => op,
            Err(e) => {
                warn!("{}", e);
                return Response::error(ResponseCode::WrongType, e.to_string());
            }
        };
        debug!("dispatch {} {:?}", operation, request.request_data);
        let mut service = self.service.lock().await;
        match dispatch(&mut *service, operation, &request.request_data).await {
            Ok(data) => Response::ok(data),
            Err(DispatchError::Service(ServiceError::Rejected { code, message })) => {
                Response::error(code, message)
            }
            Err(e) => Response::error(ResponseCode::WrongData, e.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum DispatchError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

async fn dispatch<S: BullsCowsService>(
    service: &mut S,
    operation: Operation,
    data: &str,
) -> Result<String, DispatchError> {
    let result = match operation {
        Operation::CreateGame => {
            let length: u32 = codec::decode_scalar(data)?;
            service.create_game(length).await?.to_string()
        }
        Operation::StartGame => {
            let id: GameId = codec::decode_scalar(data)?;
            codec::encode_list(service.start_game(id).await?)
        }
        Operation::RegisterGamer => {
            let gamer: GamerData = codec::decode_record(data)?;
            service.register_gamer(&gamer.username, gamer.birth_date).await?;
            String::new()
        }
        Operation::GamerJoinGame => {
            let parts = codec::decode_compound(data, 2)?;
            let id: GameId = codec::decode_scalar(parts[0])?;
            service.gamer_join_game(id, parts[1]).await?;
            String::new()
        }
        Operation::GetNotStartedGames => codec::encode_list(service.get_not_started_games().await?),
        Operation::MoveProcessing => {
            let guess: SequenceGameGamer = codec::decode_record(data)?;
            let moves = service
                .move_processing(&guess.sequence, guess.game_id, &guess.username)
                .await?;
            codec::encode_record_list(&moves)?
        }
        Operation::GameOver => {
            let id: GameId = codec::decode_scalar(data)?;
            service.game_over(id).await?.to_string()
        }
        Operation::GetGameGamers => {
            let id: GameId = codec::decode_scalar(data)?;
            codec::encode_list(service.get_game_gamers(id).await?)
        }
        Operation::GetNotStartedGamesWithGamer => {
            codec::encode_list(service.get_not_started_games_with_gamer(data).await?)
        }
        Operation::GetNotStartedGamesWithNoGamer => {
            codec::encode_list(service.get_not_started_games_with_no_gamer(data).await?)
        }
        Operation::GetStartedGamesWithGamer => {
            codec::encode_list(service.get_started_games_with_gamer(data).await?)
        }
        Operation::LoginGamer => {
            service.login_gamer(data).await?;
            data.to_string()
        }
        Operation::GetAllGamers => codec::encode_list(service.get_all_gamers().await?),
        Operation::GetGameSequenceLength => {
            let id: GameId = codec::decode_scalar(data)?;
            service.get_game_sequence_length(id).await?.to_string()
        }
        Operation::GetGameDefaults => codec::encode_record(&service.get_game_defaults().await?)?,
    };
    Ok(result)
}
