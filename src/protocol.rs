use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors raised while reading or writing request/response envelopes.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed envelope: {0}")]
    Envelope(#[from] serde_json::Error),
    #[error("unknown operation \"{0}\"")]
    UnknownOperation(String),
}

/// How an operation's arguments are laid out in the request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// No arguments; the payload is the empty string.
    Empty,
    /// A single bare value.
    Scalar,
    /// `arity` values joined with the list delimiter.
    Compound { arity: usize },
    /// A JSON object.
    Record,
}

/// Remote operations exposed by the game server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateGame,
    StartGame,
    RegisterGamer,
    GamerJoinGame,
    GetNotStartedGames,
    MoveProcessing,
    GameOver,
    GetGameGamers,
    GetNotStartedGamesWithGamer,
    GetNotStartedGamesWithNoGamer,
    GetStartedGamesWithGamer,
    LoginGamer,
    GetAllGamers,
    GetGameSequenceLength,
    GetGameDefaults,
}

impl Operation {
    pub const ALL: [Operation; 15] = [
        Operation::CreateGame,
        Operation::StartGame,
        Operation::RegisterGamer,
        Operation::GamerJoinGame,
        Operation::GetNotStartedGames,
        Operation::MoveProcessing,
        Operation::GameOver,
        Operation::GetGameGamers,
        Operation::GetNotStartedGamesWithGamer,
        Operation::GetNotStartedGamesWithNoGamer,
        Operation::GetStartedGamesWithGamer,
        Operation::LoginGamer,
        Operation::GetAllGamers,
        Operation::GetGameSequenceLength,
        Operation::GetGameDefaults,
    ];

    /// Identifier sent as `requestType`.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::CreateGame => "createGame",
            Operation::StartGame => "startGame",
            Operation::RegisterGamer => "registerGamer",
            Operation::GamerJoinGame => "gamerJoinGame",
            Operation::GetNotStartedGames => "getNotStartedGames",
            Operation::MoveProcessing => "moveProcessing",
            Operation::GameOver => "gameOver",
            Operation::GetGameGamers => "getGameGamers",
            Operation::GetNotStartedGamesWithGamer => "getNotStartedGamesWithGamer",
            Operation::GetNotStartedGamesWithNoGamer => "getNotStartedGamesWithNoGamer",
            Operation::GetStartedGamesWithGamer => "getStartedGamesWithGamer",
            Operation::LoginGamer => "loginGamer",
            Operation::GetAllGamers => "getAllGamers",
            Operation::GetGameSequenceLength => "getGameSequenceLength",
            Operation::GetGameDefaults => "getGameDefaults",
        }
    }

    /// Fixed payload layout for this operation.
    pub fn scheme(self) -> Scheme {
        match self {
            Operation::GetNotStartedGames
            | Operation::GetAllGamers
            | Operation::GetGameDefaults => Scheme::Empty,
            Operation::GamerJoinGame => Scheme::Compound { arity: 2 },
            Operation::RegisterGamer | Operation::MoveProcessing => Scheme::Record,
            _ => Scheme::Scalar,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownOperation(s.to_string()))
    }
}

/// A single call on the wire.
///
/// `request_type` is kept as a raw string so that a server can answer an
/// unknown operation with `WRONG_TYPE` instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub request_type: String,
    pub request_data: String,
}

impl Request {
    pub fn new(operation: Operation, data: impl Into<String>) -> Self {
        Self {
            request_type: operation.as_str().to_string(),
            request_data: data.into(),
        }
    }

    pub fn operation(&self) -> Result<Operation, ProtocolError> {
        self.request_type.parse()
    }

    pub fn to_line(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_line(line: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(line.trim_end())?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseCode {
    Ok,
    WrongType,
    WrongData,
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResponseCode::Ok => "OK",
            ResponseCode::WrongType => "WRONG_TYPE",
            ResponseCode::WrongData => "WRONG_DATA",
        })
    }
}

/// Server answer: a status code and an operation-specific payload or error text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub response_code: ResponseCode,
    pub response_data: String,
}

impl Response {
    pub fn ok(data: impl Into<String>) -> Self {
        Self {
            response_code: ResponseCode::Ok,
            response_data: data.into(),
        }
    }

    pub fn error(code: ResponseCode, message: impl Into<String>) -> Self {
        Self {
            response_code: code,
            response_data: message.into(),
        }
    }

    pub fn to_line(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_line(line: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(line.trim_end())?)
    }
}
