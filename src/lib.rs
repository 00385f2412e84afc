pub mod codec;
pub mod config;
pub mod console;
pub mod domain;
pub mod engine;
pub mod flow;
mod logging;
pub mod protocol;
pub mod service;
pub mod session;
pub mod skeleton;
pub mod stub;
pub mod transport;
pub mod validation;

pub use codec::{CodecError, Payload, LIST_DELIMITER};
pub use config::*;
pub use console::{ConsoleIo, InputError, InputOutput, ScriptedIo};
pub use domain::*;
pub use engine::BullsCowsEngine;
pub use flow::{Action, FlowError, GameFlow, Screen, Transition};
pub use logging::init_logging;
pub use protocol::{Operation, ProtocolError, Request, Response, ResponseCode};
pub use service::{BullsCowsService, ServiceError};
pub use session::{Phase, SessionError, SessionState};
pub use skeleton::Skeleton;
pub use stub::BullsCowsStub;
pub use transport::in_memory::InMemoryTransport;
pub use transport::tcp::TcpTransport;
pub use transport::{Transport, TransportError};
