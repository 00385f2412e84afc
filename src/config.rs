use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 4000;

/// Default timeout for a single send or receive on the network (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How long a served connection may wait for the gamer's next request (30 minutes).
pub const SERVER_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Longest response line accepted from the server (1 MiB).
pub const MAX_LINE_LENGTH: u64 = 1 << 20;

/// How many times a prompt is repeated after invalid input before the sub-flow is abandoned.
pub const MAX_INPUT_ATTEMPTS: usize = 5;

pub const MIN_SEQUENCE_LENGTH: u32 = 4;
pub const MAX_SEQUENCE_LENGTH: u32 = 10;
pub const DEFAULT_SEQUENCE_LENGTH: u32 = 4;
pub const MIN_GAMER_AGE: u32 = 16;

/// Game defaults served by the reference engine.
pub const REFERENCE_DEFAULTS: crate::domain::GameDefaultData = crate::domain::GameDefaultData {
    min_seq_len: MIN_SEQUENCE_LENGTH,
    max_seq_len: MAX_SEQUENCE_LENGTH,
    def_seq_len: DEFAULT_SEQUENCE_LENGTH,
    min_age: MIN_GAMER_AGE,
};
